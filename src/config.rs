//! Run configuration.
//!
//! Enumerated once at startup and immutable for the lifetime of a run.
//!
//! # Example
//!
//! ```ignore
//! use spark_dsl::Config;
//! use std::time::Duration;
//!
//! let config = Config::builder()
//!     .tick_rate(Duration::from_millis(50))
//!     .mouse_capture(true)
//!     .build()?;
//! ```

use std::time::Duration;

use crate::error::{Error, Result};

/// Default interval between ticks.
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    tick_rate: Duration,
    mouse_capture: bool,
    alternate_screen: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            mouse_capture: false,
            alternate_screen: true,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Fixed period between Tick cycles.
    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// When false the backend never enables mouse reporting.
    pub fn mouse_capture(&self) -> bool {
        self.mouse_capture
    }

    pub fn alternate_screen(&self) -> bool {
        self.alternate_screen
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn tick_rate(mut self, rate: Duration) -> Self {
        self.config.tick_rate = rate;
        self
    }

    pub fn mouse_capture(mut self, enabled: bool) -> Self {
        self.config.mouse_capture = enabled;
        self
    }

    pub fn alternate_screen(mut self, enabled: bool) -> Self {
        self.config.alternate_screen = enabled;
        self
    }

    pub fn build(self) -> Result<Config> {
        if self.config.tick_rate.is_zero() {
            return Err(Error::InvalidConfig("tick rate must be non-zero".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
        assert!(!config.mouse_capture());
        assert!(config.alternate_screen());
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = Config::builder()
            .tick_rate(Duration::from_millis(16))
            .mouse_capture(true)
            .alternate_screen(false)
            .build()
            .unwrap();
        assert_eq!(config.tick_rate(), Duration::from_millis(16));
        assert!(config.mouse_capture());
        assert!(!config.alternate_screen());
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let err = Config::builder().tick_rate(Duration::ZERO).build();
        assert!(matches!(err, Err(Error::InvalidConfig(_))));
    }
}

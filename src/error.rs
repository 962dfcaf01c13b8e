//! Error types for spark-dsl.

use std::fmt;

/// The cycle step a component callback was running in when it faulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The application's tree builder or a lazy thunk.
    Build,
    /// A component's `render`.
    Render,
    /// A component's `on_tick`.
    Tick,
    /// Key dispatch (component, container, or global handler).
    Key,
    /// Mouse dispatch.
    Mouse,
    /// Resize broadcast.
    Resize,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Build => "build",
            Phase::Render => "render",
            Phase::Tick => "tick",
            Phase::Key => "key",
            Phase::Mouse => "mouse",
            Phase::Resize => "resize",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two live elements registered the same focus key in one frame.
    #[error("duplicate focus key `{key}` in one frame")]
    DuplicateFocusKey { key: String },

    #[error("terminal backend failure: {0}")]
    Backend(#[from] std::io::Error),

    #[error("input source closed")]
    InputClosed,

    /// A component callback panicked.
    #[error("handler fault during {phase}: {message}")]
    HandlerFault { phase: Phase, message: String },

    #[error("layout failed: {0}")]
    Layout(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether this error ends the run.
    ///
    /// Only a focus-key collision is recoverable: the frame keeps its
    /// previous focus ring and the loop carries on.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::DuplicateFocusKey { .. })
    }
}

impl From<taffy::TaffyError> for Error {
    fn from(err: taffy::TaffyError) -> Self {
        Error::Layout(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_duplicate_key_is_recoverable() {
        let dup = Error::DuplicateFocusKey { key: "a".into() };
        assert!(!dup.is_fatal());
        assert!(Error::InputClosed.is_fatal());
        assert!(Error::Layout("x".into()).is_fatal());
    }

    #[test]
    fn test_fault_message_names_phase() {
        let err = Error::HandlerFault {
            phase: Phase::Tick,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "handler fault during tick: boom");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Backend(_)));
    }
}

//! Taffy Bridge - Integration with Taffy layout engine
//!
//! Converts frame nodes to Taffy styles, runs layout computation, and
//! extracts absolute rectangles back into a [`LayoutMap`].
//!
//! Constraints map onto the parent's main axis:
//!
//! | constraint      | basis        | grow | shrink | extra                |
//! |-----------------|--------------|------|--------|----------------------|
//! | `Length(n)`     | n            | 0    | 0      | main size = n        |
//! | `Percentage(p)` | p%           | 0    | 1      | main size = p%       |
//! | `Ratio(a, b)`   | a/b          | 0    | 1      | main size = a/b      |
//! | `Min(n)`        | n            | 1    | 0      | min size = n         |
//! | `Max(n)`        | 0            | 1    | 1      | max size = n         |
//! | `Fill(w)`       | 0            | w    | 1      |                      |

use taffy::{
    AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage, LengthPercentageAuto,
    NodeId, Position, Size, Style, TaffyTree,
};

use crate::error::Result;
use crate::pipeline::{FrameTree, NodeContent};
use crate::primitives::{ContainerKind, FloatGeometry};
use crate::types::{Constraint, Rect};

use super::text_measure::measure;
use super::{LayoutMap, LayoutResolver};

// =============================================================================
// AXIS
// =============================================================================

/// Main axis of the parent container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn of(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Row => Axis::Horizontal,
            _ => Axis::Vertical,
        }
    }
}

fn main_mut(size: &mut Size<Dimension>, axis: Axis) -> &mut Dimension {
    match axis {
        Axis::Horizontal => &mut size.width,
        Axis::Vertical => &mut size.height,
    }
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

fn apply_constraint(style: &mut Style, constraint: Constraint, axis: Axis) {
    match constraint {
        Constraint::Length(n) => {
            *main_mut(&mut style.size, axis) = Dimension::Length(n as f32);
            style.flex_basis = Dimension::Length(n as f32);
            style.flex_grow = 0.0;
            style.flex_shrink = 0.0;
        }
        Constraint::Percentage(p) => {
            let fraction = p.min(100) as f32 / 100.0;
            *main_mut(&mut style.size, axis) = Dimension::Percent(fraction);
            style.flex_basis = Dimension::Percent(fraction);
            style.flex_grow = 0.0;
            style.flex_shrink = 1.0;
        }
        Constraint::Ratio(numerator, denominator) => {
            let fraction = if denominator == 0 {
                0.0
            } else {
                (numerator as f32 / denominator as f32).min(1.0)
            };
            *main_mut(&mut style.size, axis) = Dimension::Percent(fraction);
            style.flex_basis = Dimension::Percent(fraction);
            style.flex_grow = 0.0;
            style.flex_shrink = 1.0;
        }
        Constraint::Min(n) => {
            *main_mut(&mut style.min_size, axis) = Dimension::Length(n as f32);
            style.flex_basis = Dimension::Length(n as f32);
            style.flex_grow = 1.0;
            style.flex_shrink = 0.0;
        }
        Constraint::Max(n) => {
            *main_mut(&mut style.max_size, axis) = Dimension::Length(n as f32);
            style.flex_basis = Dimension::Length(0.0);
            style.flex_grow = 1.0;
            style.flex_shrink = 1.0;
        }
        Constraint::Fill(weight) => {
            style.flex_basis = Dimension::Length(0.0);
            style.flex_grow = weight as f32;
            style.flex_shrink = 1.0;
        }
    }
}

fn text_style(content: &str, constraint: Option<Constraint>, axis: Axis) -> Style {
    let mut style = Style::default();
    match constraint {
        Some(constraint) => apply_constraint(&mut style, constraint, axis),
        None => {
            // Natural size along the main axis, stretched across it
            let (width, height) = measure(content);
            let natural = match axis {
                Axis::Horizontal => width,
                Axis::Vertical => height,
            };
            style.flex_basis = Dimension::Length(natural as f32);
            style.flex_grow = 0.0;
            style.flex_shrink = 1.0;
        }
    }
    style
}

fn border_all() -> taffy::Rect<LengthPercentage> {
    taffy::Rect {
        left: LengthPercentage::Length(1.0),
        right: LengthPercentage::Length(1.0),
        top: LengthPercentage::Length(1.0),
        bottom: LengthPercentage::Length(1.0),
    }
}

fn float_style(geometry: FloatGeometry) -> Style {
    Style {
        position: Position::Absolute,
        inset: taffy::Rect {
            left: LengthPercentageAuto::Length(geometry.x as f32),
            top: LengthPercentageAuto::Length(geometry.y as f32),
            right: LengthPercentageAuto::Auto,
            bottom: LengthPercentageAuto::Auto,
        },
        size: Size {
            width: Dimension::Length(geometry.width as f32),
            height: Dimension::Length(geometry.height as f32),
        },
        flex_direction: FlexDirection::Column,
        border: border_all(),
        ..Default::default()
    }
}

fn container_style(
    kind: ContainerKind,
    float: Option<FloatGeometry>,
    constraint: Option<Constraint>,
    axis: Axis,
) -> Style {
    if kind == ContainerKind::Float {
        return float_style(float.unwrap_or_default());
    }

    let mut style = Style {
        display: Display::Flex,
        flex_direction: match kind {
            ContainerKind::Row => FlexDirection::Row,
            _ => FlexDirection::Column,
        },
        ..Default::default()
    };
    if kind == ContainerKind::Panel {
        style.border = border_all();
    }
    apply_constraint(&mut style, constraint.unwrap_or_default(), axis);
    style
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Default layout solver backed by a reusable Taffy tree.
pub struct TaffyLayout {
    taffy: TaffyTree<()>,
}

impl Default for TaffyLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TaffyLayout {
    pub fn new() -> Self {
        Self {
            taffy: TaffyTree::new(),
        }
    }

    fn build(
        &mut self,
        tree: &FrameTree,
        idx: usize,
        axis: Axis,
        inherited: Option<Constraint>,
        ids: &mut [Option<NodeId>],
    ) -> Result<NodeId> {
        let node = tree.node(idx);
        let constraint = inherited.or(node.constraint);

        let id = match &node.content {
            // Transparent: the wrapper shares its output's node
            NodeContent::Component(_) => match node.children.first() {
                Some(&child) => self.build(tree, child, axis, constraint, ids)?,
                None => self.taffy.new_leaf(Style {
                    display: Display::None,
                    ..Default::default()
                })?,
            },
            NodeContent::Text(content) => self.taffy.new_leaf(text_style(content, constraint, axis))?,
            NodeContent::Container(kind) => {
                let style = container_style(*kind, node.float, constraint, axis);
                let child_axis = Axis::of(*kind);
                let children = node
                    .children
                    .iter()
                    .map(|&child| self.build(tree, child, child_axis, None, ids))
                    .collect::<Result<Vec<_>>>()?;
                self.taffy.new_with_children(style, &children)?
            }
        };

        ids[idx] = Some(id);
        Ok(id)
    }

    fn extract(
        &self,
        tree: &FrameTree,
        idx: usize,
        origin: (f32, f32),
        ids: &[Option<NodeId>],
        map: &mut LayoutMap,
    ) -> Result<()> {
        let node = tree.node(idx);

        if node.component().is_some() {
            // Same taffy node as the output, so same origin
            let rect = match node.children.first() {
                Some(&child) => {
                    self.extract(tree, child, origin, ids, map)?;
                    map.rect(child)
                }
                None => Rect::new(to_cell(origin.0), to_cell(origin.1), 0, 0),
            };
            map.set(idx, rect);
            return Ok(());
        }

        let Some(id) = ids[idx] else {
            return Ok(());
        };
        let layout = self.taffy.layout(id)?;
        let x = origin.0 + layout.location.x;
        let y = origin.1 + layout.location.y;
        map.set(
            idx,
            Rect::new(
                to_cell(x),
                to_cell(y),
                to_cell(layout.size.width),
                to_cell(layout.size.height),
            ),
        );

        for &child in &node.children {
            self.extract(tree, child, (x, y), ids, map)?;
        }
        Ok(())
    }
}

fn to_cell(value: f32) -> u16 {
    value.round().clamp(0.0, u16::MAX as f32) as u16
}

impl LayoutResolver for TaffyLayout {
    fn resolve(&mut self, tree: &FrameTree, area: Rect) -> Result<LayoutMap> {
        let mut map = LayoutMap::empty(tree.len());
        let Some(root) = tree.root() else {
            return Ok(map);
        };
        if area.is_empty() {
            return Ok(map);
        }

        self.taffy.clear();
        let mut ids = vec![None; tree.len()];
        let content = self.build(tree, root, Axis::Vertical, None, &mut ids)?;

        let width = area.width as f32;
        let height = area.height as f32;
        let frame_root = self.taffy.new_with_children(
            Style {
                flex_direction: FlexDirection::Column,
                size: Size {
                    width: Dimension::Length(width),
                    height: Dimension::Length(height),
                },
                ..Default::default()
            },
            &[content],
        )?;

        self.taffy.compute_layout(
            frame_root,
            Size {
                width: AvailableSpace::Definite(width),
                height: AvailableSpace::Definite(height),
            },
        )?;

        self.extract(tree, root, (area.x as f32, area.y as f32), &ids, &mut map)?;
        Ok(map)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Component, Components};
    use crate::primitives::*;
    use crate::state::focus::FocusRegistry;

    fn resolve(element: Element, components: &Components, width: u16, height: u16) -> (FrameTree, LayoutMap) {
        let mut tree = FrameTree::materialize(element, components);
        tree.expand_components(components, &FocusRegistry::new());
        let map = TaffyLayout::new()
            .resolve(&tree, Rect::new(0, 0, width, height))
            .unwrap();
        (tree, map)
    }

    fn rects(tree: &FrameTree, map: &LayoutMap) -> Vec<Rect> {
        tree.traverse().into_iter().map(|idx| map.rect(idx)).collect()
    }

    #[test]
    fn test_empty_area() {
        let components = Components::new();
        let (_, map) = resolve(column([text("a")]), &components, 0, 0);
        assert!(map.rect(0).is_empty());
    }

    #[test]
    fn test_column_lengths() {
        let components = Components::new();
        let (tree, map) = resolve(
            column([text("a").constraint(length(2)), text("b").constraint(length(3))]),
            &components,
            20,
            10,
        );
        let r = rects(&tree, &map);
        assert_eq!(r[0], Rect::new(0, 0, 20, 10));
        assert_eq!(r[1], Rect::new(0, 0, 20, 2));
        assert_eq!(r[2], Rect::new(0, 2, 20, 3));
    }

    #[test]
    fn test_row_fill_weights() {
        let components = Components::new();
        let (tree, map) = resolve(
            row([
                column([]).constraint(fill()),
                column([]).constraint(fill_weighted(2)),
            ]),
            &components,
            30,
            4,
        );
        let r = rects(&tree, &map);
        assert_eq!(r[1], Rect::new(0, 0, 10, 4));
        assert_eq!(r[2], Rect::new(10, 0, 20, 4));
    }

    #[test]
    fn test_percentage() {
        let components = Components::new();
        let (tree, map) = resolve(
            row([column([]).constraint(percent(25)), spacer()]),
            &components,
            40,
            2,
        );
        let r = rects(&tree, &map);
        assert_eq!(r[1].width, 10);
        assert_eq!(r[2], Rect::new(10, 0, 30, 2));
    }

    #[test]
    fn test_panel_border_insets_children() {
        let components = Components::new();
        let (tree, map) = resolve(
            panel([text("inside").constraint(length(1))]),
            &components,
            12,
            5,
        );
        let r = rects(&tree, &map);
        assert_eq!(r[0], Rect::new(0, 0, 12, 5));
        assert_eq!(r[1], Rect::new(1, 1, 10, 1));
    }

    #[test]
    fn test_float_is_absolute() {
        let components = Components::new();
        let geometry = FloatGeometry { x: 5, y: 3, width: 10, height: 4, z: 0 };
        let (tree, map) = resolve(
            column([text("flow").constraint(length(1)), float(geometry, [])]),
            &components,
            40,
            20,
        );
        let r = rects(&tree, &map);
        assert_eq!(r[1], Rect::new(0, 0, 40, 1));
        assert_eq!(r[2], Rect::new(5, 3, 10, 4));
    }

    #[test]
    fn test_component_wrapper_matches_output() {
        struct Boxed;
        impl Component for Boxed {
            fn render(&self, _focused: bool) -> Element {
                panel([])
            }
        }

        let mut components = Components::new();
        let id = components.add(Boxed);
        let (tree, map) = resolve(
            column([text("top").constraint(length(2)), component(id).constraint(length(4))]),
            &components,
            10,
            10,
        );
        let r = rects(&tree, &map);
        // column, text, wrapper, panel
        assert_eq!(r[2], Rect::new(0, 2, 10, 4));
        assert_eq!(r[2], r[3]);
    }
}

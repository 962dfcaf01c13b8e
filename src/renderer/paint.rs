//! Paint pass - draws a laid-out frame tree into a [`Canvas`].
//!
//! Normal flow paints in traversal order with each container clipping its
//! children. Floats are lifted out of the flow and painted afterwards,
//! lowest z first, each clearing the cells underneath it.

use crate::layout::LayoutMap;
use crate::pipeline::{FrameTree, NodeContent};
use crate::primitives::ContainerKind;
use crate::types::{Rect, Style};

use super::canvas::Canvas;

const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';
const HORIZONTAL: char = '─';
const VERTICAL: char = '│';

struct Deferred {
    z: u32,
    order: usize,
    idx: usize,
    style: Style,
}

pub fn paint(tree: &FrameTree, layout: &LayoutMap, width: u16, height: u16) -> Canvas {
    let mut canvas = Canvas::new(width, height);
    let Some(root) = tree.root() else {
        return canvas;
    };

    let area = canvas.area();
    let mut floats = Vec::new();
    paint_node(tree, layout, root, area, Style::default(), &mut canvas, Some(&mut floats));

    floats.sort_by_key(|f| (f.z, f.order));
    for float in floats {
        paint_node(tree, layout, float.idx, area, float.style, &mut canvas, None);
    }
    canvas
}

fn paint_node(
    tree: &FrameTree,
    layout: &LayoutMap,
    idx: usize,
    clip: Rect,
    inherited: Style,
    canvas: &mut Canvas,
    mut floats: Option<&mut Vec<Deferred>>,
) {
    let node = tree.node(idx);
    let rect = layout.rect(idx);

    if node.is_float() {
        if let Some(deferred) = floats.as_deref_mut() {
            deferred.push(Deferred {
                z: node.float.map(|g| g.z).unwrap_or(0),
                order: node.order,
                idx,
                style: inherited,
            });
            return;
        }
    }

    let style = inherited.patch(node.style);
    let visible = rect.intersect(&clip).unwrap_or_default();

    let child_clip = match &node.content {
        NodeContent::Text(content) => {
            for (row, line) in content.lines().enumerate().take(rect.height as usize) {
                canvas.put_str(rect.x, rect.y + row as u16, line, style, visible);
            }
            visible
        }
        NodeContent::Component(_) => clip,
        NodeContent::Container(kind) => {
            if *kind == ContainerKind::Float || !style.bg.is_terminal_default() {
                canvas.fill(visible, Style::new().bg(style.bg));
            }
            if node.has_border() {
                draw_border(canvas, rect, visible, style, node.title.as_deref());
                rect.inner().intersect(&clip).unwrap_or_default()
            } else {
                visible
            }
        }
    };

    for &child in &node.children {
        paint_node(tree, layout, child, child_clip, style, canvas, floats.as_deref_mut());
    }
}

fn draw_border(canvas: &mut Canvas, rect: Rect, clip: Rect, style: Style, title: Option<&str>) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let right = rect.right() - 1;
    let bottom = rect.bottom() - 1;
    let mut put = |x: u16, y: u16, c: char| {
        if clip.contains(x, y) {
            canvas.set(x, y, c, style);
        }
    };

    put(rect.x, rect.y, TOP_LEFT);
    put(right, rect.y, TOP_RIGHT);
    put(rect.x, bottom, BOTTOM_LEFT);
    put(right, bottom, BOTTOM_RIGHT);
    for x in rect.x + 1..right {
        put(x, rect.y, HORIZONTAL);
        put(x, bottom, HORIZONTAL);
    }
    for y in rect.y + 1..bottom {
        put(rect.x, y, VERTICAL);
        put(right, y, VERTICAL);
    }

    if let Some(title) = title {
        let slot = Rect::new(rect.x + 1, rect.y, rect.width - 2, 1)
            .intersect(&clip)
            .unwrap_or_default();
        canvas.put_str(rect.x + 1, rect.y, &format!(" {title} "), style, slot);
    }
}

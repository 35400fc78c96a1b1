//! Rasterizer - retained tree to frame buffer, one pass per frame.
//!
//! Recursive, offset-accumulating walk. The offset is an explicit parameter
//! threaded through every call: visiting a node at cumulative `(ox, oy)`
//! clears its rendered-cell set, paints through a writer that clamps to the
//! buffer and records each absolute coordinate in that set, then recurses
//! into children at `(ox + child.x, oy + child.y)` in declaration order.
//!
//! Later paints win at shared coordinates (painter's algorithm). The pass
//! touches every live node exactly once and never compares against the
//! previous frame; that is the commit pass's job.

use std::collections::HashSet;

use crate::buffer::FrameBuffer;
use crate::tree::{NodeArena, NodeId, NodeKind};
use crate::types::{BorderStyle, CellAttrs, Color, Rect};

/// Rasterize the tree into the buffer and refresh every node's
/// rendered-cell set.
pub fn rasterize(arena: &mut NodeArena, root: NodeId, buffer: &mut FrameBuffer) {
    buffer.reset_current();
    raster_node(arena, buffer, root, 0, 0);
}

fn raster_node(arena: &mut NodeArena, buffer: &mut FrameBuffer, id: NodeId, ox: i32, oy: i32) {
    let Some(node) = arena.get_mut(id) else {
        return;
    };

    let mut cells = std::mem::take(&mut node.rendered_cells);
    cells.clear();
    let kind = node.kind.clone();
    let rect = node.rect;
    let children = node.children.clone();

    {
        let mut painter = CellPainter {
            buffer,
            cells: &mut cells,
            ox,
            oy,
        };
        match &kind {
            NodeKind::Root => {}
            NodeKind::Box {
                character,
                fg,
                bg,
                border,
            } => paint_box(&mut painter, rect, *character, *fg, *bg, *border),
            NodeKind::Text { content, fg, bg } => paint_text(&mut painter, content, *fg, *bg),
        }
    }

    if let Some(node) = arena.get_mut(id) {
        node.rendered_cells = cells;
    }

    for child in children {
        let Some((cx, cy)) = arena.get(child).map(|c| (c.rect.x, c.rect.y)) else {
            continue;
        };
        raster_node(arena, buffer, child, ox + cx, oy + cy);
    }
}

// =============================================================================
// CellPainter
// =============================================================================

/// Write function handed to a node's paint: node-local coordinates in,
/// clamped absolute buffer writes plus occupancy tracking out.
struct CellPainter<'a> {
    buffer: &'a mut FrameBuffer,
    cells: &'a mut HashSet<(u16, u16)>,
    ox: i32,
    oy: i32,
}

impl CellPainter<'_> {
    fn put(&mut self, dx: i32, dy: i32, attrs: CellAttrs) {
        let Ok(x) = u16::try_from(self.ox + dx) else {
            return;
        };
        let Ok(y) = u16::try_from(self.oy + dy) else {
            return;
        };
        if self.buffer.set(x, y, attrs) {
            self.cells.insert((x, y));
        }
    }
}

// =============================================================================
// Paint capabilities
// =============================================================================

/// Fill the box rectangle, then overlay the border frame if styled.
///
/// Zero or negative width/height paints nothing. Borders need at least a
/// 2x2 box, otherwise the frame would collapse onto itself.
fn paint_box(
    painter: &mut CellPainter<'_>,
    rect: Rect,
    character: char,
    fg: Color,
    bg: Color,
    border: BorderStyle,
) {
    if rect.width <= 0 || rect.height <= 0 {
        return;
    }

    let fill = CellAttrs {
        ch: character,
        fg,
        bg,
    };
    for y in 0..rect.height {
        for x in 0..rect.width {
            painter.put(x, y, fill);
        }
    }

    if border == BorderStyle::None || rect.width < 2 || rect.height < 2 {
        return;
    }

    let (horiz, vert, tl, tr, br, bl) = border.chars();
    let x2 = rect.width - 1;
    let y2 = rect.height - 1;
    let edge = |ch: char| CellAttrs { ch, fg, bg };

    for x in 1..x2 {
        painter.put(x, 0, edge(horiz));
        painter.put(x, y2, edge(horiz));
    }
    for y in 1..y2 {
        painter.put(0, y, edge(vert));
        painter.put(x2, y, edge(vert));
    }
    painter.put(0, 0, edge(tl));
    painter.put(x2, 0, edge(tr));
    painter.put(x2, y2, edge(br));
    painter.put(0, y2, edge(bl));
}

/// One glyph per character, content split on newlines into rows.
///
/// No wrapping: glyphs past the buffer edge are dropped by the painter's
/// bounds clamp. Text paints its full content regardless of the node's
/// width/height; there is no box model for text runs.
fn paint_text(painter: &mut CellPainter<'_>, content: &str, fg: Color, bg: Color) {
    for (row, line) in content.split('\n').enumerate() {
        for (col, ch) in line.chars().enumerate() {
            painter.put(col as i32, row as i32, CellAttrs { ch, fg, bg });
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Attribute;
    use pretty_assertions::assert_eq;

    fn setup(width: u16, height: u16) -> (NodeArena, NodeId, FrameBuffer) {
        let mut arena = NodeArena::new();
        let root = arena.create_node_at(
            NodeKind::Root,
            Rect::new(0, 0, width as i32, height as i32),
        );
        (arena, root, FrameBuffer::new(width, height))
    }

    fn boxed(character: char, rect: Rect) -> (NodeKind, Rect) {
        (
            NodeKind::Box {
                character,
                fg: Color::WHITE,
                bg: Color::BLACK,
                border: BorderStyle::None,
            },
            rect,
        )
    }

    #[test]
    fn test_nested_offsets_accumulate() {
        let (mut arena, root, mut buffer) = setup(30, 30);
        let (kind, rect) = boxed('o', Rect::new(5, 5, 10, 10));
        let outer = arena.create_node_at(kind, rect);
        let (kind, rect) = boxed('i', Rect::new(1, 1, 8, 8));
        let inner = arena.create_node_at(kind, rect);
        arena.append_child(root, outer).unwrap();
        arena.append_child(outer, inner).unwrap();

        rasterize(&mut arena, root, &mut buffer);

        // Inner box covers absolute x,y in [6, 13]
        for coord in 6..=13u16 {
            assert_eq!(buffer.get(coord, 6).unwrap().ch, 'i');
            assert_eq!(buffer.get(6, coord).unwrap().ch, 'i');
        }
        assert_eq!(buffer.get(13, 13).unwrap().ch, 'i');
        // Outer still visible outside the inner rectangle
        assert_eq!(buffer.get(5, 5).unwrap().ch, 'o');
        assert_eq!(buffer.get(14, 14).unwrap().ch, 'o');
        // Untouched cell stays default
        assert_eq!(buffer.get(0, 0).unwrap().ch, ' ');

        let inner_cells = arena.get(inner).unwrap().rendered_cells();
        assert_eq!(inner_cells.len(), 64);
        assert!(inner_cells.contains(&(6, 6)));
        assert!(inner_cells.contains(&(13, 13)));
        assert!(!inner_cells.contains(&(5, 5)));
    }

    #[test]
    fn test_later_sibling_wins_shared_cells() {
        let (mut arena, root, mut buffer) = setup(10, 10);
        let (kind, rect) = boxed('a', Rect::new(0, 0, 5, 5));
        let first = arena.create_node_at(kind, rect);
        let (kind, rect) = boxed('b', Rect::new(2, 2, 5, 5));
        let second = arena.create_node_at(kind, rect);
        arena.append_child(root, first).unwrap();
        arena.append_child(root, second).unwrap();

        rasterize(&mut arena, root, &mut buffer);

        // Overlap belongs to the later-declared sibling
        assert_eq!(buffer.get(3, 3).unwrap().ch, 'b');
        assert_eq!(buffer.get(1, 1).unwrap().ch, 'a');

        // Both nodes still claim the shared cell for hit-testing
        assert!(arena.get(first).unwrap().rendered_cells().contains(&(3, 3)));
        assert!(arena.get(second).unwrap().rendered_cells().contains(&(3, 3)));
    }

    #[test]
    fn test_text_rows_and_colors() {
        let (mut arena, root, mut buffer) = setup(20, 5);
        let text = arena.create_node_at(
            NodeKind::Text {
                content: "Hello\nWorld".into(),
                fg: Color::LIME,
                bg: Color::NAVY,
            },
            Rect::new(1, 1, 0, 0),
        );
        arena.append_child(root, text).unwrap();

        rasterize(&mut arena, root, &mut buffer);

        for (i, ch) in "Hello".chars().enumerate() {
            let cell = buffer.get(1 + i as u16, 1).unwrap();
            assert_eq!(cell.ch, ch);
            assert_eq!(cell.fg, Color::LIME);
            assert_eq!(cell.bg, Color::NAVY);
        }
        for (i, ch) in "World".chars().enumerate() {
            assert_eq!(buffer.get(1 + i as u16, 2).unwrap().ch, ch);
        }
        assert_eq!(buffer.get(6, 1).unwrap().ch, ' ');
    }

    #[test]
    fn test_text_clips_at_buffer_edge() {
        let (mut arena, root, mut buffer) = setup(5, 2);
        let text = arena.create_node_at(
            NodeKind::text("abcdefghij"),
            Rect::new(2, 0, 0, 0),
        );
        arena.append_child(root, text).unwrap();

        rasterize(&mut arena, root, &mut buffer);

        assert_eq!(buffer.get(2, 0).unwrap().ch, 'a');
        assert_eq!(buffer.get(4, 0).unwrap().ch, 'c');
        // d..j fell off the right edge and were dropped
        assert_eq!(arena.get(text).unwrap().rendered_cells().len(), 3);
    }

    #[test]
    fn test_zero_and_negative_size_paint_nothing() {
        let (mut arena, root, mut buffer) = setup(10, 10);
        let (kind, rect) = boxed('x', Rect::new(0, 0, 0, 5));
        let empty = arena.create_node_at(kind, rect);
        let (kind, rect) = boxed('y', Rect::new(0, 0, 5, -3));
        let negative = arena.create_node_at(kind, rect);
        arena.append_child(root, empty).unwrap();
        arena.append_child(root, negative).unwrap();

        rasterize(&mut arena, root, &mut buffer);

        assert!(arena.get(empty).unwrap().rendered_cells().is_empty());
        assert!(arena.get(negative).unwrap().rendered_cells().is_empty());
        assert_eq!(buffer.get(0, 0).unwrap().ch, ' ');
    }

    #[test]
    fn test_negative_position_clips_to_origin() {
        let (mut arena, root, mut buffer) = setup(10, 10);
        let (kind, rect) = boxed('x', Rect::new(-2, -2, 4, 4));
        let bx = arena.create_node_at(kind, rect);
        arena.append_child(root, bx).unwrap();

        rasterize(&mut arena, root, &mut buffer);

        assert_eq!(buffer.get(0, 0).unwrap().ch, 'x');
        assert_eq!(buffer.get(1, 1).unwrap().ch, 'x');
        assert_eq!(buffer.get(2, 2).unwrap().ch, ' ');
        // Only the visible quadrant is occupied
        assert_eq!(arena.get(bx).unwrap().rendered_cells().len(), 4);
    }

    #[test]
    fn test_border_frame_glyphs() {
        let (mut arena, root, mut buffer) = setup(10, 10);
        let bx = arena.create_node_at(
            NodeKind::Box {
                character: '.',
                fg: Color::WHITE,
                bg: Color::BLACK,
                border: BorderStyle::Single,
            },
            Rect::new(1, 1, 4, 3),
        );
        arena.append_child(root, bx).unwrap();

        rasterize(&mut arena, root, &mut buffer);

        assert_eq!(buffer.get(1, 1).unwrap().ch, '┌');
        assert_eq!(buffer.get(4, 1).unwrap().ch, '┐');
        assert_eq!(buffer.get(4, 3).unwrap().ch, '┘');
        assert_eq!(buffer.get(1, 3).unwrap().ch, '└');
        assert_eq!(buffer.get(2, 1).unwrap().ch, '─');
        assert_eq!(buffer.get(1, 2).unwrap().ch, '│');
        // Interior keeps the fill character
        assert_eq!(buffer.get(2, 2).unwrap().ch, '.');
    }

    #[test]
    fn test_border_skipped_on_degenerate_box() {
        let (mut arena, root, mut buffer) = setup(10, 10);
        let bx = arena.create_node_at(
            NodeKind::Box {
                character: 'x',
                fg: Color::WHITE,
                bg: Color::BLACK,
                border: BorderStyle::Single,
            },
            Rect::new(0, 0, 1, 3),
        );
        arena.append_child(root, bx).unwrap();

        rasterize(&mut arena, root, &mut buffer);

        // Fill happens, frame does not
        assert_eq!(buffer.get(0, 0).unwrap().ch, 'x');
        assert_eq!(buffer.get(0, 1).unwrap().ch, 'x');
    }

    #[test]
    fn test_rerasterize_after_detach_clears_occupancy() {
        let (mut arena, root, mut buffer) = setup(10, 10);
        let (kind, rect) = boxed('x', Rect::new(0, 0, 3, 3));
        let bx = arena.create_node_at(kind, rect);
        arena.append_child(root, bx).unwrap();

        rasterize(&mut arena, root, &mut buffer);
        assert_eq!(arena.get(bx).unwrap().rendered_cells().len(), 9);

        arena.remove_child(root, bx);
        rasterize(&mut arena, root, &mut buffer);

        // Detached subtree no longer paints; the frame shows defaults again
        assert_eq!(buffer.get(1, 1).unwrap().ch, ' ');
        // The detached node keeps its stale set only until its next paint;
        // it is unreachable from the tree walk, so the scene clears it there.
        assert!(arena.get(root).unwrap().rendered_cells().is_empty());
    }

    #[test]
    fn test_attribute_changes_show_up_next_pass() {
        let (mut arena, root, mut buffer) = setup(5, 5);
        let (kind, rect) = boxed('x', Rect::new(0, 0, 2, 2));
        let bx = arena.create_node_at(kind, rect);
        arena.append_child(root, bx).unwrap();

        rasterize(&mut arena, root, &mut buffer);
        assert_eq!(buffer.get(0, 0).unwrap().ch, 'x');

        arena.set_attribute(bx, Attribute::Character('y'));
        rasterize(&mut arena, root, &mut buffer);
        assert_eq!(buffer.get(0, 0).unwrap().ch, 'y');
    }
}

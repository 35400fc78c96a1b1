//! FrameBuffer - the cell grid and its diff/commit pass.
//!
//! Two parallel flat arrays indexed `y * width + x`:
//!
//! - `current` holds the latest rasterization and is logically rebuilt
//!   (values overwritten) every pass.
//! - `committed` holds what was last applied to the sink. `None` means the
//!   cell has never been applied, so the first commit paints everything.
//!
//! The commit pass walks both arrays once and calls the sink only for cells
//! whose attributes actually differ. Committing twice without an intervening
//! change performs zero sink calls.

use crate::sink::PaintSink;
use crate::types::CellAttrs;

/// A `width x height` grid of cells with current and committed state.
///
/// Identity persists across frames; the rasterizer overwrites `current`
/// in place so the diff against `committed` stays meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    current: Vec<CellAttrs>,
    committed: Vec<Option<CellAttrs>>,
}

impl FrameBuffer {
    /// Create a buffer filled with default cells, nothing committed yet.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            current: vec![CellAttrs::default(); size],
            committed: vec![None; size],
        }
    }

    /// Buffer width.
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height.
    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Convert (x, y) to flat index.
    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Check if coordinates are in bounds.
    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Get the current attributes of a cell (None if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&CellAttrs> {
        if self.in_bounds(x, y) {
            Some(&self.current[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get the committed attributes of a cell.
    ///
    /// Returns None if out of bounds or never committed.
    #[inline]
    pub fn get_committed(&self, x: u16, y: u16) -> Option<&CellAttrs> {
        if self.in_bounds(x, y) {
            self.committed[self.index(x, y)].as_ref()
        } else {
            None
        }
    }

    /// Overwrite a cell's current attributes.
    ///
    /// Out-of-bounds writes are dropped; returns whether the write landed.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, attrs: CellAttrs) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.current[idx] = attrs;
        true
    }

    /// Reset every current cell to the default attributes.
    ///
    /// Run at the start of each rasterize pass so stale paint from the
    /// previous frame does not bleed through. Committed state is untouched.
    pub fn reset_current(&mut self) {
        self.current.fill(CellAttrs::default());
    }

    /// Resize the buffer. Clears current state and forgets committed state,
    /// so the next commit repaints the whole surface.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = width as usize * height as usize;
        self.current.clear();
        self.current.resize(size, CellAttrs::default());
        self.committed.clear();
        self.committed.resize(size, None);
    }

    /// Forget committed state; the next commit repaints every cell.
    ///
    /// For hosts whose surface was corrupted or rebuilt.
    pub fn invalidate(&mut self) {
        self.committed.fill(None);
    }

    /// Apply every changed cell to the sink and mark it committed.
    ///
    /// Returns the number of sink calls, which is exactly the number of
    /// visually changed cells. Never errors; fallible sinks buffer
    /// internally and report on flush.
    pub fn commit(&mut self, sink: &mut dyn PaintSink) -> usize {
        let mut painted = 0;

        for idx in 0..self.current.len() {
            let attrs = self.current[idx];
            if self.committed[idx] == Some(attrs) {
                continue;
            }

            let x = (idx % self.width as usize) as u16;
            let y = (idx / self.width as usize) as u16;
            sink.paint_cell(x, y, &attrs);
            self.committed[idx] = Some(attrs);
            painted += 1;
        }

        painted
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use crate::types::Color;
    use pretty_assertions::assert_eq;

    fn attrs(ch: char) -> CellAttrs {
        CellAttrs {
            ch,
            fg: Color::WHITE,
            bg: Color::BLACK,
        }
    }

    #[test]
    fn test_first_commit_paints_everything() {
        let mut buffer = FrameBuffer::new(4, 3);
        let mut sink = RecordingSink::new();

        assert_eq!(buffer.commit(&mut sink), 12);
        assert_eq!(sink.calls().len(), 12);
    }

    #[test]
    fn test_commit_is_idempotent() {
        let mut buffer = FrameBuffer::new(4, 3);
        buffer.set(1, 1, attrs('X'));

        let mut sink = RecordingSink::new();
        assert_eq!(buffer.commit(&mut sink), 12);

        // No change between commits: zero sink calls
        sink.clear();
        assert_eq!(buffer.commit(&mut sink), 0);
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_commit_emits_only_changed_cells() {
        let mut buffer = FrameBuffer::new(4, 3);
        let mut sink = RecordingSink::new();
        buffer.commit(&mut sink);
        sink.clear();

        buffer.set(2, 1, attrs('A'));
        buffer.set(3, 2, attrs('B'));

        assert_eq!(buffer.commit(&mut sink), 2);
        assert_eq!(
            sink.calls(),
            &[(2, 1, attrs('A')), (3, 2, attrs('B'))]
        );
    }

    #[test]
    fn test_rewriting_same_value_is_not_a_change() {
        let mut buffer = FrameBuffer::new(2, 2);
        let mut sink = RecordingSink::new();
        buffer.set(0, 0, attrs('X'));
        buffer.commit(&mut sink);
        sink.clear();

        // Overwrite with identical attributes, as a rasterize pass would
        buffer.set(0, 0, attrs('X'));
        assert_eq!(buffer.commit(&mut sink), 0);
    }

    #[test]
    fn test_out_of_bounds_write_dropped() {
        let mut buffer = FrameBuffer::new(2, 2);
        assert!(!buffer.set(2, 0, attrs('X')));
        assert!(!buffer.set(0, 2, attrs('X')));
        assert!(buffer.get(2, 0).is_none());
    }

    #[test]
    fn test_reset_current_keeps_committed() {
        let mut buffer = FrameBuffer::new(2, 1);
        let mut sink = RecordingSink::new();
        buffer.set(0, 0, attrs('X'));
        buffer.commit(&mut sink);

        buffer.reset_current();
        assert_eq!(buffer.get(0, 0), Some(&CellAttrs::default()));
        assert_eq!(buffer.get_committed(0, 0), Some(&attrs('X')));

        // The cleared cell now differs from committed and gets repainted
        sink.clear();
        assert_eq!(buffer.commit(&mut sink), 1);
        assert_eq!(sink.calls(), &[(0, 0, CellAttrs::default())]);
    }

    #[test]
    fn test_invalidate_forces_full_repaint() {
        let mut buffer = FrameBuffer::new(3, 1);
        let mut sink = RecordingSink::new();
        buffer.commit(&mut sink);
        sink.clear();

        buffer.invalidate();
        assert_eq!(buffer.commit(&mut sink), 3);
    }

    #[test]
    fn test_resize_clears_state() {
        let mut buffer = FrameBuffer::new(2, 2);
        let mut sink = RecordingSink::new();
        buffer.set(1, 1, attrs('X'));
        buffer.commit(&mut sink);

        buffer.resize(3, 3);
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 3);
        assert_eq!(buffer.get(1, 1), Some(&CellAttrs::default()));

        sink.clear();
        assert_eq!(buffer.commit(&mut sink), 9);
    }
}

//! Presentation sinks - where committed cells go.
//!
//! The commit pass only requires [`PaintSink`]: one call per visually
//! changed cell. The contract is surface-agnostic; a host may keep a
//! persistent element per cell and restyle it, or redraw one rectangle plus
//! glyph per call in immediate mode. Both must end up visually identical.
//!
//! Browser sinks (per-cell DOM elements, canvas fill/text) live host-side.
//! This crate ships two implementations: [`RecordingSink`] for tests and
//! headless hosts, and [`TerminalSink`] as an immediate-mode reference
//! surface over crossterm.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, SetBackgroundColor, SetForegroundColor};

use crate::types::{CellAttrs, Color};

/// Receiver for committed cell paints.
pub trait PaintSink {
    /// Paint one cell at grid position (x, y).
    ///
    /// Called exactly once per visually changed cell per commit.
    fn paint_cell(&mut self, x: u16, y: u16, attrs: &CellAttrs);
}

// =============================================================================
// RecordingSink
// =============================================================================

/// A sink that records every paint call.
///
/// Used by the test suite to assert on exact mutation counts, and usable by
/// hosts that want to batch-forward paints elsewhere (e.g. over FFI to a
/// DOM adapter).
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Vec<(u16, u16, CellAttrs)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All paint calls since creation or the last [`clear`](Self::clear).
    pub fn calls(&self) -> &[(u16, u16, CellAttrs)] {
        &self.calls
    }

    /// The last paint applied to a given cell, if any.
    pub fn last_at(&self, x: u16, y: u16) -> Option<&CellAttrs> {
        self.calls
            .iter()
            .rev()
            .find(|(cx, cy, _)| (*cx, *cy) == (x, y))
            .map(|(_, _, attrs)| attrs)
    }

    /// Drop the recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl PaintSink for RecordingSink {
    fn paint_cell(&mut self, x: u16, y: u16, attrs: &CellAttrs) {
        self.calls.push((x, y, *attrs));
    }
}

// =============================================================================
// TerminalSink
// =============================================================================

/// Immediate-mode sink writing one cursor-move + styled glyph per cell.
///
/// `paint_cell` is infallible by contract, so I/O errors are latched and
/// surfaced by [`flush`](Self::flush); once an error is latched, further
/// paints are dropped.
pub struct TerminalSink<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl TerminalSink<io::Stdout> {
    /// A sink over stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Flush queued paints, reporting any latched I/O error first.
    pub fn flush(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()
    }

    /// Consume the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

impl<W: Write> PaintSink for TerminalSink<W> {
    fn paint_cell(&mut self, x: u16, y: u16, attrs: &CellAttrs) {
        if self.error.is_some() {
            return;
        }
        let result = queue!(
            self.out,
            MoveTo(x, y),
            SetForegroundColor(term_color(attrs.fg)),
            SetBackgroundColor(term_color(attrs.bg)),
            Print(attrs.ch),
        );
        if let Err(err) = result {
            self.error = Some(err);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

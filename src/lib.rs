//! # gridscene
//!
//! Retained-mode scene renderer for fixed-size character grids.
//!
//! A scene is a tree of nodes (one root, boxes, text runs) rasterized into a
//! flat cell buffer. Committing the buffer diffs against what was last
//! applied and forwards only the visually changed cells to a [`PaintSink`],
//! so steady-state frames cost nothing downstream. The same rasterization
//! pass records which cells each node painted, and pointer events are
//! resolved against those sets with DOM-style bubbling plus synthesized
//! enter/leave transitions.
//!
//! ## Pipeline
//!
//! ```text
//! Node tree → rasterize (painter's order) → FrameBuffer diff → PaintSink
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cell attributes, colors, rects, border styles
//! - [`tree`] - Node arena, structural mutations, typed attributes
//! - [`buffer`] - Frame buffer with current/committed diff state
//! - [`raster`] - Tree-to-buffer rasterization and rendered-cell tracking
//! - [`input`] - Pointer hit-testing, bubbling, hover synthesis
//! - [`sink`] - [`PaintSink`] trait plus recording and terminal sinks
//! - [`scene`] - The [`Scene`] facade tying it all together

pub mod buffer;
pub mod input;
pub mod raster;
pub mod scene;
pub mod sink;
pub mod tree;
pub mod types;

// Re-export the common surface
pub use buffer::FrameBuffer;
pub use input::{
    dispatch, HandlerRegistry, HoverHandler, PointerEvent, PointerEventKind, PointerHandler,
    PointerHandlers, PointerState,
};
pub use raster::rasterize;
pub use scene::{Scene, SceneConfig};
pub use sink::{PaintSink, RecordingSink, TerminalSink};
pub use tree::{Attribute, Node, NodeArena, NodeId, NodeKind, StructuralError};
pub use types::{BorderStyle, CellAttrs, Color, Rect};

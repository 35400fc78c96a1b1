//! Scene - one node tree, one frame buffer, one pointer state.
//!
//! The facade the producer drives: tree mutations in, then a
//! rasterize + commit cycle per frame, with pointer events resolved against
//! the most recent rasterize output. Everything is synchronous and runs to
//! completion on the caller's thread; `&mut self` serializes the cycles.

use crate::buffer::FrameBuffer;
use crate::input::{
    self, HandlerRegistry, PointerEventKind, PointerHandlers, PointerState,
};
use crate::raster::rasterize;
use crate::sink::PaintSink;
use crate::tree::{Attribute, Node, NodeArena, NodeId, NodeKind, StructuralError};
use crate::types::Rect;

// =============================================================================
// Configuration
// =============================================================================

/// Flat scene options.
///
/// Cell pixel metrics and font size are carried for hosts that build
/// per-cell surfaces (absolute-positioned DOM cells in the reference
/// surface); the core itself only uses `width`/`height` and the
/// pixel-to-cell mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneConfig {
    /// Grid width in cells.
    pub width: u16,
    /// Grid height in cells.
    pub height: u16,
    /// Cell width in pixels.
    pub cell_width: u16,
    /// Cell height in pixels.
    pub cell_height: u16,
    /// Left padding inside a cell surface, in pixels.
    pub cell_padding_left: u16,
    /// Top padding inside a cell surface, in pixels.
    pub cell_padding_top: u16,
    /// Font size for cell glyphs, in pixels.
    pub font_size: u16,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 20,
            cell_width: 16,
            cell_height: 23,
            cell_padding_left: 1,
            cell_padding_top: 2,
            font_size: 28,
        }
    }
}

impl SceneConfig {
    /// Map pixel coordinates to the containing grid cell:
    /// `floor(pixel / cell_size)`.
    pub fn cell_at_pixel(&self, px: f64, py: f64) -> (i32, i32) {
        (
            (px / f64::from(self.cell_width)).floor() as i32,
            (py / f64::from(self.cell_height)).floor() as i32,
        )
    }
}

// =============================================================================
// Scene
// =============================================================================

/// A retained scene instance.
pub struct Scene {
    config: SceneConfig,
    arena: NodeArena,
    root: NodeId,
    buffer: FrameBuffer,
    registry: HandlerRegistry,
    pointer: PointerState,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Scene with the default 80x20 configuration.
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Scene with explicit configuration. The root node spans the grid.
    pub fn with_config(config: SceneConfig) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.create_node_at(
            NodeKind::Root,
            Rect::new(0, 0, i32::from(config.width), i32::from(config.height)),
        );
        Self {
            config,
            arena,
            root,
            buffer: FrameBuffer::new(config.width, config.height),
            registry: HandlerRegistry::new(),
            pointer: PointerState::default(),
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Borrow a node for inspection.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    // =========================================================================
    // Tree operations (producer interface)
    // =========================================================================

    /// Create a detached node with default geometry.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        self.arena.create_node(kind)
    }

    /// Create a detached node with explicit geometry.
    pub fn create_node_at(&mut self, kind: NodeKind, rect: Rect) -> NodeId {
        self.arena.create_node_at(kind, rect)
    }

    /// Append `child` under `parent`; rejects attached nodes and cycles.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), StructuralError> {
        self.arena.append_child(parent, child)
    }

    /// Detach `child` from `parent`; no-op (false) for non-children.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.arena.remove_child(parent, child)
    }

    /// Set one whitelisted attribute; mismatches are ignored (false).
    pub fn set_attribute(&mut self, id: NodeId, attr: Attribute) -> bool {
        self.arena.set_attribute(id, attr)
    }

    /// Move a node relative to its parent.
    pub fn set_position(&mut self, id: NodeId, x: i32, y: i32) -> bool {
        self.arena.set_position(id, x, y)
    }

    /// Release a detached node's slot and drop its handlers and hover
    /// reference.
    pub fn release_node(&mut self, id: NodeId) -> Result<(), StructuralError> {
        self.arena.release(id)?;
        self.registry.remove(id);
        self.pointer.forget(id);
        Ok(())
    }

    // =========================================================================
    // Render pipeline
    // =========================================================================

    /// Rasterize the tree into the frame buffer and rebuild every node's
    /// rendered-cell set.
    pub fn rasterize(&mut self) {
        rasterize(&mut self.arena, self.root, &mut self.buffer);
    }

    /// Apply changed cells to the sink; returns the sink call count.
    pub fn commit(&mut self, sink: &mut dyn PaintSink) -> usize {
        self.buffer.commit(sink)
    }

    /// One full frame: rasterize then commit.
    pub fn render(&mut self, sink: &mut dyn PaintSink) -> usize {
        self.rasterize();
        self.commit(sink)
    }

    /// Force the next commit to repaint every cell.
    pub fn invalidate(&mut self) {
        self.buffer.invalidate();
    }

    /// Read access to the frame buffer.
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Register (or replace) pointer handlers for a node.
    pub fn set_pointer_handlers(&mut self, id: NodeId, handlers: PointerHandlers) {
        self.registry.set(id, handlers);
    }

    /// Remove a node's pointer handlers.
    pub fn clear_pointer_handlers(&mut self, id: NodeId) {
        self.registry.remove(id);
    }

    /// Dispatch a pointer event at grid cell coordinates.
    ///
    /// Resolves the target against the rendered-cell sets of the last
    /// rasterize pass; returns it. Handler panics propagate.
    pub fn on_pointer_event(&mut self, kind: PointerEventKind, x: i32, y: i32) -> Option<NodeId> {
        input::dispatch(
            &self.arena,
            self.root,
            &self.registry,
            &mut self.pointer,
            kind,
            x,
            y,
        )
    }

    /// Dispatch a pointer event at pixel coordinates, mapped through
    /// [`SceneConfig::cell_at_pixel`].
    pub fn on_pointer_event_at_pixel(
        &mut self,
        kind: PointerEventKind,
        px: f64,
        py: f64,
    ) -> Option<NodeId> {
        let (x, y) = self.config.cell_at_pixel(px, py);
        self.on_pointer_event(kind, x, y)
    }

    /// Node currently under the pointer, if any.
    pub fn hovered_node(&self) -> Option<NodeId> {
        self.pointer.hovered
    }
}

// =============================================================================
// Tests
// =============================================================================

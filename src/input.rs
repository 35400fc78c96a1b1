//! Hit-test and pointer dispatch.
//!
//! Pointer coordinates resolve against the per-node rendered-cell sets built
//! by the last rasterize pass: every node whose own paint covered the cell is
//! collected ancestor-first, then reversed. The head of the reversed list is
//! the target (the node that painted last, consistent with painter
//! precedence) and the whole list is the bubble path.
//!
//! Enter/leave is synthesized on any event kind whenever the target changes.
//! Hover and pointer-cell state are committed before handlers run, so a
//! panicking handler aborts only the remaining bubble walk.

use std::collections::HashMap;
use std::rc::Rc;

use crate::tree::{NodeArena, NodeId};

// =============================================================================
// Events
// =============================================================================

/// Pointer event kinds routed through the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Move,
    Down,
    Up,
    Click,
}

/// The event object shared along one bubble walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    /// Grid cell column.
    pub x: i32,
    /// Grid cell row.
    pub y: i32,
    /// Deepest node hit, if any.
    pub target: Option<NodeId>,
    stopped: bool,
}

impl PointerEvent {
    fn new(x: i32, y: i32, target: Option<NodeId>) -> Self {
        Self {
            x,
            y,
            target,
            stopped: false,
        }
    }

    /// Halt delivery to the remaining ancestors in this bubble walk.
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    /// Whether a handler stopped propagation.
    pub fn propagation_stopped(&self) -> bool {
        self.stopped
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Bubbling handler: receives the shared mutable event and may stop
/// propagation.
pub type PointerHandler = Rc<dyn Fn(&mut PointerEvent)>;

/// Enter/leave handler: transition notifications do not bubble and cannot
/// stop anything.
pub type HoverHandler = Rc<dyn Fn(&PointerEvent)>;

/// Handlers for one node.
///
/// `Rc` so user callbacks can be cloned out of the registry before
/// invocation, keeping the registry borrow short.
#[derive(Default, Clone)]
pub struct PointerHandlers {
    pub on_mouse_move: Option<PointerHandler>,
    pub on_mouse_down: Option<PointerHandler>,
    pub on_mouse_up: Option<PointerHandler>,
    pub on_click: Option<PointerHandler>,
    pub on_mouse_enter: Option<HoverHandler>,
    pub on_mouse_leave: Option<HoverHandler>,
}

impl PointerHandlers {
    fn for_kind(&self, kind: PointerEventKind) -> Option<&PointerHandler> {
        match kind {
            PointerEventKind::Move => self.on_mouse_move.as_ref(),
            PointerEventKind::Down => self.on_mouse_down.as_ref(),
            PointerEventKind::Up => self.on_mouse_up.as_ref(),
            PointerEventKind::Click => self.on_click.as_ref(),
        }
    }
}

/// Per-node handler registry.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<NodeId, PointerHandlers>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handlers for a node.
    pub fn set(&mut self, id: NodeId, handlers: PointerHandlers) {
        self.handlers.insert(id, handlers);
    }

    /// Drop a node's handlers.
    pub fn remove(&mut self, id: NodeId) {
        self.handlers.remove(&id);
    }

    fn get(&self, id: NodeId) -> Option<&PointerHandlers> {
        self.handlers.get(&id)
    }
}

// =============================================================================
// Pointer state
// =============================================================================

/// Mutable pointer bookkeeping across dispatches.
#[derive(Debug, Default)]
pub struct PointerState {
    /// Cell of the last dispatched event (move dedupe).
    pub last_cell: Option<(i32, i32)>,
    /// Node currently under the pointer.
    pub hovered: Option<NodeId>,
}

impl PointerState {
    /// Forget a node, e.g. when its slot is released.
    pub fn forget(&mut self, id: NodeId) {
        if self.hovered == Some(id) {
            self.hovered = None;
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Resolve a pointer event against the tree and deliver it.
///
/// Returns the target node, if any cell was hit. Handler panics propagate to
/// the caller; state recorded before the panic stays consistent.
pub fn dispatch(
    arena: &NodeArena,
    root: NodeId,
    registry: &HandlerRegistry,
    state: &mut PointerState,
    kind: PointerEventKind,
    x: i32,
    y: i32,
) -> Option<NodeId> {
    if kind == PointerEventKind::Move && state.last_cell == Some((x, y)) {
        return state.hovered;
    }
    state.last_cell = Some((x, y));

    // Descendant-first bubble path; head is the target.
    let path = hit_path(arena, root, x, y);
    let target = path.first().copied();

    // Hover transition fires on every kind. State is committed first so a
    // throwing enter/leave handler cannot leave it stale.
    if target != state.hovered {
        let previous = state.hovered;
        state.hovered = target;

        if let Some(old) = previous {
            let leave = registry.get(old).and_then(|h| h.on_mouse_leave.clone());
            if let Some(handler) = leave {
                handler(&PointerEvent::new(x, y, Some(old)));
            }
        }
        if let Some(new) = target {
            let enter = registry.get(new).and_then(|h| h.on_mouse_enter.clone());
            if let Some(handler) = enter {
                handler(&PointerEvent::new(x, y, target));
            }
        }
    }

    let mut event = PointerEvent::new(x, y, target);
    for id in path {
        let handler = registry.get(id).and_then(|h| h.for_kind(kind).cloned());
        if let Some(handler) = handler {
            handler(&mut event);
            if event.propagation_stopped() {
                break;
            }
        }
    }

    target
}

/// Collect nodes occupying `(x, y)` ancestor-first, then reverse.
fn hit_path(arena: &NodeArena, root: NodeId, x: i32, y: i32) -> Vec<NodeId> {
    let (Ok(cx), Ok(cy)) = (u16::try_from(x), u16::try_from(y)) else {
        return Vec::new();
    };

    let mut hits = Vec::new();
    collect_hits(arena, root, (cx, cy), &mut hits);
    hits.reverse();
    hits
}

fn collect_hits(arena: &NodeArena, id: NodeId, cell: (u16, u16), hits: &mut Vec<NodeId>) {
    let Some(node) = arena.get(id) else {
        return;
    };
    if node.rendered_cells().contains(&cell) {
        hits.push(id);
    }
    for &child in node.children() {
        collect_hits(arena, child, cell, hits);
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Node Tree Model - the retained scene tree.
//!
//! Nodes live in an arena with a free-index pool; `NodeId` is an index into
//! that arena, so child and parent links are plain indices rather than owned
//! references (no cycles, cheap clones).
//!
//! Structural rules:
//! - `append_child` rejects a node that is already attached anywhere.
//!   Re-parenting must be an explicit detach-then-attach.
//! - `remove_child` of a non-child is a no-op.
//! - A detached node keeps its attributes and can be attached again, or have
//!   its slot released for reuse.

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{BorderStyle, Color, Rect};

// =============================================================================
// Errors
// =============================================================================

/// Structural errors from tree mutation.
///
/// The tree is left unchanged whenever one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// The child already has a parent; detach it first.
    #[error("node is already attached to a parent")]
    AlreadyAttached,
    /// A node id does not resolve to a live node.
    #[error("unknown or released node id")]
    UnknownNode,
    /// Attaching would make a node its own ancestor.
    #[error("attachment would create a cycle")]
    WouldCreateCycle,
    /// The node still holds a tree reference and cannot be released.
    #[error("node is still attached to the tree")]
    StillAttached,
}

// =============================================================================
// Node
// =============================================================================

/// Handle to a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Per-kind paint payload.
///
/// Root has no paint capability; Box fills its rectangle with one
/// character/color pair plus an optional border; Text paints one glyph per
/// character of its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Box {
        character: char,
        fg: Color,
        bg: Color,
        border: BorderStyle,
    },
    Text {
        content: String,
        fg: Color,
        bg: Color,
    },
}

impl NodeKind {
    /// A Box with the default paint attributes (space glyph, white on black).
    pub fn boxed() -> Self {
        Self::Box {
            character: ' ',
            fg: Color::WHITE,
            bg: Color::BLACK,
            border: BorderStyle::None,
        }
    }

    /// A Text node with the given content, white on black.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            fg: Color::WHITE,
            bg: Color::BLACK,
        }
    }
}

/// A scene tree node: shared geometry/structure plus the kind payload.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Geometry relative to the parent.
    pub rect: Rect,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    /// Absolute coordinates painted by this node's own draw in the latest
    /// rasterize pass. Descendant paints are not included.
    pub(crate) rendered_cells: HashSet<(u16, u16)>,
}

impl Node {
    fn new(kind: NodeKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            children: Vec::new(),
            parent: None,
            rendered_cells: HashSet::new(),
        }
    }

    /// The node's parent, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in declaration (paint) order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Cells this node painted in the latest rasterize pass.
    pub fn rendered_cells(&self) -> &HashSet<(u16, u16)> {
        &self.rendered_cells
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// Typed node attributes.
///
/// The string-keyed `setAttribute` of DOM-style producers maps onto this
/// enum; validation against the per-kind whitelist happens at the call
/// boundary in [`NodeArena::set_attribute`].
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Width(i32),
    Height(i32),
    Character(char),
    ForegroundColor(Color),
    BackgroundColor(Color),
    Border(BorderStyle),
    TextContent(String),
}

// =============================================================================
// NodeArena
// =============================================================================

/// Arena storage for the node tree.
///
/// Freed slots go into a pool and are reused by the next allocation, so ids
/// are only valid until their node is released.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node with default geometry (0, 0, 80, 20).
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        self.create_node_at(kind, Rect::new(0, 0, 80, 20))
    }

    /// Create a node with explicit geometry.
    pub fn create_node_at(&mut self, kind: NodeKind, rect: Rect) -> NodeId {
        let node = Node::new(kind, rect);
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Borrow a node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// Mutably borrow a node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Fails without touching the tree if the child is attached anywhere,
    /// if either id is stale, or if the attachment would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), StructuralError> {
        if self.get(child).is_none() {
            return Err(StructuralError::UnknownNode);
        }
        if self.get(parent).is_none() {
            return Err(StructuralError::UnknownNode);
        }
        if self
            .get(child)
            .is_some_and(|node| node.parent.is_some())
        {
            return Err(StructuralError::AlreadyAttached);
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(StructuralError::WouldCreateCycle);
        }

        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Detach `child` from `parent`.
    ///
    /// Returns true if the child was removed; false (no-op) when `child` is
    /// not a current child of `parent` or an id is stale.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let is_child = self
            .get(child)
            .is_some_and(|node| node.parent == Some(parent));
        if !is_child {
            return false;
        }

        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|&id| id != child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
        true
    }

    /// Set one attribute, validated against the node kind's whitelist.
    ///
    /// Returns true when applied. A mismatched attribute (for example
    /// `TextContent` on a Box) is ignored and returns false; the tree stays
    /// renderable either way.
    pub fn set_attribute(&mut self, id: NodeId, attr: Attribute) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };

        // Width and height are writable on every kind.
        match attr {
            Attribute::Width(width) => {
                node.rect.width = width;
                return true;
            }
            Attribute::Height(height) => {
                node.rect.height = height;
                return true;
            }
            _ => {}
        }

        match (&mut node.kind, attr) {
            (NodeKind::Box { character, .. }, Attribute::Character(ch)) => {
                *character = ch;
                true
            }
            (NodeKind::Box { fg, .. }, Attribute::ForegroundColor(color))
            | (NodeKind::Text { fg, .. }, Attribute::ForegroundColor(color)) => {
                *fg = color;
                true
            }
            (NodeKind::Box { bg, .. }, Attribute::BackgroundColor(color))
            | (NodeKind::Text { bg, .. }, Attribute::BackgroundColor(color)) => {
                *bg = color;
                true
            }
            (NodeKind::Box { border, .. }, Attribute::Border(style)) => {
                *border = style;
                true
            }
            (NodeKind::Text { content, .. }, Attribute::TextContent(text)) => {
                *content = text;
                true
            }
            _ => false,
        }
    }

    /// Move a node relative to its parent.
    pub fn set_position(&mut self, id: NodeId, x: i32, y: i32) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.rect.x = x;
                node.rect.y = y;
                true
            }
            None => false,
        }
    }

    /// Release a detached node's slot for reuse.
    ///
    /// The node must hold no tree reference (no parent); its children are
    /// orphaned first by detaching them.
    pub fn release(&mut self, id: NodeId) -> Result<(), StructuralError> {
        let node = self.get(id).ok_or(StructuralError::UnknownNode)?;
        if node.parent.is_some() {
            return Err(StructuralError::StillAttached);
        }

        let children = node.children.clone();
        for child in children {
            self.remove_child(id, child);
        }

        self.slots[id.0] = None;
        self.free.push(id.0);
        Ok(())
    }

    /// Check whether `ancestor` is `node` itself or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }
}

// =============================================================================
// Tests
// =============================================================================

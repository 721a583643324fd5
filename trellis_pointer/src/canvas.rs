// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A view tree, its root, a processor, and listeners in one place.

use kurbo::Point;
use trellis_view::{Painter, TreeError, ViewId, ViewNode, ViewTree};

use crate::dispatcher;
use crate::listeners::Listeners;
use crate::processor::MouseEventProcessor;
use crate::types::PointerSample;

/// Top-level surface that owns a view tree and routes pointer input into it.
///
/// Listeners receive the tree as their context, so they can move, restyle,
/// or destroy views while handling an event.
///
/// ## Example
///
/// ```
/// use kurbo::{Point, Size, Vec2};
/// use trellis_pointer::{Buttons, Canvas, MouseButton, PointerSample};
/// use trellis_view::{Bounds, ViewNode};
///
/// let mut canvas = Canvas::with_root(ViewNode::new(Point::ORIGIN, Bounds::Rect(Size::new(100.0, 100.0))));
/// let dot = canvas.add_view(ViewNode::new(Point::new(50.0, 50.0), Bounds::Circle(10.0)));
///
/// // Dragging the dot moves it.
/// canvas.listeners_mut().on_mouse_drag(dot, |tree, ev| {
///     if let Some(p) = tree.position(ev.target) {
///         tree.set_position(ev.target, p + ev.delta);
///     }
/// });
///
/// canvas.handle(&PointerSample::down(Point::new(50.0, 50.0), MouseButton::Left, Buttons::LEFT));
/// canvas.handle(&PointerSample::moved(Point::new(60.0, 55.0), Vec2::new(10.0, 5.0), Buttons::LEFT));
/// assert_eq!(canvas.tree().position(dot), Some(Point::new(60.0, 55.0)));
/// ```
#[derive(Debug)]
pub struct Canvas {
    tree: ViewTree,
    root: ViewId,
    processor: MouseEventProcessor,
    listeners: Listeners<ViewTree>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a canvas whose root is unbounded and sits at the origin.
    pub fn new() -> Self {
        Self::with_root(ViewNode::default())
    }

    /// Create a canvas with the given root view.
    pub fn with_root(root: ViewNode) -> Self {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, root);
        Self {
            tree,
            root,
            processor: MouseEventProcessor::new(),
            listeners: Listeners::new(),
        }
    }

    /// The root view.
    pub fn root(&self) -> ViewId {
        self.root
    }

    /// The view tree.
    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    /// The view tree, mutably.
    pub fn tree_mut(&mut self) -> &mut ViewTree {
        &mut self.tree
    }

    /// The listener registry.
    pub fn listeners_mut(&mut self) -> &mut Listeners<ViewTree> {
        &mut self.listeners
    }

    /// The pointer state.
    pub fn processor(&self) -> &MouseEventProcessor {
        &self.processor
    }

    /// Create a view as the topmost child of the root.
    pub fn add_view(&mut self, view: ViewNode) -> ViewId {
        self.tree.insert(Some(self.root), view)
    }

    /// Move an existing view under `parent`.
    ///
    /// The root stays where it is; attaching it returns [`TreeError::Pinned`].
    pub fn attach(&mut self, parent: ViewId, child: ViewId) -> Result<ViewId, TreeError> {
        if child == self.root {
            log::debug!("attach: refusing to re-parent the canvas root");
            return Err(TreeError::Pinned(child));
        }
        self.tree.add_view(parent, child)
    }

    /// Destroy a view with its subtree and drop their listeners.
    ///
    /// The root cannot be destroyed; its children can.
    pub fn destroy(&mut self, view: ViewId) {
        if view == self.root {
            log::debug!("destroy: refusing to destroy the canvas root");
            return;
        }
        let mut stack = alloc::vec![view];
        while let Some(id) = stack.pop() {
            stack.extend_from_slice(self.tree.children_of(id));
            self.listeners.clear_view(id);
        }
        self.tree.destroy(view);
    }

    /// Route one host sample and deliver the resulting events.
    ///
    /// Listeners of views destroyed during delivery are dropped afterwards.
    /// Returns the number of events produced.
    pub fn handle(&mut self, sample: &PointerSample) -> usize {
        let events = self.processor.handle(&self.tree, self.root, sample);
        if events.is_empty() {
            return 0;
        }
        dispatcher::run(&events, &mut self.tree, &mut self.listeners);
        let tree = &self.tree;
        let dropped = self.listeners.retain_views(|view| tree.is_alive(view));
        if dropped > 0 {
            log::debug!("handle: dropped {dropped} listeners of destroyed views");
        }
        events.len()
    }

    /// Topmost view under a canvas point.
    pub fn view_at(&self, point: Point) -> Option<ViewId> {
        self.tree.resolve(self.root, point).map(|hit| hit.target)
    }

    /// Dispatch drawing of the whole canvas.
    pub fn paint(&self, painter: &mut impl Painter) {
        self.tree.paint(self.root, painter);
    }
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: ownership, structural edits, picking, and coordinate walks.

use alloc::{vec, vec::Vec};
use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::error::TreeError;
use crate::transform::ChildTransform;
use crate::types::{Bounds, ViewFlags, ViewId, ViewNode};

/// Ancestor chain buffer; most scenes are shallower than this.
pub(crate) type Chain = SmallVec<[ViewId; 8]>;

/// Arena of views forming zero or more trees.
///
/// Each view owns an ordered list of children and holds a non-owning
/// back-reference to its parent. All attachment goes through
/// [`ViewTree::add_view`], which detaches the child from its current parent
/// first and refuses edits that would create a cycle, so every view has at
/// most one parent and appears exactly once in that parent's child list.
///
/// Unlike a spatially indexed tree, changes take effect immediately: picking
/// walks the live structure on every query.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Size};
/// use trellis_view::{Bounds, ViewNode, ViewTree};
///
/// let mut tree = ViewTree::new();
/// let root = tree.insert(None, ViewNode::new(Point::ORIGIN, Bounds::Rect(Size::new(100.0, 100.0))));
/// let dot = tree.insert(Some(root), ViewNode::new(Point::new(50.0, 50.0), Bounds::Circle(10.0)));
///
/// let hit = tree.resolve(root, Point::new(52.0, 49.0)).unwrap();
/// assert_eq!(hit.target, dot);
/// assert_eq!(hit.local, Point::new(2.0, -1.0));
///
/// // Outside the circle the root itself is the target.
/// assert_eq!(tree.resolve(root, Point::new(10.0, 10.0)).unwrap().target, root);
/// ```
pub struct ViewTree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("ViewTree")
            .field("views_total", &total)
            .field("views_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of resolving a point to a view.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    /// The deepest, topmost view containing the point.
    pub target: ViewId,
    /// The point in `target`'s local space.
    pub local: Point,
    /// Path from the starting root to `target` (inclusive).
    pub path: Vec<ViewId>,
}

/// A point and a movement delta expressed in a view's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Localized {
    /// The point in local space.
    pub position: Point,
    /// The delta in local space; not a copy of the raw delta.
    pub delta: Vec2,
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    generation: u32,
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    pub(crate) view: ViewNode,
}

impl Node {
    fn new(generation: u32, view: ViewNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            view,
        }
    }
}

impl ViewTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Create a view, attached as the topmost child of `parent` or detached if `None`.
    ///
    /// A stale `parent` leaves the new view detached.
    pub fn insert(&mut self, parent: Option<ViewId>, view: ViewNode) -> ViewId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, view));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ViewId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, view)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ViewId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = ViewId::new(idx, generation);
        if let Some(p) = parent {
            if self.is_alive(p) {
                self.link_parent(id, p);
            } else {
                log::debug!("insert: parent {p:?} is stale, {id:?} left detached");
            }
        }
        id
    }

    /// Attach `child` as the topmost child of `parent`.
    ///
    /// The child is first detached from its current parent, so re-adding a
    /// view moves it to the top of its new parent's children.
    pub fn add_view(&mut self, parent: ViewId, child: ViewId) -> Result<ViewId, TreeError> {
        if !self.is_alive(parent) {
            return Err(TreeError::Stale(parent));
        }
        if !self.is_alive(child) {
            return Err(TreeError::Stale(child));
        }
        if child == parent || self.is_ancestor(child, parent) {
            log::debug!("add_view: refusing to attach {child:?} under {parent:?}");
            return Err(TreeError::Cycle { parent, child });
        }
        self.remove_from_parent(child);
        self.link_parent(child, parent);
        Ok(child)
    }

    /// Detach `child` if it is currently a child of `parent`.
    ///
    /// Returns `true` if the view was detached. The view stays alive.
    pub fn remove_view(&mut self, parent: ViewId, child: ViewId) -> bool {
        if self.parent_of(child) != Some(parent) {
            return false;
        }
        self.unlink_parent(child, parent);
        true
    }

    /// Detach `view` from its parent, if any. Returns `true` if it had one.
    pub fn remove_from_parent(&mut self, view: ViewId) -> bool {
        match self.parent_of(view) {
            Some(parent) => {
                self.unlink_parent(view, parent);
                true
            }
            None => false,
        }
    }

    /// Destroy a view and its whole subtree; their ids become stale.
    pub fn destroy(&mut self, id: ViewId) {
        if !self.is_alive(id) {
            return;
        }
        self.remove_from_parent(id);
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes[id.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(id.idx());
            }
        }
    }

    /// Returns true if `id` refers to a live view.
    pub fn is_alive(&self, id: ViewId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Number of live views.
    pub fn view_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns the parent of a view, or `None` for roots, detached views, and stale ids.
    pub fn parent_of(&self, id: ViewId) -> Option<ViewId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a view in draw order (last is topmost), or an empty slice if stale.
    pub fn children_of(&self, id: ViewId) -> &[ViewId] {
        match self.node_opt(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Number of children of a view.
    pub fn child_count(&self, id: ViewId) -> usize {
        self.children_of(id).len()
    }

    /// Per-view data of a live view.
    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.node_opt(id).map(|n| &n.view)
    }

    /// Mutable per-view data of a live view.
    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewNode> {
        self.node_opt_mut(id).map(|n| &mut n.view)
    }

    /// Position of a view in its parent's child space.
    pub fn position(&self, id: ViewId) -> Option<Point> {
        self.get(id).map(|v| v.position)
    }

    /// Horizontal position in the parent's child space.
    pub fn x(&self, id: ViewId) -> Option<f64> {
        self.position(id).map(|p| p.x)
    }

    /// Vertical position in the parent's child space.
    pub fn y(&self, id: ViewId) -> Option<f64> {
        self.position(id).map(|p| p.y)
    }

    /// Move a view within its parent's child space.
    pub fn set_position(&mut self, id: ViewId, position: Point) {
        if let Some(v) = self.get_mut(id) {
            v.position = position;
        }
    }

    /// Set the horizontal position.
    pub fn set_x(&mut self, id: ViewId, x: f64) {
        if let Some(v) = self.get_mut(id) {
            v.position.x = x;
        }
    }

    /// Set the vertical position.
    pub fn set_y(&mut self, id: ViewId, y: f64) {
        if let Some(v) = self.get_mut(id) {
            v.position.y = y;
        }
    }

    /// Bounds predicate of a view.
    pub fn bounds(&self, id: ViewId) -> Option<Bounds> {
        self.get(id).map(|v| v.bounds)
    }

    /// Update bounds.
    pub fn set_bounds(&mut self, id: ViewId, bounds: Bounds) {
        if let Some(v) = self.get_mut(id) {
            v.bounds = bounds;
        }
    }

    /// Child transform of a view.
    pub fn transform(&self, id: ViewId) -> Option<ChildTransform> {
        self.get(id).map(|v| v.transform)
    }

    /// Mutable child transform of a view, for in-place edits like [`ChildTransform::rotate`].
    pub fn transform_mut(&mut self, id: ViewId) -> Option<&mut ChildTransform> {
        self.get_mut(id).map(|v| &mut v.transform)
    }

    /// Update the child transform.
    pub fn set_transform(&mut self, id: ViewId, transform: ChildTransform) {
        if let Some(v) = self.get_mut(id) {
            v.transform = transform;
        }
    }

    /// Flags of a live view.
    pub fn flags(&self, id: ViewId) -> Option<ViewFlags> {
        self.get(id).map(|v| v.flags)
    }

    /// Update view flags.
    pub fn set_flags(&mut self, id: ViewId, flags: ViewFlags) {
        if let Some(v) = self.get_mut(id) {
            v.flags = flags;
        }
    }

    /// Returns `true` if the view is live and visible.
    pub fn is_visible(&self, id: ViewId) -> bool {
        self.flags(id).is_some_and(|f| f.contains(ViewFlags::VISIBLE))
    }

    /// Show or hide a view and its subtree.
    pub fn set_visible(&mut self, id: ViewId, visible: bool) {
        if let Some(v) = self.get_mut(id) {
            v.flags.set(ViewFlags::VISIBLE, visible);
        }
    }

    /// Returns `true` if the view is live and pickable.
    pub fn is_pickable(&self, id: ViewId) -> bool {
        self.flags(id).is_some_and(|f| f.contains(ViewFlags::PICKABLE))
    }

    /// Allow or forbid picking this view. Its children are unaffected.
    pub fn set_pickable(&mut self, id: ViewId, pickable: bool) {
        if let Some(v) = self.get_mut(id) {
            v.flags.set(ViewFlags::PICKABLE, pickable);
        }
    }

    /// Iterate the ancestors of a view, nearest first. Empty for stale ids.
    pub fn ancestors(&self, id: ViewId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent_of(id),
        }
    }

    /// The topmost ancestor of a view (the view itself if it has no parent).
    pub fn root_of(&self, id: ViewId) -> Option<ViewId> {
        if !self.is_alive(id) {
            return None;
        }
        Some(self.ancestors(id).last().unwrap_or(id))
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: ViewId, id: ViewId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Test a local-space point against a view's bounds.
    pub fn is_in_bounds(&self, id: ViewId, local: Point) -> bool {
        self.get(id).is_some_and(|v| v.bounds.contains(local))
    }

    /// Find the topmost child of `view` containing `child_point`.
    ///
    /// `child_point` is expressed in `view`'s child space. Children are tried
    /// from last to first; hidden or unpickable children are skipped, and each
    /// candidate tests the point in its own local space. Clipping is ignored.
    pub fn pick_view(&self, view: ViewId, child_point: Point) -> Option<ViewId> {
        let node = self.node_opt(view)?;
        node.children.iter().rev().copied().find(|&c| {
            self.node_opt(c).is_some_and(|n| {
                n.view.flags.contains(ViewFlags::VISIBLE | ViewFlags::PICKABLE)
                    && n.view.bounds.contains(child_point - n.view.position.to_vec2())
            })
        })
    }

    /// Resolve the deepest topmost view under `point`, starting at `root`.
    ///
    /// `point` is in `root`'s parent space (canvas space for a canvas root).
    /// At each level the point is made local to the current view, mapped into
    /// its child space, and handed to [`ViewTree::pick_view`]; the search
    /// descends while a child is found. When nothing below matches, `root`
    /// itself is the target. Returns `None` only if `root` is stale.
    pub fn resolve(&self, root: ViewId, point: Point) -> Option<Resolved> {
        let mut current = root;
        let mut node = self.node_opt(root)?;
        let mut point = point;
        let mut path = vec![root];
        loop {
            let local = point - node.view.position.to_vec2();
            let child_point = node.view.transform.local_to_child(local);
            let Some(child) = self.pick_view(current, child_point) else {
                return Some(Resolved {
                    target: current,
                    local,
                    path,
                });
            };
            let Some(child_node) = self.node_opt(child) else {
                unreachable!("`pick_view` only returns live views");
            };
            current = child;
            node = child_node;
            point = child_point;
            path.push(child);
        }
    }

    /// Express a point and delta given in `root`'s parent space in `target`'s
    /// local space.
    ///
    /// Walks from `root` down to `target`, applying each ancestor's offset and
    /// child transform to both `point` and `point - delta`. The local delta is
    /// the difference of the two results, so ancestor scale and rotation are
    /// reflected in it. Ancestors above `root` are not applied, matching
    /// [`ViewTree::resolve`] from the same root. If `target` is not inside
    /// `root`'s subtree (for example after being detached), the walk starts at
    /// `target`'s topmost ancestor instead.
    ///
    /// No hit-testing is involved: the point may lie outside `target`. Returns
    /// `None` for a stale `target`.
    pub fn localize(
        &self,
        root: ViewId,
        target: ViewId,
        point: Point,
        delta: Vec2,
    ) -> Option<Localized> {
        let offset = self.get(target)?.position.to_vec2();
        let chain = self.chain_to(root, target);
        let mut current = point;
        let mut previous = point - delta;
        for id in chain.iter().rev() {
            let Some(v) = self.get(*id) else {
                unreachable!("ancestors are live");
            };
            let origin = v.position.to_vec2();
            current = v.transform.local_to_child(current - origin);
            previous = v.transform.local_to_child(previous - origin);
        }
        current -= offset;
        previous -= offset;
        Some(Localized {
            position: current,
            delta: current - previous,
        })
    }

    /// Map a point in `view`'s local space back to `root`'s parent space, the
    /// space used by [`ViewTree::resolve`] and [`ViewTree::localize`].
    pub fn local_to_root(&self, root: ViewId, view: ViewId, local: Point) -> Option<Point> {
        let mut point = local + self.get(view)?.position.to_vec2();
        for id in self.chain_to(root, view) {
            let Some(v) = self.get(id) else {
                unreachable!("ancestors are live");
            };
            point = v.transform.child_to_local(point) + v.position.to_vec2();
        }
        Some(point)
    }

    /// Ancestors of `view`, nearest first, up to and including `root`.
    ///
    /// Empty when `view` is `root`; all ancestors when `root` is not one.
    fn chain_to(&self, root: ViewId, view: ViewId) -> Chain {
        let mut chain = Chain::new();
        if view == root {
            return chain;
        }
        for id in self.ancestors(view) {
            chain.push(id);
            if id == root {
                break;
            }
        }
        chain
    }
}

impl ViewTree {
    // --- internals ---

    pub(crate) fn node_opt(&self, id: ViewId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ViewId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: ViewId, parent: ViewId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: ViewId, parent: ViewId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = None;
        }
    }
}

/// Iterator over a view's ancestors, nearest first. See [`ViewTree::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    tree: &'a ViewTree,
    next: Option<ViewId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ViewId;

    fn next(&mut self) -> Option<ViewId> {
        let id = self.next?;
        self.next = self.tree.parent_of(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::f64::consts::FRAC_PI_2;
    use kurbo::{Rect, Size};

    fn rect_view(x: f64, y: f64, w: f64, h: f64) -> ViewNode {
        ViewNode::new(Point::new(x, y), Bounds::Rect(Size::new(w, h)))
    }

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    /// Root R (0, 0, 100, 100) with a circle C of radius 10 at (50, 50).
    fn circle_scene() -> (ViewTree, ViewId, ViewId) {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, rect_view(0.0, 0.0, 100.0, 100.0));
        let circle = tree.insert(
            Some(root),
            ViewNode::new(Point::new(50.0, 50.0), Bounds::Circle(10.0)),
        );
        (tree, root, circle)
    }

    #[test]
    fn resolves_circle_at_its_center() {
        let (tree, root, circle) = circle_scene();
        let hit = tree.resolve(root, Point::new(50.0, 50.0)).unwrap();
        assert_eq!(hit.target, circle);
        assert_eq!(hit.local, Point::ORIGIN);
        assert_eq!(hit.path, vec![root, circle]);

        let miss = tree.resolve(root, Point::new(10.0, 10.0)).unwrap();
        assert_eq!(miss.target, root, "outside the circle the root is the target");
        assert_eq!(miss.local, Point::new(10.0, 10.0));
    }

    #[test]
    fn empty_tree_resolves_root() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::default());
        let hit = tree.resolve(root, Point::new(-5.0, 1e6)).unwrap();
        assert_eq!(hit.target, root);
        assert_eq!(hit.path, vec![root]);
    }

    #[test]
    fn stale_root_resolves_nothing() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::default());
        tree.destroy(root);
        assert!(tree.resolve(root, Point::ORIGIN).is_none());
    }

    #[test]
    fn topmost_sibling_wins() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::default());
        let a = tree.insert(Some(root), rect_view(10.0, 10.0, 50.0, 50.0));
        let b = tree.insert(Some(root), rect_view(40.0, 40.0, 80.0, 80.0));

        assert_eq!(tree.resolve(root, Point::new(45.0, 45.0)).unwrap().target, b);
        assert_eq!(tree.resolve(root, Point::new(20.0, 20.0)).unwrap().target, a);

        // Re-adding moves `a` to the top.
        tree.add_view(root, a).unwrap();
        assert_eq!(tree.children_of(root), &[b, a]);
        assert_eq!(tree.resolve(root, Point::new(45.0, 45.0)).unwrap().target, a);
    }

    #[test]
    fn leaf_inside_nested_views() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, rect_view(0.0, 0.0, 300.0, 300.0));
        let panel = tree.insert(Some(root), rect_view(100.0, 100.0, 150.0, 150.0));
        let _sibling = tree.insert(Some(root), rect_view(0.0, 0.0, 50.0, 50.0));
        let leaf = tree.insert(Some(panel), rect_view(10.0, 20.0, 30.0, 30.0));
        let _leaf_sibling = tree.insert(Some(panel), rect_view(100.0, 100.0, 20.0, 20.0));

        let hit = tree.resolve(root, Point::new(115.0, 125.0)).unwrap();
        assert_eq!(hit.target, leaf);
        assert_eq!(hit.local, Point::new(5.0, 5.0));
        assert_eq!(hit.path, vec![root, panel, leaf]);

        // Inside the panel but outside the leaf.
        assert_eq!(tree.resolve(root, Point::new(105.0, 105.0)).unwrap().target, panel);
    }

    #[test]
    fn hidden_and_unpickable_views_are_skipped() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::default());
        let under = tree.insert(Some(root), rect_view(0.0, 0.0, 100.0, 100.0));
        let over = tree.insert(Some(root), rect_view(0.0, 0.0, 100.0, 100.0));
        let inner = tree.insert(Some(over), rect_view(0.0, 0.0, 10.0, 10.0));
        let p = Point::new(5.0, 5.0);

        assert_eq!(tree.resolve(root, p).unwrap().target, inner);

        // Unpickable `over` is skipped together with its subtree in this walk.
        tree.set_pickable(over, false);
        assert_eq!(tree.resolve(root, p).unwrap().target, under);

        tree.set_pickable(over, true);
        tree.set_visible(over, false);
        assert_eq!(tree.resolve(root, p).unwrap().target, under);

        // Pickability is per view: an unpickable leaf lets its parent be the target.
        tree.set_visible(over, true);
        tree.set_pickable(inner, false);
        assert_eq!(tree.resolve(root, p).unwrap().target, over);
    }

    #[test]
    fn scaled_and_translated_parent() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::default());
        let zoomed = tree.insert(
            Some(root),
            ViewNode {
                position: Point::new(100.0, 0.0),
                bounds: Bounds::Rect(Size::new(200.0, 200.0)),
                transform: ChildTransform::IDENTITY
                    .with_scale(2.0)
                    .with_translation(Vec2::new(10.0, 10.0)),
                ..ViewNode::default()
            },
        );
        let leaf = tree.insert(Some(zoomed), rect_view(20.0, 20.0, 10.0, 10.0));

        // Canvas (150, 40) -> zoomed local (50, 40) -> child (35, 30) -> leaf local (15, 10).
        // That is outside the 10x10 leaf.
        assert_eq!(tree.resolve(root, Point::new(150.0, 40.0)).unwrap().target, zoomed);

        // Canvas (125, 25) -> local (25, 25) -> child (22.5, 22.5) -> leaf local (2.5, 2.5).
        let hit = tree.resolve(root, Point::new(125.0, 25.0)).unwrap();
        assert_eq!(hit.target, leaf);
        assert_close(hit.local, Point::new(2.5, 2.5));
    }

    #[test]
    fn rotated_parent_picks_in_child_space() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::default());
        let turntable = tree.insert(
            Some(root),
            ViewNode {
                transform: ChildTransform::IDENTITY.with_rotation(FRAC_PI_2),
                ..ViewNode::default()
            },
        );
        let leaf = tree.insert(Some(turntable), rect_view(10.0, -5.0, 10.0, 10.0));

        // Children at +x are drawn at +y.
        let hit = tree.resolve(root, Point::new(0.0, 15.0)).unwrap();
        assert_eq!(hit.target, leaf);
        assert_close(hit.local, Point::new(5.0, 5.0));
        assert_eq!(tree.resolve(root, Point::new(15.0, 0.0)).unwrap().target, turntable);
    }

    #[test]
    fn clip_does_not_affect_picking() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::default());
        let clipped = tree.insert(
            Some(root),
            ViewNode {
                bounds: Bounds::Rect(Size::new(50.0, 50.0)),
                transform: ChildTransform::IDENTITY.with_clip(true),
                ..ViewNode::default()
            },
        );
        let overflow = tree.insert(Some(clipped), rect_view(40.0, 40.0, 100.0, 100.0));
        // (45, 45) is inside both; the overflow child is picked even though part of it is clipped.
        assert_eq!(tree.resolve(root, Point::new(45.0, 45.0)).unwrap().target, overflow);
        // (80, 80) is outside the clipped parent, so its subtree is never considered.
        assert_eq!(tree.resolve(root, Point::new(80.0, 80.0)).unwrap().target, root);
    }

    #[test]
    fn localize_walks_ancestor_transforms() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::default());
        let zoomed = tree.insert(
            Some(root),
            ViewNode {
                position: Point::new(10.0, 10.0),
                transform: ChildTransform::IDENTITY.with_scale(2.0),
                ..ViewNode::default()
            },
        );
        let leaf = tree.insert(Some(zoomed), rect_view(5.0, 5.0, 1.0, 1.0));

        // Far outside the leaf: localize still answers.
        let l = tree
            .localize(root, leaf, Point::new(50.0, 30.0), Vec2::new(8.0, -4.0))
            .unwrap();
        // (50, 30) -> zoomed local (40, 20) -> child (20, 10) -> leaf local (15, 5).
        assert_close(l.position, Point::new(15.0, 5.0));
        // The raw delta is halved by the ancestor scale.
        assert!((l.delta - Vec2::new(4.0, -2.0)).hypot() < 1e-9, "delta {:?}", l.delta);
    }

    #[test]
    fn localize_agrees_with_resolve_and_round_trips() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::default());
        let outer = tree.insert(
            Some(root),
            ViewNode {
                position: Point::new(30.0, 40.0),
                transform: ChildTransform::IDENTITY
                    .with_scale(1.5)
                    .with_rotation(0.3)
                    .with_translation(Vec2::new(-7.0, 2.0)),
                ..ViewNode::default()
            },
        );
        let inner = tree.insert(
            Some(outer),
            ViewNode {
                position: Point::new(3.0, 4.0),
                transform: ChildTransform::IDENTITY.with_rotation(-1.1),
                ..ViewNode::default()
            },
        );
        let leaf = tree.insert(
            Some(inner),
            ViewNode::new(Point::new(1.0, 1.0), Bounds::Circle(1000.0)),
        );

        let p = Point::new(61.0, 52.0);
        let hit = tree.resolve(root, p).unwrap();
        assert_eq!(hit.target, leaf);
        let l = tree.localize(root, leaf, p, Vec2::ZERO).unwrap();
        assert_close(l.position, hit.local);
        assert_close(tree.local_to_root(root, leaf, l.position).unwrap(), p);
    }

    #[test]
    fn add_view_moves_between_parents() {
        let mut tree = ViewTree::new();
        let a = tree.insert(None, ViewNode::default());
        let b = tree.insert(None, ViewNode::default());
        let child = tree.insert(Some(a), ViewNode::default());

        tree.add_view(b, child).unwrap();
        assert_eq!(tree.parent_of(child), Some(b));
        assert!(tree.children_of(a).is_empty(), "old parent no longer lists the child");
        assert_eq!(tree.children_of(b), &[child]);
    }

    #[test]
    fn add_view_rejects_cycles() {
        let mut tree = ViewTree::new();
        let a = tree.insert(None, ViewNode::default());
        let b = tree.insert(Some(a), ViewNode::default());
        let c = tree.insert(Some(b), ViewNode::default());

        assert_eq!(tree.add_view(c, a), Err(TreeError::Cycle { parent: c, child: a }));
        assert_eq!(tree.add_view(b, b), Err(TreeError::Cycle { parent: b, child: b }));
        // Nothing moved.
        assert_eq!(tree.parent_of(a), None);
        assert_eq!(tree.parent_of(c), Some(b));
        assert_eq!(tree.root_of(c), Some(a));
    }

    #[test]
    fn remove_view_and_remove_from_parent() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::default());
        let other = tree.insert(None, ViewNode::default());
        let a = tree.insert(Some(root), ViewNode::default());
        let b = tree.insert(Some(root), ViewNode::default());

        assert!(!tree.remove_view(other, a), "not a child of `other`");
        assert!(tree.remove_view(root, a));
        assert_eq!(tree.parent_of(a), None);
        assert!(tree.is_alive(a), "detached views stay alive");

        assert!(tree.remove_from_parent(b));
        assert!(!tree.remove_from_parent(b));
        assert_eq!(tree.child_count(root), 0);
    }

    #[test]
    fn liveness_destroy_and_reuse() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, rect_view(0.0, 0.0, 1.0, 1.0));
        let a = tree.insert(Some(root), rect_view(0.0, 0.0, 1.0, 1.0));
        let a_child = tree.insert(Some(a), ViewNode::default());

        tree.destroy(a);
        assert!(!tree.is_alive(a));
        assert!(!tree.is_alive(a_child), "subtree is destroyed too");
        assert!(tree.children_of(root).is_empty());
        assert_eq!(tree.view_count(), 1);

        // Insert new child; might reuse slot but generation bumps.
        let b = tree.insert(Some(root), rect_view(0.0, 0.0, 1.0, 1.0));
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
        assert!(tree.add_view(a, b).is_err());
    }

    #[test]
    fn accessors_respect_liveness() {
        let mut tree = ViewTree::new();
        let v = tree.insert(None, rect_view(3.0, 4.0, 1.0, 1.0));
        assert_eq!(tree.x(v), Some(3.0));
        assert_eq!(tree.y(v), Some(4.0));
        tree.set_x(v, 7.0);
        assert_eq!(tree.position(v), Some(Point::new(7.0, 4.0)));
        tree.destroy(v);
        assert_eq!(tree.position(v), None);
        assert_eq!(tree.bounds(v), None);
        tree.set_position(v, Point::ORIGIN);
        assert!(!tree.is_visible(v));
    }

    #[test]
    fn localize_stops_at_a_nested_root() {
        let mut tree = ViewTree::new();
        let top = tree.insert(
            None,
            ViewNode {
                position: Point::new(10.0, 10.0),
                transform: ChildTransform::IDENTITY.with_scale(2.0),
                ..ViewNode::default()
            },
        );
        let root = tree.insert(Some(top), rect_view(0.0, 0.0, 100.0, 100.0));
        let leaf = tree.insert(Some(root), rect_view(20.0, 20.0, 10.0, 10.0));

        let p = Point::new(25.0, 25.0);
        let hit = tree.resolve(root, p).unwrap();
        assert_eq!(hit.target, leaf);
        let l = tree.localize(root, leaf, p, Vec2::new(4.0, 0.0)).unwrap();
        assert_eq!(l.position, hit.local, "`top` is above the root and must not apply");
        assert_eq!(l.delta, Vec2::new(4.0, 0.0));
        assert_eq!(tree.localize(root, root, p, Vec2::ZERO).unwrap().position, p);
        assert_eq!(tree.local_to_root(root, leaf, l.position), Some(p));

        // From the top, the scale of `top` applies.
        let from_top = tree.localize(top, leaf, p, Vec2::ZERO).unwrap();
        assert_close(from_top.position, Point::new(-12.5, -12.5));
    }

    #[test]
    fn is_in_bounds_uses_local_space() {
        let mut tree = ViewTree::new();
        let v = tree.insert(
            None,
            ViewNode::new(Point::new(100.0, 100.0), Bounds::Shape(Rect::new(-5.0, -5.0, 5.0, 5.0))),
        );
        assert!(tree.is_in_bounds(v, Point::new(0.0, 0.0)));
        assert!(!tree.is_in_bounds(v, Point::new(100.0, 100.0)));
    }
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the view tree: view identifiers, flags, bounds, and per-view data.

use kurbo::{Point, Rect, Size};

use crate::transform::ChildTransform;

/// Identifier for a view in the tree (generational).
///
/// A `ViewId` stays valid until the view is destroyed. After that the slot may
/// be reused with a bumped generation, so stale ids never alias a new view.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub(crate) u32, pub(crate) u32);

impl ViewId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// View flags controlling drawing and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ViewFlags: u8 {
        /// View is visible (drawn and hit-tested).
        const VISIBLE  = 0b0000_0001;
        /// View is pickable (participates in hit testing). Not inherited by children.
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Bounds predicate of a view, evaluated in the view's local space.
///
/// Concrete drawable shapes live outside this crate; they only hand the tree
/// the region they occupy so it can be picked.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Bounds {
    /// Contains every point. Typical for roots and plain containers.
    #[default]
    Unbounded,
    /// Rectangle spanning `(0, 0)` to `(width, height)`, max edges excluded.
    ///
    /// A zero size means "no size set yet" and behaves like [`Bounds::Unbounded`].
    Rect(Size),
    /// Disk of the given radius around the local origin, edge included.
    Circle(f64),
    /// Arbitrary local rectangle, max edges excluded.
    Shape(Rect),
}

impl Bounds {
    /// Returns `true` if `local` lies inside these bounds.
    pub fn contains(&self, local: Point) -> bool {
        match *self {
            Self::Unbounded => true,
            Self::Rect(size) => {
                (size.width == 0.0 && size.height == 0.0)
                    || Rect::from_origin_size(Point::ORIGIN, size).contains(local)
            }
            Self::Circle(radius) => local.to_vec2().hypot() <= radius,
            Self::Shape(rect) => rect.contains(local),
        }
    }

    /// Local-space rectangle covered by these bounds, or `None` when unbounded.
    pub fn rect(&self) -> Option<Rect> {
        match *self {
            Self::Unbounded => None,
            Self::Rect(size) if size.width == 0.0 && size.height == 0.0 => None,
            Self::Rect(size) => Some(Rect::from_origin_size(Point::ORIGIN, size)),
            Self::Circle(radius) => Some(Rect::new(-radius, -radius, radius, radius)),
            Self::Shape(rect) => Some(rect),
        }
    }
}

/// Per-view data: position, bounds, child transform, and flags.
#[derive(Clone, Debug, Default)]
pub struct ViewNode {
    /// Offset of the local origin, in the parent's child space.
    pub position: Point,
    /// Bounds predicate in local space.
    pub bounds: Bounds,
    /// Mapping from local space to the space children are laid out in.
    pub transform: ChildTransform,
    /// Visibility and picking flags.
    pub flags: ViewFlags,
}

impl ViewNode {
    /// A view at `position` with the given bounds and default everything else.
    pub fn new(position: Point, bounds: Bounds) -> Self {
        Self {
            position,
            bounds,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_bounds_are_half_open() {
        let b = Bounds::Rect(Size::new(10.0, 20.0));
        assert!(b.contains(Point::new(0.0, 0.0)));
        assert!(b.contains(Point::new(9.99, 19.99)));
        assert!(!b.contains(Point::new(10.0, 5.0)), "max x edge is excluded");
        assert!(!b.contains(Point::new(5.0, 20.0)), "max y edge is excluded");
        assert!(!b.contains(Point::new(-0.01, 5.0)));
    }

    #[test]
    fn zero_size_rect_is_unbounded() {
        let b = Bounds::Rect(Size::ZERO);
        assert!(b.contains(Point::new(-1000.0, 1000.0)));
        assert_eq!(b.rect(), None);
    }

    #[test]
    fn circle_bounds_include_edge() {
        let b = Bounds::Circle(10.0);
        assert!(b.contains(Point::ORIGIN));
        assert!(b.contains(Point::new(10.0, 0.0)));
        assert!(b.contains(Point::new(6.0, 8.0)));
        assert!(!b.contains(Point::new(8.0, 8.0)));
        assert_eq!(b.rect(), Some(Rect::new(-10.0, -10.0, 10.0, 10.0)));
    }

    #[test]
    fn default_flags_are_visible_and_pickable() {
        let node = ViewNode::default();
        assert!(node.flags.contains(ViewFlags::VISIBLE | ViewFlags::PICKABLE));
        assert_eq!(node.bounds, Bounds::Unbounded);
    }
}

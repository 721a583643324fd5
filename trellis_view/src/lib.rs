// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis View: a retained-mode 2D view tree for canvas-style surfaces.
//!
//! - Represents a hierarchy of views, each positioned in its parent's child space.
//! - Gives every view a child transform (scale, translation, rotation, clip flag) that maps
//!   its local space to the space its children are laid out in.
//! - Resolves the topmost view under a point by recursive picking, and re-expresses points
//!   and deltas in any view's local space by walking its ancestor chain.
//! - Dispatches drawing to a [`Painter`] without drawing anything itself.
//!
//! ## Coordinate spaces
//!
//! - *Local space*: a view's own frame. [`Bounds`] are tested here.
//! - *Child space*: the frame children are positioned in; equal to local space unless the
//!   view's [`ChildTransform`] is not the identity.
//! - *Parent space*: the parent's child space. A view's `position` lives here, and
//!   `local = parent_point - position`.
//!
//! ## Picking
//!
//! Picking is structural rather than spatially indexed. [`ViewTree::pick_view`] tries the
//! children of a view from topmost (last) to bottommost (first), skipping hidden or
//! unpickable ones. [`ViewTree::resolve`] repeats that from a root until nothing below
//! matches; the root itself is the answer for an empty tree. Clipping never affects
//! picking. Float inputs are assumed to be finite.
//!
//! ## API overview
//!
//! - [`ViewTree`]: arena owning all views, with structural edits and queries.
//! - [`ViewNode`]: per-view data (position, bounds, transform, flags).
//! - [`ViewId`]: generational handle of a view.
//! - [`ViewFlags`]: visibility and picking controls.
//! - [`Resolved`] / [`Localized`]: results of [`ViewTree::resolve`] and [`ViewTree::localize`].
//! - [`TreeError`]: rejected structural edits.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod paint;
mod transform;
mod tree;
mod types;

pub use error::TreeError;
pub use paint::Painter;
pub use transform::ChildTransform;
pub use tree::{Ancestors, Localized, Resolved, ViewTree};
pub use types::{Bounds, ViewFlags, ViewId, ViewNode};

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Pointer: mouse event processing for [`trellis_view`] trees.
//!
//! ## Overview
//!
//! Hosts feed raw [`PointerSample`]s (press, release, move, wheel, and the
//! cancel/leave notifications) into a [`MouseEventProcessor`]. The processor
//! hit-tests against a view tree, tracks which view each button went down on,
//! which button drives the drag, and which view is hovered, and returns the
//! [`MouseEvent`]s to deliver, each addressed to one view with coordinates in
//! that view's local space.
//!
//! ## Routing rules
//!
//! - A press goes to the topmost view under the pointer and is remembered per
//!   button. The first button pressed while no drag is active drives the drag.
//! - While the drag button is held, every move is a drag of the view it went
//!   down on, wherever the pointer is. Hover is frozen.
//! - Otherwise a move goes to the topmost view under the pointer. When that
//!   view changes, the old view gets an exit and the new view an enter, in
//!   that order, before the move.
//! - A release goes to the view the press landed on: up-inside when the
//!   pointer is still over it, up-outside (naming the view under the pointer)
//!   when not.
//! - Wheel events go to the view under the pointer; the amount is not scaled.
//!
//! ## Delivery
//!
//! Processing never calls user code. Events are delivered afterwards by
//! [`dispatcher::run`] to callbacks registered in [`Listeners`], so listeners
//! are free to rearrange or destroy views. [`Canvas`] bundles a tree, a
//! processor, and listeners into a single surface.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod canvas;
pub mod dispatcher;
mod listeners;
mod processor;
mod types;

pub use canvas::Canvas;
pub use listeners::{Callback, ListenerId, Listeners, Owner};
pub use processor::{Events, MouseEventProcessor};
pub use types::{
    Buttons, MouseButton, MouseEvent, MouseEventKind, PointerSample, PointerSampleKind,
};

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: deliver a processor result to listeners.
//!
//! The processor has already decided every target and computed every local
//! coordinate, so delivery is a plain walk over the events:
//!
//! - Events are delivered in order, each to the listeners of its own target
//!   and kind.
//! - Listeners may mutate the context, including destroying views. Later
//!   events of the same batch are still delivered as computed; the processor
//!   forgets destroyed views when the next sample arrives.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use trellis_pointer::{dispatcher, Buttons, Listeners, MouseEventKind, MouseEventProcessor};
//! use trellis_view::{ViewNode, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let root = tree.insert(None, ViewNode::default());
//!
//! let mut listeners: Listeners<Vec<MouseEventKind>> = Listeners::new();
//! listeners.on_mouse_enter(root, |seen, ev| seen.push(ev.kind));
//! listeners.on_mouse_move(root, |seen, ev| seen.push(ev.kind));
//!
//! let mut mp = MouseEventProcessor::new();
//! let events = mp.on_mouse_move(&tree, root, Point::new(3.0, 4.0), Vec2::ZERO, Buttons::empty());
//!
//! let mut seen = Vec::new();
//! assert_eq!(dispatcher::run(&events, &mut seen, &mut listeners), 2);
//! assert_eq!(seen, vec![MouseEventKind::Enter, MouseEventKind::Move]);
//! ```

use crate::listeners::Listeners;
use crate::types::MouseEvent;

/// Deliver `events` in order. Returns the number of listener calls made.
pub fn run<C>(events: &[MouseEvent], ctx: &mut C, listeners: &mut Listeners<C>) -> usize {
    let mut calls = 0;
    for event in events {
        calls += listeners.emit(ctx, event);
    }
    calls
}

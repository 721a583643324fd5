// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mouse event processor: turns raw samples into per-view events.
//!
//! The processor keeps three pieces of state between samples:
//!
//! - one *down view* per [`MouseButton`], the view a press landed on;
//! - the *drag button*, the first button pressed while no other drag was
//!   active;
//! - the *over view*, the view currently hovered.
//!
//! While the drag button is held every move goes to its down view as a
//! [`MouseEventKind::Drag`], wherever the pointer is. Otherwise moves are
//! hit-tested and hover changes produce an exit/enter pair before the move.
//! Releases are classified as up-inside or up-outside against the view the
//! press landed on.
//!
//! Processing is split from delivery: each `on_*` method returns the events in
//! the order they must be delivered, with targets and local coordinates already
//! computed. Deliver them with [`dispatcher::run`](crate::dispatcher::run).
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Size, Vec2};
//! use trellis_pointer::{Buttons, MouseButton, MouseEventKind, MouseEventProcessor};
//! use trellis_view::{Bounds, ViewNode, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let root = tree.insert(None, ViewNode::new(Point::ORIGIN, Bounds::Rect(Size::new(100.0, 100.0))));
//! let dot = tree.insert(Some(root), ViewNode::new(Point::new(50.0, 50.0), Bounds::Circle(10.0)));
//!
//! let mut mp = MouseEventProcessor::new();
//! let down = mp.on_mouse_down(&tree, root, Point::new(50.0, 50.0), MouseButton::Left, Buttons::LEFT);
//! assert_eq!(down[0].target, dot);
//!
//! // Far outside the dot, the move is still a drag of the dot.
//! let moved = mp.on_mouse_move(&tree, root, Point::new(90.0, 90.0), Vec2::new(40.0, 40.0), Buttons::LEFT);
//! assert_eq!(moved.len(), 1);
//! assert_eq!(moved[0].kind, MouseEventKind::Drag);
//! assert_eq!(moved[0].position, Point::new(40.0, 40.0));
//! ```

use kurbo::{Point, Vec2};
use smallvec::SmallVec;
use trellis_view::{Localized, ViewId, ViewTree};

use crate::types::{
    Buttons, MouseButton, MouseEvent, MouseEventKind, PointerSample, PointerSampleKind,
};

/// Events produced by one sample, in delivery order.
pub type Events = SmallVec<[MouseEvent; 3]>;

/// Press, drag, and hover state for a single mouse.
#[derive(Clone, Debug, Default)]
pub struct MouseEventProcessor {
    down_views: [Option<ViewId>; 5],
    drag_button: Option<MouseButton>,
    over_view: Option<ViewId>,
    /// Last pointer position in `over_view`'s local space, with the buttons held.
    last_hover: (Point, Buttons),
}

impl MouseEventProcessor {
    /// Create a processor with nothing pressed or hovered.
    pub fn new() -> Self {
        Self::default()
    }

    /// The view `button` went down on, if it is still held.
    pub fn down_view(&self, button: MouseButton) -> Option<ViewId> {
        self.down_views[button.slot()]
    }

    /// The button driving the current drag.
    pub fn drag_button(&self) -> Option<MouseButton> {
        self.drag_button
    }

    /// The view under the pointer as of the last hover update.
    pub fn over_view(&self) -> Option<ViewId> {
        self.over_view
    }

    /// Returns `true` while moves are routed as drags.
    pub fn is_dragging(&self) -> bool {
        self.drag_button
            .is_some_and(|b| self.down_views[b.slot()].is_some())
    }

    /// Process one host sample.
    ///
    /// Down and up samples without a button are ignored.
    pub fn handle(&mut self, tree: &ViewTree, root: ViewId, sample: &PointerSample) -> Events {
        let PointerSample {
            position,
            delta,
            button,
            buttons,
            amount,
            ..
        } = *sample;
        match sample.kind {
            PointerSampleKind::Down => match button {
                Some(b) => self.on_mouse_down(tree, root, position, b, buttons),
                None => Events::new(),
            },
            PointerSampleKind::Up => match button {
                Some(b) => self.on_mouse_up(tree, root, position, b, buttons),
                None => Events::new(),
            },
            PointerSampleKind::Move => self.on_mouse_move(tree, root, position, delta, buttons),
            PointerSampleKind::Wheel => self.on_mouse_wheel(tree, root, position, amount, buttons),
            PointerSampleKind::Cancel => {
                self.prune(tree);
                self.cancel();
                Events::new()
            }
            PointerSampleKind::Leave => {
                self.prune(tree);
                self.leave().into_iter().collect()
            }
        }
    }

    /// A button went down at `point` (in `root`'s parent space).
    pub fn on_mouse_down(
        &mut self,
        tree: &ViewTree,
        root: ViewId,
        point: Point,
        button: MouseButton,
        buttons: Buttons,
    ) -> Events {
        self.prune(tree);
        let Some(hit) = tree.resolve(root, point) else {
            log::debug!("mouse down: root {root:?} is stale");
            return Events::new();
        };
        self.down_views[button.slot()] = Some(hit.target);
        if self.drag_button.is_none() {
            log::trace!("drag pinned to {button:?} on {:?}", hit.target);
            self.drag_button = Some(button);
        } else {
            log::trace!("{button:?} pressed on {:?}", hit.target);
        }
        let mut ev = MouseEvent::new(MouseEventKind::Down, hit.target, hit.local, buttons);
        ev.button = Some(button);
        smallvec::smallvec![ev]
    }

    /// A button went up at `point`.
    ///
    /// Only buttons with a recorded down view produce an event.
    pub fn on_mouse_up(
        &mut self,
        tree: &ViewTree,
        root: ViewId,
        point: Point,
        button: MouseButton,
        buttons: Buttons,
    ) -> Events {
        self.prune(tree);
        let down = self.down_views[button.slot()].take();
        if self.drag_button == Some(button) {
            self.drag_button = None;
        }
        let Some(down) = down else {
            return Events::new();
        };
        let current = tree.resolve(root, point).map(|hit| hit.target);
        let Some(at) = tree.localize(root, down, point, Vec2::ZERO) else {
            return Events::new();
        };
        let mut ev = if current == Some(down) {
            log::trace!("{button:?} released inside {down:?}");
            MouseEvent::new(MouseEventKind::UpInside, down, at.position, buttons)
        } else {
            log::trace!("{button:?} released outside {down:?}, over {current:?}");
            let mut ev = MouseEvent::new(MouseEventKind::UpOutside, down, at.position, buttons);
            ev.related = current;
            ev
        };
        ev.button = Some(button);
        smallvec::smallvec![ev]
    }

    /// The pointer moved to `point` by `delta`.
    ///
    /// During a drag the only event is a drag of the pressed view, and hover
    /// state is left alone. Otherwise a change of hovered view yields an exit
    /// of the old view followed by an enter of the new one, and every move
    /// ends with a move event on the hovered view.
    pub fn on_mouse_move(
        &mut self,
        tree: &ViewTree,
        root: ViewId,
        point: Point,
        delta: Vec2,
        buttons: Buttons,
    ) -> Events {
        self.prune(tree);
        if let Some(button) = self.drag_button
            && let Some(view) = self.down_views[button.slot()]
        {
            let Some(at) = tree.localize(root, view, point, delta) else {
                return Events::new();
            };
            // Hover is frozen, but the exit sent on leave should be where the
            // pointer is now.
            if let Some(over) = self.over_view
                && let Some(here) = tree.localize(root, over, point, Vec2::ZERO)
            {
                self.last_hover = (here.position, buttons);
            }
            let mut ev = localized(MouseEventKind::Drag, view, at, buttons);
            ev.button = Some(button);
            return smallvec::smallvec![ev];
        }

        let Some(current) = tree.resolve(root, point).map(|hit| hit.target) else {
            return Events::new();
        };
        let mut events = Events::new();
        if self.over_view != Some(current) {
            let previous = self.over_view.replace(current);
            log::trace!("hover {previous:?} -> {current:?}");
            if let Some(old) = previous
                && let Some(at) = tree.localize(root, old, point, delta)
            {
                let mut exit = localized(MouseEventKind::Exit, old, at, buttons);
                exit.related = Some(current);
                events.push(exit);
            }
            if let Some(at) = tree.localize(root, current, point, delta) {
                let mut enter = localized(MouseEventKind::Enter, current, at, buttons);
                enter.related = previous;
                events.push(enter);
            }
        }
        if let Some(at) = tree.localize(root, current, point, delta) {
            self.last_hover = (at.position, buttons);
            events.push(localized(MouseEventKind::Move, current, at, buttons));
        }
        events
    }

    /// The wheel turned by `amount` at `point`.
    ///
    /// The amount is passed through unscaled.
    pub fn on_mouse_wheel(
        &mut self,
        tree: &ViewTree,
        root: ViewId,
        point: Point,
        amount: f64,
        buttons: Buttons,
    ) -> Events {
        self.prune(tree);
        let Some(hit) = tree.resolve(root, point) else {
            return Events::new();
        };
        let mut ev = MouseEvent::new(MouseEventKind::Wheel, hit.target, hit.local, buttons);
        ev.amount = amount;
        smallvec::smallvec![ev]
    }

    /// Drop every press without emitting events, as after a loss of pointer
    /// capture. Returns the views whose presses were dropped.
    pub fn cancel(&mut self) -> SmallVec<[ViewId; 5]> {
        let dropped: SmallVec<[ViewId; 5]> =
            self.down_views.iter_mut().filter_map(Option::take).collect();
        if !dropped.is_empty() {
            log::trace!("cancel: dropped presses on {dropped:?}");
        }
        self.drag_button = None;
        dropped
    }

    /// The pointer left the canvas.
    ///
    /// Returns an exit for the hovered view, positioned where the last move
    /// (hover or drag) left the pointer, and clears the hover.
    pub fn leave(&mut self) -> Option<MouseEvent> {
        let view = self.over_view.take()?;
        log::trace!("hover {view:?} -> none (left canvas)");
        let (position, buttons) = self.last_hover;
        Some(MouseEvent::new(MouseEventKind::Exit, view, position, buttons))
    }

    /// Forget handles of views that have been destroyed.
    fn prune(&mut self, tree: &ViewTree) {
        for slot in &mut self.down_views {
            if let Some(view) = *slot
                && !tree.is_alive(view)
            {
                log::debug!("dropping press on destroyed view {view:?}");
                *slot = None;
            }
        }
        if let Some(button) = self.drag_button
            && self.down_views[button.slot()].is_none()
        {
            self.drag_button = None;
        }
        if let Some(view) = self.over_view
            && !tree.is_alive(view)
        {
            log::debug!("dropping hover of destroyed view {view:?}");
            self.over_view = None;
        }
    }
}

fn localized(kind: MouseEventKind, target: ViewId, at: Localized, buttons: Buttons) -> MouseEvent {
    let mut ev = MouseEvent::new(kind, target, at.position, buttons);
    ev.delta = at.delta;
    ev
}

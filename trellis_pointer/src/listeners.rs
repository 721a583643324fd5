// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view listener registry.
//!
//! Listeners are stored per `(view, kind)` and called in registration order.
//! Each one may be bound to an [`Owner`], a caller-chosen identity that lets a
//! component remove everything it registered in one call.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use trellis_pointer::{Listeners, MouseEventKind, Owner};
//! use trellis_view::{ViewNode, ViewTree};
//!
//! let mut tree = ViewTree::new();
//! let view = tree.insert(None, ViewNode::default());
//!
//! let mut listeners: Listeners<Vec<Point>> = Listeners::new();
//! let owner = Owner(7);
//! listeners.add(view, MouseEventKind::Down, Some(owner), |log, ev| log.push(ev.position));
//! assert_eq!(listeners.count(view, MouseEventKind::Down), 1);
//!
//! assert_eq!(listeners.remove_owner(owner), 1);
//! assert!(listeners.is_empty());
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use hashbrown::HashMap;
use trellis_view::ViewId;

use crate::types::{MouseEvent, MouseEventKind};

/// A boxed listener callback. `C` is the context passed to every call.
pub type Callback<C> = Box<dyn FnMut(&mut C, &MouseEvent)>;

/// Handle returned by [`Listeners::add`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Identity a listener is bound to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Owner(pub u64);

struct Entry<C> {
    id: ListenerId,
    owner: Option<Owner>,
    callback: Callback<C>,
}

/// Registry of mouse listeners keyed by view and event kind.
pub struct Listeners<C> {
    map: HashMap<(ViewId, MouseEventKind), Vec<Entry<C>>>,
    next_id: u64,
}

impl<C> core::fmt::Debug for Listeners<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listeners")
            .field("slots", &self.map.len())
            .field("listeners", &self.len())
            .finish_non_exhaustive()
    }
}

impl<C> Default for Listeners<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Listeners<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            next_id: 0,
        }
    }

    /// Register `callback` for events of `kind` targeting `view`.
    pub fn add(
        &mut self,
        view: ViewId,
        kind: MouseEventKind,
        owner: Option<Owner>,
        callback: impl FnMut(&mut C, &MouseEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.map.entry((view, kind)).or_default().push(Entry {
            id,
            owner,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a listener. Both `id` and `owner` must match what it was added
    /// with; returns `true` if a listener was removed.
    pub fn remove(
        &mut self,
        view: ViewId,
        kind: MouseEventKind,
        id: ListenerId,
        owner: Option<Owner>,
    ) -> bool {
        let Some(list) = self.map.get_mut(&(view, kind)) else {
            return false;
        };
        let Some(pos) = list.iter().position(|e| e.id == id && e.owner == owner) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.map.remove(&(view, kind));
        }
        true
    }

    /// Remove every listener bound to `owner`. Returns how many were removed.
    pub fn remove_owner(&mut self, owner: Owner) -> usize {
        let mut removed = 0;
        self.map.retain(|_, list| {
            let before = list.len();
            list.retain(|e| e.owner != Some(owner));
            removed += before - list.len();
            !list.is_empty()
        });
        removed
    }

    /// Drop every listener of `view`.
    pub fn clear_view(&mut self, view: ViewId) {
        self.map.retain(|(v, _), _| *v != view);
    }

    /// Keep only the listeners of views for which `keep` returns `true`.
    /// Returns how many listeners were dropped.
    pub fn retain_views(&mut self, mut keep: impl FnMut(ViewId) -> bool) -> usize {
        let mut removed = 0;
        self.map.retain(|(view, _), list| {
            let kept = keep(*view);
            if !kept {
                removed += list.len();
            }
            kept
        });
        removed
    }

    /// Number of listeners for `(view, kind)`.
    pub fn count(&self, view: ViewId, kind: MouseEventKind) -> usize {
        self.map.get(&(view, kind)).map_or(0, Vec::len)
    }

    /// Total number of listeners.
    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    /// Returns `true` if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Call the listeners registered for the event's target and kind, in
    /// registration order. Returns the number of listeners called.
    ///
    /// The registry is borrowed for the whole call, so the set of listeners
    /// invoked is fixed when the call starts.
    pub fn emit(&mut self, ctx: &mut C, event: &MouseEvent) -> usize {
        let Some(list) = self.map.get_mut(&(event.target, event.kind)) else {
            return 0;
        };
        for entry in list.iter_mut() {
            (entry.callback)(ctx, event);
        }
        list.len()
    }

    /// Listen for [`MouseEventKind::Down`].
    pub fn on_mouse_down(
        &mut self,
        view: ViewId,
        callback: impl FnMut(&mut C, &MouseEvent) + 'static,
    ) -> ListenerId {
        self.add(view, MouseEventKind::Down, None, callback)
    }

    /// Listen for [`MouseEventKind::UpInside`].
    pub fn on_mouse_up_inside(
        &mut self,
        view: ViewId,
        callback: impl FnMut(&mut C, &MouseEvent) + 'static,
    ) -> ListenerId {
        self.add(view, MouseEventKind::UpInside, None, callback)
    }

    /// Listen for [`MouseEventKind::UpOutside`].
    pub fn on_mouse_up_outside(
        &mut self,
        view: ViewId,
        callback: impl FnMut(&mut C, &MouseEvent) + 'static,
    ) -> ListenerId {
        self.add(view, MouseEventKind::UpOutside, None, callback)
    }

    /// Listen for [`MouseEventKind::Move`].
    pub fn on_mouse_move(
        &mut self,
        view: ViewId,
        callback: impl FnMut(&mut C, &MouseEvent) + 'static,
    ) -> ListenerId {
        self.add(view, MouseEventKind::Move, None, callback)
    }

    /// Listen for [`MouseEventKind::Drag`].
    pub fn on_mouse_drag(
        &mut self,
        view: ViewId,
        callback: impl FnMut(&mut C, &MouseEvent) + 'static,
    ) -> ListenerId {
        self.add(view, MouseEventKind::Drag, None, callback)
    }

    /// Listen for [`MouseEventKind::Enter`].
    pub fn on_mouse_enter(
        &mut self,
        view: ViewId,
        callback: impl FnMut(&mut C, &MouseEvent) + 'static,
    ) -> ListenerId {
        self.add(view, MouseEventKind::Enter, None, callback)
    }

    /// Listen for [`MouseEventKind::Exit`].
    pub fn on_mouse_exit(
        &mut self,
        view: ViewId,
        callback: impl FnMut(&mut C, &MouseEvent) + 'static,
    ) -> ListenerId {
        self.add(view, MouseEventKind::Exit, None, callback)
    }

    /// Listen for [`MouseEventKind::Wheel`].
    pub fn on_mouse_wheel(
        &mut self,
        view: ViewId,
        callback: impl FnMut(&mut C, &MouseEvent) + 'static,
    ) -> ListenerId {
        self.add(view, MouseEventKind::Wheel, None, callback)
    }
}

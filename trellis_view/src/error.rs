// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::types::ViewId;

/// Errors from structural edits of a [`ViewTree`](crate::ViewTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The handle refers to a destroyed view.
    Stale(ViewId),
    /// Attaching `child` under `parent` would make a view its own ancestor.
    Cycle {
        /// The requested parent.
        parent: ViewId,
        /// The view that was being attached.
        child: ViewId,
    },
    /// The view is pinned in place (a canvas root) and cannot be re-parented.
    Pinned(ViewId),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stale(id) => write!(f, "view {id:?} has been destroyed"),
            Self::Cycle { parent, child } => {
                write!(f, "cannot add {child:?} under its own descendant {parent:?}")
            }
            Self::Pinned(id) => write!(f, "view {id:?} cannot be re-parented"),
        }
    }
}

impl core::error::Error for TreeError {}

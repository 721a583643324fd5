// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input samples, output events, and button identities.

use kurbo::{Point, Vec2};
use trellis_view::ViewId;

/// A physical mouse button.
///
/// The discriminant is the button's bit in a host `buttons` mask.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button.
    Left = 1,
    /// Secondary button.
    Right = 2,
    /// Wheel button.
    Middle = 4,
    /// Fourth button, usually "back".
    Mouse4 = 8,
    /// Fifth button, usually "forward".
    Mouse5 = 16,
}

impl MouseButton {
    /// All buttons, in slot order.
    pub const ALL: [Self; 5] = [
        Self::Left,
        Self::Right,
        Self::Middle,
        Self::Mouse4,
        Self::Mouse5,
    ];

    /// The button's bit in a `buttons` mask.
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Convert a single mask bit back to a button. Returns `None` unless
    /// exactly one known bit is set.
    pub const fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            4 => Some(Self::Middle),
            8 => Some(Self::Mouse4),
            16 => Some(Self::Mouse5),
            _ => None,
        }
    }

    /// Convert a DOM-style `button` index (0 primary, 1 auxiliary, 2 secondary,
    /// 3 back, 4 forward).
    pub const fn from_dom_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            3 => Some(Self::Mouse4),
            4 => Some(Self::Mouse5),
            _ => None,
        }
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
            Self::Mouse4 => 3,
            Self::Mouse5 => 4,
        }
    }
}

bitflags::bitflags! {
    /// Set of buttons held during a sample.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        /// Primary button.
        const LEFT = MouseButton::Left.bit();
        /// Secondary button.
        const RIGHT = MouseButton::Right.bit();
        /// Wheel button.
        const MIDDLE = MouseButton::Middle.bit();
        /// Fourth button.
        const MOUSE4 = MouseButton::Mouse4.bit();
        /// Fifth button.
        const MOUSE5 = MouseButton::Mouse5.bit();
    }
}

impl From<MouseButton> for Buttons {
    fn from(button: MouseButton) -> Self {
        Self::from_bits_truncate(button.bit())
    }
}

/// What a [`PointerSample`] reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerSampleKind {
    /// A button was pressed.
    Down,
    /// A button was released.
    Up,
    /// The pointer moved.
    Move,
    /// The wheel turned.
    Wheel,
    /// The host lost pointer capture (window blur and the like); presses are dropped.
    Cancel,
    /// The pointer left the canvas.
    Leave,
}

/// One raw input sample from the host.
///
/// `position` is in canvas pixels, already corrected for the element offset
/// and device scale. Values are assumed to be finite.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSample {
    /// Sample kind.
    pub kind: PointerSampleKind,
    /// Pointer position in canvas space.
    pub position: Point,
    /// Movement since the previous sample (moves only).
    pub delta: Vec2,
    /// Button that changed state (downs and ups only).
    pub button: Option<MouseButton>,
    /// Buttons held after the sample.
    pub buttons: Buttons,
    /// Wheel amount (wheel samples only).
    pub amount: f64,
}

impl PointerSample {
    fn new(kind: PointerSampleKind, position: Point) -> Self {
        Self {
            kind,
            position,
            delta: Vec2::ZERO,
            button: None,
            buttons: Buttons::empty(),
            amount: 0.0,
        }
    }

    /// A button press at `position`.
    pub fn down(position: Point, button: MouseButton, buttons: Buttons) -> Self {
        Self {
            button: Some(button),
            buttons,
            ..Self::new(PointerSampleKind::Down, position)
        }
    }

    /// A button release at `position`.
    pub fn up(position: Point, button: MouseButton, buttons: Buttons) -> Self {
        Self {
            button: Some(button),
            buttons,
            ..Self::new(PointerSampleKind::Up, position)
        }
    }

    /// A move to `position` by `delta`.
    pub fn moved(position: Point, delta: Vec2, buttons: Buttons) -> Self {
        Self {
            delta,
            buttons,
            ..Self::new(PointerSampleKind::Move, position)
        }
    }

    /// A wheel turn of `amount` at `position`.
    pub fn wheel(position: Point, amount: f64, buttons: Buttons) -> Self {
        Self {
            amount,
            buttons,
            ..Self::new(PointerSampleKind::Wheel, position)
        }
    }

    /// Loss of pointer capture.
    pub fn cancel() -> Self {
        Self::new(PointerSampleKind::Cancel, Point::ORIGIN)
    }

    /// The pointer left the canvas.
    pub fn leave() -> Self {
        Self::new(PointerSampleKind::Leave, Point::ORIGIN)
    }
}

/// Kind of a synthesized [`MouseEvent`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseEventKind {
    /// A button went down over the target.
    Down,
    /// A button went up over the view it went down on.
    UpInside,
    /// A button went up elsewhere; `related` is the view under the pointer.
    UpOutside,
    /// The pointer moved over the target with no drag active.
    Move,
    /// The pointer moved while a drag was held on the target.
    Drag,
    /// The pointer started hovering the target; `related` is the previous view.
    Enter,
    /// The pointer stopped hovering the target; `related` is the next view.
    Exit,
    /// The wheel turned over the target.
    Wheel,
}

/// A mouse event addressed to a single view.
///
/// `position` and `delta` are in the target's local space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MouseEvent {
    /// Event kind.
    pub kind: MouseEventKind,
    /// Pointer position in the target's local space.
    pub position: Point,
    /// Movement since the previous sample, in the target's local space.
    pub delta: Vec2,
    /// Wheel amount; `0.0` for everything but [`MouseEventKind::Wheel`].
    pub amount: f64,
    /// Button that changed state, or the drag button for drags.
    pub button: Option<MouseButton>,
    /// Buttons held after the sample.
    pub buttons: Buttons,
    /// The view the event is delivered to.
    pub target: ViewId,
    /// Counterpart view for up-outside, enter, and exit events.
    pub related: Option<ViewId>,
}

impl MouseEvent {
    pub(crate) fn new(kind: MouseEventKind, target: ViewId, position: Point, buttons: Buttons) -> Self {
        Self {
            kind,
            position,
            delta: Vec2::ZERO,
            amount: 0.0,
            button: None,
            buttons,
            target,
            related: None,
        }
    }

    /// Local x coordinate.
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Local y coordinate.
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Local x movement.
    pub fn dx(&self) -> f64 {
        self.delta.x
    }

    /// Local y movement.
    pub fn dy(&self) -> f64 {
        self.delta.y
    }
}

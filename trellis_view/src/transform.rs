// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child-space transform of a view.
//!
//! Every view has two frames:
//!
//! - *Local space*: the view's own frame, used for its bounds test.
//! - *Child space*: the frame its children are positioned in.
//!
//! [`ChildTransform`] maps between the two. Mapping local to child divides by
//! `scale`, adds `translation`, then rotates by `-rotation`:
//!
//! ```text
//! child = R(-rotation) * (local / scale + translation)
//! local = scale * (R(rotation) * child - translation)
//! ```
//!
//! The `clip` flag only tells a painter to cut children off at the view's
//! bounds. It has no effect on the mapping and does not constrain picking.

use core::f64::consts::TAU;

use kurbo::{Affine, Point, Size, Vec2};

/// Scale, translation, rotation, and clip applied to a view's children.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildTransform {
    /// Zoom factor; children appear `scale` times larger in local space. Must be non-zero.
    pub scale: f64,
    /// Child-space point shown at the local origin (before rotation).
    pub translation: Vec2,
    /// Rotation in radians, normalized into `(-2π, 2π)` by [`ChildTransform::set_rotation`].
    pub rotation: f64,
    /// Cut children off at the view's bounds when drawing.
    pub clip: bool,
}

impl Default for ChildTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ChildTransform {
    /// The identity mapping: child space equals local space.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translation: Vec2::ZERO,
        rotation: 0.0,
        clip: false,
    };

    /// Returns a copy with the given scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Returns a copy with the given translation.
    #[must_use]
    pub fn with_translation(mut self, translation: Vec2) -> Self {
        self.translation = translation;
        self
    }

    /// Returns a copy with the given rotation (normalized).
    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Returns a copy with clipping enabled or disabled.
    #[must_use]
    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    /// Returns `true` if this transform leaves points unchanged.
    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.translation == Vec2::ZERO && self.rotation == 0.0
    }

    /// Set the rotation, wrapping it modulo a full turn.
    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation % TAU;
    }

    /// Add `delta` radians to the rotation.
    pub fn rotate(&mut self, delta: f64) {
        self.set_rotation(self.rotation + delta);
    }

    /// Shift the translation by `delta` (child-space units).
    pub fn translate(&mut self, delta: Vec2) {
        self.translation += delta;
    }

    /// Adjust the translation so the child-space point `center` is shown at the
    /// middle of a view of size `size`.
    pub fn center_on(&mut self, center: Point, size: Size) {
        let half = Vec2::new(size.width, size.height) / (2.0 * self.scale);
        self.translation = (Affine::rotate(self.rotation) * center).to_vec2() - half;
    }

    /// The local → child mapping as an affine transform.
    pub fn to_affine(&self) -> Affine {
        Affine::rotate(-self.rotation)
            * Affine::translate(self.translation)
            * Affine::scale(1.0 / self.scale)
    }

    /// The child → local mapping as an affine transform.
    ///
    /// Built directly from the parameters rather than by inverting
    /// [`ChildTransform::to_affine`].
    pub fn inverse_affine(&self) -> Affine {
        Affine::scale(self.scale) * Affine::translate(-self.translation) * Affine::rotate(self.rotation)
    }

    /// Map a local-space point into child space.
    pub fn local_to_child(&self, local: Point) -> Point {
        if self.is_identity() {
            return local;
        }
        self.to_affine() * local
    }

    /// Map a child-space point into local space.
    pub fn child_to_local(&self, child: Point) -> Point {
        if self.is_identity() {
            return child;
        }
        self.inverse_affine() * child
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, PI};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_close(a: Point, b: Point, eps: f64) {
        assert!(
            (a.x - b.x).abs() <= eps && (a.y - b.y).abs() <= eps,
            "{a:?} != {b:?} within {eps}"
        );
    }

    #[test]
    fn identity_is_a_no_op() {
        let t = ChildTransform::default();
        let p = Point::new(3.5, -7.25);
        assert_eq!(t.local_to_child(p), p);
        assert_eq!(t.child_to_local(p), p);
        assert!(t.is_identity());
    }

    #[test]
    fn scale_divides_into_child_space() {
        let t = ChildTransform::IDENTITY.with_scale(2.0);
        assert_close(t.local_to_child(Point::new(10.0, 4.0)), Point::new(5.0, 2.0), 1e-12);
        assert_close(t.child_to_local(Point::new(5.0, 2.0)), Point::new(10.0, 4.0), 1e-12);
    }

    #[test]
    fn translation_adds_in_child_space() {
        let t = ChildTransform::IDENTITY.with_translation(Vec2::new(100.0, -50.0));
        assert_close(t.local_to_child(Point::ORIGIN), Point::new(100.0, -50.0), 1e-12);
    }

    #[test]
    fn rotation_turns_children_the_other_way() {
        let t = ChildTransform::IDENTITY.with_rotation(FRAC_PI_2);
        // A child drawn at (1, 0) shows up at (0, 1) in local space.
        assert_close(t.child_to_local(Point::new(1.0, 0.0)), Point::new(0.0, 1.0), 1e-12);
        assert_close(t.local_to_child(Point::new(0.0, 1.0)), Point::new(1.0, 0.0), 1e-12);
    }

    #[test]
    fn rotation_wraps_modulo_full_turn() {
        let mut t = ChildTransform::default();
        t.set_rotation(3.0 * PI);
        assert!((t.rotation - PI).abs() < 1e-12, "rotation was {}", t.rotation);
        t.rotate(2.0 * PI);
        assert!((t.rotation - PI).abs() < 1e-12, "rotation was {}", t.rotation);
    }

    #[test]
    fn inverse_law_holds_for_random_points() {
        let mut rng = StdRng::seed_from_u64(0x7e11_15);
        let transforms = [
            ChildTransform::IDENTITY.with_scale(0.25),
            ChildTransform::IDENTITY.with_scale(3.0),
            ChildTransform::IDENTITY.with_rotation(0.7),
            ChildTransform::IDENTITY.with_translation(Vec2::new(-40.0, 12.5)),
            ChildTransform::IDENTITY
                .with_scale(1.5)
                .with_rotation(-2.1)
                .with_translation(Vec2::new(7.0, 9.0)),
            ChildTransform::IDENTITY
                .with_scale(0.1)
                .with_rotation(5.9)
                .with_translation(Vec2::new(250.0, -125.0))
                .with_clip(true),
        ];
        for t in transforms {
            for _ in 0..100 {
                let p = Point::new(rng.gen_range(-1000.0..1000.0), rng.gen_range(-1000.0..1000.0));
                assert_close(t.child_to_local(t.local_to_child(p)), p, 1e-9);
                assert_close(t.local_to_child(t.child_to_local(p)), p, 1e-9);
            }
        }
    }

    #[test]
    fn center_on_puts_point_in_the_middle() {
        let size = Size::new(200.0, 100.0);
        let mut t = ChildTransform::IDENTITY.with_scale(2.0).with_rotation(0.5);
        let target = Point::new(30.0, -12.0);
        t.center_on(target, size);
        let middle = Point::new(size.width / 2.0, size.height / 2.0);
        assert_close(t.local_to_child(middle), target, 1e-9);
    }

    #[test]
    fn clip_does_not_change_the_mapping() {
        let a = ChildTransform::IDENTITY.with_scale(2.0);
        let b = a.with_clip(true);
        let p = Point::new(9.0, 1.0);
        assert_eq!(a.local_to_child(p), b.local_to_child(p));
    }
}

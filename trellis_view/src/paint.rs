// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw dispatch.
//!
//! The tree does not draw anything itself. [`ViewTree::paint`] walks visible
//! views in paint order (parents before children, earlier siblings first) and
//! hands each one to a [`Painter`] together with the transform from the view's
//! local space to the top-level space.

use alloc::vec;
use kurbo::{Affine, Rect};

use crate::tree::ViewTree;
use crate::types::{ViewFlags, ViewId, ViewNode};

/// Receiver of draw dispatch.
pub trait Painter {
    /// Draw one view. `transform` maps the view's local space to top-level space.
    fn paint_view(&mut self, id: ViewId, view: &ViewNode, transform: Affine);

    /// Start clipping to `clip` (local rect of a clipping view) under `transform`.
    fn push_clip(&mut self, clip: Rect, transform: Affine) {
        let _ = (clip, transform);
    }

    /// Undo the matching [`Painter::push_clip`].
    fn pop_clip(&mut self) {}
}

enum Step {
    Visit(ViewId, Affine),
    PopClip,
}

impl ViewTree {
    /// Dispatch drawing of the subtree at `root` to `painter`.
    ///
    /// Hidden views are skipped together with their subtrees. Views whose
    /// child transform has `clip` set, and whose bounds are finite, wrap their
    /// children in a [`Painter::push_clip`] / [`Painter::pop_clip`] pair.
    pub fn paint(&self, root: ViewId, painter: &mut impl Painter) {
        let mut stack = vec![Step::Visit(root, Affine::IDENTITY)];
        while let Some(step) = stack.pop() {
            let (id, parent_tf) = match step {
                Step::PopClip => {
                    painter.pop_clip();
                    continue;
                }
                Step::Visit(id, tf) => (id, tf),
            };
            let Some(node) = self.node_opt(id) else {
                continue;
            };
            let view = &node.view;
            if !view.flags.contains(ViewFlags::VISIBLE) {
                continue;
            }
            let local_tf = parent_tf * Affine::translate(view.position.to_vec2());
            painter.paint_view(id, view, local_tf);

            let children = self.children_of(id);
            if children.is_empty() {
                continue;
            }
            if view.transform.clip
                && let Some(rect) = view.bounds.rect()
            {
                painter.push_clip(rect, local_tf);
                stack.push(Step::PopClip);
            }
            let child_tf = local_tf * view.transform.inverse_affine();
            // Reverse so children are visited in list order.
            for &child in children.iter().rev() {
                stack.push(Step::Visit(child, child_tf));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::ChildTransform;
    use crate::types::Bounds;
    use alloc::vec;
    use alloc::vec::Vec;
    use kurbo::{Point, Size};

    #[derive(Debug, PartialEq)]
    enum Op {
        View(ViewId, Point),
        Clip(Rect),
        Unclip,
    }

    #[derive(Default)]
    struct Recorder(Vec<Op>);

    impl Painter for Recorder {
        fn paint_view(&mut self, id: ViewId, _view: &ViewNode, transform: Affine) {
            self.0.push(Op::View(id, transform * Point::ORIGIN));
        }

        fn push_clip(&mut self, clip: Rect, _transform: Affine) {
            self.0.push(Op::Clip(clip));
        }

        fn pop_clip(&mut self) {
            self.0.push(Op::Unclip);
        }
    }

    #[test]
    fn paints_in_order_with_accumulated_offsets() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::default());
        let a = tree.insert(Some(root), ViewNode::new(Point::new(10.0, 0.0), Bounds::Unbounded));
        let a1 = tree.insert(Some(a), ViewNode::new(Point::new(1.0, 2.0), Bounds::Unbounded));
        let b = tree.insert(Some(root), ViewNode::new(Point::new(0.0, 20.0), Bounds::Unbounded));

        let mut rec = Recorder::default();
        tree.paint(root, &mut rec);
        assert_eq!(
            rec.0,
            vec![
                Op::View(root, Point::ORIGIN),
                Op::View(a, Point::new(10.0, 0.0)),
                Op::View(a1, Point::new(11.0, 2.0)),
                Op::View(b, Point::new(0.0, 20.0)),
            ]
        );
    }

    #[test]
    fn hidden_subtrees_are_skipped_but_unpickable_views_paint() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::default());
        let hidden = tree.insert(Some(root), ViewNode::default());
        let _under_hidden = tree.insert(Some(hidden), ViewNode::default());
        let ghost = tree.insert(Some(root), ViewNode::default());
        tree.set_visible(hidden, false);
        tree.set_pickable(ghost, false);

        let mut rec = Recorder::default();
        tree.paint(root, &mut rec);
        assert_eq!(
            rec.0,
            vec![Op::View(root, Point::ORIGIN), Op::View(ghost, Point::ORIGIN)]
        );
    }

    #[test]
    fn child_transform_and_clip_wrap_children() {
        let mut tree = ViewTree::new();
        let root = tree.insert(None, ViewNode::default());
        let frame = tree.insert(
            Some(root),
            ViewNode {
                position: Point::new(100.0, 100.0),
                bounds: Bounds::Rect(Size::new(50.0, 50.0)),
                transform: ChildTransform::IDENTITY
                    .with_scale(2.0)
                    .with_translation(kurbo::Vec2::new(5.0, 0.0))
                    .with_clip(true),
                ..ViewNode::default()
            },
        );
        let inner = tree.insert(Some(frame), ViewNode::new(Point::new(10.0, 10.0), Bounds::Unbounded));

        let mut rec = Recorder::default();
        tree.paint(root, &mut rec);
        assert_eq!(rec.0.len(), 5, "{:?}", rec.0);
        assert_eq!(rec.0[1], Op::View(frame, Point::new(100.0, 100.0)));
        assert_eq!(rec.0[2], Op::Clip(Rect::new(0.0, 0.0, 50.0, 50.0)));
        // Child (10, 10) -> local 2 * ((10, 10) - (5, 0)) = (10, 20) -> top level (110, 120).
        let Op::View(id, p) = &rec.0[3] else {
            panic!("expected a view, got {:?}", rec.0[3]);
        };
        assert_eq!(*id, inner);
        assert!((p.x - 110.0).abs() < 1e-9 && (p.y - 120.0).abs() < 1e-9, "{p:?}");
        assert_eq!(rec.0[4], Op::Unclip);
    }
}

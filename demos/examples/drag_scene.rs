// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer routing through a small scene: a draggable circle on a canvas and
//! a zoomed, rotated scene view holding a rectangle.
//!
//! This example shows how to:
//! - build a view tree under a [`Canvas`],
//! - register listeners that mutate the tree (dragging moves the circle),
//! - feed host samples and watch which view each event reaches,
//! - dispatch drawing to a [`Painter`].
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p trellis_demos --example drag_scene`

use kurbo::{Affine, Point, Rect, Size, Vec2};
use trellis_pointer::{Buttons, Canvas, MouseButton, MouseEvent, MouseEventKind, PointerSample};
use trellis_view::{Bounds, ChildTransform, Painter, ViewId, ViewNode, ViewTree};

/// Prints each view with its top-level origin.
struct TextPainter;

impl Painter for TextPainter {
    fn paint_view(&mut self, id: ViewId, view: &ViewNode, transform: Affine) {
        let origin = transform * Point::ORIGIN;
        println!("  paint {id:?} {:?} at ({:.1}, {:.1})", view.bounds, origin.x, origin.y);
    }

    fn push_clip(&mut self, clip: Rect, transform: Affine) {
        println!("  clip {:?}", transform.transform_rect_bbox(clip));
    }

    fn pop_clip(&mut self) {
        println!("  unclip");
    }
}

fn print_event(name: &str, ev: &MouseEvent) {
    println!(
        "  {name}: {:?} on {:?} at ({:.1}, {:.1}) delta ({:.1}, {:.1}) related {:?}",
        ev.kind,
        ev.target,
        ev.x(),
        ev.y(),
        ev.dx(),
        ev.dy(),
        ev.related
    );
}

fn main() {
    env_logger::init();

    let mut canvas = Canvas::with_root(ViewNode::new(
        Point::ORIGIN,
        Bounds::Rect(Size::new(400.0, 300.0)),
    ));

    let circle = canvas.add_view(ViewNode::new(Point::new(50.0, 50.0), Bounds::Circle(10.0)));

    // A scene view at (200, 100) showing child space zoomed 2x and turned a quarter.
    let scene = canvas.add_view(ViewNode {
        position: Point::new(200.0, 100.0),
        bounds: Bounds::Rect(Size::new(150.0, 150.0)),
        transform: ChildTransform::IDENTITY
            .with_scale(2.0)
            .with_rotation(core::f64::consts::FRAC_PI_2)
            .with_clip(true),
        ..ViewNode::default()
    });
    let card = canvas
        .tree_mut()
        .insert(Some(scene), ViewNode::new(Point::new(10.0, -40.0), Bounds::Rect(Size::new(30.0, 20.0))));
    if let Some(t) = canvas.tree_mut().transform_mut(scene) {
        t.center_on(Point::new(25.0, -30.0), Size::new(150.0, 150.0));
    }

    {
        let listeners = canvas.listeners_mut();
        for kind in [
            MouseEventKind::Down,
            MouseEventKind::UpInside,
            MouseEventKind::UpOutside,
            MouseEventKind::Enter,
            MouseEventKind::Exit,
        ] {
            listeners.add(circle, kind, None, |_, ev| print_event("circle", ev));
            listeners.add(card, kind, None, |_, ev| print_event("card", ev));
        }
        // Dragging moves the circle by the local delta (its parent is unscaled).
        listeners.on_mouse_drag(circle, |tree: &mut ViewTree, ev| {
            print_event("circle", ev);
            if let Some(p) = tree.position(ev.target) {
                tree.set_position(ev.target, p + ev.delta);
            }
        });
        // Wheel over the scene view zooms it.
        listeners.on_mouse_wheel(scene, |tree: &mut ViewTree, ev| {
            print_event("scene", ev);
            if let Some(t) = tree.transform_mut(ev.target) {
                t.scale *= if ev.amount < 0.0 { 1.1 } else { 1.0 / 1.1 };
            }
        });
    }

    println!("initial scene:");
    canvas.paint(&mut TextPainter);

    let samples = [
        PointerSample::moved(Point::new(50.0, 50.0), Vec2::new(50.0, 50.0), Buttons::empty()),
        PointerSample::down(Point::new(50.0, 50.0), MouseButton::Left, Buttons::LEFT),
        PointerSample::moved(Point::new(90.0, 90.0), Vec2::new(40.0, 40.0), Buttons::LEFT),
        PointerSample::moved(Point::new(120.0, 60.0), Vec2::new(30.0, -30.0), Buttons::LEFT),
        PointerSample::up(Point::new(120.0, 60.0), MouseButton::Left, Buttons::empty()),
        PointerSample::moved(Point::new(275.0, 175.0), Vec2::new(155.0, 115.0), Buttons::empty()),
        PointerSample::wheel(Point::new(275.0, 175.0), -1.0, Buttons::empty()),
        PointerSample::down(Point::new(275.0, 175.0), MouseButton::Right, Buttons::RIGHT),
        PointerSample::cancel(),
        PointerSample::leave(),
    ];
    for sample in &samples {
        println!("{:?} at {:?}", sample.kind, sample.position);
        let produced = canvas.handle(sample);
        if produced == 0 {
            println!("  (no events)");
        }
    }

    println!("final scene:");
    canvas.paint(&mut TextPainter);
    println!(
        "circle ended at {:?}; view under (120, 60) is {:?}",
        canvas.tree().position(circle),
        canvas.view_at(Point::new(120.0, 60.0))
    );
}

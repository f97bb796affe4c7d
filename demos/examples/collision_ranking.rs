// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The built-in detectors compared on one scene.
//!
//! The same draggable position is evaluated by rectangle intersection,
//! closest center, and pointer containment, to show how the pluggable
//! ranking changes which container becomes the drop target.
//!
//! Run:
//! - `cargo run -p canopy_demos --example collision_ranking`

use canopy_collision::{
    ClosestCenter, CollisionDetector, CollisionInput, PointerWithin, RectIntersection,
};
use canopy_geometry::from_ltwh;
use kurbo::Point;

fn main() {
    let droppables = [
        ("backlog", from_ltwh(0.0, 0.0, 30.0, 100.0)),
        ("doing", from_ltwh(40.0, 0.0, 30.0, 100.0)),
        ("done", from_ltwh(80.0, 0.0, 30.0, 100.0)),
    ];

    // The dragged card straddles the gap between "backlog" and "doing",
    // still mostly over "backlog", but the pointer is already inside "doing".
    let input = CollisionInput {
        draggable_rect: from_ltwh(24.0, 40.0, 20.0, 20.0),
        pointer: Some(Point::new(42.0, 50.0)),
        droppables: &droppables,
    };

    let by_area = RectIntersection.detect(&input);
    let by_center = ClosestCenter.detect(&input);
    let by_pointer = PointerWithin.detect(&input);

    println!("== RectIntersection (largest overlap) ==");
    for c in &by_area {
        println!("  {:>8}  area {}", c.id, c.metric);
    }
    println!("== ClosestCenter (nearest center) ==");
    for c in &by_center {
        println!("  {:>8}  distance^2 {}", c.id, c.metric);
    }
    println!("== PointerWithin (under the pointer) ==");
    for c in &by_pointer {
        println!("  {:>8}  distance^2 {}", c.id, c.metric);
    }

    // The geometric detectors still favor "backlog"; following the pointer
    // instead already commits to "doing".
    assert_eq!(by_area.first().map(|c| c.id), Some("backlog"));
    assert_eq!(by_center.first().map(|c| c.id), Some("backlog"));
    assert_eq!(by_pointer.first().map(|c| c.id), Some("doing"));
}

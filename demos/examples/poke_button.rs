// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Poke a clipped button, drag across a slider, and stray off a panel.
//!
//! A scripted fingertip path drives one `PokeInteractor` against three
//! touchables:
//! - a small button, pressed and released cleanly,
//! - a slider panel that is pressed and then dragged sideways,
//! - a panel that slides toward the fingertip while it is pushed too deep,
//!   which cancels the press.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example poke_button`

use glam::DVec3;
use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_poke::{
    PokeEventKind, PokeEvents, PokeInteractor, Touchable, TouchableId, TouchableParams,
    TouchableSet,
};
use understory_surface::{OrientedBox, PlaneSurface, Pose, SurfaceField};

fn plane_at(position: DVec3, clip: Rect) -> PlaneSurface {
    PlaneSurface::with_clip(Pose::from_position(position), clip)
}

fn print_events(label: &str, set: &TouchableSet, names: &[(TouchableId, &str)], events: &PokeEvents) {
    for e in events {
        if e.kind == PokeEventKind::Move {
            continue;
        }
        let name = names
            .iter()
            .find(|(id, _)| *id == e.touchable)
            .map_or("?", |(_, n)| n);
        let live = if set.contains(e.touchable) { "" } else { " (removed)" };
        println!(
            "{label:>12}: {:?} {name}{live} at ({:+.3}, {:+.3}, {:+.3})",
            e.kind, e.pose.position.x, e.pose.position.y, e.pose.position.z
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut set = TouchableSet::new();

    let button_plane = plane_at(DVec3::ZERO, Rect::new(-0.02, -0.02, 0.02, 0.02));
    let button = set.insert(
        Touchable::builder()
            .surface(button_plane)
            .proximity_field(SurfaceField::new(button_plane))
            .build()
            .expect("button is valid"),
    );

    let slider_center = DVec3::new(0.3, 0.0, 0.0);
    let slider_plane = plane_at(slider_center, Rect::new(-0.1, -0.02, 0.1, 0.02));
    let slider = set.insert(
        Touchable::builder()
            .params(TouchableParams {
                horizontal_drag_threshold: 0.01,
                ..TouchableParams::default()
            })
            .surface(slider_plane)
            .proximity_field(SurfaceField::new(slider_plane))
            .build()
            .expect("slider is valid"),
    );

    let panel_center = DVec3::new(-0.3, 0.0, 0.0);
    let panel_plane = plane_at(panel_center, Rect::new(-0.05, -0.05, 0.05, 0.05));
    let panel = set.insert(
        Touchable::builder()
            .params(TouchableParams {
                release_distance: 0.05,
                ..TouchableParams::default()
            })
            .surface(panel_plane)
            .proximity_field(SurfaceField::new(panel_plane))
            .volume_mask(OrientedBox::new(
                Pose::from_position(panel_center),
                DVec3::new(0.05, 0.05, 0.02),
            ))
            .build()
            .expect("panel is valid"),
    );

    let names = [(button, "button"), (slider, "slider"), (panel, "panel")];
    let mut poke = PokeInteractor::default();
    let mut now_ms = 0_u64;
    let mut step = |label: &str, set: &TouchableSet, poke: &mut PokeInteractor, p: DVec3| {
        now_ms += 11;
        let events = poke.update(set, p, now_ms);
        print_events(label, set, &names, &events);
    };

    // Button: approach, press, back out.
    for z in [0.2, 0.1, 0.05, 0.02, -0.004, -0.006, 0.01, 0.12] {
        step("button", &set, &mut poke, DVec3::new(0.0, 0.0, z));
    }

    // Slider: press near the left end, then drag right.
    for z in [0.2, 0.05, -0.004] {
        step("slider", &set, &mut poke, slider_center + DVec3::new(-0.05, 0.0, z));
    }
    for i in 1..=8 {
        let x = -0.05 + f64::from(i) * 0.0125;
        step("slider drag", &set, &mut poke, slider_center + DVec3::new(x, 0.0, -0.004));
        println!(
            "{:>12}  dragging={} touch=({:+.4}, {:+.4})",
            "",
            poke.is_dragging(),
            poke.touch_point().x,
            poke.touch_point().y
        );
    }
    step("slider", &set, &mut poke, slider_center + DVec3::new(0.05, 0.0, 0.2));

    // Panel: press, then the panel slides away while the fingertip pushes
    // deeper until the press is cancelled.
    for z in [0.2, 0.05, -0.004] {
        step("panel", &set, &mut poke, panel_center + DVec3::new(0.0, 0.0, z));
    }
    for i in 1..=12 {
        let offset = DVec3::new(0.0, 0.0, -0.01 * f64::from(i));
        if let Some(t) = set.get_mut(panel) {
            t.set_origin(Pose::from_position(panel_center + offset * 0.5));
        }
        step("panel push", &set, &mut poke, panel_center + offset);
    }

    let pose = poke.compute_pointer_pose(&set);
    println!("final state {:?}, pointer at {:?}", poke.state(), pose.position);
    for e in poke.disable(&set) {
        println!("disable: {:?} {:?}", e.kind, e.touchable);
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Poke: near-field touch interaction against 3D surfaces.
//!
//! A probe (a tracked fingertip or controller tip) presses virtual buttons,
//! panels, and sliders by physically crossing their surfaces. This crate
//! decides, frame by frame, which surface the probe is interacting with,
//! when a press starts and ends, whether a press has become a drag, and
//! where the reported touch point lies.
//!
//! ## Concepts
//!
//! - [`Touchable`]: a target with a [`Surface`](understory_surface::Surface),
//!   a [`ProximityField`](understory_surface::ProximityField), an optional
//!   [`VolumeMask`](understory_surface::VolumeMask), and
//!   [`TouchableParams`].
//! - [`TouchableSet`]: owns touchables behind stable [`TouchableId`]s and
//!   tracks which are enabled.
//! - [`PokeInteractor`]: one per probe; consumes positions and timestamps and
//!   produces [`PokeEvent`]s.
//!
//! ## Selection
//!
//! A press starts only when the probe's motion this frame crosses a surface
//! from the front, so a probe that drifts into a button from behind or from
//! the side never presses it. Moving surfaces are handled by re-basing last
//! frame's probe position against the surface's motion before the sweep.
//! While no press is possible, the closest touchable in front of the probe
//! (within `max_distance` of its proximity field) is hovered.
//!
//! ## Pressing
//!
//! While pressing, the touch point stays at the captured contact point
//! until lateral travel exceeds the drag thresholds; a drag then eases the
//! touch point onto the live position over [`DragEase`]. The press ends
//! cleanly when the probe backs out above the surface, or is cancelled when
//! the probe strays beyond `release_distance`.
//!
//! ## Example
//!
//! ```
//! use glam::DVec3;
//! use understory_poke::{PokeEventKind, PokeInteractor, Touchable, TouchableSet};
//! use understory_surface::{PlaneSurface, Pose, SurfaceField};
//!
//! let plane = PlaneSurface::new(Pose::IDENTITY);
//! let mut set = TouchableSet::new();
//! let button = set.insert(
//!     Touchable::builder()
//!         .surface(plane)
//!         .proximity_field(SurfaceField::new(plane))
//!         .build()
//!         .unwrap(),
//! );
//!
//! let mut poke = PokeInteractor::default();
//! poke.update(&set, DVec3::new(0.0, 0.0, 0.2), 0);
//! let events = poke.update(&set, DVec3::new(0.0, 0.0, -0.05), 11);
//!
//! assert!(events
//!     .iter()
//!     .any(|e| e.kind == PokeEventKind::Select && e.touchable == button));
//! assert!(poke.touch_point().length() < 1e-9);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod easing;
mod interactor;
mod set;
mod touchable;

pub use easing::{DragEase, DragProgress, EaseCurve};
pub use interactor::{
    InteractorState, PokeConfig, PokeEvent, PokeEventKind, PokeEvents, PokeInteractor,
};
pub use set::{TouchableId, TouchableSet};
pub use touchable::{PositionPinning, Touchable, TouchableBuilder, TouchableError, TouchableParams};

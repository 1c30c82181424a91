// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry-level touch surfaces for near-field 3D interaction.
//!
//! This crate provides the small set of capabilities a poke (fingertip or
//! controller tip) interaction engine needs from the scene, without tying
//! them to any particular scene graph, physics engine, or renderer.
//!
//! # Capabilities
//!
//! - [`Surface`] – the touchable geometry: closest point and normal, ray
//!   casts, tangent-plane distances, and an origin [`Pose`] that moves with
//!   whatever the surface is attached to.
//! - [`ProximityField`] – a closest-point query against a contact volume that
//!   may differ from the rendered surface (for example a padded box), used
//!   for ranking and eligibility.
//! - [`VolumeMask`] – an optional containment test that disqualifies hits
//!   falling outside a bounding volume.
//!
//! All queries are in world space and use `f64` [`glam`] types. Planar 2D
//! quantities (clip rectangles and tangent-plane vectors) use [`kurbo`].
//!
//! # Shapes
//!
//! - [`PlaneSurface`] – a plane facing its origin's local +Z, optionally
//!   clipped by a [`kurbo::Rect`] in plane-local coordinates.
//! - [`SurfaceField`] – adapts any [`Surface`] into a [`ProximityField`].
//! - [`SphereField`] – a solid ball.
//! - [`OrientedBox`] – a solid oriented box, usable as a field and a mask.
//! - [`Bounds3`] – a world-space axis-aligned box mask.
//!
//! # Re-basing
//!
//! Surfaces attached to moving objects bias frame-to-frame sweep tests by
//! their own motion. [`adjust_origin`] re-expresses a point recorded against
//! an older surface pose as if the surface had always been at its current
//! pose.
//!
//! ```
//! use glam::DVec3;
//! use understory_surface::{Pose, adjust_origin};
//!
//! let before = Pose::from_position(DVec3::new(0.0, 0.0, 0.0));
//! let after = Pose::from_position(DVec3::new(0.0, 0.0, 0.5));
//!
//! // A point 0.1 in front of the surface stays 0.1 in front after the move.
//! let p = adjust_origin(DVec3::new(0.0, 0.0, 0.1), &before, &after);
//! assert!((p - DVec3::new(0.0, 0.0, 0.6)).length() < 1e-12);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use core::fmt::Debug;

use glam::DVec3;
use kurbo::Vec2;

mod field;
mod plane;
mod pose;

pub use field::{Bounds3, OrientedBox, SphereField, SurfaceField};
pub use plane::{PARALLEL_EPSILON, PlaneSurface};
pub use pose::{Pose, Ray, adjust_origin, look_rotation};

/// A point on a surface together with the surface normal there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePoint {
    /// World-space point on the surface.
    pub point: DVec3,
    /// Unit normal pointing out of the surface's front side.
    pub normal: DVec3,
}

/// Result of a successful ray cast against a [`Surface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    /// World-space intersection point.
    pub point: DVec3,
    /// Surface normal at the intersection.
    pub normal: DVec3,
    /// Distance along the ray from its origin to `point`.
    pub distance: f64,
}

/// Touchable geometry queried by the poke engine.
///
/// Implementors answer all queries in world space. Degenerate inputs
/// (parallel rays, zero directions) must produce `None` rather than panic.
pub trait Surface: Debug {
    /// Pose the surface is attached to. Compared frame to frame to detect
    /// surface motion.
    fn origin(&self) -> Pose;

    /// Move the surface so that its origin sits at `origin`.
    fn set_origin(&mut self, origin: Pose);

    /// Closest point on the surface to `point`, with the normal there.
    fn closest_surface_point(&self, point: DVec3) -> SurfacePoint;

    /// Nearest intersection of `ray` with the surface, if any.
    fn raycast(&self, ray: &Ray) -> Option<SurfaceHit>;

    /// Lateral separation between two points on the surface, expressed as
    /// absolute distances along the surface's local right (`x`) and up (`y`)
    /// axes.
    fn tangent_distance(&self, a: DVec3, b: DVec3) -> Vec2;
}

/// Closest-point query against a contact volume.
pub trait ProximityField: Debug {
    /// Closest point in the field to `point`. Points inside a solid field
    /// return themselves.
    fn closest_point(&self, point: DVec3) -> DVec3;

    /// Move the field so that its origin sits at `origin`.
    fn set_origin(&mut self, origin: Pose);
}

/// Containment test for optional hit masking.
pub trait VolumeMask: Debug {
    /// Whether `point` lies inside the volume (boundary inclusive).
    fn contains(&self, point: DVec3) -> bool;

    /// Move the volume so that its origin sits at `origin`.
    fn set_origin(&mut self, origin: Pose);
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Planar surfaces, optionally clipped to a rectangle.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use glam::DVec3;
use kurbo::{Point, Rect, Vec2};

use crate::{Pose, Ray, Surface, SurfaceHit, SurfacePoint};

/// Rays whose direction is within this cosine of the plane are treated as
/// parallel and never hit.
pub const PARALLEL_EPSILON: f64 = 1e-9;

/// A plane through its origin, facing the origin's local +Z.
///
/// The plane's local 2D coordinates are the origin's right (`x`) and up (`y`)
/// axes. When a clip rectangle is set, closest points are clamped into it and
/// ray hits outside it are discarded (edges count as inside).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneSurface {
    origin: Pose,
    clip: Option<Rect>,
}

impl PlaneSurface {
    /// Create an unbounded plane.
    pub fn new(origin: Pose) -> Self {
        Self { origin, clip: None }
    }

    /// Create a plane clipped to `clip` in plane-local coordinates.
    pub fn with_clip(origin: Pose, clip: Rect) -> Self {
        Self {
            origin,
            clip: Some(clip.abs()),
        }
    }

    /// Front-facing unit normal.
    pub fn normal(&self) -> DVec3 {
        self.origin.forward()
    }

    /// Current clip rectangle, if any.
    pub fn clip(&self) -> Option<Rect> {
        self.clip
    }

    /// Replace the clip rectangle.
    pub fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip.map(|r| r.abs());
    }

    fn clamp_local(&self, local: Point) -> Point {
        match self.clip {
            Some(r) => Point::new(local.x.clamp(r.x0, r.x1), local.y.clamp(r.y0, r.y1)),
            None => local,
        }
    }

    fn clip_contains(&self, local: Point) -> bool {
        self.clip.is_none_or(|r| {
            local.x >= r.x0 && local.x <= r.x1 && local.y >= r.y0 && local.y <= r.y1
        })
    }
}

impl Surface for PlaneSurface {
    fn origin(&self) -> Pose {
        self.origin
    }

    fn set_origin(&mut self, origin: Pose) {
        self.origin = origin;
    }

    fn closest_surface_point(&self, point: DVec3) -> SurfacePoint {
        let local = self.origin.inverse_transform_point(point);
        let on_plane = self.clamp_local(Point::new(local.x, local.y));
        SurfacePoint {
            point: self
                .origin
                .transform_point(DVec3::new(on_plane.x, on_plane.y, 0.0)),
            normal: self.normal(),
        }
    }

    fn raycast(&self, ray: &Ray) -> Option<SurfaceHit> {
        let normal = self.normal();
        let denom = ray.direction.dot(normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let distance = (self.origin.position - ray.origin).dot(normal) / denom;
        if distance < 0.0 {
            return None;
        }
        let point = ray.at(distance);
        let local = self.origin.inverse_transform_point(point);
        if !self.clip_contains(Point::new(local.x, local.y)) {
            return None;
        }
        Some(SurfaceHit {
            point,
            normal,
            distance,
        })
    }

    fn tangent_distance(&self, a: DVec3, b: DVec3) -> Vec2 {
        let local = (self.origin.rotation.inverse() * (a - b)).abs();
        Vec2::new(local.x, local.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DQuat;

    fn wall() -> PlaneSurface {
        // Faces +X, half a meter off the world origin.
        PlaneSurface::new(Pose::new(
            DVec3::new(0.5, 0.0, 0.0),
            DQuat::from_rotation_y(core::f64::consts::FRAC_PI_2),
        ))
    }

    #[test]
    fn closest_point_projects_onto_plane() {
        let plane = PlaneSurface::new(Pose::IDENTITY);
        let sp = plane.closest_surface_point(DVec3::new(0.2, -0.3, 0.7));
        assert_eq!(sp.point, DVec3::new(0.2, -0.3, 0.0));
        assert_eq!(sp.normal, DVec3::Z);
    }

    #[test]
    fn closest_point_respects_rotated_origin() {
        let plane = wall();
        let sp = plane.closest_surface_point(DVec3::new(2.0, 0.1, 0.0));
        assert!((sp.point - DVec3::new(0.5, 0.1, 0.0)).length() < 1e-12);
        assert!((sp.normal - DVec3::X).length() < 1e-12);
    }

    #[test]
    fn closest_point_clamps_into_clip() {
        let plane = PlaneSurface::with_clip(Pose::IDENTITY, Rect::new(-0.1, -0.1, 0.1, 0.1));
        let sp = plane.closest_surface_point(DVec3::new(0.5, 0.05, 0.2));
        assert_eq!(sp.point, DVec3::new(0.1, 0.05, 0.0));
    }

    #[test]
    fn raycast_hits_from_front() {
        let plane = PlaneSurface::new(Pose::IDENTITY);
        let ray = Ray::new(DVec3::new(0.0, 0.0, 0.2), DVec3::NEG_Z);
        let hit = plane.raycast(&ray).expect("expected hit");
        assert_eq!(hit.point, DVec3::ZERO);
        assert_eq!(hit.distance, 0.2);
        assert_eq!(hit.normal, DVec3::Z);
    }

    #[test]
    fn raycast_misses_behind_and_parallel() {
        let plane = PlaneSurface::new(Pose::IDENTITY);
        let away = Ray::new(DVec3::new(0.0, 0.0, 0.2), DVec3::Z);
        let parallel = Ray::new(DVec3::new(0.0, 0.0, 0.2), DVec3::X);
        let degenerate = Ray::new(DVec3::new(0.0, 0.0, 0.2), DVec3::ZERO);
        assert!(plane.raycast(&away).is_none());
        assert!(plane.raycast(&parallel).is_none());
        assert!(plane.raycast(&degenerate).is_none());
    }

    #[test]
    fn raycast_respects_clip_edges() {
        let plane = PlaneSurface::with_clip(Pose::IDENTITY, Rect::new(-0.1, -0.1, 0.1, 0.1));
        let on_edge = Ray::new(DVec3::new(0.1, 0.0, 0.2), DVec3::NEG_Z);
        let outside = Ray::new(DVec3::new(0.2, 0.0, 0.2), DVec3::NEG_Z);
        assert!(plane.raycast(&on_edge).is_some());
        assert!(plane.raycast(&outside).is_none());
    }

    #[test]
    fn tangent_distance_is_absolute_per_axis() {
        let plane = PlaneSurface::new(Pose::IDENTITY);
        let d = plane.tangent_distance(DVec3::new(-0.01, 0.02, 0.0), DVec3::ZERO);
        assert_eq!(d, Vec2::new(0.01, 0.02));
    }

    #[test]
    fn tangent_distance_uses_surface_axes() {
        let plane = wall();
        // World +Z is the wall's local -X (right axis), world Y is its up axis.
        let d = plane.tangent_distance(DVec3::new(0.5, 0.03, 0.04), DVec3::new(0.5, 0.0, 0.0));
        assert!((d.x - 0.04).abs() < 1e-12);
        assert!((d.y - 0.03).abs() < 1e-12);
    }
}

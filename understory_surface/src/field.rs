// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proximity fields and volume masks.

use glam::DVec3;

use crate::{Pose, ProximityField, Surface, VolumeMask};

/// Uses a [`Surface`] directly as its own proximity field.
///
/// This is the common case for flat buttons and panels, where ranking by the
/// rendered geometry is good enough.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceField<S> {
    surface: S,
}

impl<S: Surface> SurfaceField<S> {
    /// Wrap `surface`.
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// The wrapped surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: Surface> ProximityField for SurfaceField<S> {
    fn closest_point(&self, point: DVec3) -> DVec3 {
        self.surface.closest_surface_point(point).point
    }

    fn set_origin(&mut self, origin: Pose) {
        self.surface.set_origin(origin);
    }
}

/// A solid ball.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereField {
    /// Center of the ball.
    pub center: DVec3,
    /// Radius of the ball; zero makes a point field.
    pub radius: f64,
}

impl SphereField {
    /// Create a ball; negative radii are treated as zero.
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }
}

impl ProximityField for SphereField {
    fn closest_point(&self, point: DVec3) -> DVec3 {
        let offset = point - self.center;
        let len = offset.length();
        if len <= self.radius {
            point
        } else {
            self.center + offset * (self.radius / len)
        }
    }

    fn set_origin(&mut self, origin: Pose) {
        self.center = origin.position;
    }
}

/// A solid box centered on its origin, aligned with the origin's axes.
///
/// Usable both as a padded contact volume ([`ProximityField`]) and as a hit
/// mask ([`VolumeMask`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedBox {
    /// Center and orientation of the box.
    pub origin: Pose,
    /// Half of the box size along each local axis.
    pub half_extents: DVec3,
}

impl OrientedBox {
    /// Create a box; negative extents are treated as zero.
    pub fn new(origin: Pose, half_extents: DVec3) -> Self {
        Self {
            origin,
            half_extents: half_extents.max(DVec3::ZERO),
        }
    }
}

impl ProximityField for OrientedBox {
    fn closest_point(&self, point: DVec3) -> DVec3 {
        let local = self.origin.inverse_transform_point(point);
        let clamped = local.clamp(-self.half_extents, self.half_extents);
        if clamped == local {
            return point;
        }
        self.origin.transform_point(clamped)
    }

    fn set_origin(&mut self, origin: Pose) {
        self.origin = origin;
    }
}

impl VolumeMask for OrientedBox {
    fn contains(&self, point: DVec3) -> bool {
        let local = self.origin.inverse_transform_point(point);
        local.abs().cmple(self.half_extents).all()
    }

    fn set_origin(&mut self, origin: Pose) {
        self.origin = origin;
    }
}

/// A world-space axis-aligned box mask.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds3 {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Bounds3 {
    /// Create bounds from two opposite corners in any order.
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Center of the bounds.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }
}

impl VolumeMask for Bounds3 {
    fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Translate the bounds so their center sits at `origin.position`.
    /// Rotation is ignored; the bounds stay world-aligned.
    fn set_origin(&mut self, origin: Pose) {
        let offset = origin.position - self.center();
        self.min += offset;
        self.max += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlaneSurface;
    use glam::DQuat;

    #[test]
    fn surface_field_tracks_surface() {
        let mut field = SurfaceField::new(PlaneSurface::new(Pose::IDENTITY));
        assert_eq!(field.closest_point(DVec3::new(0.1, 0.2, 0.3)), DVec3::new(0.1, 0.2, 0.0));

        field.set_origin(Pose::from_position(DVec3::new(0.0, 0.0, 1.0)));
        assert_eq!(field.closest_point(DVec3::new(0.1, 0.2, 0.3)), DVec3::new(0.1, 0.2, 1.0));
    }

    #[test]
    fn sphere_inside_and_outside() {
        let sphere = SphereField::new(DVec3::ZERO, 0.5);
        let inside = DVec3::new(0.1, 0.1, 0.1);
        assert_eq!(sphere.closest_point(inside), inside);
        let outside = sphere.closest_point(DVec3::new(2.0, 0.0, 0.0));
        assert!((outside - DVec3::new(0.5, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn point_field_collapses_to_center() {
        let point = SphereField::new(DVec3::ONE, -1.0);
        assert_eq!(point.radius, 0.0);
        assert!((point.closest_point(DVec3::new(3.0, 1.0, 1.0)) - DVec3::ONE).length() < 1e-12);
    }

    #[test]
    fn oriented_box_field_clamps_in_local_space() {
        let b = OrientedBox::new(
            Pose::new(DVec3::ZERO, DQuat::from_rotation_z(core::f64::consts::FRAC_PI_2)),
            DVec3::new(1.0, 0.1, 0.1),
        );
        // Rotated a quarter turn, the long axis now runs along world Y.
        let p = b.closest_point(DVec3::new(0.0, 0.5, 0.0));
        assert!((p - DVec3::new(0.0, 0.5, 0.0)).length() < 1e-12);
        let p = b.closest_point(DVec3::new(0.5, 0.0, 0.0));
        assert!((p - DVec3::new(0.1, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn oriented_box_mask_is_inclusive() {
        let b = OrientedBox::new(Pose::IDENTITY, DVec3::splat(0.5));
        assert!(b.contains(DVec3::new(0.5, 0.0, -0.5)));
        assert!(!b.contains(DVec3::new(0.6, 0.0, 0.0)));
    }

    #[test]
    fn bounds_contains_and_moves() {
        let mut bounds = Bounds3::new(DVec3::ONE, -DVec3::ONE);
        assert_eq!(bounds.min, -DVec3::ONE);
        assert!(bounds.contains(DVec3::ONE));
        assert!(!bounds.contains(DVec3::new(1.5, 0.0, 0.0)));

        bounds.set_origin(Pose::from_position(DVec3::new(10.0, 0.0, 0.0)));
        assert!(bounds.contains(DVec3::new(10.5, 0.0, 0.0)));
        assert!(!bounds.contains(DVec3::ZERO));
    }
}

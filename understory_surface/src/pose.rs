// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rigid poses, rays, and the re-basing transform.

use glam::{DMat3, DQuat, DVec3};

/// A rigid transform: world position plus orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// World-space position.
    pub position: DVec3,
    /// World-space orientation.
    pub rotation: DQuat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// Pose at the world origin with no rotation.
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    /// Create a pose from a position and rotation.
    pub const fn new(position: DVec3, rotation: DQuat) -> Self {
        Self { position, rotation }
    }

    /// Create an unrotated pose at `position`.
    pub const fn from_position(position: DVec3) -> Self {
        Self {
            position,
            rotation: DQuat::IDENTITY,
        }
    }

    /// Map a point from this pose's local space into world space.
    #[inline]
    pub fn transform_point(&self, local: DVec3) -> DVec3 {
        self.position + self.rotation * local
    }

    /// Map a world-space point into this pose's local space.
    #[inline]
    pub fn inverse_transform_point(&self, world: DVec3) -> DVec3 {
        self.rotation.inverse() * (world - self.position)
    }

    /// Local +Z in world space.
    #[inline]
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::Z
    }
}

/// Re-express `point`, recorded while a surface sat at `from`, as the
/// equivalent point with the surface at `to`.
///
/// The point keeps its offset from the surface origin and is rotated by the
/// surface's incremental rotation:
/// `to.position + (to.rotation * from.rotation⁻¹) * (point − from.position)`.
///
/// When `from == to` the point is returned unchanged, bit for bit.
pub fn adjust_origin(point: DVec3, from: &Pose, to: &Pose) -> DVec3 {
    if from == to {
        return point;
    }
    let delta = to.rotation * from.rotation.inverse();
    to.position + delta * (point - from.position)
}

/// Rotation whose local +Z points along `forward` and whose local +Y is as
/// close to `up` as possible.
///
/// A zero `forward` yields the identity. When `forward` is parallel to `up`
/// an arbitrary perpendicular axis is used for the roll.
pub fn look_rotation(forward: DVec3, up: DVec3) -> DQuat {
    let z = forward.normalize_or_zero();
    if z == DVec3::ZERO {
        return DQuat::IDENTITY;
    }
    let mut x = up.cross(z);
    if x.length_squared() < 1e-12 {
        x = z.any_orthonormal_vector();
    }
    let x = x.normalize();
    let y = z.cross(x);
    DQuat::from_mat3(&DMat3::from_cols(x, y, z)).normalize()
}

/// A half-line in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: DVec3,
    /// Unit direction, or zero for a degenerate ray that never hits.
    pub direction: DVec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn adjust_origin_is_exact_for_static_surface() {
        let pose = Pose::new(
            DVec3::new(0.3, -1.2, 4.0),
            DQuat::from_rotation_y(0.7) * DQuat::from_rotation_x(-0.2),
        );
        let p = DVec3::new(0.123_456_789, 9.87, -3.21);
        assert_eq!(adjust_origin(p, &pose, &pose), p);
    }

    #[test]
    fn adjust_origin_follows_translation() {
        let from = Pose::from_position(DVec3::new(1.0, 0.0, 0.0));
        let to = Pose::from_position(DVec3::new(1.0, 2.0, 0.0));
        let p = adjust_origin(DVec3::new(1.5, 0.0, 0.1), &from, &to);
        assert!(close(p, DVec3::new(1.5, 2.0, 0.1)));
    }

    #[test]
    fn adjust_origin_follows_rotation() {
        let from = Pose::IDENTITY;
        let to = Pose::new(DVec3::ZERO, DQuat::from_rotation_y(core::f64::consts::FRAC_PI_2));
        // A point in front of an unrotated surface stays in front once it turns.
        let p = adjust_origin(DVec3::new(0.0, 0.0, 1.0), &from, &to);
        assert!(close(p, to.forward()));
    }

    #[test]
    fn transform_round_trip() {
        let pose = Pose::new(DVec3::new(1.0, 2.0, 3.0), DQuat::from_rotation_z(1.1));
        let p = DVec3::new(-0.5, 0.25, 2.0);
        assert!(close(pose.inverse_transform_point(pose.transform_point(p)), p));
    }

    #[test]
    fn look_rotation_maps_forward_to_z() {
        assert!(look_rotation(DVec3::Z, DVec3::Y).abs_diff_eq(DQuat::IDENTITY, 1e-12));

        let dir = DVec3::new(1.0, 0.0, 1.0).normalize();
        let q = look_rotation(dir, DVec3::Y);
        assert!(close(q * DVec3::Z, dir));
        assert!(close(q * DVec3::Y, DVec3::Y));
    }

    #[test]
    fn look_rotation_handles_degenerate_inputs() {
        assert_eq!(look_rotation(DVec3::ZERO, DVec3::Y), DQuat::IDENTITY);

        let q = look_rotation(DVec3::Y, DVec3::Y);
        assert!(close(q * DVec3::Z, DVec3::Y));
        assert!(q.is_normalized());
    }

    #[test]
    fn zero_direction_ray_is_degenerate() {
        let ray = Ray::new(DVec3::ONE, DVec3::ZERO);
        assert_eq!(ray.direction, DVec3::ZERO);
        assert_eq!(ray.at(5.0), DVec3::ONE);
    }
}

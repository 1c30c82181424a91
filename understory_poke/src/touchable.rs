// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touchable targets: tuning parameters plus surface, field, and mask.

use alloc::boxed::Box;

use glam::DVec3;
use understory_surface::{Pose, ProximityField, Surface, VolumeMask};

use crate::easing::EaseCurve;

/// Clamp on how far the reported touch point may travel from the original
/// contact point during a press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionPinning {
    /// Whether pinning is applied.
    pub enabled: bool,
    /// Excursion budget. The reported offset from the contact point is scaled
    /// by `max_excursion / max_pin_distance` until that ratio reaches 1.
    /// Zero disables the scaling while leaving pinning enabled.
    pub max_pin_distance: f64,
    /// Curve applied to the excursion ratio before scaling.
    pub ease: EaseCurve,
}

impl Default for PositionPinning {
    fn default() -> Self {
        Self {
            enabled: false,
            max_pin_distance: 0.075,
            ease: EaseCurve::Linear,
        }
    }
}

/// Per-touchable tuning, in world units (meters).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchableParams {
    /// Maximum distance between the probe (or sweep hit) and the proximity
    /// field for the touchable to be eligible.
    pub max_distance: f64,
    /// How far above the surface a probe must have been on the previous
    /// frame for this touchable to become a new candidate. Never exceeds
    /// `max_distance`.
    pub enter_hover_distance: f64,
    /// Distance from the proximity field beyond which an active press is
    /// cancelled. Zero disables distance cancellation.
    pub release_distance: f64,
    /// Lateral travel along the surface's right axis that turns a press into
    /// a drag (strictly greater than).
    pub horizontal_drag_threshold: f64,
    /// Lateral travel along the surface's up axis that turns a press into a
    /// drag (strictly greater than).
    pub vertical_drag_threshold: f64,
    /// Optional touch point pinning.
    pub position_pinning: PositionPinning,
}

impl Default for TouchableParams {
    fn default() -> Self {
        Self {
            max_distance: 0.1,
            enter_hover_distance: 0.0,
            release_distance: 0.25,
            horizontal_drag_threshold: 0.03,
            vertical_drag_threshold: 0.03,
            position_pinning: PositionPinning::default(),
        }
    }
}

impl TouchableParams {
    /// Return a copy with negative distances raised to zero and
    /// `enter_hover_distance` clamped to `max_distance`.
    pub fn validated(self) -> Self {
        let max_distance = self.max_distance.max(0.0);
        Self {
            max_distance,
            enter_hover_distance: self.enter_hover_distance.clamp(0.0, max_distance),
            release_distance: self.release_distance.max(0.0),
            horizontal_drag_threshold: self.horizontal_drag_threshold.max(0.0),
            vertical_drag_threshold: self.vertical_drag_threshold.max(0.0),
            position_pinning: PositionPinning {
                max_pin_distance: self.position_pinning.max_pin_distance.max(0.0),
                ..self.position_pinning
            },
        }
    }

    fn check_finite(&self) -> Result<(), TouchableError> {
        let fields = [
            ("max_distance", self.max_distance),
            ("enter_hover_distance", self.enter_hover_distance),
            ("release_distance", self.release_distance),
            ("horizontal_drag_threshold", self.horizontal_drag_threshold),
            ("vertical_drag_threshold", self.vertical_drag_threshold),
            ("max_pin_distance", self.position_pinning.max_pin_distance),
        ];
        for (param, value) in fields {
            if !value.is_finite() {
                return Err(TouchableError::NonFinite { param, value });
            }
        }
        Ok(())
    }
}

/// Reasons a [`Touchable`] cannot be built or reconfigured.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum TouchableError {
    /// No [`Surface`] was supplied.
    #[error("touchable requires a surface")]
    MissingSurface,
    /// No [`ProximityField`] was supplied.
    #[error("touchable requires a proximity field")]
    MissingProximityField,
    /// A parameter was NaN or infinite.
    #[error("touchable parameter `{param}` must be finite, got {value}")]
    NonFinite {
        /// Name of the offending parameter.
        param: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// A poke target: parameters plus the geometry it is touched through.
///
/// Build one with [`Touchable::builder`]. A touchable always has a surface
/// and a proximity field, so one that fails to build never reaches a
/// [`TouchableSet`](crate::TouchableSet).
#[derive(Debug)]
pub struct Touchable {
    params: TouchableParams,
    surface: Box<dyn Surface + Send + Sync>,
    proximity_field: Box<dyn ProximityField + Send + Sync>,
    volume_mask: Option<Box<dyn VolumeMask + Send + Sync>>,
}

impl Touchable {
    /// Start building a touchable.
    pub fn builder() -> TouchableBuilder {
        TouchableBuilder::default()
    }

    /// Current (validated) parameters.
    pub fn params(&self) -> &TouchableParams {
        &self.params
    }

    /// Replace the parameters, validating them the same way the builder
    /// does. On error the previous parameters are kept.
    pub fn set_params(&mut self, params: TouchableParams) -> Result<(), TouchableError> {
        params.check_finite()?;
        self.params = params.validated();
        Ok(())
    }

    /// The touchable surface.
    pub fn surface(&self) -> &dyn Surface {
        &*self.surface
    }

    /// The proximity field used for ranking and eligibility.
    pub fn proximity_field(&self) -> &dyn ProximityField {
        &*self.proximity_field
    }

    /// The optional hit mask.
    pub fn volume_mask(&self) -> Option<&dyn VolumeMask> {
        self.volume_mask.as_deref().map(|m| m as &dyn VolumeMask)
    }

    /// Move the surface, proximity field, and mask together.
    pub fn set_origin(&mut self, origin: Pose) {
        self.surface.set_origin(origin);
        self.proximity_field.set_origin(origin);
        if let Some(mask) = self.volume_mask.as_mut() {
            mask.set_origin(origin);
        }
    }

    /// Whether `point` survives the volume mask (always true without one).
    pub(crate) fn mask_allows(&self, point: DVec3) -> bool {
        self.volume_mask.as_ref().is_none_or(|m| m.contains(point))
    }

    /// Signed distance of `point` below the surface: positive behind it,
    /// negative in front.
    pub(crate) fn depth(&self, point: DVec3) -> f64 {
        let sp = self.surface.closest_surface_point(point);
        (point - sp.point).dot(-sp.normal)
    }

    /// Non-negative depth of `point` behind the surface.
    pub(crate) fn depth_below(&self, point: DVec3) -> f64 {
        self.depth(point).max(0.0)
    }
}

/// Builder for [`Touchable`].
#[derive(Debug, Default)]
pub struct TouchableBuilder {
    params: TouchableParams,
    surface: Option<Box<dyn Surface + Send + Sync>>,
    proximity_field: Option<Box<dyn ProximityField + Send + Sync>>,
    volume_mask: Option<Box<dyn VolumeMask + Send + Sync>>,
}

impl TouchableBuilder {
    /// Set the tuning parameters.
    pub fn params(mut self, params: TouchableParams) -> Self {
        self.params = params;
        self
    }

    /// Set the touchable surface (required).
    pub fn surface(mut self, surface: impl Surface + Send + Sync + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    /// Set the proximity field (required).
    pub fn proximity_field(mut self, field: impl ProximityField + Send + Sync + 'static) -> Self {
        self.proximity_field = Some(Box::new(field));
        self
    }

    /// Set an optional hit mask.
    pub fn volume_mask(mut self, mask: impl VolumeMask + Send + Sync + 'static) -> Self {
        self.volume_mask = Some(Box::new(mask));
        self
    }

    /// Validate and build the touchable.
    pub fn build(self) -> Result<Touchable, TouchableError> {
        let surface = self.surface.ok_or(TouchableError::MissingSurface)?;
        let proximity_field = self
            .proximity_field
            .ok_or(TouchableError::MissingProximityField)?;
        self.params.check_finite()?;
        Ok(Touchable {
            params: self.params.validated(),
            surface,
            proximity_field,
            volume_mask: self.volume_mask,
        })
    }
}

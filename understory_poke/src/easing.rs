// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value-type easing used to blend a drag's touch point onto the live
//! surface position.
//!
//! A [`DragProgress`] is created fresh every time a drag starts, so no
//! progress can carry over from one press to the next.

/// Shape of an easing curve over `t ∈ [0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EaseCurve {
    /// `t`.
    Linear,
    /// `t²`.
    EaseIn,
    /// `1 − (1 − t)²`.
    EaseOut,
    /// Cubic Hermite with zero end tangents, `3t² − 2t³`.
    #[default]
    EaseInOut,
}

impl EaseCurve {
    /// Evaluate the curve. `t` is clamped to `[0, 1]` first.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => {
                let u = 1.0 - t;
                1.0 - u * u
            }
            Self::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Easing configuration for drag entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragEase {
    /// Curve shape.
    pub curve: EaseCurve,
    /// Time to reach full progress, in milliseconds. Zero snaps immediately.
    pub duration_ms: u64,
}

impl Default for DragEase {
    fn default() -> Self {
        Self {
            curve: EaseCurve::EaseInOut,
            duration_ms: 100,
        }
    }
}

/// Progress of one drag's ease-in, anchored at the drag's start time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragProgress {
    start_ms: u64,
    ease: DragEase,
}

impl DragProgress {
    /// Start easing at `start_ms`.
    pub fn start(ease: DragEase, start_ms: u64) -> Self {
        Self { start_ms, ease }
    }

    /// Eased progress in `[0, 1]` at `now_ms`. Timestamps earlier than the
    /// start count as zero elapsed time.
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.ease.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        if elapsed >= self.ease.duration_ms {
            return 1.0;
        }
        #[allow(
            clippy::cast_precision_loss,
            reason = "Easing spans are short; millisecond precision is plenty."
        )]
        let t = elapsed as f64 / self.ease.duration_ms as f64;
        self.ease.curve.apply(t)
    }
}

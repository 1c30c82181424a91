// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-probe poke state machine.
//!
//! ## Frame structure
//!
//! Every call to [`PokeInteractor::update`] (or [`PokeInteractor::update_with`]):
//!
//! 1. Shifts the probe history: the previous position becomes
//!    `previous_origin` and the new position becomes `origin`.
//! 2. In [`InteractorState::Select`], runs the press update: clean release
//!    above the surface, drag detection and easing, position pinning, and
//!    release-distance cancellation.
//! 3. Otherwise, computes a candidate: first a sweep test (the probe must
//!    cross the surface during this frame), then a hover test. Hover
//!    transitions follow the candidate, and a sweep winner that is also the
//!    hovered target is offered for selection.
//! 4. Snapshots every candidate's surface origin so the next frame can
//!    re-base historical points against moving surfaces.
//!
//! ## Release vs. cancel
//!
//! A press ends cleanly when the probe backs out above the surface; this
//! emits [`PokeEventKind::Unselect`] only. A press whose probe strays beyond
//! the touchable's `release_distance` emits [`PokeEventKind::Cancel`]
//! followed by [`PokeEventKind::Unselect`]. Consumers that act on "click"
//! semantics should ignore an unselect that follows a cancel.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use glam::DVec3;
use hashbrown::HashMap;
use smallvec::SmallVec;
use understory_surface::{Pose, Ray, adjust_origin, look_rotation};

use crate::easing::{DragEase, DragProgress};
use crate::set::{TouchableId, TouchableSet};
use crate::touchable::Touchable;

/// Engine-wide tuning shared by every touchable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PokeConfig {
    /// Height above the surface at which an active press ends cleanly.
    pub touch_release_threshold: f64,
    /// Easing applied when a press turns into a drag.
    pub drag_ease: DragEase,
}

impl Default for PokeConfig {
    fn default() -> Self {
        Self {
            touch_release_threshold: 0.002,
            drag_ease: DragEase::default(),
        }
    }
}

/// Lifecycle state of a [`PokeInteractor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractorState {
    /// Not updating; emits nothing.
    Disabled,
    /// Enabled, no target.
    Normal,
    /// Hovering a touchable.
    Hover,
    /// Pressing a touchable.
    Select,
}

/// Kind of lifecycle signal produced by a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PokeEventKind {
    /// Started hovering a touchable.
    Hover,
    /// Stopped hovering a touchable.
    Unhover,
    /// Started pressing a touchable.
    Select,
    /// Stopped pressing a touchable (after a clean release or a cancel).
    Unselect,
    /// Pointer moved while hovering or pressing.
    Move,
    /// The press was interrupted because the probe left the release distance.
    Cancel,
}

/// A lifecycle signal for one touchable, with the pointer pose at the time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PokeEvent {
    /// What happened.
    pub kind: PokeEventKind,
    /// The touchable it happened to.
    pub touchable: TouchableId,
    /// Pointer pose when the event was generated.
    pub pose: Pose,
}

/// Events produced by one frame, in the order they happened.
pub type PokeEvents = SmallVec<[PokeEvent; 4]>;

#[derive(Clone, Copy, Debug)]
struct Drag {
    start_offset: DVec3,
    progress: DragProgress,
}

/// State that only exists while a press is active.
#[derive(Clone, Copy, Debug)]
struct Press {
    touchable: TouchableId,
    captured_touch_point: DVec3,
    captured_surface_origin: Pose,
    previous_touch_point: DVec3,
    previous_surface_origin: Pose,
    drag: Option<Drag>,
    max_delta_from_touch_point: f64,
}

/// Outcome of the sweep pass.
enum SweepResult {
    Hit(TouchableId, DVec3),
    Miss,
    /// The probe did not move relative to a surface, so no direction exists.
    Degenerate,
}

/// Poke interaction engine for a single probe.
///
/// ## Usage
///
/// - Create one per probe with [`PokeInteractor::new`].
/// - Each frame, call [`PokeInteractor::update`] with the shared
///   [`TouchableSet`], the probe's world position, and a millisecond
///   timestamp. Dispatch the returned events.
/// - To arbitrate between several probes, call
///   [`PokeInteractor::update_with`] and decide in the hook whether a
///   proposed press may start.
///
/// Probes never share mutable state; a [`TouchableSet`] may be read by any
/// number of interactors in the same frame.
#[derive(Debug)]
pub struct PokeInteractor {
    config: PokeConfig,
    state: InteractorState,
    has_history: bool,
    origin: DVec3,
    previous_origin: DVec3,
    now_ms: u64,
    frame: u64,
    /// Surface origin of each candidate and the frame it was recorded on.
    surface_origins: HashMap<TouchableId, (Pose, u64)>,
    previous_candidate: Option<TouchableId>,
    candidate: Option<TouchableId>,
    active: Option<TouchableId>,
    hovered: Option<TouchableId>,
    selected: Option<TouchableId>,
    touch_point: DVec3,
    closest_point: DVec3,
    press: Option<Press>,
}

impl Default for PokeInteractor {
    fn default() -> Self {
        Self::new(PokeConfig::default())
    }
}

impl PokeInteractor {
    /// Create an enabled interactor with no history.
    pub fn new(config: PokeConfig) -> Self {
        Self {
            config,
            state: InteractorState::Normal,
            has_history: false,
            origin: DVec3::ZERO,
            previous_origin: DVec3::ZERO,
            now_ms: 0,
            frame: 0,
            surface_origins: HashMap::new(),
            previous_candidate: None,
            candidate: None,
            active: None,
            hovered: None,
            selected: None,
            touch_point: DVec3::ZERO,
            closest_point: DVec3::ZERO,
            press: None,
        }
    }

    /// Engine tuning.
    pub fn config(&self) -> &PokeConfig {
        &self.config
    }

    /// Replace the engine tuning. Takes effect on the next frame.
    pub fn set_config(&mut self, config: PokeConfig) {
        self.config = config;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> InteractorState {
        self.state
    }

    /// Probe position this frame.
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Probe position last frame.
    pub fn previous_origin(&self) -> DVec3 {
        self.previous_origin
    }

    /// Reported touch point: the contact point while pressing, the proximity
    /// field's closest point while hovering.
    pub fn touch_point(&self) -> DVec3 {
        self.touch_point
    }

    /// Closest point on the target's proximity field.
    pub fn closest_point(&self) -> DVec3 {
        self.closest_point
    }

    /// Candidate computed on the most recent selection pass.
    pub fn candidate(&self) -> Option<TouchableId> {
        self.candidate
    }

    /// Touchable currently hovered (also set while pressing).
    pub fn hovered(&self) -> Option<TouchableId> {
        self.hovered
    }

    /// Touchable currently pressed.
    pub fn selected(&self) -> Option<TouchableId> {
        self.selected
    }

    /// Touchable the sweep test found or that is still being pressed.
    pub fn active_touchable(&self) -> Option<TouchableId> {
        self.active
    }

    /// Whether the active press has turned into a drag.
    pub fn is_dragging(&self) -> bool {
        self.press.as_ref().is_some_and(|p| p.drag.is_some())
    }

    /// World-space contact point recorded when the active press began.
    pub fn captured_touch_point(&self) -> Option<DVec3> {
        self.press.as_ref().map(|p| p.captured_touch_point)
    }

    /// Whether the sweep winner is the hovered target and may be pressed.
    pub fn should_select(&self) -> bool {
        self.state == InteractorState::Hover && self.active.is_some() && self.active == self.hovered
    }

    /// Whether an active press has ended and should be unselected.
    pub fn should_unselect(&self) -> bool {
        self.state == InteractorState::Select && self.active.is_none()
    }

    /// Stop interacting. Emits unselect/unhover for the current target and
    /// forgets all candidate and press state.
    pub fn disable(&mut self, set: &TouchableSet) -> PokeEvents {
        let mut events = PokeEvents::new();
        if self.state == InteractorState::Disabled {
            return events;
        }
        if let Some(id) = self.selected.take() {
            self.emit(&mut events, set, PokeEventKind::Unselect, id);
        }
        if let Some(id) = self.hovered.take() {
            self.emit(&mut events, set, PokeEventKind::Unhover, id);
        }
        self.press = None;
        self.active = None;
        self.candidate = None;
        self.previous_candidate = None;
        self.state = InteractorState::Disabled;
        tracing::debug!("poke interactor disabled");
        events
    }

    /// Resume interacting. The next frame starts a fresh position history.
    pub fn enable(&mut self) {
        if self.state == InteractorState::Disabled {
            self.state = InteractorState::Normal;
            self.has_history = false;
            self.surface_origins.clear();
        }
    }

    /// Advance one frame, confirming every proposed press.
    pub fn update(&mut self, set: &TouchableSet, position: DVec3, now_ms: u64) -> PokeEvents {
        self.update_with(set, position, now_ms, |_| true)
    }

    /// Advance one frame. `confirm_select` is asked before a press starts and
    /// may veto it, for example because another probe already owns the
    /// touchable.
    pub fn update_with(
        &mut self,
        set: &TouchableSet,
        position: DVec3,
        now_ms: u64,
        mut confirm_select: impl FnMut(TouchableId) -> bool,
    ) -> PokeEvents {
        let mut events = PokeEvents::new();
        if self.state == InteractorState::Disabled {
            return events;
        }
        self.now_ms = now_ms;
        self.frame = self.frame.wrapping_add(1);
        self.preprocess(position);

        if self.state == InteractorState::Select {
            self.update_press(set, &mut events);
            if self.should_unselect() {
                self.unselect(set, &mut events);
            }
        } else {
            let candidate = self.compute_candidate(set);
            self.candidate = candidate;
            self.hover(set, candidate, &mut events);
            if self.should_select() {
                if let Some(id) = self.active.filter(|id| confirm_select(*id)) {
                    self.select(set, id, &mut events);
                }
            }
        }

        if let Some(id) = self.selected.or(self.hovered).filter(|id| set.is_enabled(*id)) {
            self.emit(&mut events, set, PokeEventKind::Move, id);
        }
        self.record_surface_origins(set);
        events
    }

    fn preprocess(&mut self, position: DVec3) {
        if self.has_history {
            self.previous_origin = self.origin;
        } else {
            self.previous_origin = position;
            self.has_history = true;
        }
        self.origin = position;
    }

    /// Surface origin recorded on the immediately preceding frame, if any.
    fn previous_surface_origin(&self, id: TouchableId) -> Option<Pose> {
        self.surface_origins
            .get(&id)
            .filter(|(_, frame)| *frame == self.frame.wrapping_sub(1))
            .map(|(pose, _)| *pose)
    }

    fn record_surface_origins(&mut self, set: &TouchableSet) {
        for (id, t) in set.candidates() {
            self.surface_origins
                .insert(id, (t.surface().origin(), self.frame));
        }
    }

    /// Choose this frame's target among the enabled touchables in `set`.
    ///
    /// A sweep winner (the probe crossed the surface this frame) takes
    /// precedence and becomes the [active touchable](Self::active_touchable);
    /// otherwise the closest hover-eligible touchable is returned. When the
    /// probe has not moved relative to a gated surface no candidate is
    /// returned at all.
    pub fn compute_candidate(&mut self, set: &TouchableSet) -> Option<TouchableId> {
        match self.sweep_candidate(set) {
            SweepResult::Hit(id, closest) => {
                self.active = Some(id);
                self.previous_candidate = Some(id);
                self.touch_point = closest;
                self.closest_point = closest;
                return Some(id);
            }
            SweepResult::Degenerate => {
                self.active = None;
                return None;
            }
            SweepResult::Miss => {}
        }
        self.active = None;
        let hover = self.hover_candidate(set);
        self.previous_candidate = hover.map(|(id, _)| id);
        if let Some((_, closest)) = hover {
            self.touch_point = closest;
            self.closest_point = closest;
        }
        hover.map(|(id, _)| id)
    }

    fn passes_enter_hover_check(&self, id: TouchableId, t: &Touchable, point: DVec3) -> bool {
        self.previous_candidate == Some(id) || t.depth(point) <= -t.params().enter_hover_distance
    }

    fn sweep_candidate(&self, set: &TouchableSet) -> SweepResult {
        let mut best: Option<(TouchableId, DVec3, f64)> = None;
        for (id, t) in set.candidates() {
            let surface = t.surface();
            let current = surface.origin();
            let previous = self.previous_surface_origin(id).unwrap_or(current);
            let adjusted = adjust_origin(self.previous_origin, &previous, &current);

            if !self.passes_enter_hover_check(id, t, adjusted) {
                continue;
            }

            let travel = self.origin - adjusted;
            let magnitude = travel.length();
            if magnitude == 0.0 {
                tracing::trace!(touchable = ?id, "poke sweep has no direction");
                return SweepResult::Degenerate;
            }
            let direction = travel / magnitude;

            let normal = surface.closest_surface_point(self.origin).normal;
            if direction.dot(normal) >= 0.0 {
                continue;
            }

            let Some(hit) = surface.raycast(&Ray::new(adjusted, direction)) else {
                continue;
            };
            if hit.distance > magnitude {
                continue;
            }
            if !t.mask_allows(hit.point) {
                tracing::trace!(touchable = ?id, "poke sweep hit masked out");
                continue;
            }

            let closest = t.proximity_field().closest_point(hit.point);
            let sqr_distance = (closest - hit.point).length_squared();
            let max_distance = t.params().max_distance;
            if sqr_distance > max_distance * max_distance {
                continue;
            }
            if best.is_none_or(|(_, _, d)| sqr_distance < d) {
                best = Some((id, closest, sqr_distance));
            }
        }
        match best {
            Some((id, closest, _)) => SweepResult::Hit(id, closest),
            None => SweepResult::Miss,
        }
    }

    fn hover_candidate(&self, set: &TouchableSet) -> Option<(TouchableId, DVec3)> {
        let mut best: Option<(TouchableId, DVec3, f64)> = None;
        for (id, t) in set.candidates() {
            if !self.passes_enter_hover_check(id, t, self.previous_origin) {
                continue;
            }
            let sp = t.surface().closest_surface_point(self.origin);
            if (self.origin - sp.point).dot(sp.normal) <= 0.0 {
                continue;
            }
            if !t.mask_allows(self.origin) {
                continue;
            }
            let closest = t.proximity_field().closest_point(self.origin);
            let sqr_distance = (self.origin - closest).length_squared();
            let max_distance = t.params().max_distance;
            if sqr_distance > max_distance * max_distance {
                continue;
            }
            if best.is_none_or(|(_, _, d)| sqr_distance < d) {
                best = Some((id, closest, sqr_distance));
            }
        }
        best.map(|(id, closest, _)| (id, closest))
    }

    fn hover(&mut self, set: &TouchableSet, candidate: Option<TouchableId>, events: &mut PokeEvents) {
        if self.hovered != candidate {
            if let Some(old) = self.hovered.take() {
                tracing::debug!(touchable = ?old, "poke unhover");
                self.emit(events, set, PokeEventKind::Unhover, old);
            }
            if let Some(new) = candidate {
                tracing::debug!(touchable = ?new, "poke hover");
                self.hovered = Some(new);
                self.emit(events, set, PokeEventKind::Hover, new);
            }
        }
        self.state = if self.hovered.is_some() {
            InteractorState::Hover
        } else {
            InteractorState::Normal
        };
    }

    fn select(&mut self, set: &TouchableSet, id: TouchableId, events: &mut PokeEvents) {
        let Some(t) = set.get(id) else {
            return;
        };
        let surface = t.surface();
        let contact = surface.closest_surface_point(self.origin).point;
        let surface_origin = surface.origin();
        self.press = Some(Press {
            touchable: id,
            captured_touch_point: contact,
            captured_surface_origin: surface_origin,
            previous_touch_point: contact,
            previous_surface_origin: surface_origin,
            drag: None,
            max_delta_from_touch_point: 0.0,
        });
        self.selected = Some(id);
        self.state = InteractorState::Select;
        tracing::debug!(touchable = ?id, "poke select");
        self.emit(events, set, PokeEventKind::Select, id);
    }

    fn unselect(&mut self, set: &TouchableSet, events: &mut PokeEvents) {
        self.press = None;
        if let Some(id) = self.selected.take() {
            self.emit(events, set, PokeEventKind::Unselect, id);
        }
        self.state = if self.hovered.is_some() {
            InteractorState::Hover
        } else {
            InteractorState::Normal
        };
    }

    fn update_press(&mut self, set: &TouchableSet, events: &mut PokeEvents) {
        let Some(mut press) = self.press.take() else {
            self.active = None;
            return;
        };
        let Some(t) = set.get(press.touchable).filter(|_| set.is_enabled(press.touchable)) else {
            tracing::debug!(touchable = ?press.touchable, "poke press target went away");
            self.active = None;
            return;
        };
        let surface = t.surface();
        let params = t.params();

        let on_surface = surface.closest_surface_point(self.origin);
        let height = (self.origin - on_surface.point).dot(on_surface.normal);
        if height > self.config.touch_release_threshold {
            tracing::debug!(touchable = ?press.touchable, "poke release");
            self.active = None;
            return;
        }
        let position_on_surface = on_surface.point;

        let current = surface.origin();
        let captured = adjust_origin(
            press.captured_touch_point,
            &press.captured_surface_origin,
            &current,
        );
        let previous = adjust_origin(
            press.previous_touch_point,
            &press.previous_surface_origin,
            &current,
        );

        let lateral_delta = surface.tangent_distance(position_on_surface, captured);
        let frame_delta = surface.tangent_distance(position_on_surface, previous);
        let depth_delta = (t.depth_below(self.origin) - t.depth_below(self.previous_origin)).abs();

        if press.drag.is_none()
            && frame_delta.hypot() > depth_delta
            && (lateral_delta.x > params.horizontal_drag_threshold
                || lateral_delta.y > params.vertical_drag_threshold)
        {
            tracing::debug!(touchable = ?press.touchable, "poke drag start");
            press.drag = Some(Drag {
                start_offset: captured - position_on_surface,
                progress: DragProgress::start(self.config.drag_ease, self.now_ms),
            });
        }

        let mut touch_point = match press.drag {
            None => {
                press.max_delta_from_touch_point = 0.0;
                captured
            }
            Some(drag) => {
                let progress = drag.progress.progress(self.now_ms);
                position_on_surface + drag.start_offset.lerp(DVec3::ZERO, progress)
            }
        };

        let pinning = params.position_pinning;
        if pinning.enabled {
            let offset = touch_point - captured;
            press.max_delta_from_touch_point =
                press.max_delta_from_touch_point.max(offset.length());
            let ratio = if pinning.max_pin_distance == 0.0 {
                1.0
            } else {
                pinning
                    .ease
                    .apply(press.max_delta_from_touch_point / pinning.max_pin_distance)
            };
            touch_point = captured + offset * ratio;
        }
        self.touch_point = touch_point;

        press.previous_touch_point = position_on_surface;
        press.previous_surface_origin = current;

        let closest = t.proximity_field().closest_point(self.origin);
        self.closest_point = closest;
        if params.release_distance > 0.0
            && (closest - self.origin).length() > params.release_distance
        {
            tracing::debug!(touchable = ?press.touchable, "poke cancel");
            self.emit(events, set, PokeEventKind::Cancel, press.touchable);
            self.previous_candidate = None;
            self.previous_origin = self.origin;
            self.active = None;
            return;
        }

        self.press = Some(press);
    }

    /// Pointer pose for the current target: at the touch point, looking
    /// along the surface normal there. Identity when there is no target.
    pub fn compute_pointer_pose(&self, set: &TouchableSet) -> Pose {
        match self.selected.or(self.hovered) {
            Some(id) => self.pose_for(set, id),
            None => Pose::IDENTITY,
        }
    }

    fn pose_for(&self, set: &TouchableSet, id: TouchableId) -> Pose {
        match set.get(id) {
            Some(t) => {
                let normal = t.surface().closest_surface_point(self.touch_point).normal;
                Pose::new(self.touch_point, look_rotation(normal, DVec3::Y))
            }
            None => Pose::from_position(self.touch_point),
        }
    }

    fn emit(
        &self,
        events: &mut PokeEvents,
        set: &TouchableSet,
        kind: PokeEventKind,
        touchable: TouchableId,
    ) {
        events.push(PokeEvent {
            kind,
            touchable,
            pose: self.pose_for(set, touchable),
        });
    }
}

//! Transform animations driven by curves.
//!
//! Each [`AnimationKind`] owns one runner key, so starting a kind replaces
//! whatever that kind was doing while other kinds keep running. Relative
//! kinds add the sampled value to the target's baseline ([`AnimationData`]),
//! which is captured the first time a relative animation starts.

use serde::{Deserialize, Serialize};

use framekit_core::{KeyedTaskRunner, TaskHandle};

use crate::math::{Quat, Vec3};
use crate::sampler::CurveTask;
use crate::transform::Transform;
use crate::vec3_curve::Vec3Curve;

/// Snapshot of a target's transform used as the origin of relative kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationData {
    pub transform: Transform,
}

impl AnimationData {
    pub fn capture(transform: &Transform) -> Self {
        Self {
            transform: *transform,
        }
    }
}

/// Anything with a transform and a baseline slot can be animated.
pub trait Animated {
    fn transform(&self) -> &Transform;
    fn transform_mut(&mut self) -> &mut Transform;
    fn animation_data(&self) -> Option<&AnimationData>;
    fn animation_data_mut(&mut self) -> &mut Option<AnimationData>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationKind {
    /// Absolute local position.
    Position,
    /// Baseline position plus the sample.
    PositionRelative,
    /// Sample as Euler degrees.
    Rotation,
    /// Absolute local scale.
    Scale,
    /// Baseline scale plus the sample.
    ScaleRelative,
}

impl AnimationKind {
    pub const ALL: [Self; 5] = [
        Self::Position,
        Self::PositionRelative,
        Self::Rotation,
        Self::Scale,
        Self::ScaleRelative,
    ];

    /// Runner key this kind occupies.
    pub fn key(self) -> &'static str {
        match self {
            Self::Position => "Position",
            Self::PositionRelative => "PositionRelative",
            Self::Rotation => "Rotation",
            Self::Scale => "Scale",
            Self::ScaleRelative => "ScaleRelative",
        }
    }

    #[inline]
    pub fn is_relative(self) -> bool {
        matches!(self, Self::PositionRelative | Self::ScaleRelative)
    }

    /// Write one sampled value into `target`.
    pub fn apply<T: Animated>(self, target: &mut T, value: Vec3) {
        match self {
            Self::Position => target.transform_mut().position = value,
            Self::PositionRelative => {
                let base = ensure_baseline(target).transform.position;
                target.transform_mut().position = base + value;
            }
            Self::Rotation => target.transform_mut().rotation = Quat::from_euler_degrees(value),
            Self::Scale => target.transform_mut().scale = value,
            Self::ScaleRelative => {
                let base = ensure_baseline(target).transform.scale;
                target.transform_mut().scale = base + value;
            }
        }
    }

    /// Drive task writing this kind's samples of `curve`.
    pub fn task<T: Animated + 'static>(self, curve: Vec3Curve) -> CurveTask<T> {
        CurveTask::new(curve, move |target: &mut T, curve: &Vec3Curve, time| {
            self.apply(target, curve.evaluate(time))
        })
    }
}

/// Return the target's baseline, capturing the current transform if it has none.
pub fn ensure_baseline<T: Animated>(target: &mut T) -> AnimationData {
    let current = *target.transform();
    *target
        .animation_data_mut()
        .get_or_insert_with(|| AnimationData::capture(&current))
}

/// Overwrite the baseline with the target's current transform.
pub fn reset_animation_data<T: Animated>(target: &mut T) {
    let current = *target.transform();
    *target.animation_data_mut() = Some(AnimationData::capture(&current));
}

/// Start (or restart) `kind` on `target` through its `runner`.
pub fn start<T: Animated + 'static>(
    runner: &mut KeyedTaskRunner<T>,
    target: &mut T,
    kind: AnimationKind,
    curve: Vec3Curve,
) -> TaskHandle {
    if kind.is_relative() {
        ensure_baseline(target);
    }
    runner.start_or_replace(kind.key(), kind.task(curve))
}

/// Linear move from the current position to `destination`.
///
/// A non-positive or non-finite `duration` snaps immediately, cancels any
/// running Position animation and returns `None`.
pub fn move_to<T: Animated + 'static>(
    runner: &mut KeyedTaskRunner<T>,
    target: &mut T,
    destination: Vec3,
    duration: f32,
) -> Option<TaskHandle> {
    if !(duration.is_finite() && duration > 0.0) {
        runner.remove_coroutine(AnimationKind::Position.key());
        target.transform_mut().position = destination;
        log::debug!("move_to snapped to {destination:?} (duration {duration})");
        return None;
    }
    let curve = Vec3Curve::linear(target.transform().position, destination, duration);
    Some(start(runner, target, AnimationKind::Position, curve))
}

/// Stop `kind`. Returns whether it was running.
pub fn stop<T>(runner: &mut KeyedTaskRunner<T>, kind: AnimationKind) -> bool {
    runner.remove_coroutine(kind.key())
}

//! Drive task: samples a [`Vec3Curve`] once per frame into a target.

use std::fmt;

use framekit_core::{Task, TaskContext, TaskStatus};

use crate::vec3_curve::Vec3Curve;

/// Callback receiving `(target, curve, time)` for every sample.
pub type SampleFn<T> = Box<dyn FnMut(&mut T, &Vec3Curve, f32)>;

/// Samples `curve` at its own elapsed time on each resume.
///
/// - While `elapsed < max_time` (or forever when the curve loops), the
///   sample callback runs at `elapsed`, then `elapsed` advances by the frame
///   delta.
/// - Otherwise one final sample is taken exactly at `max_time` and the task
///   completes, so the target always lands on the curve's end value.
pub struct CurveTask<T> {
    curve: Vec3Curve,
    elapsed: f32,
    on_sample: SampleFn<T>,
}

impl<T> CurveTask<T> {
    pub fn new<F>(curve: Vec3Curve, on_sample: F) -> Self
    where
        F: FnMut(&mut T, &Vec3Curve, f32) + 'static,
    {
        Self {
            curve,
            elapsed: 0.0,
            on_sample: Box::new(on_sample),
        }
    }

    #[inline]
    pub fn curve(&self) -> &Vec3Curve {
        &self.curve
    }

    /// Seconds of curve time consumed so far.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl<T> fmt::Debug for CurveTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveTask")
            .field("curve", &self.curve)
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

impl<T> Task<T> for CurveTask<T> {
    fn resume(&mut self, cx: &mut TaskContext<'_, T>) -> TaskStatus {
        let max_time = self.curve.max_time();
        if self.elapsed < max_time || self.curve.is_looping() {
            (self.on_sample)(cx.host(), &self.curve, self.elapsed);
            self.elapsed += cx.dt();
            TaskStatus::Pending
        } else {
            (self.on_sample)(cx.host(), &self.curve, max_time);
            TaskStatus::Complete
        }
    }
}

//! Three independent scalar curves sampled together as a [`Vec3`].

use serde::{Deserialize, Serialize};

use crate::curve::{Curve, CurveError, WrapMode};
use crate::math::Vec3;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3Curve {
    pub x: Curve,
    pub y: Curve,
    pub z: Curve,
}

impl Vec3Curve {
    pub fn new(x: Curve, y: Curve, z: Curve) -> Self {
        Self { x, y, z }
    }

    pub fn constant(value: Vec3) -> Self {
        Self::new(
            Curve::constant(value.x),
            Curve::constant(value.y),
            Curve::constant(value.z),
        )
    }

    /// Per-axis straight lines from `from` at t=0 to `to` at t=`duration`.
    pub fn linear(from: Vec3, to: Vec3, duration: f32) -> Self {
        Self::new(
            Curve::linear(0.0, from.x, duration, to.x),
            Curve::linear(0.0, from.y, duration, to.y),
            Curve::linear(0.0, from.z, duration, to.z),
        )
    }

    pub fn ease_in_out(from: Vec3, to: Vec3, duration: f32) -> Self {
        Self::new(
            Curve::ease_in_out(0.0, from.x, duration, to.x),
            Curve::ease_in_out(0.0, from.y, duration, to.y),
            Curve::ease_in_out(0.0, from.z, duration, to.z),
        )
    }

    /// Apply the same post-wrap mode to every channel.
    pub fn with_post_wrap(mut self, post_wrap: WrapMode) -> Self {
        for channel in self.channels_mut() {
            channel.set_post_wrap(post_wrap);
        }
        self
    }

    pub fn evaluate(&self, t: f32) -> Vec3 {
        Vec3::new(self.x.evaluate(t), self.y.evaluate(t), self.z.evaluate(t))
    }

    /// Longest channel duration.
    pub fn max_time(&self) -> f32 {
        self.x
            .max_time()
            .max(self.y.max_time())
            .max(self.z.max_time())
    }

    /// True when any channel loops or ping-pongs past its last key.
    pub fn is_looping(&self) -> bool {
        self.x.is_looping() || self.y.is_looping() || self.z.is_looping()
    }

    /// Set key `index` on all three channels. Nothing changes unless every
    /// channel has that key.
    pub fn edit_keyframe_value(&mut self, index: usize, value: Vec3) -> Result<(), CurveError> {
        for channel in [&self.x, &self.y, &self.z] {
            if index >= channel.len() {
                return Err(CurveError::KeyIndexOutOfRange {
                    index,
                    len: channel.len(),
                });
            }
        }
        if !(value.x.is_finite() && value.y.is_finite() && value.z.is_finite()) {
            return Err(CurveError::NonFiniteKey { index });
        }
        self.x.edit_keyframe_value(index, value.x)?;
        self.y.edit_keyframe_value(index, value.y)?;
        self.z.edit_keyframe_value(index, value.z)
    }

    fn channels_mut(&mut self) -> [&mut Curve; 3] {
        [&mut self.x, &mut self.y, &mut self.z]
    }
}

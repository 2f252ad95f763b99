//! One-dimensional keyframed curves.
//!
//! Model:
//! - A curve holds keyframes `(time, value, in_tangent, out_tangent)` with
//!   strictly increasing, finite times. Every constructor, editor and the
//!   serde path enforce this, so sampling never sees a degenerate segment.
//! - Times outside `[first, last]` are mapped through the pre/post
//!   [`WrapMode`] (clamp, loop, ping-pong).
//! - Segments are interpolated with the curve-wide [`Interpolation`]; tangents
//!   only matter for [`Interpolation::Hermite`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interp::functions::{bezier_ease_t, hermite, lerp_f32, ping_pong, repeat};

/// Errors raised while building, editing or loading curves.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CurveError {
    #[error("keyframe {index} has a non-finite time, value or tangent")]
    NonFiniteKey { index: usize },
    #[error("keyframe {index} at time {time} does not come after the previous key at {previous}")]
    NonIncreasingTime {
        index: usize,
        previous: f32,
        time: f32,
    },
    #[error("keyframe index {index} is out of range for a curve with {len} key(s)")]
    KeyIndexOutOfRange { index: usize, len: usize },
    #[error("curve json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A control point of a curve. Tangents are finite slopes in value per second.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub in_tangent: f32,
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self::with_tangents(time, value, 0.0, 0.0)
    }

    pub fn with_tangents(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }

    // All four fields must survive a JSON round trip; stepped segments use
    // Interpolation::Step rather than infinite tangents.
    fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.value.is_finite()
            && self.in_tangent.is_finite()
            && self.out_tangent.is_finite()
    }
}

/// Behaviour for sample times before the first or after the last key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    #[default]
    Clamp,
    Loop,
    PingPong,
}

/// How values between two keys are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Hold the left key's value.
    Step,
    #[default]
    Linear,
    /// Cubic Hermite using the keys' out/in tangents.
    Hermite,
    /// Cubic-bezier timing between keys, then a linear blend of values.
    Bezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Interpolation {
    /// The CSS "ease-in-out" timing.
    pub const EASE_IN_OUT: Self = Self::Bezier {
        x1: 0.42,
        y1: 0.0,
        x2: 0.58,
        y2: 1.0,
    };
}

/// Wire shape of a curve, validated on conversion.
#[derive(Deserialize)]
struct CurveDef {
    keys: Vec<Keyframe>,
    #[serde(default)]
    interpolation: Interpolation,
    #[serde(default)]
    pre_wrap: WrapMode,
    #[serde(default)]
    post_wrap: WrapMode,
}

impl TryFrom<CurveDef> for Curve {
    type Error = CurveError;

    fn try_from(def: CurveDef) -> Result<Self, CurveError> {
        Ok(Curve::new(def.keys)?
            .with_interpolation(def.interpolation)
            .with_wrap(def.pre_wrap, def.post_wrap))
    }
}

/// A keyframed scalar curve.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveDef")]
pub struct Curve {
    keys: Vec<Keyframe>,
    interpolation: Interpolation,
    pre_wrap: WrapMode,
    post_wrap: WrapMode,
}

fn validate(keys: &[Keyframe]) -> Result<(), CurveError> {
    let mut previous: Option<f32> = None;
    for (index, key) in keys.iter().enumerate() {
        if !key.is_finite() {
            return Err(CurveError::NonFiniteKey { index });
        }
        if let Some(previous) = previous {
            if key.time <= previous {
                return Err(CurveError::NonIncreasingTime {
                    index,
                    previous,
                    time: key.time,
                });
            }
        }
        previous = Some(key.time);
    }
    Ok(())
}

impl Curve {
    /// Build a linear, clamped curve from keys with strictly increasing times.
    pub fn new(keys: Vec<Keyframe>) -> Result<Self, CurveError> {
        validate(&keys)?;
        Ok(Self {
            keys,
            ..Self::default()
        })
    }

    /// Single key at time 0.
    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![Keyframe::new(0.0, value)],
            ..Self::default()
        }
    }

    /// Straight line from `(t0, v0)` to `(t1, v1)`.
    ///
    /// A non-positive span collapses to a single key holding `v1`, i.e. an
    /// instantaneous transition.
    pub fn linear(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        let t0 = if t0.is_finite() { t0 } else { 0.0 };
        let v0 = if v0.is_finite() { v0 } else { 0.0 };
        let v1 = if v1.is_finite() { v1 } else { v0 };
        if !t1.is_finite() || t1 <= t0 {
            return Self {
                keys: vec![Keyframe::new(t0, v1)],
                ..Self::default()
            };
        }
        let slope = (v1 - v0) / (t1 - t0);
        let slope = if slope.is_finite() { slope } else { 0.0 };
        Self {
            keys: vec![
                Keyframe::with_tangents(t0, v0, 0.0, slope),
                Keyframe::with_tangents(t1, v1, slope, 0.0),
            ],
            ..Self::default()
        }
    }

    /// Smooth start and stop between `(t0, v0)` and `(t1, v1)` (flat tangents).
    pub fn ease_in_out(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        let mut curve = Self::linear(t0, v0, t1, v1);
        for key in &mut curve.keys {
            key.in_tangent = 0.0;
            key.out_tangent = 0.0;
        }
        curve.with_interpolation(Interpolation::Hermite)
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_wrap(mut self, pre_wrap: WrapMode, post_wrap: WrapMode) -> Self {
        self.pre_wrap = pre_wrap;
        self.post_wrap = post_wrap;
        self
    }

    pub fn set_post_wrap(&mut self, post_wrap: WrapMode) {
        self.post_wrap = post_wrap;
    }

    #[inline]
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    #[inline]
    pub fn pre_wrap(&self) -> WrapMode {
        self.pre_wrap
    }

    #[inline]
    pub fn post_wrap(&self) -> WrapMode {
        self.post_wrap
    }

    /// Time of the last key (0 for an empty curve).
    pub fn max_time(&self) -> f32 {
        self.keys.last().map_or(0.0, |k| k.time)
    }

    /// Whether sampling past the last key keeps producing motion.
    pub fn is_looping(&self) -> bool {
        matches!(self.post_wrap, WrapMode::Loop | WrapMode::PingPong)
    }

    /// Sample the curve at `t` seconds.
    pub fn evaluate(&self, t: f32) -> f32 {
        let keys = &self.keys;
        let n = keys.len();
        match n {
            0 => 0.0,
            1 => keys[0].value,
            _ => {
                let first = keys[0].time;
                let last = keys[n - 1].time;
                let t = if t.is_nan() {
                    first
                } else if t < first {
                    wrap_time(self.pre_wrap, t, first, last)
                } else if t > last {
                    wrap_time(self.post_wrap, t, first, last)
                } else {
                    t
                };
                self.sample_segment(t)
            }
        }
    }

    fn sample_segment(&self, t: f32) -> f32 {
        let keys = &self.keys;
        let i = keys.partition_point(|k| k.time <= t);
        if i == 0 {
            return keys[0].value;
        }
        if i >= keys.len() {
            return keys[keys.len() - 1].value;
        }
        let k0 = &keys[i - 1];
        let k1 = &keys[i];
        let span = k1.time - k0.time;
        let s = ((t - k0.time) / span).clamp(0.0, 1.0);
        match self.interpolation {
            Interpolation::Step => k0.value,
            Interpolation::Linear => lerp_f32(k0.value, k1.value, s),
            Interpolation::Hermite => {
                hermite(k0.value, k0.out_tangent, k1.value, k1.in_tangent, span, s)
            }
            Interpolation::Bezier { x1, y1, x2, y2 } => {
                lerp_f32(k0.value, k1.value, bezier_ease_t(s, x1, y1, x2, y2))
            }
        }
    }

    /// Change the value of key `index`, leaving its time and tangents alone.
    pub fn edit_keyframe_value(&mut self, index: usize, value: f32) -> Result<(), CurveError> {
        let len = self.keys.len();
        if !value.is_finite() {
            return Err(CurveError::NonFiniteKey { index });
        }
        let key = self
            .keys
            .get_mut(index)
            .ok_or(CurveError::KeyIndexOutOfRange { index, len })?;
        key.value = value;
        Ok(())
    }

    /// Replace key `index`; the new key must keep times strictly increasing.
    pub fn replace_key(&mut self, index: usize, key: Keyframe) -> Result<(), CurveError> {
        let len = self.keys.len();
        if index >= len {
            return Err(CurveError::KeyIndexOutOfRange { index, len });
        }
        let mut keys = self.keys.clone();
        keys[index] = key;
        validate(&keys)?;
        self.keys = keys;
        Ok(())
    }

    /// Insert a key at its time-ordered position and return that position.
    /// A key at an existing time is rejected.
    pub fn add_key(&mut self, key: Keyframe) -> Result<usize, CurveError> {
        let index = self.keys.partition_point(|k| k.time < key.time);
        if !key.is_finite() {
            return Err(CurveError::NonFiniteKey { index });
        }
        if let Some(existing) = self.keys.get(index) {
            if existing.time == key.time {
                return Err(CurveError::NonIncreasingTime {
                    index: index + 1,
                    previous: existing.time,
                    time: key.time,
                });
            }
        }
        self.keys.insert(index, key);
        Ok(index)
    }
}

fn wrap_time(mode: WrapMode, t: f32, first: f32, last: f32) -> f32 {
    let span = last - first;
    match mode {
        WrapMode::Clamp => t.clamp(first, last),
        WrapMode::Loop => first + repeat(t - first, span),
        WrapMode::PingPong => first + ping_pong(t - first, span),
    }
}

//! Core configuration for framekit-core.

use serde::{Deserialize, Serialize};

/// Configuration for runner/pool sizing and frame delta policy.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial capacity hint for a runner's task map.
    pub task_capacity: usize,
    /// Initial capacity hint for a pool's free list.
    pub pool_capacity: usize,
    /// Upper bound applied to every frame delta fed to tasks.
    /// `None` passes host deltas through unchanged.
    pub max_delta_time: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            task_capacity: 8,
            pool_capacity: 16,
            max_delta_time: None,
        }
    }
}

impl Config {
    /// Sanitize a host frame delta: negative or non-finite deltas become 0,
    /// and the optional upper bound is applied. A negative or non-finite
    /// bound is ignored.
    pub fn clamp_delta(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("ignoring invalid frame delta {dt}");
            return 0.0;
        }
        match self.max_delta_time {
            Some(max) if !(max.is_finite() && max >= 0.0) => {
                log::warn!("ignoring invalid max_delta_time {max}");
                dt
            }
            Some(max) if dt > max => {
                log::warn!("frame delta {dt} clamped to {max}");
                max
            }
            _ => dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_delta_rejects_negative_and_nan() {
        let cfg = Config::default();
        assert_eq!(cfg.clamp_delta(-1.0), 0.0);
        assert_eq!(cfg.clamp_delta(f32::NAN), 0.0);
        assert_eq!(cfg.clamp_delta(0.25), 0.25);
    }

    #[test]
    fn clamp_delta_applies_upper_bound() {
        let cfg = Config {
            max_delta_time: Some(0.1),
            ..Config::default()
        };
        assert_eq!(cfg.clamp_delta(0.5), 0.1);
        assert_eq!(cfg.clamp_delta(0.05), 0.05);
    }

    #[test]
    fn invalid_upper_bound_is_ignored() {
        let cfg: Config = serde_json::from_str(r#"{ "max_delta_time": -0.5 }"#).unwrap();
        assert_eq!(cfg.clamp_delta(0.1), 0.1);
        assert_eq!(cfg.clamp_delta(-0.1), 0.0);
        let cfg = Config {
            max_delta_time: Some(f32::NAN),
            ..Config::default()
        };
        assert_eq!(cfg.clamp_delta(0.3), 0.3);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "max_delta_time": 0.2 }"#).unwrap();
        assert_eq!(cfg.max_delta_time, Some(0.2));
        assert_eq!(cfg.task_capacity, Config::default().task_capacity);
    }
}

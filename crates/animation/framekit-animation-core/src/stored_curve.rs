//! JSON documents describing a [`Vec3Curve`].
//!
//! Shape: `{ "x": <curve>, "y": <curve>, "z": <curve> }` where each curve is
//! `{ "keys": [{ "time", "value", "in_tangent"?, "out_tangent"? }],
//! "interpolation"?, "pre_wrap"?, "post_wrap"? }`. Key times must be finite
//! and strictly increasing.

use crate::curve::CurveError;
use crate::vec3_curve::Vec3Curve;

/// Parse and validate a stored curve.
pub fn parse_curve_json(json: &str) -> Result<Vec3Curve, CurveError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a stored curve from an already decoded JSON value.
pub fn curve_from_value(value: serde_json::Value) -> Result<Vec3Curve, CurveError> {
    Ok(serde_json::from_value(value)?)
}

/// Serialize a curve in the stored format.
pub fn curve_to_json(curve: &Vec3Curve) -> Result<String, CurveError> {
    Ok(serde_json::to_string_pretty(curve)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Interpolation, WrapMode};
    use crate::math::Vec3;

    #[test]
    fn parses_defaults() {
        let json = r#"{
            "x": { "keys": [{ "time": 0, "value": 0 }, { "time": 2, "value": 4 }] },
            "y": { "keys": [{ "time": 0, "value": 1 }], "interpolation": "step" },
            "z": { "keys": [], "post_wrap": "ping_pong" }
        }"#;
        let curve = parse_curve_json(json).unwrap();
        assert_eq!(curve.x.interpolation(), Interpolation::Linear);
        assert_eq!(curve.x.post_wrap(), WrapMode::Clamp);
        assert_eq!(curve.y.interpolation(), Interpolation::Step);
        assert!(curve.is_looping());
        assert_eq!(curve.max_time(), 2.0);
        assert_eq!(curve.evaluate(1.0), Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn bezier_interpolation_round_trips_through_json() {
        let mut curve = Vec3Curve::linear(Vec3::ZERO, Vec3::ONE, 1.0);
        curve.x = curve.x.clone().with_interpolation(Interpolation::EASE_IN_OUT);
        let text = curve_to_json(&curve).unwrap();
        assert_eq!(parse_curve_json(&text).unwrap(), curve);
    }

    #[test]
    fn rejects_unordered_keys_and_bad_json() {
        let json = r#"{
            "x": { "keys": [{ "time": 1, "value": 0 }, { "time": 1, "value": 4 }] },
            "y": { "keys": [] },
            "z": { "keys": [] }
        }"#;
        assert!(matches!(parse_curve_json(json), Err(CurveError::Json(_))));
        assert!(parse_curve_json("{").is_err());
        assert!(curve_from_value(serde_json::json!({ "x": { "keys": [] } })).is_err());
    }

    #[test]
    fn stepped_curve_round_trips_through_json() {
        let mut curve = Vec3Curve::linear(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), 1.0);
        curve.x = curve.x.clone().with_interpolation(Interpolation::Step);
        let text = curve_to_json(&curve).unwrap();
        let back = parse_curve_json(&text).unwrap();
        assert_eq!(back, curve);
        assert_eq!(back.evaluate(0.5).x, 0.0);
        assert_eq!(back.evaluate(1.0).x, 5.0);
    }
}

//! Local transform (translation, rotation, scale) of an animated object.

use serde::{Deserialize, Serialize};

use crate::math::{Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Quat,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Turn around the forward (Z) axis so local +X points at `target`.
    pub fn look_at_2d(&mut self, target: Vec3) {
        self.rotation = Quat::from_axis_angle(Vec3::FORWARD, self.heading_to(target));
    }

    /// Like [`Transform::look_at_2d`], offset by the signed angle between the
    /// forward axis and `direction`.
    pub fn look_at_2d_with_direction(&mut self, target: Vec3, direction: Vec3) {
        let sign = if Vec3::FORWARD.cross(direction).x < 0.0 {
            -1.0
        } else {
            1.0
        };
        let offset = Vec3::FORWARD.angle_deg(direction) * sign;
        self.rotation =
            Quat::from_axis_angle(Vec3::FORWARD, self.heading_to(target) + offset);
    }

    fn heading_to(&self, target: Vec3) -> f32 {
        let delta = target - self.position;
        delta.y.atan2(delta.x).to_degrees()
    }
}

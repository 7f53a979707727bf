//! World-space object transforms.

use glam::{DMat4, DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// Relative tolerance used when deciding whether a scale component is 1 or
/// whether two components are equal.
pub const SCALE_TOLERANCE: f64 = 1e-5;

/// Decomposed world transform of a scene object.
///
/// Rotation is stored as Euler angles in radians applied about the fixed X,
/// then Y, then Z axes. That is the same order Radiance's `xform -rx -ry -rz`
/// applies its arguments, so the angles can be emitted directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub location: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
}

fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: [0.0; 3],
            rotation: [0.0; 3],
            scale: unit_scale(),
        }
    }
}

impl Transform {
    pub fn from_location(location: [f64; 3]) -> Self {
        Self {
            location,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: [f64; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: [f64; 3]) -> Self {
        self.scale = scale;
        self
    }

    /// Build from a column-major world matrix (translation in the last column).
    pub fn from_matrix(columns: [[f64; 4]; 4]) -> Self {
        let matrix = DMat4::from_cols_array_2d(&columns);
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        let (z, y, x) = rotation.to_euler(EulerRot::ZYX);
        Self {
            location: translation.to_array(),
            rotation: [x, y, z],
            scale: scale.to_array(),
        }
    }

    /// Rotation as a quaternion.
    pub fn quat(&self) -> DQuat {
        let [x, y, z] = self.rotation;
        DQuat::from_euler(EulerRot::ZYX, z, y, x)
    }

    /// Full affine matrix: translate * rotate * scale.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(
            DVec3::from_array(self.scale),
            self.quat(),
            DVec3::from_array(self.location),
        )
    }

    /// Rotation angles in degrees, in `-rx -ry -rz` order.
    pub fn rotation_degrees(&self) -> [f64; 3] {
        self.rotation.map(f64::to_degrees)
    }

    /// Rotate a local direction into world space (scale is ignored).
    pub fn rotate(&self, direction: DVec3) -> DVec3 {
        self.quat() * direction
    }

    /// Check if every scale component is 1.
    pub fn has_unit_scale(&self) -> bool {
        self.scale.iter().all(|s| is_close(*s, 1.0))
    }

    /// Check if all scale components are equal.
    pub fn has_uniform_scale(&self) -> bool {
        let [sx, sy, sz] = self.scale;
        is_close(sx, sy) && is_close(sx, sz)
    }
}

/// Relative float comparison.
pub fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= SCALE_TOLERANCE * a.abs().max(b.abs())
}

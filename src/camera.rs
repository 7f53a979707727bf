//! Camera translation into Radiance view files (`.vf`).

use crate::scene::{CameraData, Projection};
use crate::types::Transform;
use glam::DVec3;
use std::fmt;

/// Apertures wider than this (degrees) switch to an angular fisheye view.
pub const FISHEYE_THRESHOLD: f64 = 160.0;

/// Far clip distances at or beyond this are treated as unbounded.
pub const UNBOUNDED_CLIP: f64 = 1_000_000.0;

/// Radiance view type (`-vt?`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    Perspective,
    Parallel,
    Cylindrical,
    AngularFisheye,
}

impl ViewType {
    pub fn flag(self) -> char {
        match self {
            Self::Perspective => 'v',
            Self::Parallel => 'l',
            Self::Cylindrical => 'c',
            Self::AngularFisheye => 'a',
        }
    }
}

/// All parameters written to a view file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub view_type: ViewType,
    pub origin: [f64; 3],
    pub direction: [f64; 3],
    pub up: [f64; 3],
    pub horizontal: f64,
    pub vertical: f64,
    pub fore_clip: f64,
    pub aft_clip: f64,
    pub shift: f64,
    pub lift: f64,
}

impl View {
    /// Derive a view from a camera and its world transform.
    ///
    /// The camera looks down its local -Z with local +Y up.
    pub fn from_camera(camera: &CameraData, transform: &Transform) -> Self {
        let mut horizontal = camera.angle_x.to_degrees();
        let mut vertical = camera.angle_y.to_degrees();

        let mut view_type = match camera.projection {
            Projection::Orthographic => ViewType::Parallel,
            Projection::Panoramic => ViewType::Cylindrical,
            Projection::Perspective => ViewType::Perspective,
        };
        if horizontal > FISHEYE_THRESHOLD || vertical > FISHEYE_THRESHOLD {
            view_type = ViewType::AngularFisheye;
            horizontal = 180.0;
            vertical = 180.0;
        }

        let (fore_clip, aft_clip) = if camera.clip_end >= UNBOUNDED_CLIP {
            (0.0, 0.0)
        } else {
            (camera.clip_start, camera.clip_end)
        };

        Self {
            view_type,
            origin: transform.location,
            direction: transform.rotate(DVec3::NEG_Z).to_array(),
            up: transform.rotate(DVec3::Y).to_array(),
            horizontal,
            vertical,
            fore_clip,
            aft_clip,
            shift: camera.shift_x,
            lift: camera.shift_y,
        }
    }
}

impl fmt::Display for View {
    /// A single `rvu` line as read by `-vf`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [px, py, pz] = self.origin;
        let [dx, dy, dz] = self.direction;
        let [ux, uy, uz] = self.up;
        writeln!(
            f,
            "rvu -vt{} -vp {} {} {} -vd {} {} {} -vu {} {} {} -vh {} -vv {} -vo {} -va {} -vs {} -vl {}",
            self.view_type.flag(),
            px,
            py,
            pz,
            round(dx),
            round(dy),
            round(dz),
            round(ux),
            round(uy),
            round(uz),
            self.horizontal,
            self.vertical,
            self.fore_clip,
            self.aft_clip,
            self.shift,
            self.lift
        )
    }
}

/// Trim rotation noise (e.g. 6.1e-17) from unit vectors.
fn round(v: f64) -> f64 {
    let r = (v * 1e9).round() / 1e9;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

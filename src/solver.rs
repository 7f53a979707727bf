//! Similarity-transform fitting between polygon vertices and texture coordinates.
//!
//! Radiance's `colorpict` pattern only accepts a 7-parameter transform
//! (three rotations, one isotropic scale, three translations). Per-loop UVs can
//! describe any affine or worse mapping, so the best we can do is the closest
//! similarity transform from the polygon's plane onto the UV plane.
//!
//! The fit works on centroid-relative points:
//! 1. estimate both normals from consecutive cross products,
//! 2. rotate the polygon normal onto the UV normal,
//! 3. rotate about the UV normal by the least-squares in-plane angle,
//! 4. scale by the mean length ratio.
//!
//! The composed forward matrix maps geometry into UV space. Radiance wants the
//! opposite direction (pattern space into geometry), so the emitted parameters
//! come from its inverse.

use glam::{DMat4, DQuat, DVec3, EulerRot};
use log::{debug, warn};
use thiserror::Error;

/// Absolute per-axis tolerance for the post-fit residual check.
pub const FIT_TOLERANCE: f64 = 0.01;

/// Vectors shorter than this are treated as zero length.
const MIN_LENGTH: f64 = 1e-9;

/// Why a polygon could not be fitted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    #[error("need at least 3 point pairs, got {0}")]
    TooFewPoints(usize),

    #[error("degenerate polygon: {0}")]
    Degenerate(&'static str),
}

/// Rotation (degrees, applied about X then Y then Z), isotropic scale and
/// translation, in the order `xform` applies them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityTransform {
    pub rotation: [f64; 3],
    pub scale: f64,
    pub translation: [f64; 3],
}

impl Default for SimilarityTransform {
    fn default() -> Self {
        Self {
            rotation: [0.0; 3],
            scale: 1.0,
            translation: [0.0; 3],
        }
    }
}

impl SimilarityTransform {
    /// Decompose a similarity matrix. Only the X scale is kept.
    pub fn from_matrix(matrix: DMat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        let (z, y, x) = rotation.to_euler(EulerRot::ZYX);
        Self {
            rotation: [x.to_degrees(), y.to_degrees(), z.to_degrees()],
            scale: scale.x,
            translation: translation.to_array(),
        }
    }

    pub fn matrix(&self) -> DMat4 {
        let [x, y, z] = self.rotation.map(f64::to_radians);
        DMat4::from_scale_rotation_translation(
            DVec3::splat(self.scale),
            DQuat::from_euler(EulerRot::ZYX, z, y, x),
            DVec3::from_array(self.translation),
        )
    }

    pub fn transform_point(&self, point: [f64; 3]) -> [f64; 3] {
        self.matrix()
            .transform_point3(DVec3::from_array(point))
            .to_array()
    }

    /// Transform arguments as they appear after a `colorpict` function name.
    pub fn xform_args(&self) -> Vec<String> {
        let [rx, ry, rz] = self.rotation;
        let [tx, ty, tz] = self.translation;
        let mut args = Vec::with_capacity(12);
        for (flag, value) in [("-rx", rx), ("-ry", ry), ("-rz", rz), ("-s", self.scale)] {
            args.push(flag.to_string());
            args.push(format!("{:.6}", value));
        }
        args.push("-t".to_string());
        args.extend([tx, ty, tz].iter().map(|v| format!("{:.6}", v)));
        args
    }
}

/// Result of fitting one polygon.
#[derive(Debug, Clone, Copy)]
pub struct TextureFit {
    /// Geometry space to UV space.
    pub forward: DMat4,
    /// Pattern transform for the `colorpict` record (inverse of `forward`).
    pub pattern: SimilarityTransform,
    /// Vertices whose forward image missed their UV by more than [`FIT_TOLERANCE`].
    pub misses: usize,
}

impl TextureFit {
    /// Map a geometry-space point into UV space (z should be near 0).
    pub fn project(&self, point: [f64; 3]) -> [f64; 3] {
        self.forward
            .transform_point3(DVec3::from_array(point))
            .to_array()
    }
}

/// Fit the closest similarity transform taking `points` onto `uvs`.
///
/// A UV list shorter than the point list is logged and both are truncated to
/// the shorter length.
pub fn solve(points: &[[f64; 3]], uvs: &[[f64; 2]]) -> Result<TextureFit, SolveError> {
    let mut n = points.len();
    if uvs.len() < n {
        warn!(
            "UV list shorter than position list ({} < {}), truncating",
            uvs.len(),
            n
        );
        n = uvs.len();
    }
    if n < 3 {
        return Err(SolveError::TooFewPoints(n));
    }

    let vertices: Vec<DVec3> = points[..n].iter().map(|p| DVec3::from_array(*p)).collect();
    let targets: Vec<DVec3> = uvs[..n].iter().map(|uv| DVec3::new(uv[0], uv[1], 0.0)).collect();

    let vertex_center = centroid(&vertices);
    let uv_center = centroid(&targets);
    let mut vertices: Vec<DVec3> = vertices.iter().map(|v| *v - vertex_center).collect();
    let targets: Vec<DVec3> = targets.iter().map(|t| *t - uv_center).collect();

    let vertex_normal = loop_normal(&vertices).ok_or(SolveError::Degenerate("polygon normal"))?;
    let uv_normal = loop_normal(&targets).ok_or(SolveError::Degenerate("UV normal"))?;

    // Tilt the polygon plane onto the UV plane.
    let tilt = DQuat::from_rotation_arc(vertex_normal, uv_normal);
    for v in &mut vertices {
        *v = tilt * *v;
    }

    // Least-squares spin about the UV normal.
    let (mut sin_sum, mut cos_sum) = (0.0, 0.0);
    for (v, t) in vertices.iter().zip(&targets) {
        sin_sum += v.cross(*t).dot(uv_normal);
        cos_sum += v.dot(*t);
    }
    let spin = DQuat::from_axis_angle(uv_normal, sin_sum.atan2(cos_sum));
    let rotation = spin * tilt;
    debug!(
        "normals {:?} -> {:?}, spin {:.4} rad",
        vertex_normal,
        uv_normal,
        sin_sum.atan2(cos_sum)
    );

    let mut ratio_sum = 0.0;
    for (v, t) in vertices.iter().zip(&targets) {
        let length = v.length();
        if length < MIN_LENGTH {
            return Err(SolveError::Degenerate("vertex at polygon centroid"));
        }
        ratio_sum += t.length() / length;
    }
    let scale = ratio_sum / n as f64;

    let forward = DMat4::from_translation(uv_center)
        * DMat4::from_scale(DVec3::splat(scale))
        * DMat4::from_quat(rotation)
        * DMat4::from_translation(-vertex_center);

    let mut misses = 0;
    for (i, (p, uv)) in points.iter().zip(uvs).take(n).enumerate() {
        let mapped = forward.transform_point3(DVec3::from_array(*p));
        let close = (mapped.x - uv[0]).abs() <= FIT_TOLERANCE
            && (mapped.y - uv[1]).abs() <= FIT_TOLERANCE
            && mapped.z.abs() <= FIT_TOLERANCE;
        if !close {
            misses += 1;
            warn!(
                "texture fit misses vertex {}: [{:.6} {:.6} {:.6}] vs uv [{:.6} {:.6}]",
                i, mapped.x, mapped.y, mapped.z, uv[0], uv[1]
            );
        }
    }

    Ok(TextureFit {
        forward,
        pattern: SimilarityTransform::from_matrix(forward.inverse()),
        misses,
    })
}

fn centroid(points: &[DVec3]) -> DVec3 {
    points.iter().copied().sum::<DVec3>() / points.len() as f64
}

/// Sum of cross products of consecutive normalized loop vectors.
fn loop_normal(points: &[DVec3]) -> Option<DVec3> {
    let mut sum = DVec3::ZERO;
    for (i, p) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        sum += unit(*p)?.cross(unit(next)?);
    }
    unit(sum)
}

fn unit(v: DVec3) -> Option<DVec3> {
    let length = v.length();
    (length >= MIN_LENGTH).then(|| v / length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    fn lift(uvs: &[[f64; 2]]) -> Vec<[f64; 3]> {
        uvs.iter().map(|uv| [uv[0], uv[1], 0.0]).collect()
    }

    fn assert_round_trip(fit: &TextureFit, points: &[[f64; 3]], uvs: &[[f64; 2]]) {
        for (p, uv) in points.iter().zip(uvs) {
            let mapped = fit.project(*p);
            assert_abs_diff_eq!(mapped[0], uv[0], epsilon = FIT_TOLERANCE);
            assert_abs_diff_eq!(mapped[1], uv[1], epsilon = FIT_TOLERANCE);
            assert_abs_diff_eq!(mapped[2], 0.0, epsilon = FIT_TOLERANCE);
        }
        assert_eq!(fit.misses, 0);
    }

    #[test]
    fn test_identity_mapping() {
        let fit = solve(&lift(&SQUARE), &SQUARE).unwrap();
        let pattern = fit.pattern;
        for i in 0..3 {
            assert_abs_diff_eq!(pattern.rotation[i], 0.0, epsilon = 1e-4);
            assert_abs_diff_eq!(pattern.translation[i], 0.0, epsilon = 1e-4);
        }
        assert_abs_diff_eq!(pattern.scale, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_identity_mapping_triangle() {
        let uvs = [[0.2, 0.1], [0.9, 0.3], [0.4, 0.8]];
        let fit = solve(&lift(&uvs), &uvs).unwrap();
        assert_abs_diff_eq!(fit.pattern.scale, 1.0, epsilon = 1e-4);
        for i in 0..3 {
            assert_abs_diff_eq!(fit.pattern.rotation[i], 0.0, epsilon = 1e-4);
            assert_abs_diff_eq!(fit.pattern.translation[i], 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_tilted_scaled_polygon() {
        // A 2x2 square standing in the xz plane, offset in space, mapped onto the unit square.
        let points = [
            [3.0, 5.0, 1.0],
            [5.0, 5.0, 1.0],
            [5.0, 5.0, 3.0],
            [3.0, 5.0, 3.0],
        ];
        let fit = solve(&points, &SQUARE).unwrap();
        assert_abs_diff_eq!(fit.pattern.scale, 2.0, epsilon = 1e-6);
        assert_round_trip(&fit, &points, &SQUARE);
    }

    #[test]
    fn test_in_plane_rotation() {
        // Square rotated 90 degrees about z relative to its UVs, scaled by 3.
        let points = [
            [0.0, 0.0, 0.0],
            [0.0, 3.0, 0.0],
            [-3.0, 3.0, 0.0],
            [-3.0, 0.0, 0.0],
        ];
        let fit = solve(&points, &SQUARE).unwrap();
        assert_round_trip(&fit, &points, &SQUARE);
        assert_abs_diff_eq!(fit.pattern.rotation[2].abs(), 90.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mirrored_winding() {
        // Geometry winds clockwise while UVs wind counter-clockwise.
        let points = [
            [0.0, 0.0, 2.0],
            [0.0, 1.0, 2.0],
            [1.0, 1.0, 2.0],
            [1.0, 0.0, 2.0],
        ];
        let fit = solve(&points, &SQUARE).unwrap();
        assert_round_trip(&fit, &points, &SQUARE);
    }

    #[test]
    fn test_pattern_is_inverse_of_forward() {
        let points = [[1.0, 2.0, 0.5], [2.0, 2.5, 0.5], [1.5, 3.5, 0.5]];
        let uvs = [[0.0, 0.0], [0.5, 0.25], [0.25, 0.75]];
        let fit = solve(&points, &uvs).unwrap();
        for p in &points {
            let back = fit.pattern.transform_point(fit.project(*p));
            for i in 0..3 {
                assert_abs_diff_eq!(back[i], p[i], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_non_similarity_mapping_reports_misses() {
        // Stretching a square into a long rectangle cannot be a similarity.
        let uvs = [[0.0, 0.0], [4.0, 0.0], [4.0, 1.0], [0.0, 1.0]];
        let fit = solve(&lift(&SQUARE), &uvs).unwrap();
        assert!(fit.misses > 0);
    }

    #[test]
    fn test_truncates_short_uv_list() {
        let points = lift(&SQUARE);
        let fit = solve(&points, &SQUARE[..3]).unwrap();
        assert_round_trip(&fit, &points[..3], &SQUARE[..3]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(
            solve(&lift(&SQUARE[..2]), &SQUARE[..2]).unwrap_err(),
            SolveError::TooFewPoints(2)
        );

        let repeated = [[1.0, 1.0, 1.0]; 3];
        assert!(matches!(
            solve(&repeated, &SQUARE[..3]),
            Err(SolveError::Degenerate(_))
        ));

        let collinear = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        assert!(matches!(
            solve(&collinear, &SQUARE[..3]),
            Err(SolveError::Degenerate(_))
        ));
    }

    #[test]
    fn test_xform_args_format() {
        let t = SimilarityTransform::default();
        assert_eq!(
            t.xform_args().join(" "),
            "-rx 0.000000 -ry 0.000000 -rz 0.000000 -s 1.000000 -t 0.000000 0.000000 0.000000"
        );
    }
}

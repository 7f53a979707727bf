//! Calculation grids: sensor points for `rtrace`.

use crate::scene::GeometryData;
use crate::types::Transform;
use glam::DVec3;
use std::fmt::Write;

/// Directory holding the `.pnt` files.
pub const GRID_DIR: &str = "grids";

/// One `x y z nx ny nz` line per vertex, placed in world space.
pub fn make_grid_points(geometry: &GeometryData, transform: &Transform) -> String {
    let matrix = transform.matrix();
    let normal_matrix = matrix.inverse().transpose();

    let mut out = String::with_capacity(geometry.vertices.len() * 64);
    for (vertex, normal) in geometry.vertices.iter().zip(geometry.vertex_normals()) {
        let p = matrix.transform_point3(DVec3::from_array(*vertex));
        let n = normal_matrix
            .transform_vector3(DVec3::from_array(normal))
            .normalize_or_zero();
        let _ = writeln!(
            out,
            "{:.6} {:.6} {:.6} {:.6} {:.6} {:.6}",
            p.x, p.y, p.z, n.x, n.y, n.z
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Polygon;

    fn quad() -> GeometryData {
        GeometryData::new(
            "Floor",
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            vec![Polygon::new(vec![0, 1, 2, 3])],
        )
    }

    #[test]
    fn test_points_in_world_space() {
        let transform = Transform::from_location([10.0, 0.0, 0.8]).with_scale([2.0, 2.0, 2.0]);
        let points = make_grid_points(&quad(), &transform);
        let lines: Vec<&str> = points.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "10.000000 0.000000 0.800000 0.000000 0.000000 1.000000");
        assert_eq!(lines[2], "12.000000 2.000000 0.800000 0.000000 0.000000 1.000000");
    }

    #[test]
    fn test_normals_follow_rotation() {
        // Half turn about X flips the floor upside down.
        let transform = Transform::default().with_rotation([std::f64::consts::PI, 0.0, 0.0]);
        let points = make_grid_points(&quad(), &transform);
        let first: Vec<f64> = points
            .lines()
            .next()
            .unwrap()
            .split(' ')
            .map(|v| v.parse().unwrap())
            .collect();
        approx::assert_abs_diff_eq!(first[5], -1.0, epsilon = 1e-9);
    }
}

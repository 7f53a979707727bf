//! Shared types used throughout the library.

mod transform;

pub use transform::{is_close, Transform, SCALE_TOLERANCE};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a [f64; 3]>) -> Option<Self> {
        let mut min = [f64::MAX; 3];
        let mut max = [f64::MIN; 3];
        let mut has_points = false;

        for p in points {
            has_points = true;
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        if has_points {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn dimensions(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Rescale a point's x and y into `[0, 1]` relative to this box.
    ///
    /// A flat axis maps to 0 rather than dividing by zero.
    pub fn normalize_xy(&self, point: &[f64; 3]) -> [f64; 2] {
        let dims = self.dimensions();
        let axis = |i: usize| {
            if dims[i].abs() > f64::EPSILON {
                (point[i] - self.min[i]) / dims[i]
            } else {
                0.0
            }
        };
        [axis(0), axis(1)]
    }
}

/// Make a name safe for Radiance identifiers and file names.
///
/// Anything other than ASCII alphanumerics, `-` and `_` becomes `_`.
pub fn clean_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let points = [[0.0, -1.0, 2.0], [2.0, 1.0, 0.0]];
        let bbox = BoundingBox::from_points(&points).unwrap();
        assert_eq!(bbox.min, [0.0, -1.0, 0.0]);
        assert_eq!(bbox.dimensions(), [2.0, 2.0, 2.0]);
        assert_eq!(bbox.normalize_xy(&[1.0, 0.0, 5.0]), [0.5, 0.5]);
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_normalize_flat_axis() {
        let bbox = BoundingBox::new([0.0, 3.0, 0.0], [4.0, 3.0, 0.0]);
        assert_eq!(bbox.normalize_xy(&[2.0, 3.0, 0.0]), [0.5, 0.0]);
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("Sphere.001"), "Sphere_001");
        assert_eq!(clean_name("my lamp-2"), "my_lamp-2");
    }
}

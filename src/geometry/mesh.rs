//! General polygon emission and quad-splitting grid emission.
//!
//! Textured polygons get a `colorpict` modifier of their own, carrying the
//! similarity transform fitted between the polygon and its texture
//! coordinates. When a polygon cannot be fitted it keeps the plain material.

use crate::record::Record;
use crate::scene::{GeometryData, ImageData, Polygon, TextureCoords};
use crate::solver::{self, SimilarityTransform};
use crate::types::BoundingBox;
use log::warn;

/// Directory the re-encoded images live in, relative to the scene root.
pub const IMAGE_DIR: &str = "images";

/// Function file providing `pic_u`/`pic_v`.
pub const PICTURE_CAL: &str = "picture.cal";

/// Image texture applied to a geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureBinding {
    /// Scene-relative path of the `.hdr` picture.
    pub picture: String,
    /// Multiplies `[u, v]` from the host's 0..1 range into Radiance's
    /// picture space.
    pub aspect: [f64; 2],
    /// Take coordinates from authored UVs when polygons have them.
    pub use_uvs: bool,
}

impl TextureBinding {
    pub fn new(image: &ImageData, coords: TextureCoords) -> Self {
        Self {
            picture: format!("{}/{}.hdr", IMAGE_DIR, image.stem()),
            aspect: aspect_scales(image.width, image.height),
            use_uvs: coords == TextureCoords::Uv,
        }
    }

    /// `colorpict` modifier wrapping `material` for one polygon.
    pub fn colorpict(&self, material: &str, identifier: &str, fit: &SimilarityTransform) -> Record {
        Record::new(material, "colorpict", identifier)
            .strings(["clip_r", "clip_g", "clip_b", self.picture.as_str(), PICTURE_CAL])
            .strings(["pic_u", "pic_v"])
            .strings(fit.xform_args())
    }
}

/// Radiance pictures span 0..1 on their short side and 0..long/short on the
/// long side.
pub fn aspect_scales(width: u32, height: u32) -> [f64; 2] {
    let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));
    if h > w {
        [1.0, h / w]
    } else {
        [w / h, 1.0]
    }
}

/// Shared state while emitting one geometry.
struct MeshEmitter<'a> {
    geometry: &'a GeometryData,
    identifier: &'a str,
    material: &'a str,
    texture: Option<&'a TextureBinding>,
    bounds: BoundingBox,
    records: Vec<Record>,
    count: usize,
}

impl<'a> MeshEmitter<'a> {
    fn new(
        geometry: &'a GeometryData,
        identifier: &'a str,
        material: &'a str,
        texture: Option<&'a TextureBinding>,
    ) -> Self {
        let bounds = BoundingBox::from_points(&geometry.vertices)
            .unwrap_or(BoundingBox::new([0.0; 3], [0.0; 3]));
        Self {
            geometry,
            identifier,
            material,
            texture,
            bounds,
            records: Vec::with_capacity(geometry.polygons.len()),
            count: 0,
        }
    }

    fn position(&self, index: usize) -> [f64; 3] {
        self.geometry.vertices[index]
    }

    /// Texture coordinate for one corner: the authored UV when available,
    /// otherwise the vertex's bounding-box position.
    fn uv(&self, polygon: &Polygon, corner: usize, use_uvs: bool) -> Option<[f64; 2]> {
        if use_uvs && polygon.has_uvs() {
            polygon.uvs.get(corner).copied()
        } else {
            let point = self.position(polygon.vertices[corner]);
            Some(self.bounds.normalize_xy(&point))
        }
    }

    /// Emit one polygon from `corners` (indices into `polygon`'s loop).
    /// With `flatten`, the texture fit sees the corners projected onto z = 0.
    fn emit(&mut self, polygon: &Polygon, corners: &[usize], flatten: bool) {
        let identifier = format!("{}.p{}", self.identifier, self.count);
        self.count += 1;

        let positions: Vec<[f64; 3]> = corners
            .iter()
            .map(|&c| self.position(polygon.vertices[c]))
            .collect();

        let mut modifier = self.material.to_string();
        if let Some(texture) = self.texture {
            if texture.use_uvs && polygon.has_uvs() && polygon.uvs.len() < polygon.loop_total() {
                warn!(
                    "{}: {} UVs for {} corners",
                    identifier,
                    polygon.uvs.len(),
                    polygon.loop_total()
                );
            }
            let uvs: Vec<[f64; 2]> = corners
                .iter()
                .map_while(|&c| self.uv(polygon, c, texture.use_uvs))
                .map(|[u, v]| [u * texture.aspect[0], v * texture.aspect[1]])
                .collect();
            let points: Vec<[f64; 3]> = if flatten {
                positions.iter().map(|p| [p[0], p[1], 0.0]).collect()
            } else {
                positions.clone()
            };

            match solver::solve(&points, &uvs) {
                Ok(fit) => {
                    let pict = format!("{}_pict", identifier);
                    self.records
                        .push(texture.colorpict(self.material, &pict, &fit.pattern));
                    modifier = pict;
                }
                Err(e) => warn!("{}: texture skipped, {}", identifier, e),
            }
        }

        self.records.push(
            Record::new(modifier, "polygon", identifier)
                .reals(positions.into_iter().flatten())
                .rows(3),
        );
    }
}

/// One polygon record per face. `geometry` must already be validated.
pub(crate) fn make_mesh(
    geometry: &GeometryData,
    identifier: &str,
    material: &str,
    texture: Option<&TextureBinding>,
) -> Vec<Record> {
    let mut emitter = MeshEmitter::new(geometry, identifier, material, texture);
    for polygon in &geometry.polygons {
        let corners: Vec<usize> = (0..polygon.loop_total()).collect();
        emitter.emit(polygon, &corners, false);
    }
    emitter.records
}

/// Split every quad into two triangles along the diagonal whose endpoints
/// differ least in height. Other faces are emitted unchanged.
///
/// Textures on grids are projected straight down: the fit sees the
/// triangles flattened onto the XY plane. `geometry` must already be validated.
pub(crate) fn make_grid(
    geometry: &GeometryData,
    identifier: &str,
    material: &str,
    texture: Option<&TextureBinding>,
) -> Vec<Record> {
    let mut emitter = MeshEmitter::new(geometry, identifier, material, texture);
    for polygon in &geometry.polygons {
        match split_quad(geometry, polygon) {
            Some([first, second]) => {
                emitter.emit(polygon, &first, true);
                emitter.emit(polygon, &second, true);
            }
            None => {
                let corners: Vec<usize> = (0..polygon.loop_total()).collect();
                emitter.emit(polygon, &corners, true);
            }
        }
    }
    emitter.records
}

/// Corner triples for the two triangles of a quad.
fn split_quad(geometry: &GeometryData, polygon: &Polygon) -> Option<[[usize; 3]; 2]> {
    if polygon.loop_total() != 4 {
        return None;
    }
    let z = |corner: usize| geometry.vertices[polygon.vertices[corner]][2];
    if (z(0) - z(2)).abs() <= (z(1) - z(3)).abs() {
        Some([[0, 1, 2], [2, 3, 0]])
    } else {
        Some([[0, 1, 3], [2, 3, 1]])
    }
}

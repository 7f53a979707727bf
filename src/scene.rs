//! Read-only scene snapshot handed to the exporter.
//!
//! The host application enumerates its scene once into these records. The
//! exporter never reaches back into a live scene graph, and never mutates the
//! snapshot.

use crate::error::{ExportError, Result};
use crate::geometry::PrimitiveKind;
use crate::types::Transform;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A complete scene snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub geometries: Vec<GeometryData>,
    #[serde(default)]
    pub materials: Vec<MaterialData>,
    #[serde(default)]
    pub images: Vec<ImageData>,
    #[serde(default)]
    pub texts: Vec<TextData>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn geometry(&self, name: &str) -> Option<&GeometryData> {
        self.geometries.iter().find(|g| g.name == name)
    }

    pub fn material(&self, name: &str) -> Option<&MaterialData> {
        self.materials.iter().find(|m| m.name == name)
    }

    pub fn image(&self, name: &str) -> Option<&ImageData> {
        self.images.iter().find(|i| i.name == name)
    }

    pub fn text(&self, name: &str) -> Option<&TextData> {
        self.texts.iter().find(|t| t.name == name)
    }

    /// Check that every polygon index is in range and every polygon has at
    /// least three loops.
    pub fn validate(&self) -> Result<()> {
        for geometry in &self.geometries {
            geometry.validate()?;
        }
        Ok(())
    }
}

/// Load a scene snapshot from a JSON file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene> {
    let json = std::fs::read_to_string(path)?;
    Scene::from_json_str(&json)
}

/// One object placed in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub selected: bool,
    /// Also export this object's vertices as a calculation grid.
    #[serde(default)]
    pub calc_grid: bool,
    pub data: ObjectData,
}

fn default_true() -> bool {
    true
}

impl SceneObject {
    pub fn new(name: impl Into<String>, data: ObjectData) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            visible: true,
            selected: false,
            calc_grid: false,
            data,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn kind(&self) -> ObjectKind {
        match self.data {
            ObjectData::Mesh { .. } => ObjectKind::Mesh,
            ObjectData::Text { .. } => ObjectKind::Font,
            ObjectData::Light(_) => ObjectKind::Light,
            ObjectData::Camera(_) => ObjectKind::Camera,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Mesh,
    Font,
    Light,
    Camera,
}

/// Kind-specific payload of a scene object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectData {
    Mesh {
        geometry: String,
        #[serde(default)]
        material: Option<String>,
    },
    Text {
        text: String,
        #[serde(default)]
        material: Option<String>,
    },
    Light(LightData),
    Camera(CameraData),
}

/// Polygon mesh data, shared between objects by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeometryData {
    pub name: String,
    pub vertices: Vec<[f64; 3]>,
    pub polygons: Vec<Polygon>,
    /// Optional per-vertex normals, used for calculation grids.
    #[serde(default)]
    pub normals: Vec<[f64; 3]>,
    /// Explicitly requested primitive family.
    #[serde(default)]
    pub primitive: Option<PrimitiveKind>,
}

impl GeometryData {
    pub fn new(name: impl Into<String>, vertices: Vec<[f64; 3]>, polygons: Vec<Polygon>) -> Self {
        Self {
            name: name.into(),
            vertices,
            polygons,
            normals: Vec::new(),
            primitive: None,
        }
    }

    pub fn with_primitive(mut self, kind: PrimitiveKind) -> Self {
        self.primitive = Some(kind);
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (i, polygon) in self.polygons.iter().enumerate() {
            if polygon.vertices.len() < 3 {
                return Err(ExportError::InvalidScene(format!(
                    "geometry '{}' polygon {} has {} vertices",
                    self.name,
                    i,
                    polygon.vertices.len()
                )));
            }
            if let Some(&bad) = polygon.vertices.iter().find(|&&v| v >= self.vertices.len()) {
                return Err(ExportError::InvalidScene(format!(
                    "geometry '{}' polygon {} references vertex {} of {}",
                    self.name,
                    i,
                    bad,
                    self.vertices.len()
                )));
            }
        }
        Ok(())
    }

    /// Per-vertex normals: the authored ones if complete, otherwise the
    /// normalized sum of the Newell normals of every polygon touching a vertex.
    pub fn vertex_normals(&self) -> Vec<[f64; 3]> {
        if self.normals.len() == self.vertices.len() {
            return self.normals.clone();
        }
        let mut sums = vec![DVec3::ZERO; self.vertices.len()];
        for polygon in &self.polygons {
            let normal = polygon.newell_normal(&self.vertices);
            for &v in &polygon.vertices {
                if let Some(sum) = sums.get_mut(v) {
                    *sum += normal;
                }
            }
        }
        sums.into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect()
    }
}

/// A single polygon: ordered vertex indices and optional per-loop UVs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<usize>,
    #[serde(default)]
    pub uvs: Vec<[f64; 2]>,
}

impl Polygon {
    pub fn new(vertices: Vec<usize>) -> Self {
        Self {
            vertices,
            uvs: Vec::new(),
        }
    }

    pub fn with_uvs(mut self, uvs: Vec<[f64; 2]>) -> Self {
        self.uvs = uvs;
        self
    }

    /// Number of loops (corners).
    pub fn loop_total(&self) -> usize {
        self.vertices.len()
    }

    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    fn newell_normal(&self, vertices: &[[f64; 3]]) -> DVec3 {
        let corners: Vec<DVec3> = self
            .vertices
            .iter()
            .filter_map(|&i| vertices.get(i))
            .map(|p| DVec3::from_array(*p))
            .collect();
        let mut normal = DVec3::ZERO;
        for (i, a) in corners.iter().enumerate() {
            let b = corners[(i + 1) % corners.len()];
            normal += DVec3::new(
                (a.y - b.y) * (a.z + b.z),
                (a.z - b.z) * (a.x + b.x),
                (a.x - b.x) * (a.y + b.y),
            );
        }
        normal.normalize_or_zero()
    }
}

/// Surface appearance parameters, with Blender-style defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialData {
    pub name: String,
    pub diffuse_color: [f64; 3],
    pub diffuse_intensity: f64,
    pub specular_color: [f64; 3],
    pub specular_intensity: f64,
    /// Specular hardness, 1..511; used as an inverse roughness proxy.
    pub specular_hardness: f64,
    pub emit: f64,
    pub use_mirror: bool,
    pub mirror_color: [f64; 3],
    pub reflect_factor: f64,
    pub use_transparency: bool,
    pub alpha: f64,
    pub texture: Option<TextureSlot>,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse_color: [0.8, 0.8, 0.8],
            diffuse_intensity: 0.8,
            specular_color: [1.0, 1.0, 1.0],
            specular_intensity: 0.5,
            specular_hardness: 50.0,
            emit: 0.0,
            use_mirror: false,
            mirror_color: [1.0, 1.0, 1.0],
            reflect_factor: 0.0,
            use_transparency: false,
            alpha: 1.0,
            texture: None,
        }
    }
}

impl MaterialData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// An image texture bound to a material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureSlot {
    /// Name of an entry in [`Scene::images`].
    pub image: String,
    #[serde(default)]
    pub coords: TextureCoords,
}

/// Where a texture takes its coordinates from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureCoords {
    /// Authored per-loop UVs.
    Uv,
    /// Generated from the geometry's bounding box.
    #[default]
    Generated,
}

/// Image metadata for a texture source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageData {
    pub name: String,
    pub path: String,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    /// File stem used for the re-encoded `images/<stem>.hdr`.
    pub fn stem(&self) -> String {
        let stem = Path::new(self.path.trim_start_matches("//"))
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name);
        crate::types::clean_name(stem)
    }
}

/// A text block from a font object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextData {
    pub name: String,
    pub body: String,
    #[serde(default = "default_text_size")]
    pub size: f64,
    #[serde(default)]
    pub shear: f64,
}

fn default_text_size() -> f64 {
    1.0
}

/// Light source parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightData {
    pub name: String,
    #[serde(default = "white")]
    pub color: [f64; 3],
    #[serde(default = "default_energy")]
    pub energy: f64,
    #[serde(flatten)]
    pub shape: LightShape,
}

fn white() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn default_energy() -> f64 {
    1.0
}

impl LightData {
    pub fn new(name: impl Into<String>, shape: LightShape) -> Self {
        Self {
            name: name.into(),
            color: white(),
            energy: default_energy(),
            shape,
        }
    }

    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_color(mut self, color: [f64; 3]) -> Self {
        self.color = color;
        self
    }
}

/// Per-kind light shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightShape {
    Point,
    #[serde(alias = "directional")]
    Sun {
        /// Request an analytic sky dome alongside the sun.
        #[serde(default)]
        sky: bool,
    },
    Spot {
        /// Full cone angle in radians.
        spot_size: f64,
    },
    Area {
        size: f64,
        /// Depth of a rectangular lamp; square when absent.
        #[serde(default)]
        size_y: Option<f64>,
    },
    #[serde(alias = "hemispherical")]
    Hemi,
}

/// Camera parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraData {
    /// Horizontal angular aperture in radians.
    pub angle_x: f64,
    /// Vertical angular aperture in radians.
    pub angle_y: f64,
    #[serde(default)]
    pub shift_x: f64,
    #[serde(default)]
    pub shift_y: f64,
    #[serde(default = "default_clip_start")]
    pub clip_start: f64,
    #[serde(default = "default_clip_end")]
    pub clip_end: f64,
    #[serde(default)]
    pub projection: Projection,
}

fn default_clip_start() -> f64 {
    0.1
}

fn default_clip_end() -> f64 {
    100.0
}

impl CameraData {
    pub fn perspective(angle_x: f64, angle_y: f64) -> Self {
        Self {
            angle_x,
            angle_y,
            shift_x: 0.0,
            shift_y: 0.0,
            clip_start: default_clip_start(),
            clip_end: default_clip_end(),
            projection: Projection::Perspective,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
    Panoramic,
}

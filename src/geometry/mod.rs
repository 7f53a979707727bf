//! Geometry translation.
//!
//! A geometry is emitted either as one of Radiance's analytic surfaces
//! (sphere, cylinder, cone, with ring end caps) reconstructed from the mesh
//! layout, or as explicit polygons.
//!
//! Which family to try comes from [`GeometryData::primitive`]. When that is
//! absent the name heuristic may be used: a case-insensitive substring match
//! on the geometry name. The heuristic trusts that the mesh is the untouched
//! output of the host's primitive generator; authors who edit such a mesh must
//! rename it, or the reconstructed surface will not match.

pub mod mesh;
pub mod primitive;
pub mod text;

pub use mesh::{aspect_scales, TextureBinding};
pub use primitive::{EndCap, Primitive};
pub use text::make_text;

use crate::record::Record;
use crate::scene::GeometryData;
use serde::{Deserialize, Serialize};

/// Requested primitive family for a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Sphere,
    Cylinder,
    Cone,
    /// Height-field grid: quads are split into triangles.
    Grid,
    /// Flat text label.
    Text,
    /// Plain polygons.
    Mesh,
}

impl PrimitiveKind {
    /// Name-keyed heuristic.
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("sphere") {
            Self::Sphere
        } else if name.contains("cylinder") {
            Self::Cylinder
        } else if name.contains("cone") {
            Self::Cone
        } else if name.contains("grid") {
            Self::Grid
        } else if name.contains("text") {
            Self::Text
        } else {
            Self::Mesh
        }
    }

    /// The explicit request if any, else the name heuristic when enabled,
    /// else a general mesh.
    pub fn resolve(geometry: &GeometryData, name_heuristics: bool) -> Self {
        match geometry.primitive {
            Some(kind) => kind,
            None if name_heuristics => Self::from_name(&geometry.name),
            None => Self::Mesh,
        }
    }
}

/// Emit the records for a mesh geometry.
///
/// `identifier` names the records (and the geometry file); `material` is the
/// modifier applied to every surface. A geometry that fails
/// [`GeometryData::validate`] is logged and emits nothing.
pub fn make_geometry(
    geometry: &GeometryData,
    kind: PrimitiveKind,
    identifier: &str,
    material: &str,
    texture: Option<&TextureBinding>,
) -> Vec<Record> {
    if let Err(e) = geometry.validate() {
        log::warn!("{}, nothing emitted", e);
        return Vec::new();
    }
    match kind {
        PrimitiveKind::Grid => mesh::make_grid(geometry, identifier, material, texture),
        PrimitiveKind::Text => {
            log::warn!(
                "geometry '{}' looks like text but carries no text body, exporting polygons",
                geometry.name
            );
            mesh::make_mesh(geometry, identifier, material, texture)
        }
        _ => match Primitive::reconstruct(geometry, kind) {
            Primitive::GeneralMesh => mesh::make_mesh(geometry, identifier, material, texture),
            analytic => analytic.records(identifier, material),
        },
    }
}

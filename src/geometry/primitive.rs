//! Analytic primitive reconstruction from generated meshes.
//!
//! These rules read the vertex and face layout the host's primitive
//! generators produce (origin-centred, axis along Z):
//!
//! - a sphere's first vertex lies on the surface in the YZ plane,
//! - a cylinder or cone has its first rim vertex at `(0, r, -depth/2)`,
//! - a triangle-fan cap puts its centre vertices first in the vertex list,
//! - an n-gon cap is one large polygon at the end of the face list.
//!
//! Nothing checks that the mesh really has that layout.

use super::PrimitiveKind;
use crate::record::Record;
use crate::scene::GeometryData;
use log::warn;

/// A rim vertex closer than this to the axis is a fan centre.
const AXIS_TOLERANCE: f64 = 1e-5;

/// How a cylinder or cone end is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCap {
    None,
    TriangleFan,
    NGon,
}

impl EndCap {
    pub fn is_capped(self) -> bool {
        self != Self::None
    }
}

/// Reconstructed surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Sphere {
        radius: f64,
    },
    Cylinder {
        radius: f64,
        depth: f64,
        cap: EndCap,
    },
    Cone {
        radius1: f64,
        /// 0 when the cone ends in a point.
        radius2: f64,
        depth: f64,
        cap: EndCap,
    },
    GeneralMesh,
}

impl Primitive {
    /// Reconstruct the requested family, or fall back to a general mesh when
    /// the family is not analytic or the mesh is too small to read.
    pub fn reconstruct(geometry: &GeometryData, kind: PrimitiveKind) -> Self {
        let primitive = match kind {
            PrimitiveKind::Sphere => sphere(geometry),
            PrimitiveKind::Cylinder => cylinder(geometry),
            PrimitiveKind::Cone => cone(geometry),
            _ => return Self::GeneralMesh,
        };
        primitive.unwrap_or_else(|| {
            warn!(
                "geometry '{}' does not have a {:?} layout, exporting polygons",
                geometry.name, kind
            );
            Self::GeneralMesh
        })
    }

    /// Analytic records, with outward-facing ring caps on capped ends.
    pub fn records(&self, identifier: &str, material: &str) -> Vec<Record> {
        match *self {
            Self::Sphere { radius } => {
                vec![Record::new(material, "sphere", identifier).reals([0.0, 0.0, 0.0, radius])]
            }
            Self::Cylinder { radius, depth, cap } => {
                let half = depth / 2.0;
                let mut records = vec![Record::new(material, "cylinder", identifier)
                    .reals([0.0, 0.0, -half, 0.0, 0.0, half, radius])];
                if cap.is_capped() {
                    records.push(ring(identifier, "_cap1", material, -half, radius));
                    records.push(ring(identifier, "_cap2", material, half, radius));
                }
                records
            }
            Self::Cone {
                radius1,
                radius2,
                depth,
                cap,
            } => {
                let half = depth / 2.0;
                let mut records = vec![Record::new(material, "cone", identifier)
                    .reals([0.0, 0.0, -half, 0.0, 0.0, half, radius1, radius2])];
                if cap.is_capped() {
                    records.push(ring(identifier, "_cap1", material, -half, radius1));
                    if radius2 > 0.0 {
                        records.push(ring(identifier, "_cap2", material, half, radius2));
                    }
                }
                records
            }
            Self::GeneralMesh => Vec::new(),
        }
    }
}

/// Flat disk at height `z` on the axis, facing away from the centre.
fn ring(identifier: &str, suffix: &str, material: &str, z: f64, radius: f64) -> Record {
    let direction = if z < 0.0 { -1.0 } else { 1.0 };
    Record::new(material, "ring", format!("{}{}", identifier, suffix))
        .reals([0.0, 0.0, z, 0.0, 0.0, direction, 0.0, radius])
}

fn sphere(geometry: &GeometryData) -> Option<Primitive> {
    let [_, y, z] = geometry.vertices.first()?;
    Some(Primitive::Sphere {
        radius: (y * y + z * z).sqrt(),
    })
}

fn cylinder(geometry: &GeometryData) -> Option<Primitive> {
    let first = geometry.polygons.first()?;
    let last = geometry.polygons.last()?;

    let cap = if first.loop_total() == 3 {
        EndCap::TriangleFan
    } else if last.loop_total() > 4 {
        EndCap::NGon
    } else {
        EndCap::None
    };

    // Skip the two fan centres.
    let rim = if cap == EndCap::TriangleFan { 2 } else { 0 };
    let [_, y, z] = geometry.vertices.get(rim)?;
    Some(Primitive::Cylinder {
        radius: *y,
        depth: -2.0 * z,
        cap,
    })
}

fn cone(geometry: &GeometryData) -> Option<Primitive> {
    let first = geometry.polygons.first()?;
    let last = geometry.polygons.last()?;
    let [_, y0, _] = geometry.vertices.first()?;

    let fan = y0.abs() < AXIS_TOLERANCE;
    let ngon = last.loop_total() > 4;
    let cap = if fan {
        EndCap::TriangleFan
    } else if ngon {
        EndCap::NGon
    } else {
        EndCap::None
    };

    // A pointed cone has triangle sides; a truncated one has quads.
    let section = ((fan || !cap.is_capped()) && last.loop_total() == 4)
        || (ngon && first.loop_total() == 4);

    let rim = match (fan, section) {
        (true, true) => 2,
        (true, false) => 1,
        (false, _) => 0,
    };
    let [_, y, z] = geometry.vertices.get(rim)?;

    let radius2 = if section {
        let top = if fan { 3 } else { 1 };
        geometry.vertices.get(top)?[1]
    } else {
        0.0
    };

    Some(Primitive::Cone {
        radius1: *y,
        radius2,
        depth: -2.0 * z,
        cap,
    })
}

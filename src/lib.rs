//! # Radiance Exporter
//!
//! A Rust library for translating a 3D scene snapshot into a Radiance
//! lighting-simulation scene directory.
//!
//! ## Overview
//!
//! The host application enumerates its scene once into a [`Scene`]: objects
//! with world transforms, shared geometries, materials, images, lights and
//! cameras. The exporter turns that snapshot into Radiance text records:
//! analytic primitives where a mesh is recognisably a sphere, cylinder or
//! cone, polygons otherwise, `colorpict` patterns for textured faces, light
//! sources with their geometry, and `rvu` view files.
//!
//! ## Quick Start
//!
//! ```ignore
//! use radiance_exporter::{export_scene, load_scene, ExportConfig};
//!
//! let scene = load_scene("scene.json")?;
//! let config = ExportConfig::default().with_energy_scale(0.5, 0);
//!
//! // Fails with ExportError::OutputExists if the directory is already there.
//! export_scene(&scene, "out/radiance", &config)?;
//! ```
//!
//! ## Building without writing
//!
//! [`SceneExport::build`] produces the full file set in memory, which is
//! handy for previews and tests:
//!
//! ```ignore
//! let export = SceneExport::build(&scene, &config);
//! println!("{}", export.file("scene.rad").unwrap().contents);
//! ```

pub mod error;
pub mod types;
pub mod scene;
pub mod solver;
pub mod record;
pub mod material;
pub mod light;
pub mod camera;
pub mod geometry;
pub mod config;
pub mod export;

// Re-export main types for convenience
pub use error::{ExportError, Result};
pub use types::{BoundingBox, Transform};
pub use scene::{
    load_scene, CameraData, GeometryData, ImageData, LightData, LightShape, MaterialData,
    ObjectData, Polygon, Projection, Scene, SceneObject, TextData, TextureCoords, TextureSlot,
};
pub use solver::{solve, SimilarityTransform, SolveError, TextureFit};
pub use record::Record;
pub use material::{make_material, MaterialClass};
pub use light::{make_light, EnergyScale, LightRecord};
pub use camera::{View, ViewType};
pub use geometry::{make_geometry, EndCap, Primitive, PrimitiveKind};
pub use config::ExportConfig;
pub use export::{export_scene, ExportSession, HdrEncoder, ImageHdrEncoder, SceneExport};

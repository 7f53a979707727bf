//! Scene export to a Radiance directory.
//!
//! Translation happens fully in memory ([`SceneExport::build`]); only then is
//! the file set written to a fresh directory ([`SceneExport::write_to`]).
//!
//! Output layout:
//! - `<camera>.vf` per camera
//! - `lights.lum` placing every light, plus `<light>.rad` per light
//! - `materials.mat`
//! - `geom/<geometry>.rad` per geometry and material, `geom/<text>.txt` for labels
//! - `scene.rad` placing every mesh and label
//! - `sky.mat`, `sky.rad` when a sky dome is wanted
//! - `images/<image>.hdr` and `picture.cal` when textures are used
//! - `grids/<object>.pnt` for calculation grids
//! - `run1`..`run4` as `.sh` and `.bat`

pub mod grid;
pub mod images;
pub mod scripts;
pub mod session;

pub use images::{HdrEncoder, ImageHdrEncoder};
pub use session::ExportSession;

use crate::config::ExportConfig;
use crate::error::{ExportError, Result};
use crate::geometry::mesh::PICTURE_CAL;
use crate::light::{SKY_MAT, SKY_RAD};
use crate::scene::Scene;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// One text file of the export, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: String,
}

/// A texture waiting to be re-encoded as a Radiance picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    /// Source path as recorded in the snapshot.
    pub source: PathBuf,
    /// Target path relative to the output directory.
    pub target: PathBuf,
}

/// The complete, not yet written output of one run.
#[derive(Debug, Clone, Default)]
pub struct SceneExport {
    pub files: Vec<OutputFile>,
    pub images: Vec<PendingImage>,
    /// A sky dome is part of the scene.
    pub sky: bool,
    /// First camera, used by the run scripts.
    pub camera: Option<String>,
}

impl SceneExport {
    /// Translate a scene snapshot.
    pub fn build(scene: &Scene, config: &ExportConfig) -> Self {
        let mut session = ExportSession::new(scene, config);
        for object in &scene.objects {
            session.add_object(object);
        }
        let mut export = session.finish();

        let mut scene_files = vec!["materials.mat", "lights.lum", "scene.rad"];
        if export.sky {
            export.push("sky.mat", SKY_MAT.to_string());
            export.push("sky.rad", SKY_RAD.to_string());
            scene_files.extend(["sky.mat", "sky.rad"]);
        }
        if !export.images.is_empty() {
            export.push(PICTURE_CAL, scripts::PICTURE_CAL_BODY.to_string());
        }
        if config.run_scripts {
            for (name, body) in scripts::run_scripts(&scene_files, export.camera.as_deref()) {
                export.push(name, body);
            }
        }
        export
    }

    fn push(&mut self, path: impl Into<PathBuf>, contents: String) {
        self.files.push(OutputFile {
            path: path.into(),
            contents,
        });
    }

    /// Look up a file by its relative path.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&OutputFile> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path == path)
    }

    /// Write everything into `dir`, which must not exist yet.
    ///
    /// Image sources are resolved against `image_root` when relative. A
    /// texture that cannot be converted is logged and left out.
    pub fn write_to(
        &self,
        dir: &Path,
        image_root: Option<&Path>,
        encoder: &dyn HdrEncoder,
    ) -> Result<()> {
        if dir.exists() {
            return Err(ExportError::OutputExists(dir.to_path_buf()));
        }
        fs::create_dir_all(dir)?;

        for file in &self.files {
            let path = dir.join(&file.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &file.contents)?;
            info!("wrote {}", path.display());
        }

        for image in &self.images {
            let source = match image_root {
                Some(root) if image.source.is_relative() => root.join(&image.source),
                _ => image.source.clone(),
            };
            if !source.exists() {
                warn!("texture source {} not found, skipped", source.display());
                continue;
            }
            let target = dir.join(&image.target);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            match encoder.encode(&source, &target) {
                Ok(()) => info!("converted {} to {}", source.display(), target.display()),
                Err(e) => warn!("could not convert {}: {}", source.display(), e),
            }
        }
        Ok(())
    }
}

/// Translate `scene` and write it into the new directory `dir`.
///
/// Fails with [`ExportError::OutputExists`] before anything is written when
/// `dir` already exists.
pub fn export_scene(scene: &Scene, dir: impl AsRef<Path>, config: &ExportConfig) -> Result<SceneExport> {
    let dir = dir.as_ref();
    if dir.exists() {
        return Err(ExportError::OutputExists(dir.to_path_buf()));
    }
    let export = SceneExport::build(scene, config);
    export.write_to(dir, config.image_root.as_deref(), &ImageHdrEncoder)?;
    Ok(export)
}

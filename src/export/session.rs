//! Per-run export state.
//!
//! An [`ExportSession`] walks the snapshot once, in object order, and
//! accumulates the text of every output file. All deduplication sets and the
//! sky flag live here and die with the session.

use super::grid::{make_grid_points, GRID_DIR};
use super::{OutputFile, PendingImage, SceneExport};
use crate::camera::View;
use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::geometry::mesh::IMAGE_DIR;
use crate::geometry::text::TEXT_DIR;
use crate::geometry::{make_geometry, make_text, PrimitiveKind, TextureBinding};
use crate::light::{make_light, EnergyScale};
use crate::material::make_material;
use crate::record::{push_records, Record};
use crate::scene::{
    CameraData, LightData, MaterialData, ObjectData, Scene, SceneObject, TextData,
};
use crate::types::{clean_name, Transform};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use std::path::PathBuf;

/// Modifier used when an object has no usable material.
pub const VOID: &str = "void";

/// Directory holding geometry files, relative to the scene root.
pub const GEOM_DIR: &str = "geom";

/// `.rad` stems the export root reserves for its own files.
const RESERVED_ROOT_STEMS: [&str; 2] = ["scene", "sky"];

/// `base`, or `base_1`, `base_2`, ... when taken; the result is marked used.
fn unique_stem(used: &mut HashSet<String>, base: &str) -> String {
    let mut stem = base.to_string();
    let mut n = 1;
    while used.contains(&stem) {
        stem = format!("{}_{}", base, n);
        n += 1;
    }
    used.insert(stem.clone());
    stem
}

/// Translation state for one export run.
pub struct ExportSession<'a> {
    scene: &'a Scene,
    config: &'a ExportConfig,
    energy: EnergyScale,

    materials: String,
    /// Rendered material record -> identifier it was written under.
    material_ids: HashMap<String, String>,
    used_material_ids: HashSet<String>,

    /// (geometry or text name, material name) -> geometry file stem.
    geometry_stems: HashMap<(String, String), String>,
    used_stems: HashSet<String>,
    invalid_geometries: HashSet<String>,

    /// Rendered light file -> stem it was written under.
    light_stems: HashMap<String, String>,
    root_stems: HashSet<String>,
    lights: String,
    placements: String,

    images: Vec<PendingImage>,
    /// Image source -> stem of its `.hdr`.
    image_stems: HashMap<PathBuf, String>,
    used_image_stems: HashSet<String>,

    files: Vec<OutputFile>,
    sky: bool,
    camera: Option<String>,
}

impl<'a> ExportSession<'a> {
    pub fn new(scene: &'a Scene, config: &'a ExportConfig) -> Self {
        Self {
            scene,
            config,
            energy: config.energy_scale(),
            materials: String::new(),
            material_ids: HashMap::new(),
            used_material_ids: HashSet::from([VOID.to_string()]),
            geometry_stems: HashMap::new(),
            used_stems: HashSet::new(),
            invalid_geometries: HashSet::new(),
            light_stems: HashMap::new(),
            root_stems: RESERVED_ROOT_STEMS.iter().map(|s| s.to_string()).collect(),
            lights: String::new(),
            placements: String::new(),
            images: Vec::new(),
            image_stems: HashMap::new(),
            used_image_stems: HashSet::new(),
            files: Vec::new(),
            sky: config.add_sky,
            camera: None,
        }
    }

    /// Whether this object takes part in the export.
    pub fn includes(&self, object: &SceneObject) -> bool {
        object.visible && (!self.config.only_selected || object.selected)
    }

    /// Translate one object, appending to the accumulated files.
    pub fn add_object(&mut self, object: &SceneObject) {
        if !self.includes(object) {
            debug!("skipping '{}'", object.name);
            return;
        }
        let scene = self.scene;
        match &object.data {
            ObjectData::Camera(camera) => self.add_camera(object, camera),
            ObjectData::Light(light) => self.add_light(object, light),
            ObjectData::Mesh { geometry, material } => {
                self.add_mesh(object, geometry, material.as_deref())
            }
            ObjectData::Text { text, material } => match scene.text(text) {
                Some(data) => self.add_text(object, data, material.as_deref()),
                None => warn!("{}, skipping '{}'", ExportError::missing("text", text), object.name),
            },
        }
    }

    fn add_camera(&mut self, object: &SceneObject, camera: &CameraData) {
        let name = clean_name(&object.name);
        let view = View::from_camera(camera, &object.transform);
        self.push_file(format!("{}.vf", name), view.to_string());
        if self.camera.is_none() {
            self.camera = Some(name);
        }
    }

    fn add_light(&mut self, object: &SceneObject, light: &LightData) {
        let translated = make_light(light, self.energy, self.config.lamp_radius);
        if translated.wants_sky {
            self.sky = true;
        }

        // Lights share a file only when they translate identically.
        let rendered = translated.to_rad();
        let stem = match self.light_stems.get(&rendered) {
            Some(stem) => stem.clone(),
            None => {
                let stem = unique_stem(&mut self.root_stems, &translated.name);
                let contents = if stem == translated.name {
                    rendered.clone()
                } else {
                    let renamed = LightData {
                        name: stem.clone(),
                        ..light.clone()
                    };
                    make_light(&renamed, self.energy, self.config.lamp_radius).to_rad()
                };
                self.push_file(format!("{}.rad", stem), contents);
                self.light_stems.insert(rendered, stem.clone());
                stem
            }
        };

        let [rx, ry, rz] = object.transform.rotation_degrees();
        let [x, y, z] = object.transform.location;
        let _ = writeln!(
            self.lights,
            "!xform -rx {} -ry {} -rz {} -t {} {} {} {}.rad",
            rx, ry, rz, x, y, z, stem
        );
    }

    /// Resolve an object's material, writing it to `materials.mat` on first use.
    /// Returns the modifier name and the material data when present.
    fn use_material(&mut self, object: &str, name: Option<&str>) -> (String, Option<&'a MaterialData>) {
        let Some(name) = name else {
            return (VOID.to_string(), None);
        };
        let scene = self.scene;
        let Some(material) = scene.material(name) else {
            warn!("{}, '{}' uses void", ExportError::missing("material", name), object);
            return (VOID.to_string(), None);
        };

        let mut record = make_material(material);
        let rendered = record.to_string();
        if let Some(identifier) = self.material_ids.get(&rendered) {
            return (identifier.clone(), Some(material));
        }

        let identifier = unique_stem(&mut self.used_material_ids, &record.identifier);
        record.identifier = identifier.clone();
        push_records(&mut self.materials, &[record]);
        self.material_ids.insert(rendered, identifier.clone());
        (identifier, Some(material))
    }

    /// Texture binding for a material, queueing its image for re-encoding.
    fn use_texture(&mut self, material: Option<&MaterialData>) -> Option<TextureBinding> {
        let slot = material?.texture.as_ref()?;
        let scene = self.scene;
        let Some(image) = scene.image(&slot.image) else {
            warn!("{}, texture skipped", ExportError::missing("image", slot.image.as_str()));
            return None;
        };

        let source = PathBuf::from(image.path.trim_start_matches("//"));
        let stem = match self.image_stems.get(&source) {
            Some(stem) => stem.clone(),
            None => {
                let stem = unique_stem(&mut self.used_image_stems, &image.stem());
                self.images.push(PendingImage {
                    source: source.clone(),
                    target: PathBuf::from(IMAGE_DIR).join(format!("{}.hdr", stem)),
                });
                self.image_stems.insert(source, stem.clone());
                stem
            }
        };

        let mut binding = TextureBinding::new(image, slot.coords);
        binding.picture = format!("{}/{}.hdr", IMAGE_DIR, stem);
        Some(binding)
    }

    /// File stem for a (shape, material) pair and whether it is new.
    fn geometry_stem(&mut self, shape: &str, material: &str) -> (String, bool) {
        let key = (shape.to_string(), material.to_string());
        if let Some(stem) = self.geometry_stems.get(&key) {
            return (stem.clone(), false);
        }

        let base = if self.geometry_stems.keys().any(|(s, _)| s == shape) {
            format!("{}.{}", clean_name(shape), clean_name(material))
        } else {
            clean_name(shape)
        };
        let stem = unique_stem(&mut self.used_stems, &base);
        self.geometry_stems.insert(key, stem.clone());
        (stem, true)
    }

    fn add_mesh(&mut self, object: &SceneObject, geometry_name: &str, material: Option<&str>) {
        let scene = self.scene;
        let Some(geometry) = scene.geometry(geometry_name) else {
            warn!(
                "{}, skipping '{}'",
                ExportError::missing("geometry", geometry_name),
                object.name
            );
            return;
        };
        if self.invalid_geometries.contains(geometry_name) {
            return;
        }
        if let Err(e) = geometry.validate() {
            warn!("{}, skipping '{}'", e, object.name);
            self.invalid_geometries.insert(geometry_name.to_string());
            return;
        }

        let (modifier, material) = self.use_material(&object.name, material);
        let texture = self.use_texture(material);

        let (stem, fresh) = self.geometry_stem(geometry_name, &modifier);
        if fresh {
            let kind = PrimitiveKind::resolve(geometry, self.config.name_heuristics);
            debug!("geometry '{}' emitted as {:?}", geometry_name, kind);
            let records = make_geometry(geometry, kind, &stem, &modifier, texture.as_ref());
            self.push_geometry(&stem, &records);
        }
        self.place(object, &stem);

        if object.calc_grid && self.config.calculation_grids {
            self.push_file(
                format!("{}/{}.pnt", GRID_DIR, clean_name(&object.name)),
                make_grid_points(geometry, &object.transform),
            );
        }
    }

    fn add_text(&mut self, object: &SceneObject, text: &TextData, material: Option<&str>) {
        let (modifier, _) = self.use_material(&object.name, material);
        let (stem, fresh) = self.geometry_stem(&text.name, &modifier);
        if fresh {
            let records = make_text(text, &stem, &modifier, &self.config.font);
            self.push_geometry(&stem, &records);
            self.push_file(format!("{}/{}.txt", TEXT_DIR, stem), format!("{}\n", text.body));
        }
        self.place(object, &stem);
    }

    fn push_geometry(&mut self, stem: &str, records: &[Record]) {
        let mut body = String::new();
        push_records(&mut body, records);
        self.push_file(format!("{}/{}.rad", GEOM_DIR, stem), body);
    }

    /// Append the `scene.rad` placement line for an object.
    fn place(&mut self, object: &SceneObject, stem: &str) {
        let transform: &Transform = &object.transform;
        let _ = write!(self.placements, "!xform -n {}_ ", clean_name(&object.name));
        if !transform.has_unit_scale() {
            if !transform.has_uniform_scale() {
                warn!(
                    "object '{}' has non-uniform scale {:?}, using x scale only",
                    object.name, transform.scale
                );
            }
            let _ = write!(self.placements, "-s {} ", transform.scale[0]);
        }
        let [rx, ry, rz] = transform.rotation_degrees();
        let [x, y, z] = transform.location;
        let _ = writeln!(
            self.placements,
            "-rx {} -ry {} -rz {} -t {} {} {} {}/{}.rad",
            rx, ry, rz, x, y, z, GEOM_DIR, stem
        );
    }

    fn push_file(&mut self, path: impl Into<PathBuf>, contents: String) {
        let path = path.into();
        if self.files.iter().any(|f| f.path == path) {
            warn!("{} written twice, keeping the first", path.display());
            return;
        }
        self.files.push(OutputFile { path, contents });
    }

    /// Close the run: the aggregate files follow the per-object ones.
    pub fn finish(mut self) -> SceneExport {
        let materials = std::mem::take(&mut self.materials);
        let lights = std::mem::take(&mut self.lights);
        let placements = std::mem::take(&mut self.placements);
        self.push_file("materials.mat", materials);
        self.push_file("lights.lum", lights);
        self.push_file("scene.rad", placements);
        SceneExport {
            files: self.files,
            images: self.images,
            sky: self.sky,
            camera: self.camera,
        }
    }
}

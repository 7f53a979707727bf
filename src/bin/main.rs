//! Radiance Exporter CLI
//!
//! Convert a JSON scene snapshot into a Radiance scene directory.

use clap::{Parser, Subcommand};
use log::info;
use radiance_exporter::{
    export_scene, load_scene, ExportConfig, ObjectData, Primitive, PrimitiveKind, Scene,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "radiance-exporter")]
#[command(author, version, about = "Export 3D scene snapshots to Radiance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene snapshot to a new Radiance directory
    Export {
        /// Input JSON scene snapshot
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory (must not exist)
        #[arg(short, long)]
        output: PathBuf,

        /// JSON export configuration; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Light energy mantissa
        #[arg(long)]
        mantissa: Option<f64>,

        /// Light energy power of ten
        #[arg(long, allow_hyphen_values = true)]
        power: Option<i32>,

        /// Export only selected objects
        #[arg(long)]
        only_selected: bool,

        /// Always add a sky dome
        #[arg(long)]
        sky: bool,

        /// Do not classify geometries by name
        #[arg(long)]
        no_name_heuristics: bool,
    },

    /// Show how each object of a scene snapshot would be exported
    Inspect {
        /// Input JSON scene snapshot
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            config,
            mantissa,
            power,
            only_selected,
            sky,
            no_name_heuristics,
        } => {
            let mut config = match config {
                Some(path) => ExportConfig::load(path)?,
                None => ExportConfig::default(),
            };
            if mantissa.is_some() || power.is_some() {
                let mantissa = mantissa.unwrap_or(config.energy_mantissa);
                let power = power.unwrap_or(config.energy_power);
                config = config.with_energy_scale(mantissa, power);
            }
            if only_selected {
                config = config.only_selected(true);
            }
            if sky {
                config = config.with_sky(true);
            }
            if no_name_heuristics {
                config.name_heuristics = false;
            }
            if config.image_root.is_none() {
                config = config.with_image_root(scene_dir(&input));
            }
            export(&input, &output, &config)?;
        }
        Commands::Inspect { input } => {
            inspect(&input)?;
        }
    }

    Ok(())
}

fn scene_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn export(input: &Path, output: &Path, config: &ExportConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading scene from {:?}...", input);
    let scene = load_scene(input)?;
    println!(
        "  Found {} objects, {} geometries, {} materials",
        scene.objects.len(),
        scene.geometries.len(),
        scene.materials.len()
    );

    let export = export_scene(&scene, output, config)?;
    info!("energy scale {}", config.energy_scale().factor());

    println!("Exported {} files to {:?}", export.files.len(), output);
    if !export.images.is_empty() {
        println!("  Textures: {}", export.images.len());
    }
    if export.sky {
        println!("  Sky dome added");
    }
    match &export.camera {
        Some(camera) => println!("  View: {}.vf", camera),
        None => println!("  No camera; run scripts expect Camera.vf"),
    }

    Ok(())
}

fn inspect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let scene: Scene = load_scene(input)?;

    println!("Scene {:?}:", input);
    for object in &scene.objects {
        match &object.data {
            ObjectData::Mesh { geometry, material } => {
                let kind = scene
                    .geometry(geometry)
                    .map(|g| describe(&Primitive::reconstruct(g, PrimitiveKind::resolve(g, true))))
                    .unwrap_or_else(|| "missing geometry".to_string());
                println!(
                    "  {} mesh '{}' [{}] material {}",
                    object.name,
                    geometry,
                    kind,
                    material.as_deref().unwrap_or("void")
                );
            }
            ObjectData::Text { text, .. } => println!("  {} text '{}'", object.name, text),
            ObjectData::Light(light) => println!("  {} light {:?}", object.name, light.shape),
            ObjectData::Camera(camera) => {
                println!("  {} camera {:?}", object.name, camera.projection)
            }
        }
    }

    Ok(())
}

fn describe(primitive: &Primitive) -> String {
    match primitive {
        Primitive::Sphere { radius } => format!("sphere r={}", radius),
        Primitive::Cylinder { radius, depth, cap } => {
            format!("cylinder r={} h={} cap={:?}", radius, depth, cap)
        }
        Primitive::Cone {
            radius1,
            radius2,
            depth,
            cap,
        } => format!("cone r1={} r2={} h={} cap={:?}", radius1, radius2, depth, cap),
        Primitive::GeneralMesh => "polygons".to_string(),
    }
}

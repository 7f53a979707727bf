//! End-to-end exports into temporary directories.

use image::{ImageBuffer, Rgb};
use radiance_exporter::{
    export_scene, ExportConfig, ExportError, Scene, SceneExport,
};
use std::fs;
use std::path::Path;

const POINT_LIGHT_SCENE: &str = r#"{
    "objects": [
        {"name": "Lamp", "transform": {"location": [0, 0, 5]},
         "data": {"kind": "light", "name": "Lamp", "type": "point", "energy": 1000}},
        {"name": "Floor",
         "data": {"kind": "mesh", "geometry": "Plane", "material": "Grey"}},
        {"name": "Ball", "transform": {"location": [0, 0, 1], "scale": [0.5, 0.5, 0.5]},
         "data": {"kind": "mesh", "geometry": "Sphere", "material": "Grey"}},
        {"name": "Camera", "transform": {"location": [0, -10, 2], "rotation": [1.5707963267948966, 0, 0]},
         "data": {"kind": "camera", "angle_x": 0.8575, "angle_y": 0.5}}
    ],
    "geometries": [
        {"name": "Plane",
         "vertices": [[-5, -5, 0], [5, -5, 0], [5, 5, 0], [-5, 5, 0]],
         "polygons": [{"vertices": [0, 1, 2, 3]}]},
        {"name": "Sphere", "primitive": "sphere",
         "vertices": [[0, 0, 1], [0, 1, 0], [1, 0, 0]],
         "polygons": [{"vertices": [0, 1, 2]}]}
    ],
    "materials": [{"name": "Grey", "diffuse_color": [0.5, 0.5, 0.5], "diffuse_intensity": 1.0}]
}"#;

fn read(dir: &Path, file: &str) -> String {
    fs::read_to_string(dir.join(file)).unwrap_or_else(|e| panic!("{}: {}", file, e))
}

#[test]
fn test_point_light_scene() {
    let scene = Scene::from_json_str(POINT_LIGHT_SCENE).unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("rad");

    export_scene(&scene, &out, &ExportConfig::default()).unwrap();

    let lamp = read(&out, "Lamp.rad");
    assert!(lamp.contains("void light Lamp.light\n0\n0\n3 500.000000 500.000000 500.000000\n"));
    assert!(lamp.contains("Lamp.light sphere Lamp\n0\n0\n4 0.000000 0.000000 0.000000 0.330000\n"));
    assert_eq!(read(&out, "lights.lum"), "!xform -rx 0 -ry 0 -rz 0 -t 0 0 5 Lamp.rad\n");

    let sphere = read(&out, "geom/Sphere.rad");
    assert!(sphere.starts_with("Grey sphere Sphere\n0\n0\n4 0.000000 0.000000 0.000000 1.000000\n"));

    let placements = read(&out, "scene.rad");
    assert!(placements.contains("!xform -n Ball_ -s 0.5 -rx 0 -ry 0 -rz 0 -t 0 0 1 geom/Sphere.rad\n"));
    assert!(placements.contains("geom/Plane.rad"));

    let view = read(&out, "Camera.vf");
    assert!(view.starts_with("rvu -vtv -vp 0 -10 2 -vd 0 1 0 -vu 0 0 1 "));

    assert_eq!(read(&out, "run2.sh"), "rvu -vf Camera.vf scene.oct\n");
    assert_eq!(
        read(&out, "run1.bat"),
        "oconv materials.mat lights.lum scene.rad > scene.oct\npause\n"
    );
    assert!(!out.join("sky.mat").exists());
}

#[test]
fn test_existing_directory_is_refused() {
    let scene = Scene::from_json_str(POINT_LIGHT_SCENE).unwrap();
    let tmp = tempfile::tempdir().unwrap();

    let result = export_scene(&scene, tmp.path(), &ExportConfig::default());
    assert!(matches!(result, Err(ExportError::OutputExists(_))));
    assert!(!tmp.path().join("scene.rad").exists());
}

#[test]
fn test_exports_are_identical() {
    let scene = Scene::from_json_str(POINT_LIGHT_SCENE).unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let first = tmp.path().join("a");
    let second = tmp.path().join("b");

    let export = export_scene(&scene, &first, &ExportConfig::default()).unwrap();
    export_scene(&scene, &second, &ExportConfig::default()).unwrap();

    for file in &export.files {
        assert_eq!(
            fs::read(first.join(&file.path)).unwrap(),
            fs::read(second.join(&file.path)).unwrap(),
            "{} differs",
            file.path.display()
        );
    }
}

#[test]
fn test_textured_plane() {
    let tmp = tempfile::tempdir().unwrap();
    let textures = tmp.path().join("textures");
    fs::create_dir_all(&textures).unwrap();
    let png: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(8, 4, |x, _| Rgb([(x * 32) as u8, 128, 64]));
    png.save(textures.join("bricks.png")).unwrap();

    let json = r#"{
        "objects": [{"name": "Wall", "data": {"kind": "mesh", "geometry": "Plane", "material": "Brick"}}],
        "geometries": [{"name": "Plane",
            "vertices": [[0, 0, 0], [2, 0, 0], [2, 1, 0], [0, 1, 0]],
            "polygons": [{"vertices": [0, 1, 2, 3], "uvs": [[0, 0], [1, 0], [1, 1], [0, 1]]}]}],
        "materials": [{"name": "Brick", "texture": {"image": "bricks", "coords": "uv"}}],
        "images": [{"name": "bricks", "path": "//textures/bricks.png", "width": 8, "height": 4}]
    }"#;
    let scene = Scene::from_json_str(json).unwrap();
    let out = tmp.path().join("rad");
    let config = ExportConfig::default().with_image_root(tmp.path());

    export_scene(&scene, &out, &config).unwrap();

    let hdr = fs::read(out.join("images/bricks.hdr")).unwrap();
    assert!(hdr.starts_with(b"#?RADIANCE"));
    assert!(out.join("picture.cal").exists());

    let geometry = read(&out, "geom/Plane.rad");
    assert!(geometry.starts_with("Brick colorpict Plane.p0_pict\n19 clip_r clip_g clip_b images/bricks.hdr picture.cal pic_u pic_v"));
    assert!(geometry.contains("Plane.p0_pict polygon Plane.p0\n"));
}

#[test]
fn test_missing_texture_is_skipped() {
    let json = r#"{
        "objects": [{"name": "Wall", "data": {"kind": "mesh", "geometry": "Plane", "material": "Brick"}}],
        "geometries": [{"name": "Plane",
            "vertices": [[0, 0, 0], [1, 0, 0], [1, 1, 0], [0, 1, 0]],
            "polygons": [{"vertices": [0, 1, 2, 3]}]}],
        "materials": [{"name": "Brick", "texture": {"image": "gone"}}],
        "images": [{"name": "gone", "path": "nowhere/gone.png", "width": 4, "height": 4}]
    }"#;
    let scene = Scene::from_json_str(json).unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("rad");

    let export = export_scene(&scene, &out, &ExportConfig::default().with_image_root(tmp.path())).unwrap();
    assert_eq!(export.images.len(), 1);
    assert!(!out.join("images/gone.hdr").exists());
    assert!(out.join("scene.rad").exists());
}

#[test]
fn test_sun_with_sky() {
    let json = r#"{
        "objects": [
            {"name": "Sun", "transform": {"rotation": [0.5, 0, 0]},
             "data": {"kind": "light", "name": "Sun", "type": "sun", "sky": true}}
        ]
    }"#;
    let scene = Scene::from_json_str(json).unwrap();
    let export = SceneExport::build(&scene, &ExportConfig::default());

    assert!(export.sky);
    assert!(export.file("Sun.rad").unwrap().contents.contains("solar source sun"));
    assert!(export.file("sky.rad").unwrap().contents.contains("skyglow source sky"));
    assert_eq!(
        export.file("run1.sh").unwrap().contents,
        "oconv materials.mat lights.lum scene.rad sky.mat sky.rad > scene.oct\n"
    );
}

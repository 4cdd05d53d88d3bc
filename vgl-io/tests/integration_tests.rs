//! Integration tests for vgl-io
//!
//! These tests drive the public loading API end to end against fixture files
//! written into temporary directories.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vgl_core::Vec3f;
use vgl_io::*;

/// Write a fixture file, creating parent directories
fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, contents).unwrap();
    path
}

/// A textured quad referencing a material library in a subdirectory
fn quad_fixture(dir: &Path) -> PathBuf {
    write(
        dir,
        "sub/mat.mtl",
        "# library\nnewmtl wood\nKa 0.1\nKd 0.6 0.4 0.2\nKs 0 0 0\nNs 12\nd 1\nmap_Kd wood.png\n",
    );
    write(
        dir,
        "model.obj",
        "# quad\nmtllib sub/mat.mtl\n\
         v -1 -1 0\nv 1 -1 0\nv 1 1 0\nv -1 1 0\n\
         vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
         vn 0 0 1\n\
         usemtl wood\n\
         f 1/1/1 2/2/1 3/3/1 4/4/1\n",
    )
}

#[test]
fn test_mtllib_resolves_relative_to_obj_directory() {
    let dir = TempDir::new().unwrap();
    let obj = quad_fixture(dir.path());

    let mut log = EventLog::new();
    load_model(&mut log, &obj).unwrap();

    assert_eq!(log.count(&ParseEvent::BeginMaterial("wood".into())), 1);
    let textures: Vec<_> = log.with_tag(AttributeTag::DiffuseColor).collect();
    assert!(textures.contains(&&ParseEvent::Texture(
        AttributeTag::DiffuseColor,
        dir.path().join("sub").join("wood.png")
    )));
}

#[test]
fn test_relative_model_path_resolves_from_its_own_directory() {
    let dir = TempDir::new().unwrap();
    quad_fixture(&dir.path().join("nested"));

    // The only test in this binary that changes the working directory.
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let mut log = EventLog::new();
    let result = load_model(&mut log, Path::new("nested/model.obj"));
    std::env::set_current_dir(previous).unwrap();

    result.unwrap();
    assert_eq!(log.events()[0], ParseEvent::BeginModel(PathBuf::from("nested/model.obj")));
    assert!(log.events().contains(&ParseEvent::Texture(
        AttributeTag::DiffuseColor,
        Path::new("nested").join("sub").join("wood.png")
    )));
}

#[test]
fn test_reparse_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let obj = quad_fixture(dir.path());

    let mut first = EventLog::new();
    let mut second = EventLog::new();
    load_model(&mut first, &obj).unwrap();
    load_model(&mut second, &obj).unwrap();

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_material_events_precede_geometry() {
    let dir = TempDir::new().unwrap();
    let obj = quad_fixture(dir.path());

    let mut log = EventLog::new();
    load_model(&mut log, &obj).unwrap();
    let events = log.events();

    assert_eq!(events[0], ParseEvent::BeginModel(obj.clone()));
    assert_eq!(events[1], ParseEvent::BeginMaterial("wood".into()));
    assert_eq!(
        events[2],
        ParseEvent::Vec3(AttributeTag::AmbientColor, Vec3f::repeat(0.1))
    );
    let end_material = events
        .iter()
        .position(|e| *e == ParseEvent::EndMaterial)
        .unwrap();
    let first_coord = events
        .iter()
        .position(|e| e.tag() == Some(AttributeTag::Coord))
        .unwrap();
    assert!(end_material < first_coord);
    assert_eq!(events.last(), Some(&ParseEvent::EndModel));
}

#[test]
fn test_model_builder_end_to_end() {
    let dir = TempDir::new().unwrap();
    let obj = quad_fixture(dir.path());

    let model = Model::load(&obj).unwrap();
    assert_eq!(model.coords.len(), 4);
    assert_eq!(model.texcoords.len(), 4);
    assert_eq!(model.normals.len(), 1);
    assert_eq!(model.faces.len(), 1);
    assert_eq!(model.faces[0].vertices.len(), 4);
    assert_eq!(model.faces[0].material, Some(0));
    assert_eq!(model.triangle_count(), 2);

    let wood = &model.materials[0];
    assert_eq!(wood.name, "wood");
    assert_eq!(wood.ambient, Vec3f::repeat(0.1));
    assert_eq!(wood.diffuse, Vec3f::new(0.6, 0.4, 0.2));
    assert_eq!(wood.specular_exponent, 12.0);
    assert_eq!(
        wood.diffuse_map.as_deref(),
        Some(dir.path().join("sub/wood.png").as_path())
    );

    let bounds = model.bounds();
    assert_eq!(bounds.center(), Vec3f::zeros());
    assert_eq!(bounds.size(), Vec3f::new(2.0, 2.0, 0.0));
}

#[test]
fn test_failure_mid_file_has_no_end_model() {
    let dir = TempDir::new().unwrap();
    let obj = write(dir.path(), "bad.obj", "v 0 0 0\nv 1 1\n");

    let mut log = EventLog::new();
    let err = load_model(&mut log, &obj).unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::ExpectedWhitespace);
    assert!(err.to_string().starts_with(&format!("[{}: line 2, col", obj.display())));
    assert!(matches!(log.events().first(), Some(ParseEvent::BeginModel(_))));
    assert_ne!(log.events().last(), Some(&ParseEvent::EndModel));
}

#[test]
fn test_ply_and_obj_share_vocabulary() {
    let dir = TempDir::new().unwrap();
    let ply = write(
        dir.path(),
        "tri.PLY",
        "ply\nformat ascii 1.0\nelement vertex 3\n\
         property float x\nproperty float y\nproperty float z\n\
         element face 1\nproperty list uchar int vertex_indices\nend_header\n\
         0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n",
    );
    let obj = write(dir.path(), "tri.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");

    let mut from_ply = EventLog::new();
    let mut from_obj = EventLog::new();
    load_model(&mut from_ply, &ply).unwrap();
    load_model(&mut from_obj, &obj).unwrap();

    assert_eq!(from_ply.events()[1..], from_obj.events()[1..]);
}

#[test]
fn test_texture_cache_shared_between_loads() {
    let dir = TempDir::new().unwrap();
    let obj = quad_fixture(dir.path());
    image::RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]))
        .save_with_format(dir.path().join("sub/wood.png"), image::ImageFormat::Png)
        .unwrap();

    let mut cache = TextureCache::new();
    let mut loader = ModelLoader::new().with_texture_cache(&mut cache);
    let first = Model::load_with(&mut loader, &obj).unwrap();
    let second = Model::load_with(&mut loader, &obj).unwrap();
    drop(loader);

    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
    let texture = cache.get(&dir.path().join("sub/wood.png")).unwrap();
    assert_eq!(texture.format(), PixelFormat::Rgb);
}

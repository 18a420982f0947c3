use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mirror_core::{load_obj, MeshResource, ObjError, ObjLoader};
use nalgebra::{Vector2, Vector3};

const TEXTURED_QUAD: &str = "\
# quad in the xy plane
v -1 -1 0
v  1 -1 0
v  1  1 0
v -1  1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
o quad
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

fn write_obj(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_textured_quad_from_file() {
    let file = write_obj(TEXTURED_QUAD);
    let load = load_obj(file.path()).unwrap();

    assert_eq!(load.mesh.vertex_count(), 6);
    assert_eq!(load.report.triangle_count, 2);
    assert!(!load.report.normals_synthesized);
    assert_eq!(load.report.skipped.len(), 1);
    assert_eq!(load.report.skipped[0].line, 11);

    let third = load.mesh.vertices[2];
    assert_eq!(third.uv, Vector2::new(1.0, 1.0));
    assert_eq!(third.normal, Vector3::new(0.0, 0.0, 1.0));

    // every three vertices make one triangle
    assert_eq!(load.mesh.triangles().count(), 2);
    assert_eq!(load.mesh.to_flat_f32().len(), 6 * 8);
}

#[test]
fn test_missing_file_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_obj(&dir.path().join("nope.obj"));
    assert!(matches!(result, Err(ObjError::SourceUnavailable { .. })));
}

#[test]
fn test_crlf_line_endings() {
    let file = write_obj("v 0 0 0\r\nv 1 0 0\r\nv 0 1 0\r\nf 1 2 3\r\n");
    let load = load_obj(file.path()).unwrap();
    assert_eq!(load.mesh.vertex_count(), 3);
    assert!(load.report.normals_synthesized);
}

#[test]
fn test_streaming_reader_matches_path_load() {
    let file = write_obj(TEXTURED_QUAD);
    let from_path = load_obj(file.path()).unwrap();
    let from_reader = ObjLoader::new()
        .load_reader(std::io::BufReader::new(TEXTURED_QUAD.as_bytes()))
        .unwrap();
    assert_eq!(from_path.mesh, from_reader.mesh);
}

#[test]
fn test_cancel_flag_checked_per_line() {
    let flag = Arc::new(AtomicBool::new(false));
    let loader = ObjLoader::new().with_cancel_flag(flag.clone());
    assert!(loader.load_str(TEXTURED_QUAD).is_ok());

    flag.store(true, Ordering::Relaxed);
    assert!(matches!(
        loader.load_str(TEXTURED_QUAD),
        Err(ObjError::Cancelled { line: 1 })
    ));
}

#[test]
fn test_failed_reload_keeps_previous_mesh() {
    let file = write_obj(TEXTURED_QUAD);
    let mut resource = MeshResource::empty();
    resource.load(file.path()).unwrap();
    assert_eq!(resource.mesh().vertex_count(), 6);

    std::fs::write(file.path(), "v 0 0 0\nf 1 2 3\n").unwrap();
    assert!(matches!(
        resource.reload(),
        Err(ObjError::InvalidIndex { .. })
    ));
    assert_eq!(resource.mesh().vertex_count(), 6);
    assert_eq!(resource.path(), Some(file.path()));
}

#[test]
fn test_reload_picks_up_changes() {
    let file = write_obj(TEXTURED_QUAD);
    let mut resource = MeshResource::empty();
    resource.load(file.path()).unwrap();

    std::fs::write(file.path(), "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
    let report = resource.reload().unwrap().unwrap();
    assert!(report.normals_synthesized);
    assert_eq!(resource.mesh().vertex_count(), 3);
}

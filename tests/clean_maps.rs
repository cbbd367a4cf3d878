// tests/clean_maps.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use styledag::config::ConfigFile;
use styledag::errors::StyledagError;
use styledag::fs::mock::{FsOp, MockFileSystem};
use styledag::tasks::CleanMaps;
use styledag_test_utils::builders::ConfigFileBuilder;

fn seeded() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("a.scss", ".a {}");
    fs.add_file("a.css", ".a {}");
    fs.add_file("a.css.map", "{}");
    fs.add_file("badexample/b.css.map", "{}");
    fs.add_file("deep/er/c.map", "{}");
    fs.add_file("notes.mapping", "keep me");
    fs
}

fn cleaner(config: &ConfigFile, fs: &MockFileSystem) -> CleanMaps {
    CleanMaps::new(config.clean(), Path::new("."), Arc::new(fs.clone())).unwrap()
}

#[test]
fn removes_maps_at_every_depth() {
    let fs = seeded();

    let mut deleted = cleaner(&ConfigFile::default(), &fs).clean().unwrap();
    deleted.sort();

    assert_eq!(
        deleted,
        vec![
            PathBuf::from("./a.css.map"),
            PathBuf::from("./badexample/b.css.map"),
            PathBuf::from("./deep/er/c.map"),
        ]
    );
    assert_eq!(
        fs.file_paths(),
        vec![
            PathBuf::from("./a.css"),
            PathBuf::from("./a.scss"),
            PathBuf::from("./notes.mapping"),
        ]
    );
}

#[test]
fn second_run_deletes_nothing() {
    let fs = seeded();
    let clean = cleaner(&ConfigFile::default(), &fs);

    clean.clean().unwrap();
    let again = clean.clean().unwrap();

    assert!(again.is_empty());
}

#[test]
fn nothing_to_delete_is_not_an_error() {
    let fs = MockFileSystem::new();
    fs.add_file("a.scss", ".a {}");

    let deleted = cleaner(&ConfigFile::default(), &fs).clean().unwrap();

    assert!(deleted.is_empty());
    assert!(!fs.ops().iter().any(|op| matches!(op, FsOp::Remove(_))));
}

#[test]
fn maps_under_node_modules_are_left_alone() {
    let fs = seeded();
    fs.add_file("node_modules/pkg/dist.css.map", "{}");

    cleaner(&ConfigFile::default(), &fs).clean().unwrap();

    assert!(fs.contents("node_modules/pkg/dist.css.map").is_some());
}

#[test]
fn force_removes_read_only_files() {
    let fs = seeded();
    fs.set_readonly("a.css.map");

    cleaner(&ConfigFile::default(), &fs).clean().unwrap();

    assert!(fs.contents("a.css.map").is_none());
    let ops = fs.ops();
    let writable = ops
        .iter()
        .position(|op| *op == FsOp::SetWritable(PathBuf::from("./a.css.map")))
        .unwrap();
    let removed = ops
        .iter()
        .position(|op| *op == FsOp::Remove(PathBuf::from("./a.css.map")))
        .unwrap();
    assert!(writable < removed);
}

#[test]
fn read_only_file_without_force_is_a_cleanup_error() {
    let fs = seeded();
    fs.set_readonly("a.css.map");

    let config = ConfigFileBuilder::new().force_clean(false).build();
    let err = cleaner(&config, &fs).clean().unwrap_err();

    match err {
        StyledagError::Cleanup { path, .. } => assert_eq!(path, PathBuf::from("./a.css.map")),
        other => panic!("expected Cleanup error, got {other:?}"),
    }
    assert!(fs.contents("a.css.map").is_some());
}

#[test]
fn real_read_only_files_are_forced_away() {
    use styledag::fs::RealFileSystem;

    let dir = tempfile::TempDir::new().unwrap();
    let map = dir.path().join("a.css.map");
    std::fs::write(&map, "{}").unwrap();
    let mut perms = std::fs::metadata(&map).unwrap().permissions();
    perms.set_readonly(true);
    std::fs::set_permissions(&map, perms).unwrap();

    let clean = CleanMaps::new(
        ConfigFile::default().clean(),
        dir.path(),
        Arc::new(RealFileSystem),
    )
    .unwrap();
    let deleted = clean.clean().unwrap();

    assert_eq!(deleted, vec![map.clone()]);
    assert!(!map.exists());
}

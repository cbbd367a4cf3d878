// tests/patterns.rs

use std::path::{Path, PathBuf};

use styledag::fs::mock::MockFileSystem;
use styledag::fs::RealFileSystem;
use styledag::watch::path_utils::relative_str;
use styledag::watch::{collect_matching_files, WatchProfile};

fn profile(include: &[&str], exclude: &[&str]) -> WatchProfile {
    let include: Vec<String> = include.iter().map(|s| s.to_string()).collect();
    let exclude: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();
    WatchProfile::new(&include, &exclude).unwrap()
}

#[test]
fn single_star_stays_in_one_directory() {
    let p = profile(&["*.scss"], &[]);
    assert!(p.matches("a.scss"));
    assert!(!p.matches("badexample/b.scss"));

    let p = profile(&["badexample/*.scss"], &[]);
    assert!(p.matches("badexample/b.scss"));
    assert!(!p.matches("badexample/deeper/c.scss"));
}

#[test]
fn double_star_crosses_directories() {
    let p = profile(&["**/*.scss"], &[]);
    assert!(p.matches("a.scss"));
    assert!(p.matches("badexample/b.scss"));
    assert!(p.matches("x/y/z/c.scss"));
    assert!(!p.matches("a.css"));
}

#[test]
fn excludes_win_over_includes() {
    let p = profile(&["**/*.scss"], &["vendor/**"]);
    assert!(p.matches("a.scss"));
    assert!(!p.matches("vendor/lib/x.scss"));
}

#[test]
fn invalid_glob_is_rejected() {
    let include = vec!["a[.scss".to_string()];
    assert!(WatchProfile::new(&include, &[]).is_err());
}

#[test]
fn collect_walks_the_tree_and_skips_tool_directories() {
    let fs = MockFileSystem::new();
    fs.add_file("a.scss", "");
    fs.add_file("_variables.scss", "");
    fs.add_file("badexample/b.scss", "");
    fs.add_file("badexample/b.css", "");
    fs.add_file("node_modules/pkg/x.scss", "");
    fs.add_file(".git/hooks/y.scss", "");

    let files = collect_matching_files(&fs, Path::new("."), &profile(&["**/*.scss"], &[])).unwrap();

    assert_eq!(
        files,
        vec![
            PathBuf::from("./_variables.scss"),
            PathBuf::from("./a.scss"),
            PathBuf::from("./badexample/b.scss"),
        ]
    );
}

#[cfg(unix)]
#[test]
fn directory_symlinks_are_not_followed() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    std::fs::write(root.join("a.scss"), "").unwrap();
    std::fs::create_dir(root.join("sub")).unwrap();
    std::fs::write(root.join("sub/b.scss"), "").unwrap();
    // Points back at the root: following it would never end.
    std::os::unix::fs::symlink(root, root.join("sub/loop")).unwrap();

    let files =
        collect_matching_files(&RealFileSystem, root, &profile(&["**/*.scss"], &[])).unwrap();

    assert_eq!(files, vec![root.join("a.scss"), root.join("sub/b.scss")]);
}

#[test]
fn relative_str_strips_the_root() {
    let root = Path::new("/project");
    assert_eq!(
        relative_str(root, Path::new("/project/badexample/b.scss")).as_deref(),
        Some("badexample/b.scss")
    );
}

#[test]
fn relative_str_handles_removed_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    std::fs::create_dir_all(root.join("sub")).unwrap();

    // Not created: simulates a file that was deleted before the event arrived.
    let gone = dir.path().join("sub").join("gone.scss");
    let rel = relative_str(&root, &gone);

    assert_eq!(rel.as_deref(), Some("sub/gone.scss"));
}

#[test]
fn relative_str_rejects_paths_outside_the_root() {
    let dir = tempfile::TempDir::new().unwrap();
    let other = tempfile::TempDir::new().unwrap();
    let outside = other.path().join("x.scss");
    std::fs::write(&outside, "").unwrap();

    assert_eq!(relative_str(dir.path(), &outside), None);
}

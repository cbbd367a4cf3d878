// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // List of child names
}

/// One recorded filesystem operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOp {
    Read(PathBuf),
    Write(PathBuf),
    ReadDir(PathBuf),
    Remove(PathBuf),
    SetWritable(PathBuf),
}

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, MockEntry>,
    readonly: HashSet<PathBuf>,
    ops: Vec<FsOp>,
}

/// In-memory filesystem rooted at `.`.
///
/// Relative paths are normalised to start with `./`, so `a.scss` and
/// `./a.scss` name the same entry. Setup helpers (`add_file`,
/// `set_readonly`) are not recorded in the operation log; trait calls are.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut state = MockState::default();
        // Ensure root exists
        state
            .files
            .insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        insert_file(&mut state.files, &normalize(path.as_ref()), content.into());
    }

    /// Mark a file read-only; `remove_file` fails until `set_writable`.
    pub fn set_readonly(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.readonly.insert(normalize(path.as_ref()));
    }

    /// Snapshot of every operation performed through the trait so far.
    pub fn ops(&self) -> Vec<FsOp> {
        self.state.lock().unwrap().ops.clone()
    }

    /// Contents of a file, without recording a read.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let state = self.state.lock().unwrap();
        match state.files.get(&normalize(path.as_ref())) {
            Some(MockEntry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    /// All file paths currently present, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let state = self.state.lock().unwrap();
        let mut paths: Vec<PathBuf> = state
            .files
            .iter()
            .filter(|(_, e)| matches!(e, MockEntry::File(_)))
            .map(|(p, _)| p.clone())
            .collect();
        paths.sort();
        paths
    }
}

fn normalize(path: &Path) -> PathBuf {
    if path.is_absolute() || path == Path::new(".") {
        return path.to_path_buf();
    }
    match path.components().next() {
        Some(Component::CurDir) => path.to_path_buf(),
        _ => Path::new(".").join(path),
    }
}

fn parent_of(path: &Path) -> Option<&Path> {
    path.parent()
        .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
        .filter(|p| *p != path)
}

fn insert_file(files: &mut HashMap<PathBuf, MockEntry>, path: &Path, content: Vec<u8>) {
    files.insert(path.to_path_buf(), MockEntry::File(content));
    if let Some(parent) = parent_of(path) {
        ensure_dir_entry(files, parent);
        link_child(files, parent, path);
    }
}

fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if files.contains_key(path) {
        return;
    }
    files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    if let Some(parent) = parent_of(path) {
        ensure_dir_entry(files, parent);
        link_child(files, parent, path);
    }
}

fn link_child(files: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
    if let (Some(MockEntry::Dir(children)), Some(name)) = (
        files.get_mut(parent),
        child.file_name().and_then(|n| n.to_str()),
    ) {
        if !children.iter().any(|c| c == name) {
            children.push(name.to_string());
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = normalize(path);
        let mut state = self.state.lock().unwrap();
        state.ops.push(FsOp::Read(path.clone()));
        match state.files.get(&path) {
            Some(MockEntry::File(content)) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let path = normalize(path);
        let mut state = self.state.lock().unwrap();
        state.ops.push(FsOp::Write(path.clone()));
        if state.readonly.contains(&path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        insert_file(&mut state.files, &path, contents.to_vec());
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        matches!(state.files.get(&normalize(path)), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        matches!(state.files.get(&normalize(path)), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, _path: &Path) -> bool {
        // The mock has no links.
        false
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let path = normalize(path);
        let mut state = self.state.lock().unwrap();
        state.ops.push(FsOp::ReadDir(path.clone()));
        match state.files.get(&path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let path = normalize(path);
        let mut state = self.state.lock().unwrap();
        state.ops.push(FsOp::Remove(path.clone()));
        if state.readonly.contains(&path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        match state.files.get(&path) {
            Some(MockEntry::File(_)) => {}
            Some(MockEntry::Dir(_)) => return Err(anyhow!("Is a directory: {:?}", path)),
            None => return Err(anyhow!("File not found: {:?}", path)),
        }
        state.files.remove(&path);
        if let (Some(parent), Some(name)) = (
            parent_of(&path),
            path.file_name().and_then(|n| n.to_str()),
        ) {
            if let Some(MockEntry::Dir(children)) = state.files.get_mut(parent) {
                children.retain(|c| c != name);
            }
        }
        Ok(())
    }

    fn set_writable(&self, path: &Path) -> Result<()> {
        let path = normalize(path);
        let mut state = self.state.lock().unwrap();
        state.ops.push(FsOp::SetWritable(path.clone()));
        if !state.files.contains_key(&path) {
            return Err(anyhow!("File not found: {:?}", path));
        }
        state.readonly.remove(&path);
        Ok(())
    }
}

//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use buildstamp_core::{
    application::{ApplicationError, ports::Filesystem},
    error::BuildstampResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep a handle while a service owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    failing: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write to `path` fail.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing.insert(path.into());
        }
    }

    /// A file's content, if present.
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// All files, sorted by path.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn lock_error(path: &Path) -> ApplicationError {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: "memory filesystem lock poisoned".into(),
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> BuildstampResult<()> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_error(path))?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> BuildstampResult<()> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_error(path))?;

        if inner.failing.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "write rejected".into(),
            }
            .into());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> BuildstampResult<String> {
        let inner = self.inner.read().map_err(|_| Self::lock_error(path))?;
        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_file(&self, path: &Path) -> BuildstampResult<()> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_error(path))?;
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| {
                ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "No such file".into(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("out/a.h"), "").is_err());

        fs.create_dir_all(Path::new("out")).unwrap();
        fs.write_file(Path::new("out/a.h"), "x").unwrap();
        assert_eq!(fs.read_file(Path::new("out/a.h")).as_deref(), Some("x"));
        assert!(fs.exists(Path::new("out")));
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new();
        let handle = fs.clone();
        fs.write_file(Path::new("VERSION"), "1.0\n").unwrap();

        assert_eq!(handle.list_files(), vec![PathBuf::from("VERSION")]);
    }

    #[test]
    fn failing_path_rejects_writes() {
        let fs = MemoryFilesystem::new();
        fs.fail_writes_to("b.c");

        assert!(fs.write_file(Path::new("a.h"), "").is_ok());
        assert!(fs.write_file(Path::new("b.c"), "").is_err());
    }

    #[test]
    fn remove_missing_file_fails() {
        let fs = MemoryFilesystem::new();
        assert!(fs.remove_file(Path::new("nope")).is_err());
    }
}

use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Write-once blob store keyed by random UUIDs.
///
/// Every blob lives at `<dir>/<uuid>.<extension>`. Ids coming back from
/// clients are parsed as UUIDs before any path is built from them, so a
/// request can never address a file outside `dir`.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
    extension: &'static str,
}

impl Store {
    /// Open (creating if needed) the store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>, extension: &'static str) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, extension })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store `bytes` under a fresh id and return the id.
    pub fn put(&self, bytes: &[u8]) -> io::Result<String> {
        self.put_with(|file| file.write_all(bytes))
    }

    /// Create a fresh blob and let `fill` write it. A blob whose write fails
    /// is removed, so a partial file is never served.
    fn put_with(&self, fill: impl FnOnce(&mut File) -> io::Result<()>) -> io::Result<String> {
        let (id, path, mut file) = self.create_unique()?;
        if let Err(e) = fill(&mut file).and_then(|()| file.sync_all()) {
            drop(file);
            if let Err(remove) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %remove, "failed to remove partial blob");
            }
            return Err(e);
        }
        tracing::debug!(path = %path.display(), "stored blob");
        Ok(id.to_string())
    }

    fn create_unique(&self) -> io::Result<(Uuid, PathBuf, File)> {
        // create_new never overwrites; draw a new id on collision
        for _ in 0..3 {
            let id = Uuid::new_v4();
            let path = self.file_path(&id);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((id, path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }
        Err(io::Error::new(
            ErrorKind::AlreadyExists,
            "could not allocate a unique id",
        ))
    }

    /// Path of an existing blob, or `None` when `id` is not a UUID or
    /// nothing is stored under it.
    pub fn existing_path(&self, id: &str) -> Option<PathBuf> {
        let id = Uuid::parse_str(id).ok()?;
        let path = self.file_path(&id);
        path.is_file().then_some(path)
    }

    /// Read a blob. `Ok(None)` when the id is invalid or unknown.
    pub fn get(&self, id: &str) -> io::Result<Option<Vec<u8>>> {
        let Some(path) = self.existing_path(id) else {
            return Ok(None);
        };
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn file_path(&self, id: &Uuid) -> PathBuf {
        self.dir.join(format!("{}.{}", id.hyphenated(), self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("summaries"), "txt").unwrap();

        let id = store.put(b"Fever resolved.").unwrap();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(store.get(&id).unwrap().unwrap(), b"Fever resolved.");
        assert!(dir.path().join("summaries").join(format!("{id}.txt")).is_file());
    }

    #[test]
    fn test_ids_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path(), "pdf").unwrap();
        let a = store.put(b"one").unwrap();
        let b = store.put(b"two").unwrap();
        assert_ne!(a, b);
        assert_eq!(store.get(&a).unwrap().unwrap(), b"one");
    }

    #[test]
    fn test_unknown_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path(), "txt").unwrap();
        let id = Uuid::new_v4().to_string();
        assert!(store.get(&id).unwrap().is_none());
        assert!(store.existing_path(&id).is_none());
    }

    #[test]
    fn test_failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path(), "pdf").unwrap();

        let err = store
            .put_with(|file| {
                file.write_all(b"%PDF-1.7 trunc")?;
                Err(io::Error::new(ErrorKind::WriteZero, "disk full"))
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteZero);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_non_uuid_ids_never_touch_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("inner"), "txt").unwrap();
        std::fs::write(dir.path().join("secret.txt"), "nope").unwrap();

        assert!(store.get("../secret").unwrap().is_none());
        assert!(store.existing_path("../secret").is_none());
        assert!(store.get("").unwrap().is_none());
    }
}

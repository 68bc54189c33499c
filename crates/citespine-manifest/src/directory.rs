//! One JSON file per manifest under a directory.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use citespine_core::errors::{CiteError, CiteResult, ManifestError};
use citespine_core::models::Manifest;
use citespine_core::traits::IManifestStore;

/// File-backed manifest log. Each manifest is written to a temporary file in
/// the same directory and then linked into place without clobbering, so a
/// reader never observes a half-written record and an existing id is never
/// replaced.
#[derive(Debug, Clone)]
pub struct DirectoryManifestStore {
    dir: PathBuf,
}

impl DirectoryManifestStore {
    /// Open (creating if needed) the store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> CiteResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            CiteError::ConfigError(format!("manifest directory {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> CiteResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ManifestError::WriteFailed {
                id: id.to_string(),
                reason: "manifest ids may only contain ASCII letters, digits, '-' and '_'".into(),
            }
            .into());
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    fn read(&self, path: &Path, id: &str) -> CiteResult<Option<Manifest>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ManifestError::Corrupt {
                    id: id.to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
        };
        serde_json::from_str(&content).map(Some).map_err(|e| {
            ManifestError::Corrupt {
                id: id.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl IManifestStore for DirectoryManifestStore {
    fn append(&self, manifest: &Manifest) -> CiteResult<()> {
        let path = self.path_for(&manifest.id)?;
        let write_failed = |reason: String| -> CiteError {
            ManifestError::WriteFailed {
                id: manifest.id.clone(),
                reason,
            }
            .into()
        };

        let body = serde_json::to_vec_pretty(manifest)?;
        let mut staged = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| write_failed(e.to_string()))?;
        staged.write_all(&body).map_err(|e| write_failed(e.to_string()))?;
        staged.as_file().sync_all().map_err(|e| write_failed(e.to_string()))?;

        match staged.persist_noclobber(&path) {
            Ok(_) => {
                tracing::debug!(manifest_id = %manifest.id, path = %path.display(), "manifest file written");
                Ok(())
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Err(ManifestError::DuplicateId {
                id: manifest.id.clone(),
            }
            .into()),
            Err(e) => Err(write_failed(e.error.to_string())),
        }
    }

    fn get(&self, id: &str) -> CiteResult<Option<Manifest>> {
        // An id that could never have been written is simply absent.
        match self.path_for(id) {
            Ok(path) => self.read(&path, id),
            Err(_) => Ok(None),
        }
    }

    fn list_ids(&self) -> CiteResult<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            CiteError::ConfigError(format!("manifest directory {}: {e}", self.dir.display()))
        })?;

        let mut manifests = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            if let Some(manifest) = self.read(&path, &id)? {
                manifests.push((manifest.created_at, id));
            }
        }
        manifests.sort();
        Ok(manifests.into_iter().map(|(_, id)| id).collect())
    }
}

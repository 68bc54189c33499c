//! Copy-on-write holder for the current version table. Readers take an
//! `Arc` snapshot; ingestion swaps in a rebuilt table.

use std::sync::{Arc, RwLock};

use citespine_core::errors::CiteResult;
use citespine_core::models::DocumentVersion;

use crate::VersionResolver;

#[derive(Debug, Default)]
pub struct VersionRegistry {
    versions: RwLock<Vec<DocumentVersion>>,
    current: RwLock<Arc<VersionResolver>>,
}

impl VersionRegistry {
    pub fn new(versions: Vec<DocumentVersion>) -> CiteResult<Self> {
        let resolver = VersionResolver::new(versions.clone())?;
        Ok(Self {
            versions: RwLock::new(versions),
            current: RwLock::new(Arc::new(resolver)),
        })
    }

    /// The table in force right now. Cheap; never blocks on ingestion for long.
    pub fn snapshot(&self) -> Arc<VersionResolver> {
        let guard = self.current.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&guard)
    }

    /// Validate `version` against its family without publishing it. Returns
    /// whether registering it would change the table.
    pub fn check(&self, version: &DocumentVersion) -> CiteResult<bool> {
        let versions = self.versions.read().unwrap_or_else(|p| p.into_inner());
        match Self::with_version(&versions, version.clone()) {
            Some(next) => VersionResolver::new(next).map(|_| true).map_err(Into::into),
            None => Ok(false),
        }
    }

    /// Add or refresh a version and publish a rebuilt table. An identical
    /// registration leaves the table untouched.
    pub fn register(&self, version: DocumentVersion) -> CiteResult<bool> {
        let mut versions = self.versions.write().unwrap_or_else(|p| p.into_inner());
        let Some(next) = Self::with_version(&versions, version) else {
            return Ok(false);
        };

        let resolver = VersionResolver::new(next.clone())?;
        *versions = next;
        let mut current = self.current.write().unwrap_or_else(|p| p.into_inner());
        *current = Arc::new(resolver);
        Ok(true)
    }

    /// The table with `version` added or replaced, or None if it is already
    /// present unchanged.
    fn with_version(versions: &[DocumentVersion], version: DocumentVersion) -> Option<Vec<DocumentVersion>> {
        let mut next = versions.to_vec();
        match next.iter_mut().find(|v| v.version_id == version.version_id) {
            Some(existing) if *existing == version => return None,
            Some(existing) => *existing = version,
            None => next.push(version),
        }
        Some(next)
    }

    pub fn len(&self) -> usize {
        self.snapshot().version_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! # Snapshot Cache
//!
//! Optional local persistence of the snapshot under a fixed namespace
//! key, so a reload can show the last known state before the remote fetch
//! completes.
//!
//! This is a convenience cache, NOT a source of truth: it may be stale or
//! absent, and a corrupt cache file is treated as absent. The remote
//! fetch in `Store::initialize` always replaces whatever was restored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use caixa_core::AppState;

/// Fixed namespace key for the local snapshot slot.
pub const CACHE_NAMESPACE: &str = "caixa-storage";

/// A local key-value slot holding one serialized snapshot.
pub trait SnapshotCache: Send + Sync {
    /// Returns the cached snapshot, or None when absent or unreadable.
    fn load(&self) -> Option<AppState>;

    /// Persists the snapshot, replacing any previous value.
    fn save(&self, state: &AppState) -> io::Result<()>;
}

/// File-backed cache: one JSON file named after [`CACHE_NAMESPACE`]
/// inside a caller-chosen directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        FileCache {
            path: dir.as_ref().join(format!("{}.json", CACHE_NAMESPACE)),
        }
    }

    /// The file the snapshot is stored in.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotCache for FileCache {
    fn load(&self) -> Option<AppState> {
        let bytes = fs::read(&self.path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(state) => Some(state),
            Err(err) => {
                // Stale format or partial write: behave as if absent.
                debug!(path = %self.path.display(), error = %err, "ignoring unreadable snapshot cache");
                None
            }
        }
    }

    fn save(&self, state: &AppState) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec(state)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        fs::write(&self.path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caixa_core::{AppState, Product};
    use chrono::Utc;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());

        assert!(cache.load().is_none());

        let mut state = AppState::default();
        state.products.push(Product {
            id: "p1".to_string(),
            user_id: None,
            name: "Coxinha".to_string(),
            description: String::new(),
            price_cents: 550,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });

        cache.save(&state).unwrap();

        let restored = cache.load().unwrap();
        assert_eq!(restored.products.len(), 1);
        assert_eq!(restored.products[0].price_cents, 550);
        assert_eq!(restored.payment_methods, state.payment_methods);
    }

    #[test]
    fn test_corrupt_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        fs::write(cache.path(), b"{not json").unwrap();

        assert!(cache.load().is_none());
    }
}

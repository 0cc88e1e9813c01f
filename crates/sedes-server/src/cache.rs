//! Shared, wholesale-replaced facility snapshot.

use std::sync::Arc;

use sedes_opendata::{FacilityLoader, FacilitySnapshot, SourceError};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct FacilityCache {
    inner: Arc<RwLock<Arc<FacilitySnapshot>>>,
}

impl FacilityCache {
    pub fn new(snapshot: FacilitySnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// Loads the first snapshot. When both sources fail the cache starts
    /// empty and marked unavailable, and the scheduled refresh fills it later.
    pub async fn load(loader: &FacilityLoader) -> Self {
        match loader.load().await {
            Ok(snapshot) => Self::new(snapshot),
            Err(e) => {
                tracing::error!(error = %e, "facility sources unavailable at startup");
                Self::new(FacilitySnapshot::unavailable())
            }
        }
    }

    /// The snapshot current at call time. Readers never observe a partially
    /// refreshed collection.
    pub async fn current(&self) -> Arc<FacilitySnapshot> {
        Arc::clone(&*self.inner.read().await)
    }

    pub async fn replace(&self, snapshot: FacilitySnapshot) {
        *self.inner.write().await = Arc::new(snapshot);
    }

    /// Loads a new snapshot and swaps it in. On failure the previous
    /// snapshot stays in place.
    ///
    /// # Errors
    ///
    /// Returns the loader's [`SourceError::Unavailable`].
    pub async fn refresh(&self, loader: &FacilityLoader) -> Result<usize, SourceError> {
        let snapshot = loader.load().await?;
        let count = snapshot.facilities.len();
        self.replace(snapshot).await;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use sedes_opendata::SnapshotOrigin;

    use super::*;

    fn unreachable_loader() -> FacilityLoader {
        FacilityLoader::new(
            "http://127.0.0.1:9/datastore_search",
            std::env::temp_dir().join("sedes-server-cache-test-missing.json"),
            1,
        )
        .expect("loader")
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let cache = FacilityCache::new(FacilitySnapshot::new(Vec::new(), SnapshotOrigin::Live));
        let before = cache.current().await;

        assert!(cache.refresh(&unreachable_loader()).await.is_err());
        assert!(Arc::ptr_eq(&before, &cache.current().await));
    }

    #[tokio::test]
    async fn startup_without_sources_serves_an_unavailable_snapshot() {
        let cache = FacilityCache::load(&unreachable_loader()).await;

        let snapshot = cache.current().await;
        assert_eq!(snapshot.origin, SnapshotOrigin::Unavailable);
        assert!(snapshot.facilities.is_empty());
    }
}

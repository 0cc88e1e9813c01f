//! Facility collection loading: live CKAN datastore first, static file second.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use sedes_core::{AppConfig, Facility};
use serde::Serialize;

use crate::error::SourceError;
use crate::normalize::parse_facilities;

const DEFAULT_USER_AGENT: &str = "sedes/0.1 (facility-finder)";

/// Where a snapshot's facilities came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotOrigin {
    Live,
    Fallback,
    /// Neither source could be read; the collection is empty until a
    /// refresh succeeds.
    Unavailable,
}

/// An immutable facility collection as of `fetched_at`.
#[derive(Debug, Clone, Serialize)]
pub struct FacilitySnapshot {
    pub facilities: Vec<Facility>,
    pub origin: SnapshotOrigin,
    pub fetched_at: DateTime<Utc>,
}

impl FacilitySnapshot {
    #[must_use]
    pub fn new(facilities: Vec<Facility>, origin: SnapshotOrigin) -> Self {
        Self {
            facilities,
            origin,
            fetched_at: Utc::now(),
        }
    }

    /// Empty placeholder used when both sources failed.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(Vec::new(), SnapshotOrigin::Unavailable)
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.origin != SnapshotOrigin::Unavailable
    }

    /// Number of facilities with a usable coordinate.
    #[must_use]
    pub fn located_count(&self) -> usize {
        self.facilities
            .iter()
            .filter(|f| f.location().is_some())
            .count()
    }
}

/// Loads the facility collection from the open data portal, falling back to
/// a local JSON file when the portal cannot be reached or answers badly.
#[derive(Debug, Clone)]
pub struct FacilityLoader {
    client: Client,
    source_url: Url,
    fallback_path: PathBuf,
}

impl FacilityLoader {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built, or
    /// [`SourceError::InvalidBaseUrl`] if `source_url` does not parse.
    pub fn new(
        source_url: &str,
        fallback_path: impl Into<PathBuf>,
        timeout_secs: u64,
    ) -> Result<Self, SourceError> {
        Self::build(source_url, fallback_path.into(), timeout_secs, DEFAULT_USER_AGENT)
    }

    /// # Errors
    ///
    /// Same as [`FacilityLoader::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Self::build(
            &config.facility_source_url,
            config.facility_fallback_path.clone(),
            config.facility_timeout_secs,
            &config.user_agent,
        )
    }

    fn build(
        source_url: &str,
        fallback_path: PathBuf,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let source_url = Url::parse(source_url)
            .map_err(|e| SourceError::InvalidBaseUrl(format!("'{source_url}': {e}")))?;

        Ok(Self {
            client,
            source_url,
            fallback_path,
        })
    }

    #[must_use]
    pub fn fallback_path(&self) -> &Path {
        &self.fallback_path
    }

    /// Loads a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unavailable`] only when both the live source and
    /// the fallback file fail.
    pub async fn load(&self) -> Result<FacilitySnapshot, SourceError> {
        let live_error = match self.fetch_live().await {
            Ok(facilities) => {
                tracing::info!(count = facilities.len(), "loaded facilities from live source");
                return Ok(FacilitySnapshot::new(facilities, SnapshotOrigin::Live));
            }
            Err(e) => {
                tracing::warn!(
                    url = %self.source_url,
                    error = %e,
                    "live facility source failed, using fallback file"
                );
                e
            }
        };

        match self.read_fallback().await {
            Ok(facilities) => {
                tracing::info!(
                    count = facilities.len(),
                    path = %self.fallback_path.display(),
                    "loaded facilities from fallback file"
                );
                Ok(FacilitySnapshot::new(facilities, SnapshotOrigin::Fallback))
            }
            Err(fallback_error) => Err(SourceError::Unavailable {
                live: live_error.to_string(),
                fallback: fallback_error.to_string(),
            }),
        }
    }

    /// Fetches and normalizes the live dataset.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] on network failure.
    /// - [`SourceError::UnexpectedStatus`] on a non-2xx status.
    /// - [`SourceError::Api`] / [`SourceError::Deserialize`] on a bad payload.
    pub async fn fetch_live(&self) -> Result<Vec<Facility>, SourceError> {
        let response = self.client.get(self.source_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                context: "datastore_search".to_string(),
            });
        }
        let body = response.text().await?;
        let payload = serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
            context: "datastore_search".to_string(),
            source: e,
        })?;
        parse_facilities(payload, "datastore_search")
    }

    /// Reads and normalizes the fallback file.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Io`] if the file cannot be read.
    /// - [`SourceError::Deserialize`] / [`SourceError::Api`] on a bad payload.
    pub async fn read_fallback(&self) -> Result<Vec<Facility>, SourceError> {
        let context = self.fallback_path.display().to_string();
        let body = tokio::fs::read_to_string(&self.fallback_path)
            .await
            .map_err(|e| SourceError::Io {
                path: self.fallback_path.clone(),
                source: e,
            })?;
        let payload = serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
            context: context.clone(),
            source: e,
        })?;
        parse_facilities(payload, &context)
    }
}

use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub user_agent: String,
    /// Mapbox access token shared by the directions and geocoding clients.
    /// Without it both collaborators report themselves unavailable.
    pub mapbox_token: Option<String>,
    pub mapbox_base_url: String,
    pub facility_source_url: String,
    pub facility_fallback_path: PathBuf,
    pub facility_timeout_secs: u64,
    pub facility_refresh_cron: String,
    pub directions_timeout_secs: u64,
    pub geocode_bbox: String,
    pub geocode_country: String,
    pub geocode_language: String,
    pub geocode_limit: u32,
    pub nearest_count: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field(
                "mapbox_token",
                &self.mapbox_token.as_ref().map(|_| "[redacted]"),
            )
            .field("mapbox_base_url", &self.mapbox_base_url)
            .field("facility_source_url", &self.facility_source_url)
            .field("facility_fallback_path", &self.facility_fallback_path)
            .field("facility_timeout_secs", &self.facility_timeout_secs)
            .field("facility_refresh_cron", &self.facility_refresh_cron)
            .field("directions_timeout_secs", &self.directions_timeout_secs)
            .field("geocode_bbox", &self.geocode_bbox)
            .field("geocode_country", &self.geocode_country)
            .field("geocode_language", &self.geocode_language)
            .field("geocode_limit", &self.geocode_limit)
            .field("nearest_count", &self.nearest_count)
            .finish()
    }
}

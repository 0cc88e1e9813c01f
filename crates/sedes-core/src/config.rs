use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// CKAN `datastore_search` endpoint for the published facility dataset.
pub const DEFAULT_FACILITY_SOURCE_URL: &str =
    "https://datos.cdmx.gob.mx/api/3/action/datastore_search?resource_id=e040c46f-8f49-4190-89d1-c08679ca2218&limit=200";

/// Mexico City bounding box, `min_lng,min_lat,max_lng,max_lat`.
pub const DEFAULT_GEOCODE_BBOX: &str = "-99.365,19.05,-98.94,19.59";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SEDES_ENV", "development"))?;

    let bind_addr = parse("SEDES_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SEDES_LOG_LEVEL", "info");
    let user_agent = or_default("SEDES_USER_AGENT", "sedes/0.1 (facility-finder)");

    let mapbox_token = lookup("MAPBOX_TOKEN")
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let mapbox_base_url = or_default("SEDES_MAPBOX_BASE_URL", "https://api.mapbox.com");

    let facility_source_url = or_default("SEDES_FACILITY_SOURCE_URL", DEFAULT_FACILITY_SOURCE_URL);
    let facility_fallback_path = PathBuf::from(or_default(
        "SEDES_FACILITY_FALLBACK_PATH",
        "./data/facilities.json",
    ));
    let facility_timeout_secs = parse_u64("SEDES_FACILITY_TIMEOUT_SECS", "8")?;
    let facility_refresh_cron = or_default("SEDES_FACILITY_REFRESH_CRON", "0 0 3 * * *");

    let directions_timeout_secs = parse_u64("SEDES_DIRECTIONS_TIMEOUT_SECS", "8")?;

    let geocode_bbox = or_default("SEDES_GEOCODE_BBOX", DEFAULT_GEOCODE_BBOX);
    let geocode_country = or_default("SEDES_GEOCODE_COUNTRY", "MX");
    let geocode_language = or_default("SEDES_GEOCODE_LANGUAGE", "es");
    let geocode_limit = parse_u32("SEDES_GEOCODE_LIMIT", "5")?;

    let nearest_count = parse_usize("SEDES_NEAREST_COUNT", "3")?;
    if nearest_count == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SEDES_NEAREST_COUNT".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        user_agent,
        mapbox_token,
        mapbox_base_url,
        facility_source_url,
        facility_fallback_path,
        facility_timeout_secs,
        facility_refresh_cron,
        directions_timeout_secs,
        geocode_bbox,
        geocode_country,
        geocode_language,
        geocode_limit,
        nearest_count,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SEDES_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

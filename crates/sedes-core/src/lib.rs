pub mod app_config;
pub mod config;
pub mod distance;
pub mod error;
pub mod facility;
pub mod format;
pub mod geo;
pub mod rank;
pub mod route;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use distance::{distance_km, EARTH_RADIUS_KM};
pub use error::{ConfigError, CoreError, RankError};
pub use facility::{Address, Attendance, Contact, Facility, Phone};
pub use format::{format_distance, format_duration, format_phone};
pub use geo::GeoPoint;
pub use rank::{nearest_k, nearest_one, RankedFacility};
pub use route::{transit_url, Route, RouteSet, TravelMode};

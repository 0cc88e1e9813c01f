use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown travel mode: {0}")]
    InvalidTravelMode(String),
}

/// Errors returned by the nearest-facility ranker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    /// No facility in the collection has a usable coordinate.
    #[error("no facility with usable coordinates")]
    NotFound,

    #[error("query point ({latitude}, {longitude}) is not a valid coordinate")]
    InvalidQueryPoint { latitude: f64, longitude: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("location ({latitude}, {longitude}) is not a valid coordinate")]
    InvalidLocation { latitude: f64, longitude: f64 },

    /// The facility is not among the current ranked candidates.
    #[error("facility {id} is not one of the ranked candidates")]
    InvalidSelection { id: i64 },
}

//! Error taxonomy for address resolution.

use sled::transaction::TransactionError;
use thiserror::Error;

use crate::models::GeoType;

pub type Result<T, E = PlacesError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PlacesError {
    /// The provider returned zero results
    #[error("no geocoding results for '{0}'")]
    NoResults(String),

    /// The resolved component is not of the requested level
    #[error("'{query}' resolved to [{found}], expected {expected}")]
    GeoTypeMismatch {
        query: String,
        expected: GeoType,
        found: String,
    },

    /// Network / HTTP failure, or a request the provider rejected
    #[error("geocoding request failed: {0}")]
    Transport(String),

    /// A place-id lookup resolved to a place with no tracked level (e.g. a street)
    #[error("place '{0}' is not a political region")]
    UntrackedPlace(String),

    #[error("unknown geo type '{0}'")]
    UnknownGeoType(String),

    #[error("map item {0} does not exist")]
    MissingItem(u64),

    #[error("storage error: {0}")]
    Store(#[from] sled::Error),

    #[error("corrupt record: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("corrupt index key")]
    CorruptKey,
}

impl From<reqwest::Error> for PlacesError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PlacesError::Transport(format!("timed out: {}", err))
        } else {
            PlacesError::Transport(err.to_string())
        }
    }
}

impl From<TransactionError<PlacesError>> for PlacesError {
    fn from(err: TransactionError<PlacesError>) -> Self {
        match err {
            TransactionError::Abort(inner) => inner,
            TransactionError::Storage(e) => PlacesError::Store(e),
        }
    }
}

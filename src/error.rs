use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid URL ({0}).")]
    InvalidUrl(String),

    #[error("Invalid data ({0}).")]
    InvalidData(String),

    #[error("Could not decode response ({0}).")]
    DecodingError(String),

    #[error("{0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Throttling.")]
    Throttling,
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::DecodingError(err.to_string())
    }
}

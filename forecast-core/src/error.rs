use thiserror::Error;

use crate::transport::TransportError;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Failed to read response body: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to decode forecast JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Forecast API error (HTTP {status}, code {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

//! Body decoding.
//!
//! The default path streams the document straight from the response reader.
//! Debug mode reads the whole body first ([`read_body`]) so the raw payload can
//! be logged before it is parsed ([`decode_buffer`]); both paths yield the same
//! value for the same input.

use std::io::Read;

use serde::de::DeserializeOwned;

use crate::error::ForecastError;

/// Decodes directly from `body` without holding the whole document in memory.
pub fn decode_stream<T, R>(body: R) -> Result<T, ForecastError>
where
    T: DeserializeOwned,
    R: Read,
{
    Ok(serde_json::from_reader(body)?)
}

pub fn read_body<R: Read>(mut body: R) -> Result<Vec<u8>, ForecastError> {
    let mut raw = Vec::new();
    body.read_to_end(&mut raw)?;
    Ok(raw)
}

pub fn decode_buffer<T: DeserializeOwned>(raw: &[u8]) -> Result<T, ForecastError> {
    Ok(serde_json::from_slice(raw)?)
}

//! Typed client for the OpenWeatherMap 5-day / 3-hour forecast API.
//!
//! This crate defines:
//! - The forecast data model
//! - A pluggable [`Transport`] with a blocking `reqwest` implementation
//! - [`ForecastClient`], which builds the request, sends it and decodes the reply
//!
//! ```no_run
//! use forecast_core::ForecastClient;
//!
//! let client = ForecastClient::new("API_TOKEN", "3163858")?;
//! for entry in &client.last_result().list {
//!     println!("{} {:.1}K", entry.dt_txt, entry.main.temp);
//! }
//! # Ok::<(), forecast_core::ForecastError>(())
//! ```

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod transport;

pub use client::ForecastClient;
pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use decode::{decode_buffer, decode_stream, read_body};
pub use error::ForecastError;
pub use model::{
    ApiCode, ApiErrorBody, City, Clouds, Coord, ForecastDocument, ForecastEntry, ForecastResult,
    MainMeasurements, PartOfDay, Sys, WeatherCondition, Wind,
};
pub use transport::{ReqwestTransport, Transport, TransportError, TransportResponse};

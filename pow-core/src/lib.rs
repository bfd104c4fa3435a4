//! Core types and upstream clients for multi-model ski-resort snow forecasts.
//!
//! The HTTP clients (Open-Meteo, NWS) are compiled only with the `api`
//! feature; the types, schemas and the [`source::ForecastSource`] seam are
//! always available.

pub mod error;
pub mod model;
pub mod nws;
pub mod open_meteo;
pub mod resort;
pub mod series;
pub mod source;

pub use error::{ForecastError, Result};

//! Core library for the `nws` county forecast CLI.
//!
//! This crate defines:
//! - Loading the county reference table and looking counties up by name
//! - Greedy text wrapping for forecast prose
//! - Access to api.weather.gov (points, forecasts, active alerts)
//! - Configuration and plain-text rendering
//!
//! It is used by `nws-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod report;
pub mod table;
pub mod wrap;

pub use client::{NwsClient, WeatherSource, fetch_county_weather};
pub use config::Config;
pub use error::{ClientError, SkipReason, TableError, WrapError};
pub use lookup::{TableIndex, find};
pub use model::{Alert, CountyWeather, ForecastPeriod};
pub use table::{CountyRecord, LoadReport, SkippedRow, load, load_with_report};
pub use wrap::{Token, wrap};

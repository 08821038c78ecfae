//! Core library for the `weather` city lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com client behind the [`WeatherClient`] trait
//! - The query controller that drives the loading/success/error lifecycle
//! - Shared domain models (snapshots, results, background selection)
//!
//! It is used by `weather-cli`, but any other front end can observe a
//! [`WeatherQueryController`] the same way.

pub mod background;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;

pub use background::Background;
pub use config::Config;
pub use controller::{QueryState, WeatherQueryController};
pub use error::{FetchError, FetchErrorKind};
pub use model::{
    Condition, CurrentConditions, FAILED_TO_LOAD, Location, WeatherResult, WeatherSnapshot,
    hi_res_icon_url,
};
pub use provider::{WeatherClient, client_from_config, weatherapi::WeatherApiClient};

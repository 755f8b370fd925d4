//! Core library for the `weatherdash` weather dashboard.
//!
//! This crate defines:
//! - Location resolution (geolocation, fallback, search input)
//! - The WeatherAPI.com forecast and astronomy client
//! - Presenters that turn fetched data into a dashboard view-model,
//!   including the sunrise/sunset countdown
//! - The refresh flow that ties them together
//!
//! It is used by `weatherdash-cli`, but the view-model can be rendered by any front-end.

pub mod config;
pub mod countdown;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod format;
pub mod location;
pub mod model;
pub mod moon;
pub mod present;
pub mod provider;

pub use config::Config;
pub use countdown::{Countdown, SunEvent, format_duration};
pub use dashboard::{AstronomyDate, Dashboard, RefreshReport, SectionOutcome};
pub use error::{Endpoint, FetchError, GeolocationError};
pub use location::{Coordinates, FixedPosition, Geolocator, LocationQuery};
pub use model::{AstronomyInfo, WeatherSnapshot};
pub use moon::MoonPhase;
pub use present::DashboardView;
pub use provider::{WeatherSource, source_from_config, weatherapi::WeatherApiClient};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::warn;

use crate::error::GeolocationError;

/// Delhi, used whenever geolocation cannot produce a position.
pub const FALLBACK_LOCATION: &str = "28.6139,77.2090";

/// Input to both fetch operations: either `"lat,long"` or a free-text place name.
///
/// Never empty; construction goes through [`LocationQuery::from_search`] or
/// [`LocationQuery::from_coordinates`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Trimmed user input, or `None` when there is nothing to search for.
    pub fn from_search(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn from_coordinates(coords: Coordinates) -> Self {
        // `Display` for f64 is the shortest representation that round-trips.
        Self(format!("{},{}", coords.latitude, coords.longitude))
    }

    /// The built-in fallback city.
    pub fn fallback() -> Self {
        Self(FALLBACK_LOCATION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LocationQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Source of the user's current position.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Position known up front (e.g. passed on the command line).
///
/// `None` behaves like a platform without geolocation support.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition(pub Option<Coordinates>);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        self.0.ok_or(GeolocationError::Unavailable)
    }
}

/// Location used for the initial load. Geolocation failures are logged and
/// replaced by `fallback`; they never reach the user.
pub async fn resolve_startup(
    geolocator: &dyn Geolocator,
    fallback: &LocationQuery,
) -> LocationQuery {
    match geolocator.locate().await {
        Ok(coords) => LocationQuery::from_coordinates(coords),
        Err(err) => {
            warn!(
                error = %err,
                fallback = %fallback,
                "geolocation failed, using fallback location"
            );
            fallback.clone()
        }
    }
}

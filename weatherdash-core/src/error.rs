use reqwest::StatusCode;
use thiserror::Error;

/// Which WeatherAPI.com endpoint an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Forecast,
    Astronomy,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Forecast => "forecast",
            Endpoint::Astronomy => "astronomy",
        }
    }

    /// Path of the endpoint relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Forecast => "forecast.json",
            Endpoint::Astronomy => "astronomy.json",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single fetch operation. None of these are retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("WeatherAPI {endpoint} request failed with status {status}: {body}")]
    Http {
        endpoint: Endpoint,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to reach WeatherAPI {endpoint} endpoint: {source}")]
    Network {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse WeatherAPI {endpoint} JSON: {source}")]
    Parse {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("WeatherAPI {endpoint} response contained an invalid value: {detail}")]
    Malformed { endpoint: Endpoint, detail: String },
}

impl FetchError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            FetchError::Http { endpoint, .. }
            | FetchError::Network { endpoint, .. }
            | FetchError::Parse { endpoint, .. }
            | FetchError::Malformed { endpoint, .. } => *endpoint,
        }
    }

    /// Status code of a non-success response, if that is what failed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Geolocation could not produce a position. Always recovered via the fallback location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Geolocation not supported")]
    Unavailable,
    #[error("Geolocation permission denied")]
    Denied,
    #[error("Geolocation error: {0}")]
    Failed(String),
}

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    config::{DEFAULT_BASE_URL, DEFAULT_FORECAST_DAYS},
    error::{Endpoint, FetchError},
    format::parse_local_datetime,
    location::LocationQuery,
    model::{AstronomyInfo, CurrentConditions, DayRecord, HourRecord, WeatherSnapshot},
};

use super::WeatherSource;

/// Client for the WeatherAPI.com forecast and astronomy endpoints.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    forecast_days: u8,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            http: Client::new(),
        }
    }

    pub fn builder(api_key: impl Into<String>) -> WeatherApiClientBuilder {
        WeatherApiClientBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            timeout: None,
        }
    }

    #[instrument(skip_all, fields(query = %query))]
    pub async fn forecast(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError> {
        let days = self.forecast_days.to_string();
        let parsed: WaForecastResponse = self
            .get_json(
                Endpoint::Forecast,
                &[
                    ("q", query.as_str()),
                    ("days", days.as_str()),
                    ("aqi", "no"),
                    ("alerts", "no"),
                ],
            )
            .await?;

        let snapshot = parsed
            .into_snapshot()
            .map_err(|detail| FetchError::Malformed { endpoint: Endpoint::Forecast, detail })?;

        debug!(
            location = %snapshot.location_name,
            days = snapshot.days.len(),
            "forecast received"
        );
        Ok(snapshot)
    }

    #[instrument(skip_all, fields(query = %query, date = %date))]
    pub async fn astronomy(
        &self,
        query: &LocationQuery,
        date: NaiveDate,
    ) -> Result<AstronomyInfo, FetchError> {
        let dt = date.format("%Y-%m-%d").to_string();
        let parsed: WaAstronomyResponse = self
            .get_json(Endpoint::Astronomy, &[("q", query.as_str()), ("dt", dt.as_str())])
            .await?;

        let astro = parsed
            .into_info()
            .map_err(|detail| FetchError::Malformed { endpoint: Endpoint::Astronomy, detail })?;

        debug!(phase = %astro.moon_phase, is_sun_up = astro.is_sun_up, "astronomy received");
        Ok(astro)
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint.path())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = self.url(endpoint);
        debug!(%endpoint, %url, "sending request");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|source| FetchError::Network { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Network { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::Http { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Parse { endpoint, source })
    }
}

/// Configures a [`WeatherApiClient`].
#[derive(Debug, Clone)]
pub struct WeatherApiClientBuilder {
    api_key: String,
    base_url: String,
    forecast_days: u8,
    timeout: Option<Duration>,
}

impl WeatherApiClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<WeatherApiClient, reqwest::Error> {
        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(WeatherApiClient {
            api_key: self.api_key,
            base_url: self.base_url,
            forecast_days: self.forecast_days,
            http: http.build()?,
        })
    }
}

#[async_trait]
impl WeatherSource for WeatherApiClient {
    async fn fetch_forecast(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError> {
        self.forecast(query).await
    }

    async fn fetch_astronomy(
        &self,
        query: &LocationQuery,
        date: NaiveDate,
    ) -> Result<AstronomyInfo, FetchError> {
        self.astronomy(query, date).await
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    condition: WaCondition,
    last_updated: String,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time: String,
    temp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: NaiveDate,
    day: WaDay,
    #[serde(default)]
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: WaForecast,
}

impl WaForecastResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, String> {
        let local_time = local_time_field("location.localtime", &self.location.localtime)?;
        let last_updated = local_time_field("current.last_updated", &self.current.last_updated)?;

        let days = self
            .forecast
            .forecastday
            .into_iter()
            .map(|fd| -> Result<DayRecord, String> {
                let hours = fd
                    .hour
                    .into_iter()
                    .map(|h| -> Result<HourRecord, String> {
                        Ok(HourRecord {
                            time: local_time_field("forecastday.hour.time", &h.time)?,
                            temperature_c: h.temp_c,
                            icon: h.condition.icon,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(DayRecord {
                    date: fd.date,
                    max_temp_c: fd.day.maxtemp_c,
                    min_temp_c: fd.day.mintemp_c,
                    icon: fd.day.condition.icon,
                    hours,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WeatherSnapshot {
            location_name: self.location.name,
            local_time,
            current: CurrentConditions {
                temperature_c: self.current.temp_c,
                icon: self.current.condition.icon,
                last_updated,
            },
            days,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WaAstro {
    sunrise: String,
    sunset: String,
    moonrise: String,
    moonset: String,
    moon_phase: String,
    #[serde(default, deserialize_with = "flag")]
    is_sun_up: bool,
}

#[derive(Debug, Deserialize)]
struct WaAstronomy {
    astro: WaAstro,
}

#[derive(Debug, Deserialize)]
struct WaAstronomyResponse {
    location: WaLocation,
    astronomy: WaAstronomy,
}

impl WaAstronomyResponse {
    fn into_info(self) -> Result<AstronomyInfo, String> {
        let astro = self.astronomy.astro;
        Ok(AstronomyInfo {
            moon_phase: astro.moon_phase,
            moonrise: astro.moonrise,
            moonset: astro.moonset,
            sunrise: astro.sunrise,
            sunset: astro.sunset,
            is_sun_up: astro.is_sun_up,
            local_time: local_time_field("location.localtime", &self.location.localtime)?,
        })
    }
}

fn local_time_field(field: &str, value: &str) -> Result<NaiveDateTime, String> {
    parse_local_datetime(value)
        .map_err(|e| format!("{field}: '{value}' is not a local date/time ({e})"))
}

/// The provider sends `is_sun_up` as `0`/`1`; booleans and numeric strings are accepted too.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(n) => Ok(n != 0),
        Flag::Text(s) => match s.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!("invalid is_sun_up value '{other}'"))),
        },
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn forecast_json(localtime: &str) -> serde_json::Value {
        json!({
            "location": { "name": "New Delhi", "localtime": localtime },
            "current": {
                "temp_c": 31.2,
                "last_updated": "2024-03-27 14:15",
                "condition": { "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png" }
            },
            "forecast": { "forecastday": [{
                "date": "2024-03-27",
                "day": {
                    "maxtemp_c": 35.1,
                    "mintemp_c": 21.9,
                    "condition": { "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png" }
                },
                "hour": [{
                    "time": "2024-03-27 15:00",
                    "temp_c": 33.0,
                    "condition": { "icon": "//cdn.weatherapi.com/weather/64x64/day/119.png" }
                }]
            }]}
        })
    }

    fn astro_json(is_sun_up: serde_json::Value) -> serde_json::Value {
        json!({
            "location": { "name": "New Delhi", "localtime": "2024-03-27 14:20" },
            "astronomy": { "astro": {
                "sunrise": "06:16 AM",
                "sunset": "06:36 PM",
                "moonrise": "08:51 PM",
                "moonset": "07:40 AM",
                "moon_phase": "Waning Gibbous",
                "is_sun_up": is_sun_up
            }}
        })
    }

    #[test]
    fn forecast_payload_converts_to_snapshot() {
        let parsed: WaForecastResponse =
            serde_json::from_value(forecast_json("2024-03-27 14:20")).unwrap();
        let snap = parsed.into_snapshot().unwrap();

        assert_eq!(snap.location_name, "New Delhi");
        assert_eq!(snap.local_time.to_string(), "2024-03-27 14:20:00");
        assert_eq!(snap.days.len(), 1);
        assert_eq!(snap.days[0].hours[0].temperature_c, 33.0);
        assert_eq!(snap.current.last_updated.to_string(), "2024-03-27 14:15:00");
    }

    #[test]
    fn bad_localtime_is_malformed() {
        let parsed: WaForecastResponse = serde_json::from_value(forecast_json("soon")).unwrap();
        let err = parsed.into_snapshot().unwrap_err();
        assert!(err.contains("location.localtime"));
    }

    #[test]
    fn is_sun_up_accepts_ints_bools_and_strings() {
        for (raw, expected) in [
            (json!(1), true),
            (json!(0), false),
            (json!(true), true),
            (json!("1"), true),
            (json!("0"), false),
        ] {
            let parsed: WaAstronomyResponse = serde_json::from_value(astro_json(raw)).unwrap();
            assert_eq!(parsed.into_info().unwrap().is_sun_up, expected);
        }
    }

    #[test]
    fn missing_is_sun_up_defaults_to_false() {
        let mut value = astro_json(json!(1));
        value["astronomy"]["astro"].as_object_mut().unwrap().remove("is_sun_up");

        let parsed: WaAstronomyResponse = serde_json::from_value(value).unwrap();
        assert!(!parsed.into_info().unwrap().is_sun_up);
    }

    #[test]
    fn invalid_is_sun_up_is_rejected() {
        assert!(serde_json::from_value::<WaAstronomyResponse>(astro_json(json!("maybe"))).is_err());
    }

    #[test]
    fn truncates_long_bodies_on_char_boundaries() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.chars().count(), 203);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn url_joins_base_and_endpoint() {
        let client = WeatherApiClient::builder("KEY")
            .base_url("http://localhost:1234/v1/")
            .build()
            .unwrap();
        assert_eq!(client.url(Endpoint::Astronomy), "http://localhost:1234/v1/astronomy.json");
    }
}

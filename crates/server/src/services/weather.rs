//! Weather API client.
//!
//! Wraps an OpenWeatherMap-compatible API. Raw condition strings are
//! collapsed into the three-category domain at this edge; nothing past this
//! module sees upstream vocabulary. The 3-hourly multi-day forecast is
//! reduced to one entry per calendar day and normalized to exactly
//! [`FORECAST_DAYS`] entries.

use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use raincheck_core::WeatherCategory;

use crate::config::WeatherConfig;

/// Length of the daily outlook returned by [`WeatherClient::weekly`].
pub const FORECAST_DAYS: usize = 5;

/// Errors that can occur when calling the weather API.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the response body.
    #[error("parse error: {0}")]
    Parse(String),

    /// The forecast response contained no usable entries.
    #[error("forecast response contained no entries")]
    EmptyForecast,
}

/// Coordinates supplied by the client device, when available.
#[derive(Debug, Clone, Copy)]
pub struct Coords {
    pub lat: f64,
    pub lon: f64,
}

/// One day of the reduced outlook: a date label and its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyOutlook {
    /// Display label, e.g. "07 Aug".
    pub label: String,
    pub category: WeatherCategory,
}

/// The reduced multi-day outlook plus the location the API resolved.
#[derive(Debug, Clone)]
pub struct WeekOutlook {
    /// Exactly [`FORECAST_DAYS`] entries when the upstream had any data;
    /// empty otherwise - callers must handle a zero-length outlook.
    pub days: Vec<DailyOutlook>,
    /// Resolved location name ("Unknown" if the API did not name one).
    pub location: String,
}

/// Weather API client.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    default_city: String,
}

impl WeatherClient {
    /// Create a new weather API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &WeatherConfig, timeout: std::time::Duration) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            default_city: config.default_city.clone(),
        })
    }

    /// The current weather category at the given coordinates, or at the
    /// configured default city when none are supplied.
    ///
    /// # Errors
    ///
    /// Returns `WeatherError` on any upstream failure. Callers that must
    /// not fail (sale recording) degrade to a default category themselves.
    pub async fn current(&self, coords: Option<Coords>) -> Result<WeatherCategory, WeatherError> {
        let url = format!("{}/weather", self.base_url);
        let body: CurrentResponse = self.get_json(&url, coords).await?;

        let condition = body
            .weather
            .first()
            .ok_or_else(|| WeatherError::Parse("response carried no conditions".to_owned()))?;
        Ok(WeatherCategory::from_condition(&condition.main))
    }

    /// The 5-day outlook at the given coordinates (or the default city),
    /// reduced to one entry per calendar day.
    ///
    /// # Errors
    ///
    /// Returns `WeatherError` on any upstream failure.
    pub async fn weekly(&self, coords: Option<Coords>) -> Result<WeekOutlook, WeatherError> {
        let url = format!("{}/forecast", self.base_url);
        let body: ForecastResponse = self.get_json(&url, coords).await?;

        let location = body
            .city
            .and_then(|c| c.name)
            .unwrap_or_else(|| "Unknown".to_owned());

        Ok(WeekOutlook {
            days: reduce_to_daily(&body.list),
            location,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        coords: Option<Coords>,
    ) -> Result<T, WeatherError> {
        let mut params: Vec<(&str, String)> = Vec::with_capacity(4);
        match coords {
            Some(Coords { lat, lon }) => {
                params.push(("lat", lat.to_string()));
                params.push(("lon", lon.to_string()));
            }
            None => params.push(("q", self.default_city.clone())),
        }
        params.push(("appid", self.api_key.expose_secret().to_owned()));
        params.push(("units", "metric".to_owned()));

        let response = self.http.get(url).query(&params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }
}

/// Reduce a 3-hourly forecast to one entry per calendar day.
///
/// The first day contributes its earliest reading; every following day
/// contributes its local-noon reading. The result is padded by repeating
/// the last known day and truncated so a non-empty input always yields
/// exactly [`FORECAST_DAYS`] entries.
fn reduce_to_daily(slots: &[ForecastSlot]) -> Vec<DailyOutlook> {
    let mut days: Vec<DailyOutlook> = Vec::with_capacity(FORECAST_DAYS);
    let mut seen: Vec<&str> = Vec::new();

    for slot in slots {
        let Some((date_part, _)) = slot.dt_txt.split_once(' ') else {
            continue;
        };
        if seen.contains(&date_part) {
            continue;
        }
        if !slot.dt_txt.contains("12:00:00") && !days.is_empty() {
            continue;
        }
        let Some(condition) = slot.weather.first() else {
            continue;
        };

        days.push(DailyOutlook {
            label: format_day_label(date_part),
            category: WeatherCategory::from_condition(&condition.main),
        });
        seen.push(date_part);
    }

    if let Some(last) = days.last().cloned() {
        while days.len() < FORECAST_DAYS {
            days.push(last.clone());
        }
    }
    days.truncate(FORECAST_DAYS);
    days
}

/// "2026-08-07" -> "07 Aug"; unparseable dates pass through unchanged.
fn format_day_label(date_part: &str) -> String {
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_or_else(|_| date_part.to_owned(), |d| d.format("%d %b").to_string())
}

// =============================================================================
// Upstream response shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct ConditionSummary {
    main: String,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    weather: Vec<ConditionSummary>,
}

#[derive(Debug, Deserialize)]
struct ForecastSlot {
    dt_txt: String,
    #[serde(default)]
    weather: Vec<ConditionSummary>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastSlot>,
    city: Option<CityInfo>,
}

#[derive(Debug, Deserialize)]
struct CityInfo {
    name: Option<String>,
}

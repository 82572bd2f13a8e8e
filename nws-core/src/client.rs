//! Access to api.weather.gov.
//!
//! [`WeatherSource`] is the narrow HTTP seam (GET a URL, get text back).
//! The `fetch_*` functions on top of it build URLs and pull out the fields
//! we render, so they run the same against [`NwsClient`] or a canned source.

use std::fmt::Debug;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::ClientError,
    model::{Alert, AlertCollection, CountyWeather, ForecastPeriod, ForecastResponse, PointResponse},
    table::CountyRecord,
};

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// GET `url` and return the body of a successful response.
    async fn get_text(&self, url: &str) -> Result<String, ClientError>;
}

#[derive(Debug, Clone)]
pub struct NwsClient {
    http: Client,
}

impl NwsClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/geo+json"));

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self { http })
    }
}

#[async_trait]
impl WeatherSource for NwsClient {
    async fn get_text(&self, url: &str) -> Result<String, ClientError> {
        debug!(url, "GET");

        let transport = |source| ClientError::Transport { url: url.to_string(), source };

        let res = self.http.get(url).send().await.map_err(transport)?;
        let status = res.status();
        let body = res.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

pub fn points_url(api_base: &str, latitude: f64, longitude: f64) -> String {
    format!(
        "{}/points/{},{}",
        api_base.trim_end_matches('/'),
        format_coordinate(latitude),
        format_coordinate(longitude)
    )
}

pub fn alerts_url(api_base: &str, zone: &str) -> String {
    format!("{}/alerts/active/zone/{zone}", api_base.trim_end_matches('/'))
}

/// The points endpoint accepts at most four decimal places.
fn format_coordinate(value: f64) -> String {
    let s = format!("{value:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn parse_json<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|source| ClientError::Json { url: url.to_string(), source })
}

/// Resolve the gridpoint forecast URL for a coordinate.
pub async fn fetch_forecast_url(
    source: &dyn WeatherSource,
    api_base: &str,
    latitude: f64,
    longitude: f64,
) -> Result<String, ClientError> {
    let url = points_url(api_base, latitude, longitude);
    let body = source.get_text(&url).await?;
    let point: PointResponse = parse_json(&url, &body)?;

    point
        .properties
        .and_then(|p| p.forecast)
        .ok_or(ClientError::MissingField { url, field: "properties.forecast" })
}

/// Fetch forecast periods; `None` if the document has no `properties.periods`.
pub async fn fetch_periods(
    source: &dyn WeatherSource,
    forecast_url: &str,
) -> Result<Option<Vec<ForecastPeriod>>, ClientError> {
    let body = source.get_text(forecast_url).await?;
    let forecast: ForecastResponse = parse_json(forecast_url, &body)?;

    let periods = forecast.properties.and_then(|p| p.periods);
    if periods.is_none() {
        warn!(url = forecast_url, "unexpected JSON structure: missing properties/periods");
    }
    Ok(periods)
}

/// Fetch active alerts for a zone; `None` if the document has no `features`.
pub async fn fetch_alerts(
    source: &dyn WeatherSource,
    api_base: &str,
    zone: &str,
) -> Result<Option<Vec<Alert>>, ClientError> {
    let url = alerts_url(api_base, zone);
    let body = source.get_text(&url).await?;
    let collection: AlertCollection = parse_json(&url, &body)?;

    match collection.features {
        Some(features) => Ok(Some(features.into_iter().map(|f| f.properties).collect())),
        None => {
            warn!(url = %url, "unexpected JSON structure: 'features' not found");
            Ok(None)
        }
    }
}

/// Points lookup, forecast and alerts for one county, in that order.
pub async fn fetch_county_weather(
    source: &dyn WeatherSource,
    api_base: &str,
    record: &CountyRecord,
) -> Result<CountyWeather> {
    let forecast_url = fetch_forecast_url(source, api_base, record.latitude, record.longitude)
        .await
        .with_context(|| format!("Failed to resolve forecast URL for {} County", record.county))?;

    let periods = fetch_periods(source, &forecast_url)
        .await
        .context("Failed to fetch forecast")?;

    let alerts = match record.zone_code() {
        Some(zone) => fetch_alerts(source, api_base, &zone)
            .await
            .with_context(|| format!("Failed to fetch alerts for zone {zone}"))?,
        None => {
            warn!(county = %record.county, "no zone code for county, skipping alerts");
            None
        }
    };

    Ok(CountyWeather { forecast_url, periods, alerts })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const BASE: &str = "https://api.weather.gov";

    #[derive(Debug, Default)]
    struct CannedSource {
        bodies: HashMap<String, String>,
    }

    impl CannedSource {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.bodies.insert(url.to_string(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl WeatherSource for CannedSource {
        async fn get_text(&self, url: &str) -> Result<String, ClientError> {
            self.bodies.get(url).cloned().ok_or_else(|| ClientError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
                body: String::new(),
            })
        }
    }

    fn orange() -> CountyRecord {
        CountyRecord {
            county: "Orange".into(),
            state: "CA".into(),
            county_fips: "059".into(),
            latitude: 33.7,
            longitude: -117.8,
        }
    }

    const POINT: &str = r#"{"properties":{"forecast":"https://api.weather.gov/gridpoints/SGX/45,60/forecast"}}"#;
    const FORECAST: &str = r#"{"properties":{"periods":[
        {"name":"This Afternoon","temperature":75,"temperatureUnit":"F","shortForecast":"Sunny","detailedForecast":"Sunny."},
        {"name":"Tonight","temperature":58,"temperatureUnit":"F","shortForecast":"Clear","detailedForecast":"Clear, with a low around 58."}
    ]}}"#;
    const ALERTS: &str = r#"{"features":[{"properties":{"event":"Wind Advisory","headline":"Wind Advisory until 6 PM","description":"Gusts to 50 mph."}}]}"#;

    #[test]
    fn points_url_uses_lat_then_lon_with_four_decimals() {
        assert_eq!(points_url(BASE, 33.7, -117.8), "https://api.weather.gov/points/33.7,-117.8");
        assert_eq!(
            points_url("https://example.test/", 38.123456, -77.0),
            "https://example.test/points/38.1235,-77"
        );
        assert_eq!(points_url(BASE, -0.00001, 0.0), "https://api.weather.gov/points/0,0");
    }

    #[test]
    fn alerts_url_targets_zone() {
        assert_eq!(alerts_url(BASE, "CAC059"), "https://api.weather.gov/alerts/active/zone/CAC059");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let t = truncate_body(&body);
        assert!(t.ends_with("..."));
        assert!(t.len() <= 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[tokio::test]
    async fn fetches_forecast_and_alerts_for_county() {
        let source = CannedSource::default()
            .with("https://api.weather.gov/points/33.7,-117.8", POINT)
            .with("https://api.weather.gov/gridpoints/SGX/45,60/forecast", FORECAST)
            .with("https://api.weather.gov/alerts/active/zone/CAC059", ALERTS);

        let weather = fetch_county_weather(&source, BASE, &orange()).await.unwrap();

        assert_eq!(weather.forecast_url, "https://api.weather.gov/gridpoints/SGX/45,60/forecast");
        let periods = weather.periods.unwrap();
        assert_eq!(periods.len(), 2);
        assert!(periods[1].is_tonight());
        let alerts = weather.alerts.unwrap();
        assert_eq!(alerts[0].headline.as_deref(), Some("Wind Advisory until 6 PM"));
    }

    #[tokio::test]
    async fn missing_forecast_url_is_an_error() {
        let source = CannedSource::default()
            .with("https://api.weather.gov/points/33.7,-117.8", r#"{"properties":{}}"#);

        let err = fetch_forecast_url(&source, BASE, 33.7, -117.8).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingField { field: "properties.forecast", .. }));
    }

    #[tokio::test]
    async fn missing_periods_and_features_are_not_fatal() {
        let source = CannedSource::default()
            .with("https://api.weather.gov/points/33.7,-117.8", POINT)
            .with("https://api.weather.gov/gridpoints/SGX/45,60/forecast", r#"{"properties":{}}"#)
            .with("https://api.weather.gov/alerts/active/zone/CAC059", r#"{"type":"FeatureCollection"}"#);

        let weather = fetch_county_weather(&source, BASE, &orange()).await.unwrap();
        assert_eq!(weather.periods, None);
        assert_eq!(weather.alerts, None);
    }

    #[tokio::test]
    async fn county_without_zone_skips_alerts() {
        let source = CannedSource::default()
            .with("https://api.weather.gov/points/33.7,-117.8", POINT)
            .with("https://api.weather.gov/gridpoints/SGX/45,60/forecast", FORECAST);

        let record = CountyRecord { county_fips: String::new(), ..orange() };
        let weather = fetch_county_weather(&source, BASE, &record).await.unwrap();
        assert!(weather.periods.is_some());
        assert_eq!(weather.alerts, None);
    }

    #[tokio::test]
    async fn http_failure_carries_context() {
        let source = CannedSource::default();
        let err = fetch_county_weather(&source, BASE, &orange()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to resolve forecast URL for Orange County"));
    }

    #[tokio::test]
    async fn malformed_json_is_reported() {
        let source = CannedSource::default()
            .with("https://api.weather.gov/points/33.7,-117.8", "<html>");
        let err = fetch_forecast_url(&source, BASE, 33.7, -117.8).await.unwrap_err();
        assert!(matches!(err, ClientError::Json { .. }));
    }
}

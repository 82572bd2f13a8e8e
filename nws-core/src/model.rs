use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// `GET /points/{lat},{lon}` response, trimmed to what we use.
#[derive(Debug, Clone, Deserialize)]
pub struct PointResponse {
    pub properties: Option<PointProperties>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointProperties {
    pub forecast: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub properties: Option<ForecastProperties>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastProperties {
    pub periods: Option<Vec<ForecastPeriod>>,
}

/// One named slice of a forecast, e.g. "Tonight" or "Wednesday Night".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    #[serde(default = "unknown")]
    pub name: String,
    pub start_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub temperature: i64,
    #[serde(default = "unknown")]
    pub temperature_unit: String,
    #[serde(default = "unknown")]
    pub short_forecast: String,
    #[serde(default = "unknown")]
    pub detailed_forecast: String,
}

impl ForecastPeriod {
    pub fn is_tonight(&self) -> bool {
        self.name.eq_ignore_ascii_case("tonight")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertCollection {
    pub features: Option<Vec<AlertFeature>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertFeature {
    pub properties: Alert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub event: Option<String>,
    pub severity: Option<String>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub expires: Option<DateTime<FixedOffset>>,
}

/// Everything one run prints about a county.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyWeather {
    pub forecast_url: String,
    /// `None` when the forecast document lacked `properties.periods`.
    pub periods: Option<Vec<ForecastPeriod>>,
    /// `None` when the county has no zone code or the alerts document lacked `features`.
    pub alerts: Option<Vec<Alert>>,
}

fn unknown() -> String {
    "?".to_string()
}

//! Plain-text rendering of lookups, forecasts and alerts.

use std::fmt::Write;

use crate::{
    error::WrapError,
    model::{Alert, ForecastPeriod},
    table::CountyRecord,
    wrap::wrap,
};

const RULE: &str = "---------------------------------------------------------";

/// Summary printed once a county has been found.
pub fn render_record(record: &CountyRecord) -> String {
    let mut out = format!("Found County: {}", record.county);
    if !record.state.is_empty() {
        let _ = write!(out, " ({})", record.state);
    }
    let zone = record.zone_code().unwrap_or_else(|| "?".to_string());
    let _ = write!(
        out,
        "\nZone: {zone}\nLatitude: {}\nLongitude: {}\n",
        record.latitude, record.longitude
    );
    out
}

/// Period table followed by tonight's detailed forecast wrapped to `width`.
pub fn render_forecast(
    record: &CountyRecord,
    periods: &[ForecastPeriod],
    width: usize,
) -> Result<String, WrapError> {
    let mut out = String::new();
    let _ = writeln!(out, "---NWS Forecast for {} County {}---", record.county, record.state);
    let _ = writeln!(out, "{:<22} |  Temp  | Forecast", "Day");
    let _ = writeln!(out, "{RULE}");

    for p in periods {
        let _ = writeln!(
            out,
            "{:<22} | {:>4} {} | {}",
            p.name, p.temperature, p.temperature_unit, p.short_forecast
        );
    }

    if let Some(tonight) = periods.iter().find(|p| p.is_tonight()) {
        let _ = write!(out, "\n\nForecast for tonight: \n");
        for line in wrap(&tonight.detailed_forecast, width)? {
            let _ = writeln!(out, " {line}");
        }
    }

    Ok(out)
}

pub fn render_alerts(record: &CountyRecord, alerts: &[Alert]) -> String {
    let mut out = format!(
        "\n\n----Active Alerts for {} County {}----\n",
        record.county, record.state
    );

    if alerts.is_empty() {
        out.push_str("No active alerts.\n");
        return out;
    }

    for (i, alert) in alerts.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(
            out,
            "{}\n\n{}\n",
            alert.headline.as_deref().unwrap_or("?"),
            alert.description.as_deref().unwrap_or("?")
        );
        if let Some(expires) = alert.expires {
            let _ = writeln!(out, "Expires: {}", expires.format("%Y-%m-%d %H:%M %:z"));
        }
    }

    out
}

//! Wire format of the dashboard backend.
//!
//! `/api/candles` answers with an array of records whose OHLC fields are
//! nullable and whose `ts` is whatever pandas produced from the CSV time
//! column: an ISO-8601 string, a plain date, or a raw epoch number.

use crate::domain::{
    errors::{FetchError, FetchResult},
    logging::LogComponent,
    market_data::{Candle, Ohlc, Price, Timestamp, Volume},
    signals::SIGNAL_COLUMNS,
};
use crate::log_warn;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

const COMPONENT: LogComponent = LogComponent::Infrastructure("CandleDto");

/// Epoch numbers below this are seconds, above it milliseconds
const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TimestampField {
    Epoch(f64),
    Text(String),
}

impl TimestampField {
    pub fn to_timestamp(&self) -> Option<Timestamp> {
        match self {
            TimestampField::Epoch(n) => epoch_to_timestamp(*n),
            TimestampField::Text(s) => parse_timestamp(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CandleDto {
    pub ts: TimestampField,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub orders: Option<f64>,
    #[serde(default)]
    pub orders_rsi: Option<f64>,
    #[serde(default)]
    pub orders_xgb: Option<f64>,
}

impl CandleDto {
    /// `None` when the timestamp is unreadable or an OHLC value is missing
    pub fn to_domain_candle(&self) -> Option<Candle> {
        let timestamp = self.ts.to_timestamp()?;
        let ohlc = Ohlc::new(
            Price::from(self.open?),
            Price::from(self.high?),
            Price::from(self.low?),
            Price::from(self.close?),
        );

        let mut candle = Candle::new(timestamp, ohlc, self.volume.map(Volume::from));
        for (name, value) in SIGNAL_COLUMNS.iter().zip([self.orders, self.orders_rsi, self.orders_xgb]) {
            if let Some(value) = value {
                candle = candle.with_signal(*name, value);
            }
        }
        Some(candle)
    }
}

/// Parse an ISO-8601 timestamp, a plain date or a numeric epoch string
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(Timestamp::from(dt.timestamp_millis()));
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Timestamp::from(dt.and_utc().timestamp_millis()));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| Timestamp::from(dt.and_utc().timestamp_millis()));
    }

    raw.parse::<f64>().ok().and_then(epoch_to_timestamp)
}

fn epoch_to_timestamp(value: f64) -> Option<Timestamp> {
    if !value.is_finite() {
        return None;
    }
    let millis = if value.abs() < EPOCH_MILLIS_THRESHOLD { value * 1000.0 } else { value };
    Some(Timestamp::from(millis.round() as i64))
}

/// Message of an `{"error": ...}` body
pub fn backend_error(body: &Value) -> Option<String> {
    let error = body.as_object()?.get("error")?;
    Some(error.as_str().map_or_else(|| error.to_string(), str::to_string))
}

/// Decode a `/api/candles` body, skipping malformed rows
pub fn decode_candles(body: Value) -> FetchResult<Vec<Candle>> {
    let rows = match body {
        Value::Array(rows) => rows,
        Value::Object(_) => {
            let message = backend_error(&body).unwrap_or_else(|| "unexpected object response".to_string());
            return Err(FetchError::Backend(message));
        }
        other => return Err(FetchError::Decode(format!("expected an array, got {other}"))),
    };

    let total = rows.len();
    let candles: Vec<Candle> = rows
        .into_iter()
        .filter_map(|row| {
            serde_json::from_value::<CandleDto>(row)
                .ok()
                .and_then(|dto| dto.to_domain_candle())
        })
        .collect();

    let skipped = total - candles.len();
    if skipped > 0 {
        log_warn!(COMPONENT, "skipped {} of {} rows with missing fields or bad timestamps", skipped, total);
    }
    Ok(candles)
}

/// Decode a `/csv_list` body
pub fn decode_source_list(body: Value) -> FetchResult<Vec<String>> {
    serde_json::from_value::<Vec<String>>(body).map_err(|e| FetchError::Decode(e.to_string()))
}

use derive_more::{Constructor, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Value Object - Price
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

/// Value Object - Volume
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
pub struct Volume(f64);

impl Volume {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - Unix epoch timestamp in milliseconds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Constructor, Display,
    Serialize, Deserialize,
)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Value Object - OHLC prices of a single sample
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct Ohlc {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
}

impl Ohlc {
    /// Same price for all four fields
    pub fn flat(price: f64) -> Self {
        let p = Price::from(price);
        Self { open: p, high: p, low: p, close: p }
    }

    pub fn values(&self) -> [f64; 4] {
        [self.open.value(), self.high.value(), self.low.value(), self.close.value()]
    }

    pub fn is_finite(&self) -> bool {
        self.values().iter().all(|v| v.is_finite())
    }
}

/// Value Object - Identity of the data origin (the selected data file)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(source: impl Into<String>) -> Result<Self, String> {
        let source = source.into();
        if source.trim().is_empty() {
            return Err("Source identity cannot be empty".to_string());
        }
        Ok(Self(source))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// Analysed files carry the strategy signal columns
    pub fn is_analysed(&self) -> bool {
        self.0.ends_with("_anal.csv")
    }
}

impl From<&str> for SourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Value Object - Number of most recent samples to request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(from = "usize", into = "usize")]
pub struct TailSize(usize);

impl TailSize {
    pub const MIN: usize = 50;
    pub const DEFAULT: usize = 500;

    /// Values below [`TailSize::MIN`] are raised to it.
    pub fn new(rows: usize) -> Self {
        Self(rows.max(Self::MIN))
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl Default for TailSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<usize> for TailSize {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

impl From<TailSize> for usize {
    fn from(value: TailSize) -> Self {
        value.0
    }
}

//! Session configuration handed over by the host page.

use crate::domain::indicators::IndicatorPeriods;
use crate::domain::market_data::TailSize;
use serde::{Deserialize, Serialize};

pub const MIN_REFRESH_INTERVAL_MS: u32 = 2_000;
pub const DEFAULT_REFRESH_INTERVAL_MS: u32 = 10_000;
pub const DEFAULT_REVEAL_DURATION_MS: u32 = 1_100;

/// Every field is optional on the JS side; missing ones take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Backend origin; empty means same origin as the page
    pub base_url: String,
    pub refresh_interval_ms: u32,
    pub reveal_duration_ms: u32,
    pub ma_fast_period: usize,
    pub ma_slow_period: usize,
    pub ema_period: usize,
    pub oscillator_period: usize,
    pub default_tail: TailSize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let periods = IndicatorPeriods::default();
        Self {
            base_url: String::new(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            reveal_duration_ms: DEFAULT_REVEAL_DURATION_MS,
            ma_fast_period: periods.ma_fast,
            ma_slow_period: periods.ma_slow,
            ema_period: periods.ema,
            oscillator_period: periods.oscillator,
            default_tail: TailSize::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str::<Self>(json)
            .map(Self::validated)
            .map_err(|e| format!("Invalid session config: {e}"))
    }

    /// Clamp values into their supported ranges
    pub fn validated(mut self) -> Self {
        self.refresh_interval_ms = self.refresh_interval_ms.max(MIN_REFRESH_INTERVAL_MS);
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        for period in [
            &mut self.ma_fast_period,
            &mut self.ma_slow_period,
            &mut self.ema_period,
            &mut self.oscillator_period,
        ] {
            *period = (*period).max(1);
        }
        self
    }

    pub fn periods(&self) -> IndicatorPeriods {
        IndicatorPeriods {
            ma_fast: self.ma_fast_period,
            ma_slow: self.ma_slow_period,
            ema: self.ema_period,
            oscillator: self.oscillator_period,
        }
    }
}

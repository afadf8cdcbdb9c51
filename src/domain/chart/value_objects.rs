use crate::domain::market_data::TailSize;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumString};

/// Value Object - content of the lower panel
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay, EnumString, AsRefStr,
    Serialize, Deserialize,
)]
pub enum LowerPanelMode {
    #[default]
    #[strum(serialize = "volume")]
    #[serde(rename = "volume")]
    Volume,

    #[strum(serialize = "oscillator")]
    #[serde(rename = "oscillator", alias = "rsi")]
    Oscillator,
}

/// Value Object - price axis scale
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay, EnumString, AsRefStr,
    Serialize, Deserialize,
)]
pub enum ScaleMode {
    #[default]
    #[strum(serialize = "linear")]
    #[serde(rename = "linear")]
    Linear,

    #[strum(serialize = "log")]
    #[serde(rename = "log")]
    Log,
}

/// Which overlays are drawn on a rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayToggles {
    pub ma_fast: bool,
    pub ma_slow: bool,
    pub ema: bool,
    pub signals: bool,
}

impl Default for OverlayToggles {
    fn default() -> Self {
        Self { ma_fast: true, ma_slow: true, ema: false, signals: true }
    }
}

/// Value Object - everything that shapes the trace set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub lower_panel: LowerPanelMode,
    pub scale: ScaleMode,
    pub overlays: OverlayToggles,
    pub tail_size: TailSize,
}

impl RenderConfig {
    pub fn with_tail(mut self, tail: TailSize) -> Self {
        self.tail_size = tail;
        self
    }
}

use crate::domain::market_data::{Candle, Timestamp};

/// Domain service for checking fetched candle windows
#[derive(Debug, Clone, Default)]
pub struct DataValidationService;

impl DataValidationService {
    pub fn new() -> Self {
        Self
    }

    /// Validate a single candle with a descriptive error
    pub fn validate_candle(&self, candle: &Candle) -> Result<(), String> {
        if !candle.ohlc.is_finite() {
            return Err(format!("Non-finite OHLC values at {}", candle.timestamp));
        }

        if candle.ohlc.high < candle.ohlc.low {
            return Err(format!("High price below low price at {}", candle.timestamp));
        }

        if let Some(volume) = candle.volume
            && volume.value() < 0.0
        {
            return Err(format!("Negative volume at {}", candle.timestamp));
        }

        Ok(())
    }

    /// Check that timestamps are strictly increasing
    pub fn validate_candle_sequence(&self, candles: &[Candle]) -> Result<(), String> {
        for (i, pair) in candles.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(format!(
                    "Candles are not in chronological order at index {}",
                    i + 1
                ));
            }
        }
        Ok(())
    }

    /// Drop invalid candles and rows that break strict ordering.
    ///
    /// Returns the cleaned window and the number of dropped rows.
    pub fn normalize_sequence(&self, candles: Vec<Candle>) -> (Vec<Candle>, usize) {
        let total = candles.len();
        let mut last: Option<Timestamp> = None;
        let mut out = Vec::with_capacity(total);

        for candle in candles {
            if self.validate_candle(&candle).is_err() {
                continue;
            }
            if last.is_some_and(|ts| candle.timestamp <= ts) {
                continue;
            }
            last = Some(candle.timestamp);
            out.push(candle);
        }

        let dropped = total - out.len();
        (out, dropped)
    }

    /// Keep only the newest `tail` candles
    pub fn take_tail(&self, mut candles: Vec<Candle>, tail: usize) -> Vec<Candle> {
        if candles.len() > tail {
            candles.drain(..candles.len() - tail);
        }
        candles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::{Ohlc, Price};

    fn candle(ts: i64, close: f64) -> Candle {
        Candle::new(Timestamp::from(ts), Ohlc::flat(close), None)
    }

    #[test]
    fn normalize_drops_out_of_order_and_invalid_rows() {
        let svc = DataValidationService::new();
        let mut broken = candle(4, 1.0);
        broken.ohlc.high = Price::from(f64::NAN);

        let (clean, dropped) =
            svc.normalize_sequence(vec![candle(1, 1.0), candle(3, 1.0), candle(2, 1.0), broken, candle(5, 1.0)]);

        let ts: Vec<i64> = clean.iter().map(|c| c.timestamp.value()).collect();
        assert_eq!(ts, vec![1, 3, 5]);
        assert_eq!(dropped, 2);
        assert!(svc.validate_candle_sequence(&clean).is_ok());
    }

    #[test]
    fn take_tail_keeps_newest() {
        let svc = DataValidationService::new();
        let candles: Vec<Candle> = (1..=5).map(|i| candle(i, 1.0)).collect();
        let tail = svc.take_tail(candles, 2);
        assert_eq!(tail[0].timestamp.value(), 4);
        assert_eq!(tail.len(), 2);
    }
}

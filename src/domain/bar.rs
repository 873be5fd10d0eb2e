//! Daily price bar representation.

use crate::domain::error::RewindError;
use chrono::NaiveDate;

/// Technical fields derived from the raw series. `None` means the warm-up
/// window for that field has not filled yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub return_1d: Option<f64>,
    pub return_5d: Option<f64>,
    pub return_20d: Option<f64>,
    pub sma_200: Option<f64>,
    pub rsi_14: Option<f64>,
    pub atr_14: Option<f64>,
    pub volatility_20d: Option<f64>,
    pub volume_ratio: Option<f64>,
}

/// One calendar day of one instrument.
#[derive(Debug, Clone)]
pub struct PriceBar {
    pub ticker: String,
    pub company_name: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub indicators: IndicatorSnapshot,
}

impl PriceBar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Check the series invariants every downstream consumer relies on:
/// non-empty, strictly increasing dates, positive finite closes.
pub fn validate_series(bars: &[PriceBar]) -> Result<(), RewindError> {
    if bars.is_empty() {
        return Err(RewindError::InvalidInput {
            reason: "price series is empty".into(),
        });
    }

    for (i, bar) in bars.iter().enumerate() {
        if !(bar.close.is_finite() && bar.close > 0.0) {
            return Err(RewindError::InvalidInput {
                reason: format!("non-positive close {} on {}", bar.close, bar.date),
            });
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(RewindError::InvalidInput {
                reason: format!(
                    "dates not strictly increasing: {} follows {}",
                    bar.date,
                    bars[i - 1].date
                ),
            });
        }
    }

    Ok(())
}

//! Rolling indicator pipeline.
//!
//! Derives the technical fields carried by [`PriceBar`] from the raw OHLCV
//! series. Every function returns one value per input row; `None` marks rows
//! inside the warm-up window of the field.

use crate::domain::bar::{IndicatorSnapshot, PriceBar};

/// n-day fractional change of close. Defined from index n onward.
pub fn horizon_return(closes: &[f64], n: usize) -> Vec<Option<f64>> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if i >= n && closes[i - n] != 0.0 {
                Some(c / closes[i - n] - 1.0)
            } else {
                None
            }
        })
        .collect()
}

/// Simple moving average over `window` values. Defined from index window-1.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let mut out = Vec::with_capacity(values.len());
    let mut running = 0.0;
    for (i, &v) in values.iter().enumerate() {
        running += v;
        if i >= window {
            running -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(running / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// RSI from simple rolling means of gains and losses over close deltas.
///
/// The first delta does not exist, so the first defined index is `period`
/// (the window must hold `period` real deltas). An all-flat window has no
/// gains and no losses and is undefined; a window with gains and zero losses
/// saturates at 100.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = closes.len();
    let mut out = vec![None; n];
    if period == 0 || n < period + 1 {
        return out;
    }

    for i in period..n {
        let mut gains = 0.0;
        let mut losses = 0.0;
        for j in (i + 1 - period)..=i {
            let delta = closes[j] - closes[j - 1];
            if delta > 0.0 {
                gains += delta;
            } else {
                losses -= delta;
            }
        }
        let avg_gain = gains / period as f64;
        let avg_loss = losses / period as f64;

        out[i] = if avg_loss == 0.0 && avg_gain == 0.0 {
            None
        } else if avg_loss == 0.0 {
            Some(100.0)
        } else {
            let rs = avg_gain / avg_loss;
            Some(100.0 - 100.0 / (1.0 + rs))
        };
    }
    out
}

/// Simple rolling mean of true range. The first row has no prior close, so
/// its true range degrades to high - low; defined from index period-1.
pub fn atr(bars: &[PriceBar], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; bars.len()];
    }
    let tr: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();
    sma(&tr, period)
}

/// Rolling sample standard deviation (n-1 divisor) over an already-windowed
/// series. A window containing any undefined value is undefined.
pub fn rolling_stddev(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    if window < 2 {
        return out;
    }

    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_none()) {
            continue;
        }
        let xs: Vec<f64> = slice.iter().map(|v| v.unwrap()).collect();
        let mean = xs.iter().sum::<f64>() / window as f64;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        out[i] = Some(var.sqrt());
    }
    out
}

/// Volume divided by its rolling mean. Defined from index window-1; undefined
/// when the rolling mean is zero.
pub fn volume_ratio(volumes: &[i64], window: usize) -> Vec<Option<f64>> {
    let as_f64: Vec<f64> = volumes.iter().map(|&v| v as f64).collect();
    sma(&as_f64, window)
        .into_iter()
        .zip(&as_f64)
        .map(|(mean, &v)| match mean {
            Some(m) if m > 0.0 => Some(v / m),
            _ => None,
        })
        .collect()
}

/// Fill every bar's indicator snapshot from the raw series. Consumes and
/// returns the bars so enrichment happens exactly once, before any
/// range-bounding.
pub fn enrich(mut bars: Vec<PriceBar>) -> Vec<PriceBar> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<i64> = bars.iter().map(|b| b.volume).collect();

    let return_1d = horizon_return(&closes, 1);
    let return_5d = horizon_return(&closes, 5);
    let return_20d = horizon_return(&closes, 20);
    let sma_200 = sma(&closes, 200);
    let rsi_14 = rsi(&closes, 14);
    let atr_14 = atr(&bars, 14);
    let volatility_20d = rolling_stddev(&return_1d, 20);
    let vol_ratio = volume_ratio(&volumes, 20);

    for (i, bar) in bars.iter_mut().enumerate() {
        bar.indicators = IndicatorSnapshot {
            return_1d: return_1d[i],
            return_5d: return_5d[i],
            return_20d: return_20d[i],
            sma_200: sma_200[i],
            rsi_14: rsi_14[i],
            atr_14: atr_14[i],
            volatility_20d: volatility_20d[i],
            volume_ratio: vol_ratio[i],
        };
    }
    bars
}

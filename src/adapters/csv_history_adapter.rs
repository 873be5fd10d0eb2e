//! CSV directory history adapter.
//!
//! Loads every `*.csv` file under a data directory into memory at
//! construction, one instrument per file, and serves bounded date ranges
//! from the in-memory table. Indicator snapshots are computed over each
//! instrument's full history before any range-bounding, so warm-up windows
//! see all available rows.

use crate::domain::bar::{IndicatorSnapshot, PriceBar};
use crate::domain::error::RewindError;
use crate::domain::indicator;
use crate::domain::resolve::{resolve_instrument, TickerResolution};
use crate::ports::history_port::HistoryPort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct CsvHistoryAdapter {
    series: HashMap<String, Vec<PriceBar>>,
    instruments: Vec<(String, String)>,
}

impl CsvHistoryAdapter {
    /// Read every CSV file in `base_path`. Fails if the directory holds no
    /// CSV files or any file is malformed.
    pub fn load(base_path: &Path) -> Result<Self, RewindError> {
        let entries = fs::read_dir(base_path).map_err(|e| RewindError::Data {
            reason: format!("failed to read directory {}: {}", base_path.display(), e),
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(RewindError::Data {
                reason: format!("no CSV files found in {}", base_path.display()),
            });
        }

        let mut series: HashMap<String, Vec<PriceBar>> = HashMap::new();
        let mut instruments = Vec::new();

        for path in paths {
            let bars = read_file(&path)?;
            if bars.is_empty() {
                continue;
            }
            let ticker = bars[0].ticker.clone();
            let company = bars[0].company_name.clone();
            if series.contains_key(&ticker) {
                return Err(RewindError::Data {
                    reason: format!("ticker {} appears in more than one file", ticker),
                });
            }
            series.insert(ticker.clone(), indicator::enrich(bars));
            instruments.push((ticker, company));
        }

        instruments.sort();
        Ok(Self {
            series,
            instruments,
        })
    }

    fn resolve(&self, query: &str) -> Result<&Vec<PriceBar>, RewindError> {
        if query.trim().is_empty() {
            return Err(RewindError::InvalidInput {
                reason: "instrument query must not be empty".into(),
            });
        }
        match resolve_instrument(query, &self.instruments) {
            TickerResolution::Resolved(ticker) => Ok(&self.series[&ticker]),
            TickerResolution::NotFound => Err(RewindError::NotFound {
                query: query.trim().to_string(),
                reason: "not present in the dataset".into(),
            }),
            TickerResolution::Ambiguous(tickers) => Err(RewindError::AmbiguousTicker {
                name: query.trim().to_string(),
                tickers,
            }),
        }
    }
}

impl HistoryPort for CsvHistoryAdapter {
    fn get_history(
        &self,
        query: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, RewindError> {
        let bars = self.resolve(query)?;
        let first = bars.first().map(|b| b.date).unwrap();
        let last = bars.last().map(|b| b.date).unwrap();

        let start = start.unwrap_or(first);
        let end = end.unwrap_or(last);

        if start > end {
            return Err(RewindError::InvalidInput {
                reason: format!("start date {start} is after end date {end}"),
            });
        }

        let subset: Vec<PriceBar> = bars
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .cloned()
            .collect();

        if subset.is_empty() {
            return Err(RewindError::NotFound {
                query: query.trim().to_string(),
                reason: format!("no rows in {start}..{end}; available {first}..{last}"),
            });
        }

        Ok(subset)
    }

    fn available_range(&self, query: &str) -> Result<(NaiveDate, NaiveDate, usize), RewindError> {
        let bars = self.resolve(query)?;
        Ok((
            bars.first().unwrap().date,
            bars.last().unwrap().date,
            bars.len(),
        ))
    }

    fn list_instruments(&self) -> Result<Vec<(String, String)>, RewindError> {
        Ok(self.instruments.clone())
    }
}

fn read_file(path: &Path) -> Result<Vec<PriceBar>, RewindError> {
    let file_err = |reason: String| RewindError::Data {
        reason: format!("{}: {}", path.display(), reason),
    };

    let mut rdr = csv::Reader::from_path(path)
        .map_err(|e| file_err(format!("failed to open CSV: {e}")))?;

    let headers = rdr
        .headers()
        .map_err(|e| file_err(format!("failed to read header: {e}")))?
        .clone();

    let column = |name: &str| -> Result<usize, RewindError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| file_err(format!("missing column '{name}'")))
    };

    let date_col = column("date")?;
    let open_col = column("open")?;
    let high_col = column("high")?;
    let low_col = column("low")?;
    let close_col = column("close")?;
    let volume_col = column("volume")?;
    let ticker_col = column("ticker")?;
    let company_col = column("company_name")?;

    let mut bars = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| file_err(format!("row {}: {e}", line + 2)))?;
        let row_err = |reason: String| file_err(format!("row {}: {reason}", line + 2));

        let date_str = str_field(&record, date_col, "date").map_err(&row_err)?.trim();
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|e| row_err(format!("invalid 'date' {date_str}: {e}")))?;

        let close = f64_field(&record, close_col, "close").map_err(&row_err)?;
        if !(close.is_finite() && close > 0.0) {
            return Err(row_err(format!("non-positive close {close}")));
        }

        let volume: i64 = str_field(&record, volume_col, "volume")
            .map_err(&row_err)?
            .trim()
            .parse()
            .map_err(|e| row_err(format!("invalid 'volume': {e}")))?;
        if volume < 0 {
            return Err(row_err(format!("negative volume {volume}")));
        }

        bars.push(PriceBar {
            ticker: str_field(&record, ticker_col, "ticker")
                .map_err(&row_err)?
                .trim()
                .to_string(),
            company_name: str_field(&record, company_col, "company_name")
                .map_err(&row_err)?
                .trim()
                .to_string(),
            date,
            open: f64_field(&record, open_col, "open").map_err(&row_err)?,
            high: f64_field(&record, high_col, "high").map_err(&row_err)?,
            low: f64_field(&record, low_col, "low").map_err(&row_err)?,
            close,
            volume,
            indicators: IndicatorSnapshot::default(),
        });
    }

    bars.sort_by_key(|b| b.date);
    for pair in bars.windows(2) {
        if pair[0].date == pair[1].date {
            return Err(file_err(format!("duplicate date {}", pair[0].date)));
        }
    }

    Ok(bars)
}

fn str_field<'r>(record: &'r csv::StringRecord, col: usize, name: &str) -> Result<&'r str, String> {
    record
        .get(col)
        .ok_or_else(|| format!("missing '{name}' value"))
}

fn f64_field(record: &csv::StringRecord, col: usize, name: &str) -> Result<f64, String> {
    str_field(record, col, name)?
        .trim()
        .parse()
        .map_err(|e| format!("invalid '{name}': {e}"))
}

#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;

pub use traderewind::domain::bar::{IndicatorSnapshot, PriceBar};
use traderewind::domain::error::RewindError;
use traderewind::domain::metrics::Summary;
use traderewind::domain::resolve::{resolve_instrument, TickerResolution};
use traderewind::domain::simulation::SimulationPoint;
use traderewind::ports::history_port::HistoryPort;
use traderewind::ports::report_port::ReportPort;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(ticker: &str, company: &str, date: NaiveDate, close: f64) -> PriceBar {
    PriceBar {
        ticker: ticker.to_string(),
        company_name: company.to_string(),
        date,
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000,
        indicators: IndicatorSnapshot::default(),
    }
}

/// Bars on consecutive days starting 2024-01-02.
pub fn make_bars(ticker: &str, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            make_bar(
                ticker,
                &format!("{ticker} Corp"),
                date(2024, 1, 2) + chrono::Duration::days(i as i64),
                close,
            )
        })
        .collect()
}

/// In-memory provider honouring the full history-port contract.
pub struct MockHistoryPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub instruments: Vec<(String, String)>,
}

impl MockHistoryPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            instruments: Vec::new(),
        }
    }

    pub fn with_bars(mut self, bars: Vec<PriceBar>) -> Self {
        let ticker = bars[0].ticker.clone();
        let company = bars[0].company_name.clone();
        self.data.insert(ticker.clone(), bars);
        self.instruments.push((ticker, company));
        self.instruments.sort();
        self
    }

    fn resolve(&self, query: &str) -> Result<&Vec<PriceBar>, RewindError> {
        if query.trim().is_empty() {
            return Err(RewindError::InvalidInput {
                reason: "instrument query must not be empty".into(),
            });
        }
        match resolve_instrument(query, &self.instruments) {
            TickerResolution::Resolved(ticker) => Ok(&self.data[&ticker]),
            TickerResolution::NotFound => Err(RewindError::NotFound {
                query: query.to_string(),
                reason: "not present in the dataset".into(),
            }),
            TickerResolution::Ambiguous(tickers) => Err(RewindError::AmbiguousTicker {
                name: query.to_string(),
                tickers,
            }),
        }
    }
}

impl HistoryPort for MockHistoryPort {
    fn get_history(
        &self,
        query: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, RewindError> {
        let bars = self.resolve(query)?;
        let first = bars.first().unwrap().date;
        let last = bars.last().unwrap().date;
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
                query: query.to_string(),
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

/// Report port that records what it was handed.
pub struct RecordingReport {
    pub calls: RefCell<Vec<(usize, Summary, f64)>>,
}

impl RecordingReport {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for RecordingReport {
    fn render(
        &self,
        series: &[SimulationPoint],
        summary: &Summary,
        initial_capital: f64,
    ) -> Result<(), RewindError> {
        self.calls
            .borrow_mut()
            .push((series.len(), summary.clone(), initial_capital));
        Ok(())
    }
}

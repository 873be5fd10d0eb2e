//! Instrument query resolution.
//!
//! A query is either a ticker symbol or a human-readable company name. Name
//! collisions are a business outcome, not an exception, so resolution returns
//! a tagged result and lets callers decide how to surface each case.

/// Outcome of resolving a query against the (ticker, company name) table.
#[derive(Debug, Clone, PartialEq)]
pub enum TickerResolution {
    Resolved(String),
    NotFound,
    Ambiguous(Vec<String>),
}

/// Resolve a query against known instruments. A ticker match (exact,
/// case-sensitive, as tickers are canonical uppercase) wins outright;
/// otherwise the query is treated as a company name.
pub fn resolve_instrument(query: &str, instruments: &[(String, String)]) -> TickerResolution {
    let q = query.trim();

    if instruments.iter().any(|(ticker, _)| ticker == q) {
        return TickerResolution::Resolved(q.to_string());
    }

    let mut matches: Vec<String> = instruments
        .iter()
        .filter(|(_, name)| name == q)
        .map(|(ticker, _)| ticker.clone())
        .collect();
    matches.sort();
    matches.dedup();

    match matches.len() {
        0 => TickerResolution::NotFound,
        1 => TickerResolution::Resolved(matches.remove(0)),
        _ => TickerResolution::Ambiguous(matches),
    }
}

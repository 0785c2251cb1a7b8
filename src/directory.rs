// Company name -> ticker lookup table
use crate::model::SelectionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolEntry {
    pub display_name: &'static str,
    pub ticker: &'static str,
}

const fn entry(display_name: &'static str, ticker: &'static str) -> SymbolEntry {
    SymbolEntry { display_name, ticker }
}

pub const COMPANIES: [SymbolEntry; 10] = [
    entry("Apple Inc.", "AAPL"),
    entry("Microsoft Corporation", "MSFT"),
    entry("Amazon.com Inc.", "AMZN"),
    entry("Alphabet Inc. (Google)", "GOOGL"),
    entry("Facebook Inc.", "FB"),
    entry("Tesla Inc.", "TSLA"),
    entry("Netflix Inc.", "NFLX"),
    entry("NVIDIA Corporation", "NVDA"),
    entry("The Walt Disney Company", "DIS"),
    entry("Coca-Cola Company", "KO"),
];

pub fn by_name(name: &str) -> Result<SymbolEntry, SelectionError> {
    let name = name.trim();
    COMPANIES
        .iter()
        .find(|e| e.display_name == name)
        .copied()
        .ok_or_else(|| SelectionError::UnknownCompany(name.to_string()))
}

/// Case-insensitive, the directory only holds upper-case tickers.
pub fn by_ticker(ticker: &str) -> Result<SymbolEntry, SelectionError> {
    let ticker = ticker.trim();
    COMPANIES
        .iter()
        .find(|e| e.ticker.eq_ignore_ascii_case(ticker))
        .copied()
        .ok_or_else(|| SelectionError::UnknownTicker(ticker.to_string()))
}

/// Resolves an interactive answer: a 1-based list position or a display name.
pub fn resolve_choice(input: &str) -> Result<SymbolEntry, SelectionError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SelectionError::Empty);
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=COMPANIES.len()).contains(&n) => Ok(COMPANIES[n - 1]),
        Ok(_) => Err(SelectionError::UnknownCompany(input.to_string())),
        Err(_) => by_name(input),
    }
}

use crate::directory::{self, SymbolEntry, COMPANIES};
use crate::model::{AppError, SelectionError};

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Company to show, by its full name (e.g. "Apple Inc.").
    #[arg(long, conflicts_with = "ticker")]
    pub company: Option<String>,

    /// Company to show, by ticker. Must be one of the listed companies.
    #[arg(long)]
    pub ticker: Option<String>,

    /// Path to the JSON config file. Defaults apply when it does not exist.
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the selectable companies and their tickers.
    List,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// The company picked by flags, if any.
    pub fn selection(&self) -> Result<Option<SymbolEntry>, SelectionError> {
        match (&self.company, &self.ticker) {
            (Some(name), _) => directory::by_name(name).map(Some),
            (None, Some(ticker)) => directory::by_ticker(ticker).map(Some),
            (None, None) => Ok(None),
        }
    }
}

pub fn write_company_list<W: Write>(out: &mut W) -> std::io::Result<()> {
    for (i, entry) in COMPANIES.iter().enumerate() {
        writeln!(out, "{:>2}. {} ({})", i + 1, entry.display_name, entry.ticker)?;
    }
    Ok(())
}

/// Interactive selection control: lists the companies and reads one answer.
pub fn prompt_selection<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<SymbolEntry, AppError> {
    writeln!(out, "Select a company:")?;
    write_company_list(out)?;
    write!(out, "> ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(directory::resolve_choice(&line)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_company_flag() {
        let cli = Cli::parse_from(["stock-tracker", "--company", "Netflix Inc."]);
        assert_eq!(cli.selection().unwrap().unwrap().ticker, "NFLX");
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parses_ticker_and_json_format() {
        let cli = Cli::parse_from(["stock-tracker", "--ticker", "dis", "--format", "json"]);
        assert_eq!(cli.selection().unwrap().unwrap().display_name, "The Walt Disney Company");
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn company_and_ticker_conflict() {
        assert!(Cli::try_parse_from(["stock-tracker", "--company", "Apple Inc.", "--ticker", "AAPL"]).is_err());
    }

    #[test]
    fn unknown_company_is_an_error() {
        let cli = Cli::parse_from(["stock-tracker", "--company", "Apple"]);
        assert_eq!(cli.selection(), Err(SelectionError::UnknownCompany("Apple".into())));
    }

    #[test]
    fn list_subcommand() {
        let cli = Cli::parse_from(["stock-tracker", "list"]);
        assert!(matches!(cli.command, Some(Commands::List)));
        assert_eq!(cli.selection(), Ok(None));
    }

    #[test]
    fn prompt_reads_a_number() {
        let mut input = Cursor::new("8\n");
        let mut out = Vec::new();
        let entry = prompt_selection(&mut input, &mut out).unwrap();
        assert_eq!(entry.ticker, "NVDA");

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.starts_with("Select a company:"));
        assert!(shown.contains(" 1. Apple Inc. (AAPL)"));
        assert!(shown.contains("10. Coca-Cola Company (KO)"));
    }

    #[test]
    fn prompt_rejects_empty_answer() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        let err = prompt_selection(&mut input, &mut out).unwrap_err();
        assert!(matches!(err, AppError::Selection(SelectionError::Empty)));
    }
}

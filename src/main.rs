mod analyzer;
mod cli;
mod config;
mod dashboard;
mod directory;
mod fetcher;
mod model;

use clap::Parser;
use cli::{Cli, Commands, OutputFormat};
use config::load_config;
use dashboard::{render_json, Dashboard};
use fetcher::YahooSource;
use model::AppError;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr, stdout is the dashboard
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {}", panic_info);
    }));

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(Commands::List) = cli.command {
        cli::write_company_list(&mut out)?;
        return Ok(());
    }

    let config = load_config(&cli.config)?;

    let entry = match cli.selection()? {
        Some(entry) => entry,
        None => cli::prompt_selection(&mut io::stdin().lock(), &mut out)?,
    };
    info!("Selected {} ({})", entry.display_name, entry.ticker);

    let source = YahooSource::new(&config.provider_base_url, &config.user_agent)?;
    let dashboard = Dashboard::new(source, &config);

    let today = chrono::Local::now().date_naive();
    let report = dashboard.load(entry, today).await?;

    match cli.format {
        OutputFormat::Text => dashboard.render_text(report.as_ref(), &mut out)?,
        OutputFormat::Json => render_json(entry, report.as_ref(), &mut out)?,
    }
    out.flush()?;
    Ok(())
}

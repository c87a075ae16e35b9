use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use backend_bootstrap::cli::{Cli, Command};
use backend_bootstrap::commands::{score_once, write_reports};
use backend_bootstrap::context::AppContext;
use backend_bootstrap::run_standalone;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // logs go to stderr so `score` output stays pipeable
    if args.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut config = AppContext::load(args.config.as_deref()).await?;
    match args.command {
        Command::Serve => run_standalone(AppContext::from_config(config)).await,
        Command::Score {
            input,
            format,
            no_live,
            seed,
        } => {
            if let Some(input) = input {
                config.data_path = input.to_string_lossy().to_string();
            }
            let context = AppContext::from_config(config);
            let output = score_once(&context.state, format, no_live, seed).await?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&output)?;
            stdout.flush()?;
            Ok(())
        }
        Command::Report { out_dir, zone } => {
            let context = AppContext::from_config(config);
            let files = write_reports(&context.state, out_dir, zone.as_deref()).await?;
            info!("open {} in a browser", files.dashboard.display());
            Ok(())
        }
    }
}

use anyhow::Result;
use clap::Parser;
use ectd_validate::app::App;
use ectd_validate::models::Config;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "ectd-validate")]
#[command(about = "Upload a PDF to a remote eCTD validation service")]
struct CliArgs {
    /// PDF file to submit for validation.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Validation endpoint URL, overriding ECTD_ENDPOINT.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Request timeout in seconds, overriding ECTD_TIMEOUT_SECS.
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ectd_validate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config.with_overrides(args.endpoint, args.timeout_secs),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("Validation endpoint: {}", config.endpoint);

    let mut app = match App::new(&config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize upload client: {}", e);
            std::process::exit(1);
        }
    };

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message("Uploading...");
    let bar_hook = bar.clone();
    app.set_progress_hook(Arc::new(move |pct| bar_hook.set_position(pct as u64)));

    match app.run(args.file.as_deref()).await {
        Ok(()) => {
            bar.finish_and_clear();
            Ok(())
        }
        Err(e) => {
            bar.finish_and_clear();
            error!("Validation failed: {}", e);
            std::process::exit(1);
        }
    }
}

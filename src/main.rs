use anyhow::{Context, Result};
use clap::Parser;
use parley::audio::default_devices;
use parley::backend::HttpBackend;
use parley::config::ClientConfig;
use parley::ui::{self, AppState, Page};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Desktop chat and voice client for a conversational assistant
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
struct Args {
    /// Configuration file (defaults to <config dir>/parley/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides the file and PARLEY_BACKEND_URL
    #[arg(long)]
    backend_url: Option<String>,

    /// Page shown at startup: chat or voice
    #[arg(long, default_value = "chat")]
    page: Page,

    /// Run without microphone or speaker
    #[arg(long)]
    no_audio: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::load(args.config.as_deref())?;
    if let Some(url) = args.backend_url {
        config = config.with_backend_url(url);
        config.validate()?;
    }
    if args.no_audio {
        config = config.without_audio();
    }

    info!("Starting Parley against {}", config.backend.base_url);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let backend = Arc::new(HttpBackend::new(&config.backend, &config.voice.upload_field)?);
    let (capture, player) = default_devices(config.voice.enable_audio);

    let state = AppState::from_config(&config, backend, capture, player, runtime.handle().clone())
        .with_page(args.page);

    ui::run(state).map_err(|e| anyhow::anyhow!("UI error: {}", e))?;

    info!("Parley exited");
    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use voyager::agent::LocalAgent;
use voyager::config::{BackendKind, DemoConfig};
use voyager::render::{Fragment, Visualizer};
use voyager::services::backend::StageBackend;
use voyager::services::http::HttpBackend;
use voyager::{RunContext, StageController};

/// Runs the agentic travel-planning demo once and prints each stage view.
#[derive(Parser, Debug)]
#[command(name = "voyager", version, about)]
struct Cli {
    /// Traveler name
    #[arg(long)]
    name: String,

    /// Free-text preferences, e.g. "indoor, cultural"
    #[arg(long, default_value = "indoor, cultural")]
    preferences: String,

    /// City to plan for [env: VOYAGER_LOCATION]
    #[arg(long)]
    location: Option<String>,

    /// local | http [env: VOYAGER_BACKEND]
    #[arg(long)]
    backend: Option<String>,

    /// Base URL of the http backend [env: VOYAGER_BASE_URL]
    #[arg(long)]
    base_url: Option<String>,

    /// html | json | tools [env: VOYAGER_PRESENTATION]
    #[arg(long)]
    presentation: Option<String>,

    /// Per-request timeout in ms, 0 for none [env: VOYAGER_TIMEOUT_MS]
    #[arg(long)]
    timeout_ms: Option<String>,

    /// After the run, follow the server's visualization stream (http backend only)
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("voyager=info")))
        .init();

    let cli = Cli::parse();

    let mut config = DemoConfig::from_env().context("Invalid VOYAGER_* environment")?;
    let overrides = [
        ("location", &cli.location),
        ("backend", &cli.backend),
        ("base_url", &cli.base_url),
        ("presentation", &cli.presentation),
        ("timeout_ms", &cli.timeout_ms),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            config.set(key, value).with_context(|| format!("Invalid --{}", key.replace('_', "-")))?;
        }
    }

    let context = RunContext::new(cli.name.clone(), cli.preferences.clone()).with_location(config.location.clone());
    tracing::info!("Voyager demo starting ({:?} backend)", config.backend);

    match config.backend {
        BackendKind::Local => run_demo(Arc::new(LocalAgent::new()), &config, context).await,
        BackendKind::Http => {
            let backend = Arc::new(HttpBackend::new(config.base_url.clone()));
            run_demo(Arc::clone(&backend), &config, context).await?;
            if cli.watch {
                watch(&backend).await?;
            }
            Ok(())
        }
    }
}

async fn run_demo<B: StageBackend>(backend: Arc<B>, config: &DemoConfig, context: RunContext) -> Result<()> {
    let mut controller = StageController::new(backend, config.controller());

    print_fragments(&controller.start(context));
    while !controller.is_done() {
        match controller.next_event().await {
            Some(fragments) => print_fragments(&fragments),
            None => break,
        }
    }

    let snapshot = controller.machine.telemetry.snapshot();
    tracing::info!(
        "Run finished: {} live payloads, {} fallbacks",
        snapshot.payload_stats.live,
        snapshot.payload_stats.fallback
    );
    Ok(())
}

async fn watch(backend: &HttpBackend) -> Result<()> {
    let visualizer = Visualizer::new();
    let mut updates = backend
        .subscribe()
        .await
        .with_context(|| format!("Could not open event stream at {}", backend.base_url()))?;

    tracing::info!("Following visualization updates. Press Ctrl+C to stop.");
    while let Some(update) = updates.next().await {
        match update {
            Ok(update) => print_fragments(&visualizer.apply(&update)),
            Err(e) => tracing::warn!("Event stream error: {}", e),
        }
    }
    Ok(())
}

fn print_fragments(fragments: &[Fragment]) {
    for fragment in fragments {
        println!("[{}]\n{}\n", fragment.section, fragment.markup);
    }
}

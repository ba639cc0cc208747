//! Newscheck entrypoint: one-shot `check` or the HTTP `serve` mode.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use newscheck::config::Config;
use newscheck::embedding::{Embedder, EncoderConfig, SentenceEncoder};
use newscheck::gateway::{AppState, create_router};
use newscheck::index::{DEFAULT_COLLECTION, EmbeddingIndex};
use newscheck::pipeline::{FactCheckPipeline, FactChecker, PipelineConfig};
use newscheck::report::{GenaiReportGenerator, ReportGenerator};
use newscheck::scrape::ArticleScraper;
use newscheck::search::DuckDuckGoSearch;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

type Checker = FactChecker<DuckDuckGoSearch, ArticleScraper, Embedder>;

#[derive(Debug, Parser)]
#[command(name = "newscheck", version, about = "Fact-check claims against current news")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check one claim and print the report.
    Check {
        claim: String,

        /// Print the ranked passages without generating a report.
        #[arg(long)]
        context_only: bool,

        /// Print the result as JSON.
        #[arg(long, conflicts_with = "context_only")]
        json: bool,
    },
    /// Serve `POST /process-query` over HTTP.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.validate()?;

    let (checker, embedder_stub, encoder_stub) = build_checker(&config)?;

    match cli.command {
        Command::Check {
            claim,
            context_only,
            json,
        } => {
            if context_only {
                println!("{}", checker.pipeline().gather_context(&claim).await);
                return Ok(());
            }

            let result = checker.check(&claim).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.output);
            }
        }
        Command::Serve => {
            let addr: SocketAddr = config.socket_addr().parse()?;
            let state = AppState::new(Arc::new(checker), config.index_path.clone())
                .with_modes(embedder_stub, encoder_stub);
            let app = create_router(state);

            let listener = TcpListener::bind(addr).await?;
            tracing::info!(addr = %addr, "Server listening");

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("Newscheck shutdown complete");
        }
    }

    Ok(())
}

fn build_checker(config: &Config) -> anyhow::Result<(Checker, bool, bool)> {
    let timeout = config.http_timeout();

    let embedder = Embedder::from_config(config)?;
    let embedder_stub = embedder.is_stub();
    let index = Arc::new(EmbeddingIndex::open(
        config.index_path.clone(),
        DEFAULT_COLLECTION,
        embedder,
    )?);

    let encoder = SentenceEncoder::load(EncoderConfig::from_optional_path(
        config.encoder_path.clone(),
    ))?;
    let encoder_stub = encoder.is_stub();

    let pipeline = FactCheckPipeline::new(
        DuckDuckGoSearch::new(&config.search_endpoint, timeout)?,
        ArticleScraper::new(timeout)?,
        index,
        Arc::new(encoder),
        PipelineConfig::from_config(config),
    )?;

    let generator: Arc<dyn ReportGenerator> =
        Arc::new(GenaiReportGenerator::new(config.report_model.clone(), timeout));

    tracing::info!(
        index_path = %config.index_path.display(),
        embedder_stub,
        encoder_stub,
        report_model = %config.report_model,
        "Fact checker ready"
    );

    Ok((FactChecker::new(pipeline, generator), embedder_stub, encoder_stub))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use lesson_promo::app::lesson_store::{GcsLessonStore, LessonStore, LocalFsLessonStore};
use lesson_promo::app::server::{AppState, router};
use lesson_promo::gemini::GeminiGenerator;
use lesson_promo::line::LineBroadcaster;
use lesson_promo::publish::LESSONS_PREFIX;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct AppArgs {
    /// Listen address. `$PORT` (Cloud Run) takes precedence and binds 0.0.0.0.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Directory for locally published lesson pages (when no bucket is set).
    #[arg(long, default_value = "workspace-app")]
    data_dir: PathBuf,

    /// Public base URL of this app, used in locally published page URLs.
    #[arg(long)]
    public_base_url: Option<String>,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    lesson_promo::logging::init("info")?;

    let args = AppArgs::parse();
    tracing::info!(?args, "starting lesson-promo-app");

    let addr = match std::env::var("PORT").ok().and_then(|v| v.trim().parse::<u16>().ok()) {
        Some(port) => SocketAddr::from(([0, 0, 0, 0], port)),
        None => args.addr,
    };

    let bucket = std::env::var("LESSON_PROMO_BUCKET")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let (lesson_store, lessons_dir): (Arc<dyn LessonStore>, Option<PathBuf>) = match &bucket {
        Some(bucket) => {
            tracing::info!(bucket = %bucket, "using GCS lesson store");
            (Arc::new(GcsLessonStore::from_env(bucket.clone())), None)
        }
        None => {
            let public_base_url = args
                .public_base_url
                .clone()
                .unwrap_or_else(|| format!("http://{addr}"));
            tracing::info!(
                data_dir = %args.data_dir.display(),
                public_base_url = %public_base_url,
                "using local filesystem lesson store"
            );
            (
                Arc::new(LocalFsLessonStore::new(args.data_dir.clone(), public_base_url)),
                Some(args.data_dir.join(LESSONS_PREFIX)),
            )
        }
    };

    let generator = GeminiGenerator::from_env();
    tracing::info!(model = generator.model(), "using vertex ai");
    let broadcaster = LineBroadcaster::from_env();
    tracing::info!(?broadcaster, "using line broadcaster");

    let state = AppState {
        generator: Arc::new(generator),
        lesson_store,
        broadcaster: Arc::new(broadcaster),
    };
    let app = router(state, lessons_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {addr}: {err}"))?;
    tracing::info!(addr = %addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(?err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

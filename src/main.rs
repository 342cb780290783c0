use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;
use lesson_promo::app::lesson_store::{GcsLessonStore, LessonStore, LocalFsLessonStore};
use lesson_promo::cli::{BroadcastArgs, Cli, Command, GenerateArgs, PublishArgs};
use lesson_promo::gemini::GeminiGenerator;
use lesson_promo::lesson::PublishRequest;
use lesson_promo::line::{Broadcaster as _, LineBroadcaster};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    lesson_promo::logging::init("info").context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Generate(args) => generate(args).await.context("generate")?,
        Command::Publish(args) => publish(args).await.context("publish")?,
        Command::Broadcast(args) => broadcast(args).await.context("broadcast")?,
    }

    Ok(())
}

async fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let request = args.to_request()?;
    let generator = GeminiGenerator::from_env();
    tracing::info!(model = generator.model(), "using vertex ai");

    let result = lesson_promo::generate::generate(&generator, &request).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn publish(args: PublishArgs) -> anyhow::Result<()> {
    let html = tokio::fs::read_to_string(&args.html)
        .await
        .with_context(|| format!("read html: {}", args.html))?;

    let bucket = args.bucket.clone().or_else(|| {
        std::env::var("LESSON_PROMO_BUCKET")
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    });
    let store: Box<dyn LessonStore> = match bucket {
        Some(bucket) => Box::new(GcsLessonStore::from_env(bucket)),
        None => Box::new(LocalFsLessonStore::new(
            &args.data_dir,
            &args.public_base_url,
        )),
    };

    let request = PublishRequest {
        html,
        date: args.date,
    };
    let published = lesson_promo::publish::publish(store.as_ref(), &request)
        .await
        .map_err(|err| match err.details() {
            Some(details) => anyhow::anyhow!("{err}: {details}"),
            None => anyhow::anyhow!("{err}"),
        })?;
    println!("{}", serde_json::to_string_pretty(&published)?);
    Ok(())
}

async fn broadcast(args: BroadcastArgs) -> anyhow::Result<()> {
    LineBroadcaster::from_env().broadcast(&args.message).await?;
    tracing::info!("broadcast sent");
    Ok(())
}

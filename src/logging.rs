use anyhow::Context as _;

/// Installs the global `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` overrides `default_filter`. Setting `LESSON_PROMO_LOG_FORMAT=json`
/// switches to one JSON object per line, which Cloud Logging parses natively.
pub fn init(default_filter: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_filter))
        .context("build log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let result = if json_requested() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}

fn json_requested() -> bool {
    std::env::var("LESSON_PROMO_LOG_FORMAT")
        .is_ok_and(|v| v.trim().eq_ignore_ascii_case("json"))
}

//! pipeline-forge binary.
//!
//! Rendered configuration goes to stdout, so logs are written to stderr.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` directives win over `--log-level`; anything unparsable falls
/// through to the next source and finally to `info`.
fn log_filter(rust_log: Option<&str>, log_level: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(log_level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = pipeline_forge::cli::parse_cli();
    let rust_log = std::env::var("RUST_LOG").ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(rust_log.as_deref(), &cli.log_level))
        .init();

    pipeline_forge::cli::run_with_cli(cli).await
}

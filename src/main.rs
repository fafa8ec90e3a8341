use anyhow::Result;
use tracing::info;

use vapor_uci::UciEngine;

fn main() -> Result<()> {
    // Protocol output owns stdout; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("vapor starting");
    UciEngine::new().run()?;
    Ok(())
}

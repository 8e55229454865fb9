//! Back-office console demo for the till-nav content router.

mod app;
mod model;
mod panels;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // The terminal owns stdout; logs go to a file instead.
    let log = std::fs::File::create("till-demo.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(std::sync::Arc::new(log))
        .init();

    app::Console::new().run().await
}

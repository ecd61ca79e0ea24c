//! Interactive todo shell.
//!
//! Reads line commands from stdin; see `help` for the list. Logs go to
//! stderr and are filtered by `TODO_LOG` (or `RUST_LOG`).

use anyhow::Context;
use todo::{ShellConfig, TodoStore, run_shell};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let config = ShellConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| EnvFilter::new(ShellConfig::DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(?config, "Starting todo shell");

    let mut store = TodoStore::new();
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_shell(&mut store, &config, stdin.lock(), stdout.lock())
        .context("todo shell I/O failed")?;

    tracing::info!(
        remaining = store.len(),
        completed = store.completed_count(),
        "Todo shell closed"
    );
    Ok(())
}

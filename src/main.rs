mod config;
mod db;
mod models;
mod run;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let cli = run::Cli::parse();
    init_tracing();

    let db_path = config::resolve_db_path(cli.db.as_deref())?;
    let mut db = db::Database::open(&db_path)?;
    run::as_cli(cli.command, &mut db)
}

/// Diagnostics go to stderr, filtered by `FINTRACK_LOG` (default `warn`).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("FINTRACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

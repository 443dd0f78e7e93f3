mod app;
mod args;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{app::App, args::Args};

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level)?;

    let mut app = App::new(args)?;
    app.run()
}

/// `RUST_LOG` wins over `--log-level` when set.
fn init_tracing(level: Level) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    match EnvFilter::try_from_default_env() {
        Ok(filter) => {
            tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish())?
        }
        Err(_) => tracing::subscriber::set_global_default(builder.with_max_level(level).finish())?,
    }
    Ok(())
}

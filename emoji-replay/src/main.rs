//! # Emoji Canvas Replay
//!
//! Replays a gesture script and prints the resulting report.

use clap::Parser;
use emoji_replay::{CliArgs, ReplayConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the report on stdout stays machine readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emoji_replay=info,emoji_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = ReplayConfig::from(args);
    tracing::debug!("Replay config: {:?}", config);

    let report = config.run()?;
    println!("{report}");

    tracing::info!("Replay finished");
    Ok(())
}

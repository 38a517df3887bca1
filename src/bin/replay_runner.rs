use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use replay_mm::config::runner::load_runner_config;
use replay_mm::engine::replay::ReplayEngine;
use replay_mm::feed::csv_replay::CsvReplayFeed;
use replay_mm::logging::dashboard::Dashboard;
use replay_mm::logging::results::ResultsCsvLogger;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "replay-runner", about = "LOB replay market-making simulator")]
struct Cli {
    /// Path to YAML configuration
    #[arg(long, default_value = "config/replay.yaml")]
    config: String,

    /// Event stream CSV; overrides the configured path
    #[arg(long)]
    data: Option<String>,

    /// Stop after one pass instead of replaying forever
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_runner_config(&cli.config)?;
    if let Some(data) = cli.data {
        config.data = data;
    }

    info!(
        data = %config.data,
        output = %config.output,
        tick_usd = config.tick_usd,
        "starting replay"
    );

    let feed = CsvReplayFeed::new(&config.data);
    let mut engine = ReplayEngine::new(&config);
    let mut results = ResultsCsvLogger::create(&config.output)?;
    let dashboard = config.mode.dashboard.then(|| Dashboard::new(&config));
    let pacing = Duration::from_millis(config.refresh_ms);

    // Replays forever: the book is rebuilt each pass, the portfolio carries.
    loop {
        let pass = feed.open_pass()?;
        engine.begin_pass();
        for record in pass {
            if let Some(snap) = engine.on_event(&record) {
                results.append(&snap)?;
                if let Some(dashboard) = &dashboard {
                    dashboard.render(&snap);
                }
                if !pacing.is_zero() {
                    thread::sleep(pacing);
                }
            }
        }
        info!("pass complete, replaying event stream");
        if cli.once {
            break;
        }
    }

    Ok(())
}

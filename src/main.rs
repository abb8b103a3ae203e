//! Warband - Entry Point
//!
//! Opens the store, starts the background sweeps and reads commands from
//! stdin, one `<player> <command> [args]` per line. A chat adapter drives
//! the same `execute` call with the same shape of input.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use warband::core::config::GameConfig;
use warband::core::error::Result;
use warband::core::types::CommanderKey;
use warband::service::{execute, Command, GameService};
use warband::store::Store;
use warband::sweep::{reset_sweep, session_sweep, supply_sweep};

/// Warband game engine
#[derive(Parser, Debug)]
#[command(name = "warband")]
#[command(about = "Run the warband engine over a line-based command stream")]
struct Args {
    /// TOML config file; missing means defaults
    #[arg(long, default_value = "config/warband.toml")]
    config: PathBuf,

    /// JSON snapshot the store persists to
    #[arg(long, default_value = "data/warband.json")]
    data: PathBuf,

    /// Guild scope every stdin command runs in
    #[arg(long, default_value_t = 1)]
    scope: u64,

    /// Random seed for deterministic runs (overrides the config)
    #[arg(long)]
    seed: Option<u64>,
}

fn spawn_sweeps(service: Arc<GameService>) {
    let supply_every = Duration::from_secs(service.config().supply_sweep_minutes.max(1) * 60);
    let reset_every = Duration::from_secs(service.config().reset_sweep_hours.max(1) * 3600);

    let supply = Arc::clone(&service);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(supply_every);
        loop {
            interval.tick().await;
            if let Err(e) = supply_sweep(supply.store(), Utc::now()) {
                tracing::error!(error = %e, "Supply sweep failed");
            }
        }
    });

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(reset_every);
        loop {
            interval.tick().await;
            let now = Utc::now();
            if let Err(e) = reset_sweep(service.store(), now) {
                tracing::error!(error = %e, "Reset sweep failed");
            }
            if let Err(e) = session_sweep(service.store(), service.config(), now) {
                tracing::error!(error = %e, "Session sweep failed");
            }
        }
    });
}

async fn run(args: Args) -> Result<()> {
    let mut config = GameConfig::load(&args.config)?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    if let Some(dir) = args.data.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let store = Store::open(&args.data)?;
    store.seed_catalogs()?;

    let service = Arc::new(GameService::new(config, store));
    spawn_sweeps(Arc::clone(&service));

    tracing::info!(scope = args.scope, data = %args.data.display(), "Warband ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "q" {
            break;
        }

        let Some((player, rest)) = line.split_once(char::is_whitespace) else {
            println!("usage: <player> <command> [args]");
            continue;
        };
        let Ok(player) = player.parse::<u64>() else {
            println!("'{player}' is not a player id");
            continue;
        };

        let response = match Command::parse(rest) {
            Ok(command) => execute(&service, CommanderKey::new(player, args.scope), command, Utc::now()),
            Err(usage) => {
                println!("{usage}");
                continue;
            }
        };
        let mark = if response.success { "ok" } else { "!!" };
        println!("[{mark}] {}", response.message);
    }

    tracing::info!("Warband shutting down");
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warband=info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "Fatal");
        std::process::exit(1);
    }
}

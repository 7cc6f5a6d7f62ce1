//! mpris-remote - forwards infrared remote presses to MPRIS media players.
//!
//! Startup order matters: configuration problems, including a missing
//! serial device, are reported before anything touches the bus.

use std::{env, error::Error, path::PathBuf, process};

use clap::{Parser, Subcommand};
use mpris_remote::{
    bridge::Bridge,
    config::{Config, ConfigPaths, TTY_PATH_ENV},
    tracing_config,
};
use tracing::{Instrument, info_span};

#[derive(Parser)]
#[command(name = "mpris-remote", version)]
#[command(about = "Control MPRIS media players with a serial infrared remote")]
struct Cli {
    /// Configuration file to use instead of the default location
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Forward remote presses to the active player (default)
    Run {
        /// Serial device of the receiver, overrides TTY_PATH and the config file
        #[arg(short, long)]
        device: Option<PathBuf>,

        /// Also write logs to the data directory
        #[arg(long)]
        log_file: bool,
    },
    /// List the players on the bus in selection order
    List,
    /// Print the JSON schema of the configuration file
    Schema,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    Ok(())
}

async fn execute(cli: Cli) -> Result<(), Box<dyn Error>> {
    let command = cli.command.unwrap_or(Commands::Run {
        device: None,
        log_file: false,
    });

    match command {
        Commands::Schema => {
            let schema = schemars::schema_for!(Config);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Commands::List => {
            let config = Config::load(cli.config.as_deref())?;
            config.validate()?;
            let _guard = tracing_config::init(config.general.log_level, None)?;

            let bridge = Bridge::connect(&config).await?;
            let players = bridge.list_players().await;
            if players.is_empty() {
                println!("No MPRIS players found");
            }
            for player in players {
                let marker = if player.active { "*" } else { " " };
                let identity = player.identity.unwrap_or_default();
                println!(
                    "{marker} {:<24} {:<24} {}",
                    player.id.display_name(),
                    identity,
                    player.id
                );
            }
        }
        Commands::Run { device, log_file } => {
            let mut config = Config::load(cli.config.as_deref())?;
            config.apply_overrides(env::var(TTY_PATH_ENV).ok(), device);
            config.validate()?;
            config.device_path()?;

            let log_dir = if log_file {
                Some(ConfigPaths::log_dir()?)
            } else {
                None
            };
            let _guard = tracing_config::init(config.general.log_level, log_dir.as_deref())?;
            async {
                let bridge = Bridge::connect(&config).await?;
                bridge.run(&config).await
            }
            .instrument(info_span!("mpris_remote"))
            .await?;
        }
    }

    Ok(())
}

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use songlib_core::SongId;
use songlib_service::config::{self, Config, Overrides};

mod api;
mod commands;

#[derive(Debug, Parser)]
#[command(name = "songlib", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (default: ~/.config/songlib/config.toml)
    #[arg(long, global = true, env = "SONGLIB_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the database (default: ~/.local/share/songlib/songlib.db)
    #[arg(long, global = true, env = "SONG_LIBRARY_DB_PATH")]
    db: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set (e.g. "debug", "songlib=trace")
    #[arg(long, global = true, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Run the song library HTTP API
    ///
    /// Serves the song catalog over HTTP:
    ///
    /// - GET    /songs          list songs (filters: group, song, releaseDate;
    ///   paging: offset, limit)
    /// - GET    /songs/{id}     one page of a song's verses (offset, limit)
    /// - POST   /songs          add a song; metadata is fetched from the
    ///   music-info service
    /// - PUT    /songs/{id}     replace a song
    /// - DELETE /songs/{id}     remove a song
    /// - GET    /health         liveness check
    /// - GET    /swagger/       Swagger UI over /api-docs/openapi.json
    ///
    /// SIGINT or SIGTERM stops accepting connections and gives in-flight
    /// requests the configured grace period before exiting.
    Serve {
        /// Port to listen on
        #[arg(long, short, env = "PORT")]
        port: Option<u16>,

        /// Base URL of the music-info service
        #[arg(long, env = "MUSIC_INFO_URL")]
        music_info_url: Option<String>,
    },
    /// Show library status, or one stored song
    Status {
        /// Song id to show in full
        id: Option<SongId>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with example content
    Init,
    /// Print a setting, or the whole file when no key is given
    Get {
        /// Setting name, e.g. "port" or "enrichment.required"
        key: Option<String>,
    },
    /// Change a setting in the config file
    Set {
        /// Setting name, e.g. "port" or "enrichment.required"
        key: String,
        /// New value
        value: String,
    },
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(config::config_file_path);
    let config = Config::load_from(&config_path)?.apply(Overrides {
        database_path: cli.db,
        log_level: cli.log_level,
        ..Overrides::default()
    });

    init_logging(&config.log_level);

    match cli.command {
        Commands::Serve {
            port,
            music_info_url,
        } => {
            let config = config.apply(Overrides {
                port,
                music_info_url,
                ..Overrides::default()
            });
            commands::run_serve(config).await?;
        }
        Commands::Status { id } => {
            commands::show_status(&config, id)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config, &config_path),
            ConfigAction::Path => commands::config::show_path(&config_path),
            ConfigAction::Example => commands::config::show_example(),
            ConfigAction::Init => commands::config::init_config(&config_path)?,
            ConfigAction::Get { key } => {
                commands::config::get_config(&config, &config_path, key.as_deref())?;
            }
            ConfigAction::Set { key, value } => {
                commands::config::set_config(&config_path, &key, &value)?;
            }
        },
    }

    Ok(())
}

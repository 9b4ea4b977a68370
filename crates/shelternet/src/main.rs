//! Shelternet server
//!
//! Usage:
//!     shelternet serve --bind 127.0.0.1:8080 --database sqlite:shelternet.sqlite
//!     shelternet init-db --database sqlite:shelternet.sqlite

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shelternet::{server, ConfigOverrides, ServerConfig, DEFAULT_CONFIG_FILE};
use shelternet_logging::{init_logging, LogConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shelternet", about = "Animal shelter network server")]
struct Cli {
    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./shelternet.toml when present)
    #[arg(long, global = true, env = "SHELTERNET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[command(flatten)]
        common: CommonArgs,

        /// Address to listen on
        #[arg(long, env = "SHELTERNET_BIND")]
        bind: Option<String>,

        /// HTTP worker threads
        #[arg(long, env = "SHELTERNET_WORKERS")]
        workers: Option<usize>,

        /// Staff username for mutating endpoints
        #[arg(long, env = "SHELTERNET_AUTH_USER")]
        auth_user: Option<String>,

        /// Staff password for mutating endpoints
        #[arg(long, env = "SHELTERNET_AUTH_PASSWORD", hide_env_values = true)]
        auth_password: Option<String>,

        /// Directory for rolling log files
        #[arg(long, env = "SHELTERNET_LOG_DIR")]
        log_dir: Option<PathBuf>,
    },

    /// Create the database schema and exit
    InitDb {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// Database connection string
    #[arg(long, env = "SHELTERNET_DATABASE")]
    database: Option<String>,
}

fn load_config(cli_path: Option<&PathBuf>) -> Result<ServerConfig> {
    let config = match cli_path {
        Some(path) => ServerConfig::load_required(path),
        None => ServerConfig::load(&PathBuf::from(DEFAULT_CONFIG_FILE)),
    };
    config.context("Failed to load configuration")
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Serve {
            common,
            bind,
            workers,
            auth_user,
            auth_password,
            log_dir,
        } => {
            config.apply(ConfigOverrides {
                bind,
                database: common.database,
                workers,
                auth_username: auth_user,
                auth_password,
                log_dir,
            });

            let _guard = init_logging(LogConfig {
                app_name: "shelternet",
                verbose: cli.verbose,
                log_dir: config.logging.dir.as_deref(),
            })?;

            server::run(config).await
        }
        Commands::InitDb { common } => {
            config.apply(ConfigOverrides {
                database: common.database,
                ..Default::default()
            });

            let _guard = init_logging(LogConfig {
                app_name: "shelternet",
                verbose: cli.verbose,
                log_dir: None,
            })?;

            server::init_db(&config).await
        }
    }
}

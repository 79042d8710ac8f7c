use clap::{Args, Parser, Subcommand};
use rally_session_cli::application::{run_host, run_member};
use rally_session_cli::infrastructure::schema;
use rally_session_cli::{CliError, LogConfig, Result};
use rally_session_core::application::DEFAULT_SCENE;
use rally_session_core::domain::DEFAULT_MAX_MEMBERS;
use rally_session_net::application::{DEFAULT_ADDRESS, DEFAULT_PORT};
use rally_session_net::SessionConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "rally-cli")]
#[command(
    version,
    about = "Rally Session CLI - host or join a multiplayer session"
)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Endpoint {
    /// Address to bind (host) or connect to (join)
    #[arg(short = 'a', long, default_value = DEFAULT_ADDRESS)]
    address: String,

    /// TCP port
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[derive(Subcommand)]
enum Commands {
    /// Host a session as the authority
    Host {
        #[command(flatten)]
        endpoint: Endpoint,

        /// Maximum registered members
        #[arg(long, default_value_t = DEFAULT_MAX_MEMBERS)]
        max_members: usize,

        /// Scene members load when the game starts
        #[arg(long, default_value = DEFAULT_SCENE)]
        scene: String,

        /// Abort a readiness round after this many seconds
        #[arg(long)]
        ready_timeout: Option<u64>,
    },

    /// Join a session as a member
    Join {
        #[command(flatten)]
        endpoint: Endpoint,

        /// Display name (blank: Player<id>)
        #[arg(short = 'n', long, default_value = "")]
        name: String,

        /// Seconds to wait for the connection and handshake
        #[arg(long, default_value_t = 30)]
        connect_timeout: u64,

        /// Simulated scene load time in milliseconds
        #[arg(long, default_value_t = 500)]
        load_delay_ms: u64,
    },

    /// Write JSON schemas of the wire messages
    Schema {
        /// Output directory
        #[arg(short = 'o', long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = match (&cli.command, cli.verbose) {
        (_, true) => LogConfig::dev(),
        (Commands::Join { .. }, false) => LogConfig::quiet(),
        _ => LogConfig::default(),
    };
    if cli.json_logs {
        log_config = log_config.with_json();
    }
    log_config.init()?;

    match cli.command {
        Commands::Host {
            endpoint,
            max_members,
            scene,
            ready_timeout,
        } => {
            if max_members == 0 {
                return Err(CliError::InvalidConfig(
                    "max-members must be at least 1".to_string(),
                ));
            }

            let mut config = SessionConfig::new(endpoint.address, endpoint.port)
                .with_max_members(max_members)
                .with_scene(scene);
            if let Some(secs) = ready_timeout {
                config = config.with_ready_timeout(Duration::from_secs(secs));
            }

            run_host(config).await?;
        }

        Commands::Join {
            endpoint,
            name,
            connect_timeout,
            load_delay_ms,
        } => {
            let config = SessionConfig::new(endpoint.address, endpoint.port)
                .with_connect_timeout(Duration::from_secs(connect_timeout));

            run_member(config, name, Duration::from_millis(load_delay_ms)).await?;
        }

        Commands::Schema { out_dir } => {
            for path in schema::write_schemas(&out_dir)? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

//! Ballot daemon: entry point for running the election service.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use ballot_election::Election;
use ballot_rpc::{ApiMetrics, AppState, RpcServer};
use ballot_store_lmdb::LmdbEnvironment;
use ballot_types::{Role, Timestamp, VoterId};
use ballot_utils::{LogFormat, ShutdownController};
use clap::Parser;

use crate::config::DaemonConfig;

#[derive(Parser)]
#[command(name = "ballot-daemon", about = "College sports election service")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "BALLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the LMDB environment.
    #[arg(long, env = "BALLOT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Address the HTTP API binds to.
    #[arg(long, env = "BALLOT_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// Port for the HTTP API.
    #[arg(long, env = "BALLOT_PORT")]
    port: Option<u16>,

    /// LMDB map size in MiB.
    #[arg(long, env = "BALLOT_MAP_SIZE_MB")]
    map_size_mb: Option<usize>,

    /// Log level: "trace", "debug", "info", "warn", "error", or a full
    /// filter directive. `RUST_LOG` takes precedence.
    #[arg(long, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Allow cross-origin requests from any origin.
    #[arg(long, env = "BALLOT_CORS_ALLOW_ANY")]
    cors_allow_any: Option<bool>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Serve the HTTP API until SIGINT or SIGTERM.
    Serve,
    /// Load the demo roster and default accounts. Existing records are kept.
    Seed,
    /// Register a voter.
    Register {
        /// Identity forwarded by the authentication service (e-mail).
        #[arg(long)]
        id: VoterId,
        #[arg(long)]
        username: String,
        /// Hashed credential issued by the authentication service.
        #[arg(long, default_value = "")]
        credential: String,
        #[arg(long, default_value = "user")]
        role: Role,
    },
    /// Recompute every tally from the ledgers and report drift.
    /// Exits non-zero when the store is inconsistent.
    Audit,
}

impl Cli {
    /// File config (or defaults) with CLI / env overrides applied.
    fn resolve_config(&self) -> anyhow::Result<DaemonConfig> {
        let base = match &self.config {
            Some(path) => DaemonConfig::from_toml_file(path)?,
            None => DaemonConfig::default(),
        };
        let config = DaemonConfig {
            data_dir: self.data_dir.clone().unwrap_or(base.data_dir),
            bind_address: self.bind_address.clone().unwrap_or(base.bind_address),
            port: self.port.unwrap_or(base.port),
            map_size_mb: self.map_size_mb.unwrap_or(base.map_size_mb),
            log_level: self.log_level.clone().unwrap_or(base.log_level),
            log_format: self.log_format.unwrap_or(base.log_format),
            cors_allow_any: self.cors_allow_any.unwrap_or(base.cors_allow_any),
        };
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    ballot_utils::init_logging(config.log_format, &config.log_level)?;

    let store = LmdbEnvironment::open(&config.data_dir, config.map_size_bytes())
        .with_context(|| format!("opening store at {}", config.data_dir.display()))?;
    let election = Election::new(Arc::new(store));

    match cli.command {
        Command::Serve => serve(&config, election).await?,
        Command::Seed => {
            let report = election.seed_roster(Timestamp::now())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Register {
            id,
            username,
            credential,
            role,
        } => {
            let voter = election.register_voter(id, &username, &credential, role, Timestamp::now())?;
            println!("registered {} ({})", voter.id, voter.role);
        }
        Command::Audit => {
            let audit = election.audit()?;
            println!("{}", serde_json::to_string_pretty(&audit)?);
            if !audit.is_consistent() {
                anyhow::bail!("store is inconsistent: {}", audit.summary());
            }
        }
    }

    Ok(())
}

async fn serve(config: &DaemonConfig, election: Election<LmdbEnvironment>) -> anyhow::Result<()> {
    let audit = election.audit()?;
    if !audit.is_consistent() {
        tracing::warn!(
            findings = %audit.summary(),
            "serving with an inconsistent store; run `ballot-daemon audit` for details"
        );
    }

    let election_path = election.store().path().to_path_buf();
    let metrics = Arc::new(ApiMetrics::new()?);
    metrics.audit_drifts.set(audit.drifts.len() as i64);
    let state = AppState::new(election, metrics);

    let shutdown = Arc::new(ShutdownController::new());
    let signals = {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move { shutdown.wait_for_signal().await })
    };

    tracing::info!(
        data_dir = %election_path.display(),
        port = config.port,
        cors_allow_any = config.cors_allow_any,
        "starting ballot daemon"
    );
    let started = std::time::Instant::now();
    RpcServer::new(config.bind_address.clone(), config.port, config.cors_allow_any)
        .start(state, shutdown.signalled())
        .await?;
    signals.abort();

    tracing::info!(
        uptime = %ballot_utils::format_duration(started.elapsed().as_secs()),
        "ballot daemon exited cleanly"
    );
    Ok(())
}

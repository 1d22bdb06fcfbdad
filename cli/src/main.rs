//! `att`: encode and inspect trust messages, maintain the pending trust cache.

mod config;
mod error;

use anyhow::Context;
use att_messages::uri;
use att_store::PendingTrustStore;
use att_store_lmdb::LmdbEnvironment;
use att_types::{Fingerprint, Jid};
use att_utils::LogFormat;
use clap::Parser;
use std::path::PathBuf;

use crate::config::AttConfig;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "att", about = "Automatic Trust Transfer tool")]
struct Cli {
    /// Data directory of the pending trust cache.
    #[arg(long, env = "ATT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Local account for account-scoped commands.
    #[arg(long, env = "ATT_ACCOUNT")]
    account: Option<Jid>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ATT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ATT_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "ATT_CONFIG")]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print a trust message body.
    Encode {
        /// Owner of the keys.
        #[arg(long)]
        owner: Jid,

        /// Announce a revocation instead of an authentication.
        #[arg(long)]
        revoke: bool,

        /// Hex fingerprints of the keys.
        #[arg(required = true)]
        fingerprints: Vec<Fingerprint>,
    },
    /// Parse a trust message body and print it as JSON.
    Decode {
        body: String,
    },
    /// Inspect or clean up the pending trust cache.
    Pending {
        #[command(subcommand)]
        action: PendingAction,
    },
    /// Print the effective configuration.
    Config,
}

#[derive(clap::Subcommand)]
enum PendingAction {
    /// List cached trust decisions of the account as JSON.
    List,
    /// Number of cached trust decisions of all accounts.
    Count,
    /// Delete every cached trust decision of the account.
    Purge,
}

impl Cli {
    /// File configuration (or defaults) with flags and env vars applied.
    fn resolve_config(&self) -> Result<AttConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => AttConfig::from_toml_file(path)?,
            None => AttConfig::default(),
        };
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
        if let Some(account) = &self.account {
            config.account = Some(account.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        Ok(config)
    }
}

fn required_account(config: &AttConfig) -> Result<&Jid, CliError> {
    config.account.as_ref().ok_or_else(|| {
        CliError::InvalidArgument("no account given (use --account or set it in the config)".into())
    })
}

fn open_environment(config: &AttConfig) -> anyhow::Result<LmdbEnvironment> {
    LmdbEnvironment::open(&config.data_dir, config.max_dbs, config.map_size)
        .with_context(|| format!("failed to open {}", config.data_dir.display()))
}

fn run_pending(config: &AttConfig, action: PendingAction) -> anyhow::Result<()> {
    let env = open_environment(config)?;
    let store = env.pending_trust_store();
    match action {
        PendingAction::List => {
            let account = required_account(config)?;
            let entries = store.entries_for_account(account)?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        PendingAction::Count => {
            println!("{}", store.pending_count()?);
        }
        PendingAction::Purge => {
            let account = required_account(config)?;
            let removed = store.purge_account(account)?;
            println!("removed {removed} pending trust entries of {account}");
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let log_format: LogFormat = config
        .log_format
        .parse()
        .map_err(CliError::InvalidArgument)?;
    att_utils::init_tracing(&config.log_level, log_format);
    tracing::debug!(data_dir = %config.data_dir.display(), "configuration loaded");

    match cli.command {
        Command::Encode {
            owner,
            revoke,
            fingerprints,
        } => {
            println!("{}", uri::encode(&owner, &fingerprints, !revoke));
        }
        Command::Decode { body } => {
            let message = uri::decode(&body)
                .ok_or_else(|| CliError::InvalidArgument("not a trust message".into()))?;
            println!("{}", serde_json::to_string_pretty(&message)?);
        }
        Command::Pending { action } => run_pending(&config, action)?,
        Command::Config => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}

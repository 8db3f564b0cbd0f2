//! Debate room configuration tool — entry point.
//!
//! A headless front end over the same command bridge the UI uses.  Each
//! invocation performs the initial load, runs one command, and prints the
//! resulting `CommandResult` as JSON on stdout.  Logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! debate-config [OPTIONS] <COMMAND>
//!
//! Commands:
//!   show                   Print the current configuration
//!   set <FIELD> <VALUE>    Update one field (topic, difficulty, rounds)
//!   update [--topic ..] [--difficulty ..] [--rounds ..]
//!                          Apply a partial update
//!   reset                  Restore the defaults
//!   path                   Print the durable slot file path
//!
//! Options:
//!   --config-dir <DIR>     Directory holding the slot file [env: DEBATE_CONFIG_DIR]
//!   --log-level  <LEVEL>   Log filter when RUST_LOG is unset [env: DEBATE_LOG_LEVEL] [default: warn]
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use debate_config::application::{DurableSlot, CONFIG_SLOT_KEY};
use debate_config::infrastructure::storage::FileSlot;
use debate_config::infrastructure::ui_bridge::{self, AppState, CommandResult, ConfigPatchDto};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Reads and edits the persisted debate session configuration.
#[derive(Debug, Parser)]
#[command(
    name = "debate-config",
    about = "Reads and edits the persisted debate session configuration",
    version
)]
struct Cli {
    /// Directory holding the configuration slot file.
    ///
    /// Defaults to the platform configuration directory.
    #[arg(long, env = "DEBATE_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "warn", env = "DEBATE_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current configuration.
    Show,
    /// Update a single field.
    Set {
        /// Field name: topic, difficulty or rounds.
        field: String,
        /// New value for the field.
        value: String,
    },
    /// Apply a partial update; omitted fields keep their values.
    Update {
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
        #[arg(long)]
        rounds: Option<u32>,
    },
    /// Restore the default configuration.
    Reset,
    /// Print the path of the slot file.
    Path,
}

impl Cli {
    fn file_slot(&self) -> anyhow::Result<FileSlot> {
        match &self.config_dir {
            Some(dir) => Ok(FileSlot::new(dir)),
            None => FileSlot::platform_default().context("no --config-dir given"),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Level is overridden by `RUST_LOG`.  Logs go to stderr so stdout stays JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let slot = cli.file_slot()?;
    debug!(dir = %slot.dir().display(), "using slot directory");

    let slot_path = slot.path_for(CONFIG_SLOT_KEY);

    let state = AppState::new(Arc::new(slot) as Arc<dyn DurableSlot>);
    ui_bridge::initialize(Arc::clone(&state))
        .await
        .context("initial config load task failed")?;

    let result = match cli.command {
        Command::Show => ui_bridge::get_config(Arc::clone(&state)).await,
        Command::Set { field, value } => {
            ui_bridge::update_field(Arc::clone(&state), field, value).await
        }
        Command::Update {
            topic,
            difficulty,
            rounds,
        } => {
            let patch = ConfigPatchDto {
                topic,
                difficulty,
                rounds,
            };
            ui_bridge::update_config(Arc::clone(&state), patch).await
        }
        Command::Reset => ui_bridge::reset_config(Arc::clone(&state)).await,
        Command::Path => {
            println!("{}", slot_path.display());
            return Ok(());
        }
    };

    print_json(&result)?;

    if let Some(warning) = ui_bridge::get_write_warning(state).await.data.flatten() {
        eprintln!("warning: change not saved: {warning}");
    }

    if !result.success {
        anyhow::bail!(result.error.unwrap_or_else(|| "command failed".into()));
    }
    Ok(())
}

fn print_json<T: Serialize>(result: &CommandResult<T>) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(result).context("failed to serialize result")?;
    println!("{text}");
    Ok(())
}

//! Swiss Director - Runs a Swiss tournament from a JSON state file.
//!
//! Each invocation loads the state file, performs one command and writes
//! the file back if anything changed.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use swiss_core::TournamentId;
use swiss_director::{state, Director, DirectorConfig, DirectorError};

/// Swiss Director - Pairs rounds, records results and prints standings.
#[derive(Parser)]
#[command(name = "swiss-director")]
#[command(about = "Runs a Swiss-system chess tournament from a JSON state file")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value_os_t = DirectorConfig::config_path())]
    config: PathBuf,

    /// Tournament state file (overrides `state_path` from the config)
    #[arg(long)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a fresh tournament state file
    Init {
        #[arg(long)]
        name: String,
        #[arg(long)]
        rounds: u32,
    },
    /// Register participants
    Register {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Remove a participant (registration only)
    Withdraw { id: String },
    /// Pair the next round and print its boards
    Pair,
    /// Record or correct a result: 1-0, 0-1, 1/2-1/2 or *
    #[command(name = "result")]
    Record { round: u32, board: u32, code: String },
    /// Print the standings
    Standings,
    /// Finish the tournament after the current round
    Complete,
    /// Cancel the tournament
    Cancel,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = DirectorConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let state_path = args.state.unwrap_or_else(|| config.state_path.clone());
    let director = Director::new(&config);

    let result = match args.command {
        Command::Init { name, rounds } => init(&director, &state_path, &name, rounds),
        command => run(&director, &state_path, command),
    };

    if let Err(e) = &result {
        match e.downcast_ref::<DirectorError>() {
            Some(d) if d.is_operator_visible() => tracing::warn!("operator action needed: {}", d),
            _ => tracing::error!("{:#}", e),
        }
    }
    result
}

fn init(director: &Director, path: &Path, name: &str, rounds: u32) -> anyhow::Result<()> {
    if path.exists() {
        bail!("state file {} already exists", path.display());
    }
    let id = director.create_tournament(name, rounds)?;
    state::save(path, &director.export(&id)?)?;
    println!("{id}");
    Ok(())
}

fn run(director: &Director, path: &Path, command: Command) -> anyhow::Result<()> {
    let record = state::load(path).with_context(|| format!("reading {}", path.display()))?;
    let loaded_version = record.version;
    let id = director.import(record)?;

    let outcome = execute(director, &id, command);

    // Lifecycle changes such as completion are stored even when the command fails.
    let current = director.export(&id)?;
    if current.version != loaded_version {
        state::save(path, &current)?;
    }

    let output = outcome?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn execute(director: &Director, id: &TournamentId, command: Command) -> Result<String, DirectorError> {
    match command {
        Command::Init { .. } => Ok(String::new()),
        Command::Register { ids } => {
            for participant in ids {
                director.register(id, participant.into())?;
            }
            Ok(String::new())
        }
        Command::Withdraw { id: participant } => {
            director.withdraw(id, &participant.into())?;
            Ok(String::new())
        }
        Command::Pair => Ok(serde_json::to_string_pretty(&director.pair_next_round(id)?)?),
        Command::Record { round, board, code } => {
            let delta = director.record_result(id, round, board, &code)?;
            Ok(serde_json::to_string_pretty(&delta)?)
        }
        Command::Standings => Ok(serde_json::to_string_pretty(&director.standings(id)?)?),
        Command::Complete => {
            director.complete(id)?;
            Ok(String::new())
        }
        Command::Cancel => {
            director.cancel(id)?;
            Ok(String::new())
        }
    }
}

//! Mimicry CLI - voice feature extraction and challenge verification
//!
//! This binary extracts summary vectors from `.wav` recordings, compares them,
//! and manages voice challenges stored on disk.

use clap::{Parser, Subcommand};
use env_logger::Env;
use std::process::ExitCode;

use mimicry_challenge::ChallengeUpdate;
use mimicry_cli::commands::{self, challenge::CreateArgs, DEFAULT_STORE_DIR};

/// Mimicry - voice challenge feature pipeline
#[derive(Parser)]
#[command(name = "mimicry")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the summary vector of a WAV file (or of every WAV file in a directory)
    Extract {
        /// Path to the input .wav file
        #[arg(short, long)]
        input: Option<String>,

        /// Directory to recursively scan for .wav files (batch mode)
        #[arg(long)]
        input_dir: Option<String>,

        /// Also write the result to this file
        #[arg(short, long)]
        output: Option<String>,

        /// Pipeline config file (JSON)
        #[arg(long)]
        config: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Score a probe against a reference (.wav files or .json summaries)
    Compare {
        /// Reference input
        #[arg(short, long)]
        reference: String,

        /// Probe input
        #[arg(short, long)]
        probe: String,

        /// Pipeline config file (JSON)
        #[arg(long)]
        config: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Manage stored challenges
    Challenge {
        #[command(subcommand)]
        command: ChallengeCommands,
    },

    /// Score a recorded attempt against a stored challenge
    Verify {
        /// Challenge id
        #[arg(long)]
        id: u64,

        /// Recorded attempt (.wav)
        #[arg(long)]
        voice: String,

        /// Fail unless the mean score reaches this value (0..1)
        #[arg(long)]
        threshold: Option<f64>,

        /// Challenge store directory
        #[arg(long, default_value = DEFAULT_STORE_DIR)]
        store: String,

        /// Pipeline config file (JSON)
        #[arg(long)]
        config: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ChallengeCommands {
    /// Create a challenge from a reference recording
    Create {
        /// Challenge name
        #[arg(long)]
        name: String,

        /// Creator
        #[arg(long)]
        created_by: String,

        /// Reference recording (.wav)
        #[arg(long)]
        sound: String,

        /// Sound URL to record (default: file:// URL of --sound)
        #[arg(long)]
        sound_url: Option<String>,

        /// Comma-separated levels, each in 0..1
        #[arg(long, value_delimiter = ',')]
        levels: Vec<f64>,

        /// Challenge store directory
        #[arg(long, default_value = DEFAULT_STORE_DIR)]
        store: String,

        /// Pipeline config file (JSON)
        #[arg(long)]
        config: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List challenges
    List {
        /// Challenge store directory
        #[arg(long, default_value = DEFAULT_STORE_DIR)]
        store: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show one challenge
    Show {
        /// Challenge id
        id: u64,

        /// Challenge store directory
        #[arg(long, default_value = DEFAULT_STORE_DIR)]
        store: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Update name, sound URL or levels (the stored features are kept)
    Update {
        /// Challenge id
        id: u64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New sound URL
        #[arg(long)]
        sound_url: Option<String>,

        /// New comma-separated levels
        #[arg(long, value_delimiter = ',')]
        levels: Option<Vec<f64>>,

        /// Challenge store directory
        #[arg(long, default_value = DEFAULT_STORE_DIR)]
        store: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Delete a challenge
    Delete {
        /// Challenge id
        id: u64,

        /// Challenge store directory
        #[arg(long, default_value = DEFAULT_STORE_DIR)]
        store: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let result = match cli.command {
        Commands::Extract {
            input,
            input_dir,
            output,
            config,
            json,
        } => commands::extract::run(
            input.as_deref(),
            input_dir.as_deref(),
            output.as_deref(),
            config.as_deref(),
            json,
        ),
        Commands::Compare {
            reference,
            probe,
            config,
            json,
        } => commands::compare::run(&reference, &probe, config.as_deref(), json),
        Commands::Challenge { command } => run_challenge(command),
        Commands::Verify {
            id,
            voice,
            threshold,
            store,
            config,
            json,
        } => commands::verify::run(&store, id, &voice, threshold, config.as_deref(), json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

fn run_challenge(command: ChallengeCommands) -> anyhow::Result<ExitCode> {
    match command {
        ChallengeCommands::Create {
            name,
            created_by,
            sound,
            sound_url,
            levels,
            store,
            config,
            json,
        } => commands::challenge::create(
            CreateArgs {
                store: &store,
                name: &name,
                created_by: &created_by,
                sound: &sound,
                sound_url: sound_url.as_deref(),
                levels,
                config: config.as_deref(),
            },
            json,
        ),
        ChallengeCommands::List { store, json } => commands::challenge::list(&store, json),
        ChallengeCommands::Show { id, store, json } => commands::challenge::show(&store, id, json),
        ChallengeCommands::Update {
            id,
            name,
            sound_url,
            levels,
            store,
            json,
        } => commands::challenge::update(
            &store,
            id,
            ChallengeUpdate {
                name,
                sound_url,
                levels,
            },
            json,
        ),
        ChallengeCommands::Delete { id, store, json } => {
            commands::challenge::delete(&store, id, json)
        }
    }
}

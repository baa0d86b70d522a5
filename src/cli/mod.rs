//! CLI command definitions and handlers

mod analyze;
mod classify;
mod feedback;
mod import;
mod status;
mod train;

use anyhow::Result;
use clap::{Parser, Subcommand};
use repoquiz::classifier::{ClassifierStore, FeedbackLog};
use std::path::PathBuf;

/// Parse and validate the collected-file cap (1-100)
fn parse_max_files(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("max-files must be at least 1".to_string())
    } else if n > 100 {
        Err("max-files cannot exceed 100".to_string())
    } else {
        Ok(n)
    }
}

/// Repoquiz - repository comprehension quiz classification
#[derive(Parser, Debug)]
#[command(name = "repoquiz")]
#[command(
    version,
    about = "Classify repository comprehension questions by difficulty and asking-company profile",
    after_help = "\
Examples:
  repoquiz analyze . --questions questions.json   Classify generated questions
  repoquiz classify --question \"How does the cache evict entries?\" .
  repoquiz feedback --question \"...\" --difficulty Hard --companies FAANG,FinTech
  repoquiz train                                  Retrain from accumulated feedback
  repoquiz status                                 Show artifacts and training data"
)]
pub struct Cli {
    /// Directory for persisted models and training data (default: platform data dir)
    #[arg(long, global = true, env = "REPOQUIZ_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a repository and classify generated questions against it
    Analyze {
        /// Path to the repository directory
        path: PathBuf,

        /// JSON file with generated questions ([{question, context}] or {raw_response})
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Maximum number of files to collect (1-100)
        #[arg(long, default_value = "20", value_parser = parse_max_files)]
        max_files: usize,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Classify a single question
    Classify {
        /// Question text
        #[arg(long)]
        question: String,

        /// Optional question context
        #[arg(long, default_value = "")]
        context: String,

        /// Repository directory providing feature signals (optional)
        path: Option<PathBuf>,

        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Record labeled feedback; retrains automatically on every 10th sample
    Feedback {
        /// Question text
        #[arg(long)]
        question: String,

        /// Optional question context
        #[arg(long, default_value = "")]
        context: String,

        /// Difficulty label (Easy, Medium, Hard)
        #[arg(long)]
        difficulty: String,

        /// Company labels, comma separated (e.g. FAANG,FinTech)
        #[arg(long, value_delimiter = ',')]
        companies: Vec<String>,
    },

    /// Retrain classifiers from the accumulated feedback log
    Train,

    /// Import an externally labeled company dataset (JSON array)
    Import {
        /// Dataset file: [{question, context?, companies: [...]}]
        file: PathBuf,
    },

    /// Show artifact presence and training data statistics
    Status,
}

pub fn run(cli: Cli) -> Result<()> {
    let store = match &cli.data_dir {
        Some(dir) => ClassifierStore::with_dir(dir),
        None => ClassifierStore::new(),
    };
    let log = FeedbackLog::new(store.dir());

    match cli.command {
        Commands::Analyze {
            path,
            questions,
            max_files,
            json,
        } => analyze::run(&store, &path, questions.as_deref(), max_files, json),
        Commands::Classify {
            question,
            context,
            path,
            json,
        } => classify::run(&store, &question, &context, path.as_deref(), json),
        Commands::Feedback {
            question,
            context,
            difficulty,
            companies,
        } => feedback::run(&store, &log, &question, &context, &difficulty, &companies),
        Commands::Train => train::run(&store, &log),
        Commands::Import { file } => import::run(&store, &file),
        Commands::Status => status::run(&store, &log),
    }
}

//! CLI module for Astute RAG
//!
//! Provides subcommands for running the pipeline by hand:
//! - `ask`: answer a question with the full pipeline
//! - `compare`: show the retrieval-free answer next to the pipeline answer

pub mod ask;
pub mod compare;
mod input;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub use input::{load_passages, parse_passages};

/// Astute RAG - reconciles LLM internal knowledge with retrieved passages
#[derive(Parser)]
#[command(name = "astute-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Answer a question with the full pipeline
    Ask(QuestionArgs),

    /// Compare the model's direct answer with the pipeline answer
    Compare(QuestionArgs),
}

/// Question and retrieved passages shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct QuestionArgs {
    /// Question to answer
    #[arg(short, long)]
    pub question: String,

    /// Retrieved passage, in rank order (repeatable)
    #[arg(short, long = "passage")]
    pub passages: Vec<String>,

    /// File of passages: a JSON array of strings, or one passage per line
    #[arg(long)]
    pub passages_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl QuestionArgs {
    /// Passages given inline followed by those read from `--passages-file`
    pub fn collect_passages(&self) -> anyhow::Result<Vec<String>> {
        let mut passages = self.passages.clone();

        if let Some(path) = &self.passages_file {
            passages.extend(load_passages(path)?);
        }

        Ok(passages)
    }
}

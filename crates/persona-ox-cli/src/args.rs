use std::path::PathBuf;

use clap::Parser;
use persona_ox::{DEFAULT_EXPORT_FILE_NAME, Model, PersonaCount, client::DEFAULT_BASE_URL};

#[derive(Debug, Parser)]
#[command(name = "persona-ox")]
#[command(about = "Search intent and persona motivation analysis", long_about = None)]
#[command(version)]
pub struct Args {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Keyword to analyze
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Number of personas to generate
    #[arg(
        short = 'n',
        long = "personas",
        default_value_t = PersonaCount::default().get(),
        value_parser = clap::value_parser!(u8).range(PersonaCount::MIN as i64..=PersonaCount::MAX as i64)
    )]
    pub persona_count: u8,

    /// Chat model used for every request
    #[arg(long, default_value_t = Model::default().to_string())]
    pub model: String,

    /// Base URL of an OpenAI-compatible endpoint
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Maximum number of motivation requests in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    /// Where to write the CSV export
    #[arg(short, long, default_value = DEFAULT_EXPORT_FILE_NAME)]
    pub output: PathBuf,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

use std::{process::ExitCode, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use persona_ox::{
    AnalysisError, Analyzer, CompletionClient, ErrorKind, PersonaCount, Readiness, check_inputs,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod args;
mod render;

use args::Args;

fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr).compact())
        .init();
}

fn failure_message(error: &AnalysisError) -> String {
    match error.kind() {
        ErrorKind::Upstream => format!("Error calling the completion service: {error}"),
        ErrorKind::Parse => format!("Error parsing personas: {error}"),
        ErrorKind::Schema => format!("Error validating personas: {error}"),
        ErrorKind::Input => format!("Invalid input: {error}"),
        ErrorKind::Internal => format!("Internal error: {error}"),
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let mut about = String::new();
    render::about(&mut about)?;
    print!("{about}");

    let (api_key, keyword) = match check_inputs(args.api_key.as_deref(), args.keyword.as_deref()) {
        Readiness::Ready { api_key, keyword } => (api_key, keyword),
        Readiness::NeedsInput { prompt } => {
            println!("{prompt}");
            return Ok(ExitCode::SUCCESS);
        }
    };

    let count = PersonaCount::new(args.persona_count)?;
    let client = CompletionClient::builder()
        .api_key(api_key)
        .base_url(args.base_url.as_str())
        .model(args.model.as_str())
        .timeout(Duration::from_secs(args.timeout))
        .build();
    tracing::debug!(?client, "Configured completion client");

    let mut analyzer = Analyzer::new(Arc::new(client));
    if let Some(concurrency) = args.concurrency {
        analyzer = analyzer.with_max_concurrency(concurrency);
    }

    let result = analyzer
        .run_with_progress(keyword, count, |stage| eprintln!("{stage}"))
        .await;

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(kind = %e.kind(), "Analysis failed: {e}");
            eprintln!("{}", failure_message(&e));
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut rendered = String::new();
    render::report(&mut rendered, &report)?;
    print!("{rendered}");

    let csv = report.to_csv().context("Failed to encode CSV export")?;
    std::fs::write(&args.output, csv)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!(
        "Wrote {} rows to {}",
        report.answers.len(),
        args.output.display()
    );

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_level());

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

//! PhishGuard - Main Entry Point
//!
//! Thin command-line host over the decision engine: one analysis per
//! invocation, JSON on stdout, logs on stderr.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use phishguard_core::constants::{APP_NAME, APP_VERSION};
use phishguard_core::{
    AnalysisError, AnalysisResult, DecisionEngine, Domain, EmailRecord, EngineConfig,
    ErrorCategory, LayoutInfo,
};

#[derive(Parser, Debug)]
#[command(name = "phishguard")]
#[command(about = "Phishing detection for URLs and emails", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a single URL
    Url {
        url: String,

        /// Print the audit document instead of the flat result
        #[arg(long)]
        log_entry: bool,
    },

    /// Analyze an email given as a JSON record (`-` reads stdin)
    Email {
        input: PathBuf,

        /// Print the audit document instead of the flat result
        #[arg(long)]
        log_entry: bool,
    },

    /// Load every model and print the engine status
    Status,

    /// Print the feature layout stamp of a domain (`url` or `email`)
    Layout { domain: Domain },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = EngineConfig::from_env();
    log::info!("Starting {} v{} (models: {})", APP_NAME, APP_VERSION, config.model_dir.display());
    let engine = DecisionEngine::from_config(&config);

    match cli.command {
        Command::Url { url, log_entry } => {
            let input = json!({ "url": url });
            report(engine.analyze_url(&url), input, log_entry)
        }
        Command::Email { input, log_entry } => {
            let record = read_email(&input)?;
            let input = serde_json::to_value(&record)?;
            report(engine.analyze_email(&record), input, log_entry)
        }
        Command::Status => {
            engine.preload();
            let status = engine.status();
            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(if status.ready { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Layout { domain } => {
            println!("{}", serde_json::to_string_pretty(&LayoutInfo::current(domain))?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_email(input: &Path) -> Result<EmailRecord> {
    let raw = if input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?
    };

    serde_json::from_str(&raw).context("Invalid email record")
}

/// Print the result, or the error with an exit code by category
fn report(
    result: Result<AnalysisResult, AnalysisError>,
    input: serde_json::Value,
    log_entry: bool,
) -> Result<ExitCode> {
    match result {
        Ok(analysis) => {
            let output = if log_entry {
                analysis.to_log_entry(input)
            } else {
                serde_json::to_value(&analysis)?
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", json!({ "error": e.to_string() }));
            Ok(exit_code(e.category()))
        }
    }
}

fn exit_code(category: ErrorCategory) -> ExitCode {
    match category {
        ErrorCategory::ClientInput => ExitCode::from(2),
        ErrorCategory::ModelUnavailable => ExitCode::from(3),
        ErrorCategory::Internal => ExitCode::FAILURE,
    }
}

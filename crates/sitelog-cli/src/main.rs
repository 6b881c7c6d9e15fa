//! `sitelog` command-line front end for the input-hardening primitives.

mod config;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use config::SitelogConfig;
use serde::Serialize;
use sitelog_core::{SitelogError, SitelogResult};
use sitelog_security::{
    generate_secure_token, is_valid_email, is_valid_url, sanitize, sanitize_content,
    sanitize_file_name, sanitize_json, validate_file_upload, validate_password,
    AuthRateLimiter, Clock, FileMetadata, ManualClock, RateLimitDecision, RateLimitPolicy,
    ValidationResult,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sitelog", about = "Sitelog — input sanitization and validation toolkit")]
struct Cli {
    /// Path to config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sanitize free-form input
    Sanitize {
        /// Text to sanitize
        input: String,
        /// Treat the input as a JSON value (null, number, object, ...)
        #[arg(long)]
        json: bool,
    },
    /// Sanitize comment or description content
    Content {
        /// Text to sanitize
        text: String,
    },
    /// Produce a storage-safe file name
    Filename {
        /// Original file name
        name: String,
    },
    /// Check an e-mail address
    Email {
        /// Address to check
        address: String,
    },
    /// Check password strength (reads one line from stdin when omitted)
    Password {
        /// Password to check
        password: Option<String>,
    },
    /// Check that a URL is http(s)
    Url {
        /// URL to check
        url: String,
    },
    /// Validate upload metadata
    Upload {
        /// File name as sent by the client
        #[arg(long)]
        name: String,
        /// Size in bytes
        #[arg(long)]
        size: u64,
        /// Declared MIME type
        #[arg(long = "type")]
        mime_type: String,
    },
    /// Print a fresh 64-character hex token
    Token,
    /// Replay a sequence of login attempts against the configured limiter
    ReplayAuth {
        /// Identifier being limited (user name, e-mail or IP)
        #[arg(long)]
        id: String,
        /// Number of attempts to make
        #[arg(short = 'n', long, default_value_t = 6)]
        attempts: u32,
        /// Simulated seconds between attempts
        #[arg(long, default_value_t = 0)]
        interval_secs: u64,
        /// Attempt number that succeeds and resets the limiter
        #[arg(long)]
        succeed_at: Option<u32>,
    },
}

#[derive(Serialize)]
struct Verdict {
    valid: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayStep {
    attempt: u32,
    at: DateTime<Utc>,
    #[serde(flatten)]
    decision: RateLimitDecision,
    reset: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = SitelogConfig::load(cli.config.as_deref())?;
    debug!(policy = ?config.auth_rate_limit, "Configuration loaded");

    match cli.command {
        Commands::Sanitize { input, json } => {
            let out = if json {
                sanitize_json(&input)?
            } else {
                sanitize(&input)
            };
            print_json(&out)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Content { text } => {
            print_json(&sanitize_content(&text))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Filename { name } => {
            print_json(&sanitize_file_name(&name))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Email { address } => verdict(is_valid_email(&address)),
        Commands::Password { password } => {
            let password = match password {
                Some(p) => p,
                None => read_line(std::io::stdin().lock())?,
            };
            report(&validate_password(&password))
        }
        Commands::Url { url } => verdict(is_valid_url(&url)),
        Commands::Upload {
            name,
            size,
            mime_type,
        } => report(&validate_file_upload(&FileMetadata::new(name, size, mime_type))),
        Commands::Token => {
            print_json(&generate_secure_token()?)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::ReplayAuth {
            id,
            attempts,
            interval_secs,
            succeed_at,
        } => {
            info!(identifier = %id, attempts, "Replaying authentication attempts");
            let steps = replay_auth(
                config.auth_rate_limit,
                &id,
                attempts,
                interval_secs,
                succeed_at,
                Utc::now(),
            )?;
            for step in &steps {
                println!("{}", serde_json::to_string(step)?);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Run `attempts` checks for `id` on a manual clock starting at `start`.
///
/// The clock moves `interval_secs` between attempts. An allowed attempt whose
/// number equals `succeed_at` resets the limiter, as a successful login would.
fn replay_auth(
    policy: RateLimitPolicy,
    id: &str,
    attempts: u32,
    interval_secs: u64,
    succeed_at: Option<u32>,
    start: DateTime<Utc>,
) -> SitelogResult<Vec<ReplayStep>> {
    let interval = i64::try_from(interval_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| {
            SitelogError::Config(format!("interval {interval_secs}s is out of range"))
        })?;
    let clock = Arc::new(ManualClock::new(start));
    let limiter = AuthRateLimiter::with_clock(policy, clock.clone())?;

    let mut steps = Vec::with_capacity(attempts as usize);
    for attempt in 1..=attempts {
        if attempt > 1 {
            clock.advance(interval);
        }
        let decision = limiter.check(id);
        let reset = decision.allowed && succeed_at == Some(attempt);
        if reset {
            limiter.reset(id);
        }
        steps.push(ReplayStep {
            attempt,
            at: clock.now(),
            decision,
            reset,
        });
    }
    Ok(steps)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn verdict(valid: bool) -> anyhow::Result<ExitCode> {
    print_json(&Verdict { valid })?;
    Ok(exit_code(valid))
}

fn report(result: &ValidationResult) -> anyhow::Result<ExitCode> {
    print_json(result)?;
    Ok(exit_code(result.is_valid()))
}

fn exit_code(valid: bool) -> ExitCode {
    if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Read one line without its terminator.
fn read_line(mut reader: impl BufRead) -> SitelogResult<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

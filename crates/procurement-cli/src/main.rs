//! Procurement CLI - a terminal client for the procurement system.
//!
//! Logs in against the backend, keeps the session on disk between runs, and
//! lists or records items, suppliers, and purchases with amounts and dates
//! in Indonesian format.

mod commands;
mod terminal;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use procurement_core::{ApiClient, ApiError, Config, Session};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::Command;
use terminal::Terminal;

/// Log file name in the data directory
const LOG_FILE: &str = "procurement.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr and, when the data directory is available, to a log
/// file. The returned guard must live until exit so the file gets flushed.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match config.data_dir() {
        Ok(dir) if std::fs::create_dir_all(&dir).is_ok() => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = init_tracing(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, commands::USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run(config, command).await {
        Ok(code) => code,
        Err(e) => {
            if let Some(message) = error_report(&e) {
                eprintln!("{}", message);
            }
            ExitCode::FAILURE
        }
    }
}

/// Text to print for a failed command, or `None` when the user has already
/// been told. A session-bearing 401 has printed the session-expired notice
/// by the time it gets here; a rejected login has not.
fn error_report(e: &anyhow::Error) -> Option<String> {
    match e.downcast_ref::<ApiError>() {
        Some(api) if api.is_unauthorized() => None,
        _ => Some(format!("Error: {:#}", e)),
    }
}

async fn run(mut config: Config, command: Command) -> Result<ExitCode> {
    if let Command::Help = command {
        println!("{}", commands::USAGE);
        return Ok(ExitCode::SUCCESS);
    }

    let terminal = Arc::new(Terminal);
    let session = Arc::new(Session::open(&config, terminal.clone())?);
    let client = ApiClient::new(&config, session.clone(), terminal)?;
    info!(base_url = client.base_url(), "Procurement CLI starting");

    if command.requires_auth() && !session.require_auth() {
        debug!("Command needs a session, stopping");
        return Ok(ExitCode::FAILURE);
    }

    commands::execute(&client, &mut config, command).await?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_login_is_reported() {
        let e = anyhow::Error::new(ApiError::InvalidCredentials(
            "Invalid username or password".to_string(),
        ));
        assert_eq!(
            error_report(&e).as_deref(),
            Some("Error: Invalid username or password")
        );
    }

    #[test]
    fn test_expired_session_not_reported_twice() {
        let e = anyhow::Error::new(ApiError::Unauthorized("Invalid or expired token".to_string()));
        assert_eq!(error_report(&e), None);

        let e = anyhow::Error::new(ApiError::NotFound("Item not found".to_string()));
        assert_eq!(
            error_report(&e).as_deref(),
            Some("Error: Resource not found: Item not found")
        );
    }
}

//! Notebook server launcher.
//!
//! Turns a [`NotebookServerConfig`] into a `jupyter lab` invocation and runs
//! it in the foreground. The token, when set, travels through the child's
//! environment rather than its argument list.

use secrecy::ExposeSecret;
use tokio::process::Command;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::{AppError, NotebookError, NotebookServerConfig};

const TOKEN_ENV: &str = "JUPYTER_TOKEN";

/// Arguments passed to the notebook program, secrets excluded.
pub fn launch_args(config: &NotebookServerConfig) -> Result<Vec<String>, AppError> {
    config.validate()?;
    if !config.allow_unauthenticated && config.token.is_none() {
        return Err(NotebookError::Invalid(
            "a token is required when unauthenticated access is disabled".to_string(),
        )
        .into());
    }

    let mut args = vec![
        "lab".to_string(),
        "--no-browser".to_string(),
        "--allow-root".to_string(),
        format!("--ip={}", config.ip),
        format!("--port={}", config.port),
        format!("--ServerApp.root_dir={}", config.notebook_dir.display()),
    ];
    if config.token.is_none() {
        args.push("--ServerApp.token=".to_string());
        args.push("--ServerApp.password=".to_string());
    }
    Ok(args)
}

/// Builds the child process command.
pub fn build_command(config: &NotebookServerConfig) -> Result<Command, AppError> {
    let args = launch_args(config)?;
    let mut command = Command::new(&config.program);
    command.args(&args);
    if let Some(token) = &config.token {
        command.env(TOKEN_ENV, token.expose_secret());
    }
    command.kill_on_drop(true);
    Ok(command)
}

/// Runs the notebook server until it exits.
#[instrument(skip(config), fields(port = config.port, ip = %config.ip))]
pub async fn run(config: &NotebookServerConfig) -> Result<(), AppError> {
    let mut command = build_command(config)?;
    if config.token.is_none() {
        warn!("Starting notebook server without authentication");
    }

    info!(
        program = %config.program,
        url = %format!("http://{}:{}/lab", config.ip, config.port),
        "Starting notebook server"
    );
    let status = command
        .status()
        .await
        .map_err(|source| NotebookError::Launch {
            program: config.program.clone(),
            source,
        })?;

    if status.success() {
        info!("Notebook server stopped");
        Ok(())
    } else {
        Err(NotebookError::Exited(status.code().unwrap_or(-1)).into())
    }
}

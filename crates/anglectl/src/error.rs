//! Error types for anglectl

use anglelink_core::ConfigError;
use anglelink_engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Process exit code for a failed command.
///
/// 4 for configuration problems, 5 for socket and thread failures, 1 otherwise.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<CliError>() {
        Some(CliError::Config(_)) | Some(CliError::Engine(EngineError::Config(_))) => 4,
        Some(CliError::Engine(_)) => 5,
        None => 1,
    }
}

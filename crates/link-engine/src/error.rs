//! Engine error types.

use anglelink_core::ConfigError;
use thiserror::Error;

/// Failures that keep the engine from starting.
///
/// Decode failures and discovery send failures never surface here; they are
/// counted and logged by the engine instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to {context}: {source}")]
    Socket {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn receive thread: {0}")]
    Thread(#[source] std::io::Error),
}

impl EngineError {
    pub(crate) fn socket(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| EngineError::Socket { context, source }
    }
}

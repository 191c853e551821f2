//! Command implementations for anglectl

pub mod config;
pub mod discover;
pub mod listen;
pub mod simulate;

use std::path::Path;
use std::time::Duration;

use anglelink_core::LinkConfig;
use anyhow::{Context, Result};

use crate::error::CliError;

pub use simulate::SimulateArgs;

/// Load and validate the configuration, falling back to built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<LinkConfig, CliError> {
    let config = match path {
        Some(path) => LinkConfig::load(path)?,
        None => LinkConfig::embedded_default()?,
    };
    config.validate()?;
    Ok(config)
}

/// Longest `--duration` accepted, one year in seconds.
pub const MAX_DURATION_SECS: f64 = 365.0 * 24.0 * 3600.0;

/// Highest simulator `--rate` accepted, in Hz.
pub const MAX_RATE_HZ: f64 = 10_000.0;

/// Parse a strictly positive, finite number no larger than `max`.
fn parse_bounded(value: &str, max: f64) -> Result<f64, String> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("'{value}' is not a number: {e}"))?;
    if !(parsed.is_finite() && parsed > 0.0) {
        return Err(format!("'{value}' must be a positive number"));
    }
    if parsed > max {
        return Err(format!("'{value}' must not exceed {max}"));
    }
    Ok(parsed)
}

/// `--duration` in seconds: positive and at most [`MAX_DURATION_SECS`].
pub fn parse_duration_secs(value: &str) -> Result<f64, String> {
    parse_bounded(value, MAX_DURATION_SECS)
}

/// `--rate` in Hz: positive and at most [`MAX_RATE_HZ`].
pub fn parse_rate_hz(value: &str) -> Result<f64, String> {
    parse_bounded(value, MAX_RATE_HZ)
}

/// Convert float seconds to a non-zero [`Duration`], failing instead of
/// panicking on values `Duration` cannot hold.
pub fn secs_to_duration(secs: f64, what: &'static str) -> Result<Duration> {
    let duration = Duration::try_from_secs_f64(secs)
        .with_context(|| format!("{what} of {secs:?} s is out of range"))?;
    if duration.is_zero() {
        anyhow::bail!("{what} of {secs:?} s rounds to zero");
    }
    Ok(duration)
}

//! `anglectl config`: print the effective configuration

use std::path::Path;

use anyhow::{Context, Result};

use super::load_config;
use crate::output;

pub fn execute(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path).context("failed to load configuration")?;
    output::print_config(&config, json).context("failed to serialize configuration")?;
    Ok(())
}

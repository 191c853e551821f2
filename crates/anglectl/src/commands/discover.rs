//! `anglectl discover`: send a single discovery datagram

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anglelink_atomic::LinkCounters;
use anglelink_engine::{DiscoveryBroadcaster, EngineError};
use anyhow::{Context, Result};

use super::load_config;
use crate::error::CliError;
use crate::output;

pub fn execute(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path).context("failed to load configuration")?;
    let endpoints = config
        .discovery
        .resolve()
        .map_err(CliError::from)
        .context("invalid discovery settings")?;

    let broadcaster = DiscoveryBroadcaster::bind(
        endpoints.discovery_target,
        config.discovery.discovery_interval_seconds,
        Arc::new(LinkCounters::new()),
    )
    .map_err(CliError::from)?;

    broadcaster
        .send_now()
        .map_err(|source| {
            CliError::from(EngineError::Socket {
                context: "send discovery",
                source,
            })
        })
        .with_context(|| format!("failed to send DISCOVER to {}", broadcaster.target()))?;

    output::print_discovery_sent(SocketAddr::V4(broadcaster.target()), json);
    Ok(())
}

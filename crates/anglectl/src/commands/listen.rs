//! `anglectl listen`: run the engine and print what it sees

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anglelink_core::{Axis, Orientation, OrientationSink};
use anglelink_engine::UdpReceiverEngine;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::{load_config, secs_to_duration};
use crate::error::CliError;
use crate::output;

const STATUS_PERIOD: Duration = Duration::from_secs(1);

pub async fn execute(
    config_path: Option<&Path>,
    tick_hz: u32,
    duration: Option<f64>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path).context("failed to load configuration")?;
    let tick_period = secs_to_duration(1.0 / f64::from(tick_hz), "tick period")?;
    let run_for = duration
        .map(|secs| secs_to_duration(secs, "listen duration"))
        .transpose()?;

    let mut engine = UdpReceiverEngine::new(config);
    let events = engine.subscribe();

    // Stands in for the object a host application would rotate
    let orientation = Arc::new(Mutex::new(Orientation::default()));
    let sink_target = Arc::clone(&orientation);
    engine.set_orientation_sink(move |axis: Axis, angle: f32| {
        sink_target.lock().apply_orientation(axis, angle);
    });
    engine
        .start()
        .map_err(CliError::from)
        .context("failed to start listening")?;
    output::print_listening(engine.local_data_addr(), engine.config(), json);

    let mut ticker = tokio::time::interval(tick_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let deadline = run_for
        .map(|run_for| {
            Instant::now()
                .checked_add(run_for)
                .context("listen duration is too long")
        })
        .transpose()?;
    let stop_after = async move {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(stop_after);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_tick = Instant::now();
    let mut last_status = Instant::now();
    info!(tick_hz, "tick loop running");

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result.context("failed to listen for Ctrl+C")?;
                debug!("interrupted");
                break;
            }
            () = &mut stop_after => {
                debug!("duration elapsed");
                break;
            }
            now = ticker.tick() => {
                let dt = now.saturating_duration_since(last_tick).as_secs_f32();
                last_tick = now;
                engine.tick(dt);

                for event in events.try_iter() {
                    output::print_event(&event, json);
                }
                if !json && now.saturating_duration_since(last_status) >= STATUS_PERIOD {
                    last_status = now;
                    let current = *orientation.lock();
                    output::print_status_human(&engine, &current);
                }
            }
        }
    }

    engine.stop();
    for event in events.try_iter() {
        output::print_event(&event, json);
    }
    output::print_listen_summary(&engine.output(), &engine.counters(), json);
    Ok(())
}

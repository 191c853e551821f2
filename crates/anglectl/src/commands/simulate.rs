//! `anglectl simulate`: a stand-in sensor
//!
//! Streams little-endian `f32` angles to a host's data port and periodically
//! sends `DISCOVER` to the discovery port, so the listener can be exercised
//! without hardware.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use anglelink_math::normalize_360;
use anglelink_protocol::{DEFAULT_DATA_PORT, DEFAULT_DISCOVERY_PORT, DISCOVERY_TOKEN, encode_angle};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::net::UdpSocket;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::{parse_duration_secs, parse_rate_hz, secs_to_duration};
use crate::output::{self, SimulatorBanner};

const DISCOVERY_PERIOD: Duration = Duration::from_secs(2);
const STATUS_PERIOD: Duration = Duration::from_secs(1);

/// How the simulated angle evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SimMode {
    /// Continuous rotation at `--speed` degrees per second
    Rotate,
    /// 180 ± 180 degrees, sinusoidal
    Sine,
    /// Fixed at 45 degrees
    Static,
    /// Random walk of up to ±5 degrees per packet
    Random,
}

impl SimMode {
    pub fn name(self) -> &'static str {
        match self {
            SimMode::Rotate => "rotate",
            SimMode::Sine => "sine",
            SimMode::Static => "static",
            SimMode::Random => "random",
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    /// Host to stream angles to
    #[arg(long, default_value_t = Ipv4Addr::LOCALHOST)]
    pub target_ip: Ipv4Addr,

    /// Host data port
    #[arg(long, default_value_t = DEFAULT_DATA_PORT)]
    pub data_port: u16,

    /// Port DISCOVER is sent to
    #[arg(long, default_value_t = DEFAULT_DISCOVERY_PORT)]
    pub discovery_port: u16,

    /// Packets per second (at most 10000)
    #[arg(long, default_value_t = 100.0, value_parser = parse_rate_hz)]
    pub rate: f64,

    #[arg(long, value_enum, default_value_t = SimMode::Rotate)]
    pub mode: SimMode,

    /// Rotation speed in degrees per second (rotate mode)
    #[arg(long, default_value_t = 30.0)]
    pub speed: f32,

    /// Stop after this many seconds instead of waiting for Ctrl+C
    #[arg(long, value_parser = parse_duration_secs)]
    pub duration: Option<f64>,
}

/// Angle generator for the simulated sensor.
#[derive(Debug, Clone)]
pub struct Waveform {
    mode: SimMode,
    speed: f32,
    angle: f32,
}

impl Waveform {
    pub fn new(mode: SimMode, speed: f32) -> Self {
        Self {
            mode,
            speed,
            angle: 0.0,
        }
    }

    /// Next angle to send. `elapsed_s` is time since start, `dt` the send
    /// interval. The result is always within `[0, 360]`.
    pub fn next_angle(&mut self, elapsed_s: f64, dt: f32, rng: &mut impl Rng) -> f32 {
        self.angle = match self.mode {
            SimMode::Rotate => normalize_360(self.angle + self.speed * dt),
            SimMode::Sine => 180.0 + 180.0 * (0.5 * elapsed_s).sin() as f32,
            SimMode::Static => 45.0,
            SimMode::Random => normalize_360(self.angle + rng.random_range(-5.0f32..=5.0)),
        };
        self.angle.clamp(0.0, 360.0)
    }
}

/// Where DISCOVER goes: loopback stays on loopback, anything else is
/// broadcast.
pub fn discovery_target(target_ip: Ipv4Addr, discovery_port: u16) -> SocketAddrV4 {
    let addr = if target_ip.is_loopback() {
        target_ip
    } else {
        Ipv4Addr::BROADCAST
    };
    SocketAddrV4::new(addr, discovery_port)
}

pub async fn execute(args: &SimulateArgs, json: bool) -> Result<()> {
    let send_period = secs_to_duration(1.0 / args.rate, "send period")?;
    let run_for = args
        .duration
        .map(|secs| secs_to_duration(secs, "simulation duration"))
        .transpose()?;

    let target = SocketAddr::V4(SocketAddrV4::new(args.target_ip, args.data_port));
    let discovery = SocketAddr::V4(discovery_target(args.target_ip, args.discovery_port));

    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .await
        .context("failed to bind simulator socket")?;
    socket
        .set_broadcast(true)
        .context("failed to enable broadcast")?;

    output::print_simulator_banner(
        &SimulatorBanner {
            target,
            discovery_target: discovery,
            rate_hz: args.rate,
            mode: args.mode.name(),
            speed_deg_per_s: args.speed,
        },
        json,
    );

    let dt = send_period.as_secs_f32();
    let mut send_ticker = tokio::time::interval(send_period);
    send_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut discovery_ticker = tokio::time::interval(DISCOVERY_PERIOD);
    discovery_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let start = Instant::now();
    let deadline = run_for
        .map(|run_for| {
            start
                .checked_add(run_for)
                .context("simulation duration is too long")
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

    let mut rng = StdRng::from_os_rng();
    let mut waveform = Waveform::new(args.mode, args.speed);
    let mut packets: u64 = 0;
    let mut angle = 0.0f32;
    let mut last_status = start;

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result.context("failed to listen for Ctrl+C")?;
                break;
            }
            () = &mut stop_after => break,
            _ = discovery_ticker.tick() => {
                if let Err(e) = socket.send_to(DISCOVERY_TOKEN, discovery).await {
                    debug!(%discovery, error = %e, "discovery send failed");
                }
            }
            now = send_ticker.tick() => {
                let elapsed = now.saturating_duration_since(start).as_secs_f64();
                angle = waveform.next_angle(elapsed, dt, &mut rng);
                match socket.send_to(&encode_angle(angle), target).await {
                    Ok(_) => packets += 1,
                    Err(e) => warn!(%target, error = %e, "angle send failed"),
                }

                if now.saturating_duration_since(last_status) >= STATUS_PERIOD {
                    last_status = now;
                    let rate = if elapsed > 0.0 { packets as f64 / elapsed } else { 0.0 };
                    output::print_simulator_status(angle, packets, rate, json);
                }
            }
        }
    }

    debug!(last_angle = angle, "simulator stopped");
    output::print_simulator_summary(packets, start.elapsed().as_secs_f64(), json);
    Ok(())
}

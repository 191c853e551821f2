//! Output formatting for CLI responses

use std::net::SocketAddr;

use anglelink_atomic::LinkCountersSnapshot;
use anglelink_core::{AngleOutputState, ConnectionState, LinkConfig, LinkEvent, Orientation};
use anglelink_engine::UdpReceiverEngine;
use anyhow::Error;
use colored::*;
use serde::Serialize;
use serde_json::json;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "chain": error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        }
    });
    print_json(&error_json);
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "Caused by:".yellow(), cause);
    }
}

/// Print one value as a single JSON line
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}

pub fn print_listening(data_addr: Option<SocketAddr>, config: &LinkConfig, json: bool) {
    let data = data_addr.map(|addr| addr.to_string());
    if json {
        print_json(&json!({
            "event": "listening",
            "data": data,
            "discovery_target": format!(
                "{}:{}",
                config.discovery.broadcast_address, config.discovery.discovery_port
            ),
        }));
    } else {
        println!(
            "{} data on {}, discovery to {}:{} every {:.1}s",
            "Listening:".bold(),
            data.as_deref().unwrap_or("?").cyan(),
            config.discovery.broadcast_address,
            config.discovery.discovery_port,
            config.discovery.discovery_interval_seconds
        );
        println!("Press Ctrl+C to stop\n");
    }
}

/// Connectivity changes are always shown. Angle updates are only printed in
/// JSON mode; human mode uses the periodic status line instead.
pub fn print_event(event: &LinkEvent, json: bool) {
    if json {
        print_json(event);
        return;
    }

    if let LinkEvent::ConnectivityChanged { connected, peer } = event {
        let peer = peer.as_deref().unwrap_or("unknown");
        if *connected {
            println!("{} sensor connected from {}", "●".green(), peer.bold());
        } else {
            println!("{} sensor disconnected ({})", "●".red(), peer.dimmed());
        }
    }
}

/// Once-per-second status line for human mode.
pub fn print_status_human(engine: &UdpReceiverEngine, orientation: &Orientation) {
    let output = engine.output();
    let axis = engine.config().rotation.axis;
    let state = match engine.connection_state() {
        ConnectionState::Connected => format!(
            "{} {} ({:.1}s ago)",
            "connected".green(),
            engine.peer().unwrap_or("unknown"),
            engine.time_since_last_packet()
        ),
        ConnectionState::Disconnected => "waiting".yellow().to_string(),
    };
    println!(
        "Angle: raw {:6.2}°  processed {:6.2}°  smoothed {:6.2}° | {axis}: {:6.2}° | Packets: {:6} | {state}",
        output.raw_angle,
        output.processed_angle,
        output.smoothed_angle,
        orientation.axis_angle(axis),
        output.packets_received,
    );
}

pub fn print_listen_summary(
    output: &AngleOutputState,
    counters: &LinkCountersSnapshot,
    json: bool,
) {
    if json {
        print_json(&json!({
            "event": "stopped",
            "output": output,
            "datagrams_accepted": counters.datagrams_accepted,
            "datagrams_rejected": counters.datagrams_rejected,
            "discovery_sent": counters.discovery_sent,
            "discovery_failed": counters.discovery_failed,
        }));
    } else {
        println!("\n{}", "Stopped".bold());
        println!("  Samples consumed:   {}", output.packets_received);
        println!("  Datagrams accepted: {}", counters.datagrams_accepted);
        println!("  Datagrams rejected: {}", counters.datagrams_rejected);
        println!(
            "  Discovery sent:     {} ({} failed)",
            counters.discovery_sent, counters.discovery_failed
        );
    }
}

pub fn print_discovery_sent(target: SocketAddr, json: bool) {
    if json {
        print_json(&json!({ "success": true, "sent": "DISCOVER", "target": target.to_string() }));
    } else {
        println!("{} DISCOVER sent to {}", "✓".green(), target.to_string().bold());
    }
}

pub fn print_config(config: &LinkConfig, json: bool) -> Result<(), anglelink_core::ConfigError> {
    if json {
        println!("{}", config.to_json_string()?);
    } else {
        print!("{}", config.to_yaml_string()?);
    }
    Ok(())
}

/// Settings echoed when the simulator starts.
#[derive(Debug, Serialize)]
pub struct SimulatorBanner<'a> {
    pub target: SocketAddr,
    pub discovery_target: SocketAddr,
    pub rate_hz: f64,
    pub mode: &'a str,
    pub speed_deg_per_s: f32,
}

pub fn print_simulator_banner(banner: &SimulatorBanner<'_>, json: bool) {
    if json {
        print_json(&json!({ "event": "simulating", "settings": banner }));
        return;
    }

    let rule = "=".repeat(60);
    println!("{rule}");
    println!("{}", "SENSOR SIMULATOR".bold());
    println!("{rule}");
    println!("Target:          {}", banner.target);
    println!("Discovery:       {}", banner.discovery_target);
    println!("Send Rate:       {:.1} Hz", banner.rate_hz);
    println!("Mode:            {}", banner.mode);
    if banner.mode == "rotate" {
        println!("Rotation Speed:  {:.1} deg/sec", banner.speed_deg_per_s);
    }
    println!("{rule}");
    println!("\nPress Ctrl+C to stop\n");
}

pub fn print_simulator_status(angle: f32, packets: u64, rate_hz: f64, json: bool) {
    if json {
        print_json(&json!({ "event": "status", "angle": angle, "packets": packets, "rate_hz": rate_hz }));
    } else {
        println!("Angle: {angle:6.2}° | Packets: {packets:5} | Rate: {rate_hz:6.1} Hz");
    }
}

pub fn print_simulator_summary(packets: u64, elapsed_s: f64, json: bool) {
    let average = if elapsed_s > 0.0 {
        packets as f64 / elapsed_s
    } else {
        0.0
    };
    if json {
        print_json(&json!({
            "event": "stopped",
            "packets": packets,
            "average_rate_hz": average,
            "duration_s": elapsed_s,
        }));
    } else {
        println!("\nTotal packets sent: {packets}");
        println!("Average rate: {average:.1} Hz");
        println!("Duration: {elapsed_s:.1} seconds");
    }
}

//! anglectl - anglelink command-line host
//!
//! Listens for an angle sensor, sends discovery by hand, simulates a sensor
//! for bench testing and prints the effective configuration.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{SimulateArgs, parse_duration_secs};

#[derive(Parser)]
#[command(name = "anglectl")]
#[command(about = "anglelink host - receive, smooth and simulate UDP angle telemetry")]
#[command(version)]
#[command(long_about = "
anglectl hosts the anglelink engine from the command line. It can listen for a
sensor streaming angles over UDP, broadcast discovery on demand, stand in for a
sensor while testing, and print the configuration the engine would run with.

Use --json for line-delimited machine-readable output.
")]
struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine and print angle and connectivity events
    Listen {
        /// Configuration file (.yaml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Tick rate in Hz
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
        tick_hz: u32,

        /// Stop after this many seconds instead of waiting for Ctrl+C
        #[arg(long, value_parser = parse_duration_secs)]
        duration: Option<f64>,
    },

    /// Send a single discovery datagram
    Discover {
        /// Configuration file (.yaml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Act as a sensor, streaming generated angles to a host
    Simulate(SimulateArgs),

    /// Print the effective configuration after validation
    Config {
        /// Configuration file (.yaml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("anglectl={log_level},anglelink_engine={log_level},anglelink_core={log_level}")
                    .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(error::exit_code(&e))
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Listen {
            config,
            tick_hz,
            duration,
        } => commands::listen::execute(config.as_deref(), *tick_hz, *duration, cli.json).await,
        Commands::Discover { config } => commands::discover::execute(config.as_deref(), cli.json),
        Commands::Simulate(args) => commands::simulate::execute(args, cli.json).await,
        Commands::Config { config } => commands::config::execute(config.as_deref(), cli.json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::simulate::SimMode;
    use std::net::Ipv4Addr;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_listen_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["anglectl", "listen"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        assert!(matches!(
            cli.command,
            Commands::Listen {
                config: None,
                tick_hz: 60,
                duration: None,
            }
        ));
        Ok(())
    }

    #[test]
    fn parse_global_flags_after_subcommand() -> TestResult {
        let cli = Cli::try_parse_from(["anglectl", "config", "--json", "-vv"])?;
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        Ok(())
    }

    #[test]
    fn parse_tick_hz_range() {
        assert!(Cli::try_parse_from(["anglectl", "listen", "--tick-hz", "0"]).is_err());
        assert!(Cli::try_parse_from(["anglectl", "listen", "--tick-hz", "5000"]).is_err());
    }

    #[test]
    fn parse_simulate_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["anglectl", "simulate"])?;
        let Commands::Simulate(args) = cli.command else {
            return Err("expected simulate".into());
        };
        assert_eq!(args.target_ip, Ipv4Addr::LOCALHOST);
        assert_eq!(args.data_port, 5005);
        assert_eq!(args.discovery_port, 5006);
        assert!((args.rate - 100.0).abs() < f64::EPSILON);
        assert_eq!(args.mode, SimMode::Rotate);
        assert!((args.speed - 30.0).abs() < f32::EPSILON);
        assert_eq!(args.duration, None);
        Ok(())
    }

    #[test]
    fn parse_simulate_options() -> TestResult {
        let cli = Cli::try_parse_from([
            "anglectl",
            "simulate",
            "--target-ip",
            "192.168.1.10",
            "--mode",
            "sine",
            "--rate",
            "50",
        ])?;
        let Commands::Simulate(args) = cli.command else {
            return Err("expected simulate".into());
        };
        assert_eq!(args.target_ip, Ipv4Addr::new(192, 168, 1, 10));
        assert_eq!(args.mode, SimMode::Sine);
        assert!((args.rate - 50.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn parse_simulate_rejects_bad_rate() {
        assert!(Cli::try_parse_from(["anglectl", "simulate", "--rate", "0"]).is_err());
        assert!(Cli::try_parse_from(["anglectl", "simulate", "--mode", "spin"]).is_err());
        assert!(Cli::try_parse_from(["anglectl", "simulate", "--rate", "1e10"]).is_err());
        assert!(Cli::try_parse_from(["anglectl", "simulate", "--duration", "1e30"]).is_err());
    }

    #[test]
    fn parse_listen_rejects_huge_duration() {
        assert!(Cli::try_parse_from(["anglectl", "listen", "--duration", "1e30"]).is_err());
    }
}

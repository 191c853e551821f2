//! End-to-end tests over loopback UDP.
//!
//! Every test binds the data socket to an ephemeral port on 127.0.0.1 and
//! points discovery at a local capture socket, so tests never touch the real
//! network or each other.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::thread;
use std::time::{Duration, Instant};

use anglelink_core::{ConnectionState, LinkConfig, LinkEvent};
use anglelink_engine::{EngineError, UdpReceiverEngine};
use anglelink_protocol::{DISCOVERY_TOKEN, encode_angle};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const FRAME: f32 = 1.0 / 60.0;

struct Harness {
    engine: UdpReceiverEngine,
    sensor: UdpSocket,
    discovery_capture: UdpSocket,
    data_addr: SocketAddr,
}

impl Harness {
    fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let discovery_capture = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0))?;
        discovery_capture.set_read_timeout(Some(Duration::from_secs(2)))?;

        let mut config = LinkConfig::default();
        config.discovery.listen_address = Ipv4Addr::LOCALHOST.to_string();
        config.discovery.data_port = 0;
        config.discovery.broadcast_address = Ipv4Addr::LOCALHOST.to_string();
        config.discovery.discovery_port = discovery_capture.local_addr()?.port();

        let mut engine = UdpReceiverEngine::new(config);
        engine.start()?;
        let data_addr = engine
            .local_data_addr()
            .ok_or("engine did not report its data address")?;

        let sensor = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0))?;

        Ok(Self {
            engine,
            sensor,
            discovery_capture,
            data_addr,
        })
    }

    fn send_angle(&self, angle: f32) -> std::io::Result<()> {
        self.sensor.send_to(&encode_angle(angle), self.data_addr)?;
        Ok(())
    }

    fn send_raw(&self, payload: &[u8]) -> std::io::Result<()> {
        self.sensor.send_to(payload, self.data_addr)?;
        Ok(())
    }

    /// Wait until the receive thread has seen `total` datagrams.
    fn wait_for_datagrams(&self, total: u64) -> Result<(), String> {
        let deadline = Instant::now() + Duration::from_secs(2);
        while self.engine.counters().datagrams_total() < total {
            if Instant::now() > deadline {
                return Err(format!(
                    "timed out waiting for {total} datagrams, saw {:?}",
                    self.engine.counters()
                ));
            }
            thread::sleep(Duration::from_millis(2));
        }
        Ok(())
    }

    fn recv_discovery(&self) -> Result<Vec<u8>, std::io::Error> {
        let mut buf = [0u8; 64];
        let (len, _) = self.discovery_capture.recv_from(&mut buf)?;
        Ok(buf.get(..len).unwrap_or_default().to_vec())
    }
}

#[test]
fn test_sample_then_silence() -> TestResult {
    let mut h = Harness::start()?;

    h.send_angle(45.0)?;
    h.wait_for_datagrams(1)?;
    h.engine.tick(FRAME);

    let output = h.engine.output();
    assert!((output.raw_angle - 45.0).abs() < f32::EPSILON);
    assert!((output.processed_angle - 45.0).abs() < f32::EPSILON);
    assert_eq!(output.packets_received, 1);
    assert_eq!(h.engine.connection_state(), ConnectionState::Connected);
    assert_eq!(
        h.engine.peer().map(str::to_string),
        Some(h.sensor.local_addr()?.to_string())
    );

    // 5.1 s of silence at 10 Hz ticks
    for _ in 0..51 {
        h.engine.tick(0.1);
    }
    assert_eq!(h.engine.connection_state(), ConnectionState::Disconnected);
    assert_eq!(h.engine.peer(), None);

    h.engine.stop();
    Ok(())
}

#[test]
fn test_events_in_order() -> TestResult {
    let mut h = Harness::start()?;
    let events = h.engine.subscribe();

    h.send_angle(120.0)?;
    h.wait_for_datagrams(1)?;
    h.engine.tick(FRAME);
    h.engine.stop();

    let received: Vec<LinkEvent> = events.try_iter().collect();
    let peer = Some(h.sensor.local_addr()?.to_string());
    assert_eq!(
        received,
        vec![
            LinkEvent::ConnectivityChanged {
                connected: true,
                peer: peer.clone(),
            },
            LinkEvent::AngleUpdated { angle: 120.0 },
            LinkEvent::ConnectivityChanged {
                connected: false,
                peer,
            },
        ]
    );
    Ok(())
}

#[test]
fn test_invalid_datagrams_are_dropped() -> TestResult {
    let mut h = Harness::start()?;
    let events = h.engine.subscribe();

    h.send_raw(&[0x00, 0x00, 0x34])?;
    h.send_angle(400.0)?;
    h.send_angle(-10.0)?;
    h.wait_for_datagrams(3)?;
    h.engine.tick(FRAME);

    let counters = h.engine.counters();
    assert_eq!(counters.datagrams_rejected, 3);
    assert_eq!(counters.datagrams_accepted, 0);
    assert_eq!(h.engine.output().packets_received, 0);
    assert!(!h.engine.is_connected());
    assert_eq!(events.try_iter().count(), 0);
    Ok(())
}

#[test]
fn test_trailing_bytes_ignored() -> TestResult {
    let mut h = Harness::start()?;

    let mut payload = [0xEEu8; 10];
    payload
        .get_mut(..4)
        .ok_or("payload too short")?
        .copy_from_slice(&encode_angle(270.5));
    h.send_raw(&payload)?;
    h.wait_for_datagrams(1)?;
    h.engine.tick(FRAME);

    assert!((h.engine.output().raw_angle - 270.5).abs() < f32::EPSILON);
    Ok(())
}

#[test]
fn test_burst_never_yields_torn_values() -> TestResult {
    const VALUES: [f32; 5] = [0.0, 45.25, 123.5, 270.125, 360.0];
    let mut h = Harness::start()?;

    for round in 0..20 {
        for i in 0..50 {
            let value = VALUES.get((round + i) % VALUES.len()).copied().unwrap_or(0.0);
            h.send_angle(value)?;
        }
        thread::sleep(Duration::from_millis(5));
        h.engine.tick(FRAME);

        let raw = h.engine.output().raw_angle;
        assert!(
            VALUES.iter().any(|v| v.to_bits() == raw.to_bits()),
            "observed unpublished value {raw}"
        );
    }

    let consumed = h.engine.output().packets_received;
    let accepted = h.engine.counters().datagrams_accepted;
    assert!(consumed >= 1);
    assert!(consumed <= accepted);
    Ok(())
}

#[test]
fn test_discovery_on_start_and_interval() -> TestResult {
    let mut h = Harness::start()?;

    assert_eq!(h.recv_discovery()?, DISCOVERY_TOKEN.to_vec());

    // Default interval is 2 s
    h.engine.tick(1.0);
    h.engine.tick(1.0);
    assert_eq!(h.recv_discovery()?, DISCOVERY_TOKEN.to_vec());

    h.engine.send_discovery_now()?;
    assert_eq!(h.recv_discovery()?, DISCOVERY_TOKEN.to_vec());

    assert_eq!(h.engine.counters().discovery_sent, 3);
    Ok(())
}

#[test]
fn test_discovery_continues_while_connected() -> TestResult {
    let mut h = Harness::start()?;
    let _first = h.recv_discovery()?;

    h.send_angle(10.0)?;
    h.wait_for_datagrams(1)?;
    h.engine.tick(FRAME);
    assert!(h.engine.is_connected());

    h.engine.tick(2.0);
    assert_eq!(h.recv_discovery()?, DISCOVERY_TOKEN.to_vec());
    Ok(())
}

#[test]
fn test_start_twice_is_noop() -> TestResult {
    let mut h = Harness::start()?;
    let before = h.engine.local_data_addr();
    h.engine.start()?;
    assert!(h.engine.is_listening());
    assert_eq!(h.engine.local_data_addr(), before);
    Ok(())
}

#[test]
fn test_double_stop_then_restart() -> TestResult {
    let mut h = Harness::start()?;

    h.send_angle(90.0)?;
    h.wait_for_datagrams(1)?;
    h.engine.tick(FRAME);

    h.engine.stop();
    h.engine.stop();
    assert!(!h.engine.is_listening());
    assert_eq!(h.engine.local_data_addr(), None);
    assert!(!h.engine.is_connected());

    // Ticking while stopped is harmless and manual discovery is a no-op
    h.engine.tick(FRAME);
    h.engine.send_discovery_now()?;

    h.engine.start()?;
    let data_addr = h
        .engine
        .local_data_addr()
        .ok_or("engine did not report its data address")?;
    h.sensor.send_to(&encode_angle(180.0), data_addr)?;

    let deadline = Instant::now() + Duration::from_secs(2);
    while h.engine.counters().datagrams_accepted < 2 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(2));
    }
    h.engine.tick(FRAME);

    // Packet count survives stop/start
    let output = h.engine.output();
    assert_eq!(output.packets_received, 2);
    assert!((output.raw_angle - 180.0).abs() < f32::EPSILON);
    assert!(h.engine.is_connected());
    Ok(())
}

#[test]
fn test_no_samples_after_stop() -> TestResult {
    let mut h = Harness::start()?;

    h.send_angle(33.0)?;
    h.wait_for_datagrams(1)?;
    h.engine.stop();

    // The sample arrived before stop but was never consumed
    h.engine.tick(FRAME);
    assert_eq!(h.engine.output().packets_received, 0);
    Ok(())
}

#[test]
fn test_bind_failure_leaves_engine_stopped() {
    let mut config = LinkConfig::default();
    // TEST-NET-3, never a local interface
    config.discovery.listen_address = "203.0.113.7".to_string();
    config.discovery.data_port = 0;
    config.discovery.broadcast_address = Ipv4Addr::LOCALHOST.to_string();

    let mut engine = UdpReceiverEngine::new(config);
    assert!(matches!(engine.start(), Err(EngineError::Socket { .. })));
    assert!(!engine.is_listening());
    assert_eq!(engine.local_data_addr(), None);
}

#[test]
fn test_start_retries_after_port_is_freed() -> TestResult {
    // A plain socket without address reuse holds the port exclusively
    let blocker = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0))?;
    let port = blocker.local_addr()?.port();
    let discovery_capture = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0))?;
    discovery_capture.set_read_timeout(Some(Duration::from_secs(2)))?;

    let mut config = LinkConfig::default();
    config.discovery.listen_address = Ipv4Addr::LOCALHOST.to_string();
    config.discovery.data_port = port;
    config.discovery.broadcast_address = Ipv4Addr::LOCALHOST.to_string();
    config.discovery.discovery_port = discovery_capture.local_addr()?.port();

    let mut engine = UdpReceiverEngine::new(config);
    assert!(matches!(engine.start(), Err(EngineError::Socket { .. })));
    assert!(!engine.is_listening());
    assert_eq!(engine.counters().discovery_sent, 0);

    drop(blocker);
    engine.start()?;
    assert!(engine.is_listening());
    assert_eq!(engine.local_data_addr().map(|addr| addr.port()), Some(port));

    let mut buf = [0u8; 64];
    let (len, _) = discovery_capture.recv_from(&mut buf)?;
    assert_eq!(buf.get(..len), Some(&DISCOVERY_TOKEN[..]));

    let sensor = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0))?;
    sensor.send_to(&encode_angle(75.0), (Ipv4Addr::LOCALHOST, port))?;
    let deadline = Instant::now() + Duration::from_secs(2);
    while engine.counters().datagrams_accepted < 1 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(2));
    }
    engine.tick(FRAME);
    assert!((engine.output().raw_angle - 75.0).abs() < f32::EPSILON);

    engine.stop();
    // Stopping releases the port for an exclusive binder again
    let rebound = UdpSocket::bind((Ipv4Addr::LOCALHOST, port))?;
    assert_eq!(rebound.local_addr()?.port(), port);
    Ok(())
}

#[test]
fn test_drop_while_listening_stops() -> TestResult {
    let h = Harness::start()?;
    let data_addr = h.data_addr;
    drop(h);

    // The port is free again once the engine is gone
    let rebound = UdpSocket::bind(data_addr)?;
    assert_eq!(rebound.local_addr()?, data_addr);
    Ok(())
}

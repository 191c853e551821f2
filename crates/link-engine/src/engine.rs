//! The receiver engine: sockets, receive thread and per-tick processing.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use anglelink_atomic::LinkCountersSnapshot;
use anglelink_core::{
    AngleOutputState, ConfigError, ConnectionState, ConnectionTracker, LinkConfig, LinkEvent,
    OrientationSink, RotationConfig,
};
use anglelink_math::{SmoothingState, smoothing_filter};
use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use tracing::{debug, info, trace, warn};

use crate::EngineError;
use crate::discovery::DiscoveryBroadcaster;
use crate::receiver::{ReceiverShared, receive_loop};
use crate::socket::bind_data_socket;

/// Buffered events per subscriber before new events to it are dropped.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

const RECEIVE_THREAD_NAME: &str = "anglelink-rx";

/// Discovers one sensor, receives its angle stream and turns it into a
/// smoothed orientation.
///
/// Two execution contexts are involved. A background thread owns the data
/// socket and publishes each accepted sample into a lock-free slot. The host
/// calls [`tick`](Self::tick) once per frame; everything else, including the
/// discovery socket, the connection tracker and the output angles, belongs to
/// that caller.
///
/// # Example
///
/// ```no_run
/// use anglelink_core::{Axis, LinkConfig};
/// use anglelink_engine::UdpReceiverEngine;
///
/// # fn main() -> Result<(), anglelink_engine::EngineError> {
/// let mut engine = UdpReceiverEngine::new(LinkConfig::default());
/// engine.set_orientation_sink(|axis: Axis, angle: f32| {
///     println!("{axis} -> {angle:.1}");
/// });
/// let events = engine.subscribe();
///
/// engine.start()?;
/// for _ in 0..600 {
///     engine.tick(1.0 / 60.0);
///     for event in events.try_iter() {
///         println!("{event:?}");
///     }
///     std::thread::sleep(std::time::Duration::from_millis(16));
/// }
/// engine.stop();
/// # Ok(())
/// # }
/// ```
pub struct UdpReceiverEngine {
    config: LinkConfig,
    shared: Arc<ReceiverShared>,
    running: Arc<AtomicBool>,
    receive_thread: Option<JoinHandle<()>>,
    discovery: Option<DiscoveryBroadcaster>,
    local_data_addr: Option<SocketAddr>,
    tracker: ConnectionTracker,
    output: AngleOutputState,
    /// A sample has been consumed since creation or the last `reset_angle`.
    has_sample: bool,
    smoothing: SmoothingState,
    sink: Option<Box<dyn OrientationSink>>,
    subscribers: Vec<Sender<LinkEvent>>,
}

impl fmt::Debug for UdpReceiverEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UdpReceiverEngine")
            .field("config", &self.config)
            .field("listening", &self.is_listening())
            .field("local_data_addr", &self.local_data_addr)
            .field("tracker", &self.tracker)
            .field("output", &self.output)
            .field("sample_pending", &self.shared.slot.is_fresh())
            .field("last_published", &self.shared.slot.peek())
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl UdpReceiverEngine {
    /// Create a stopped engine. Nothing is bound until [`start`](Self::start).
    pub fn new(config: LinkConfig) -> Self {
        let tracker = ConnectionTracker::new(config.discovery.connection_timeout_seconds);
        let smoothing = SmoothingState::with_enabled(
            config.rotation.smoothing_speed,
            config.rotation.smoothing_enabled,
        );
        Self {
            config,
            shared: Arc::new(ReceiverShared::default()),
            running: Arc::new(AtomicBool::new(false)),
            receive_thread: None,
            discovery: None,
            local_data_addr: None,
            tracker,
            output: AngleOutputState::default(),
            has_sample: false,
            smoothing,
            sink: None,
            subscribers: Vec::new(),
        }
    }

    /// Bind both sockets, spawn the receive thread and send a first discovery.
    ///
    /// Calling this while already listening does nothing. On failure every
    /// partially created resource is released and the engine stays stopped,
    /// so `start` may simply be retried.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Config`] if the configuration does not validate
    /// - [`EngineError::Socket`] if either socket cannot be set up
    /// - [`EngineError::Thread`] if the receive thread cannot be spawned
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.is_listening() {
            return Ok(());
        }

        let endpoints = self.config.validate()?;
        let data_socket = bind_data_socket(endpoints.data)?;
        let local_addr = data_socket
            .local_addr()
            .map_err(EngineError::socket("query data socket address"))?;
        let discovery = DiscoveryBroadcaster::bind(
            endpoints.discovery_target,
            self.config.discovery.discovery_interval_seconds,
            Arc::clone(&self.shared.counters),
        )?;

        self.tracker
            .set_timeout(self.config.discovery.connection_timeout_seconds);
        self.running.store(true, Ordering::Release);

        let shared = Arc::clone(&self.shared);
        let running = Arc::clone(&self.running);
        let spawned = thread::Builder::new()
            .name(RECEIVE_THREAD_NAME.to_string())
            .spawn(move || receive_loop(data_socket, shared, running));
        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.running.store(false, Ordering::Release);
                return Err(EngineError::Thread(e));
            }
        };

        self.receive_thread = Some(handle);
        self.local_data_addr = Some(local_addr);

        info!(
            data = %local_addr,
            discovery = %endpoints.discovery_target,
            "listening for angle sensor"
        );

        if let Err(e) = discovery.send_now() {
            debug!(error = %e, "initial discovery send failed");
        }
        self.discovery = Some(discovery);
        Ok(())
    }

    /// Stop the receive thread and release both sockets.
    ///
    /// Blocks until the receive thread has exited, so no sample can be
    /// published after this returns. A connected sensor is reported as
    /// disconnected. Does nothing when not listening.
    pub fn stop(&mut self) {
        if !self.is_listening() {
            return;
        }

        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.receive_thread.take()
            && handle.join().is_err()
        {
            warn!("receive thread panicked");
        }

        self.discovery = None;
        self.local_data_addr = None;
        self.shared.slot.discard();
        *self.shared.peer.lock() = None;

        if let Some(event) = self.tracker.force_disconnect() {
            self.emit(event.into());
        }
        info!("stopped listening");
    }

    /// Advance the engine by one host frame of `dt` seconds.
    ///
    /// Order: discovery timer, sample hand-off and liveness (a consumed
    /// sample also gets the rotation transform), smoothing, then the
    /// orientation sink.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        if let Some(discovery) = self.discovery.as_mut() {
            discovery.tick(dt);
        }

        let rotation = &self.config.rotation;
        if let Some(angle) = self.shared.slot.take() {
            let peer = (*self.shared.peer.lock()).map(|addr| addr.to_string());
            let connectivity = self.tracker.record_sample(peer);

            self.has_sample = true;
            self.output.raw_angle = angle;
            self.output.processed_angle = rotation.process(angle);
            self.output.packets_received = self.output.packets_received.saturating_add(1);
            trace!(
                raw = angle,
                processed = self.output.processed_angle,
                "sample consumed"
            );

            let processed = self.output.processed_angle;
            if let Some(event) = connectivity {
                self.emit(event.into());
            }
            self.emit(LinkEvent::AngleUpdated { angle: processed });
        } else if let Some(event) = self.tracker.advance(dt) {
            self.emit(event.into());
        }

        let rotation = &self.config.rotation;
        self.smoothing.speed = rotation.smoothing_speed;
        self.smoothing.enabled = rotation.smoothing_enabled;
        self.output.smoothed_angle =
            smoothing_filter(self.output.processed_angle, dt, &mut self.smoothing);

        if rotation.auto_apply
            && let Some(sink) = self.sink.as_mut()
        {
            sink.apply_orientation(rotation.axis, self.output.smoothed_angle);
        }
    }

    /// Register an observer. Events are dropped for a subscriber whose buffer
    /// is full, and the subscriber is forgotten once its receiver is dropped.
    pub fn subscribe(&mut self) -> Receiver<LinkEvent> {
        let (tx, rx) = channel::bounded(EVENT_CHANNEL_CAPACITY);
        self.subscribers.push(tx);
        rx
    }

    /// Install the collaborator that receives the smoothed angle.
    pub fn set_orientation_sink(&mut self, sink: impl OrientationSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Replace the rotation parameters.
    ///
    /// The last consumed sample is re-processed with the new parameters, so
    /// the change shows on the next tick without waiting for a sample.
    ///
    /// # Errors
    ///
    /// The validation error; the previous parameters are kept.
    pub fn set_rotation_config(&mut self, rotation: RotationConfig) -> Result<(), ConfigError> {
        rotation.validate()?;
        self.config.rotation = rotation;
        if self.has_sample {
            self.output.processed_angle = self.config.rotation.process(self.output.raw_angle);
        }
        Ok(())
    }

    /// Zero every angle and drop any pending sample. The packet count is kept.
    pub fn reset_angle(&mut self) {
        self.output.reset_angles();
        self.has_sample = false;
        self.smoothing.reset();
        self.shared.slot.reset();
    }

    /// Broadcast a discovery datagram now. Does nothing when not listening.
    ///
    /// # Errors
    ///
    /// [`EngineError::Socket`] if the send fails.
    pub fn send_discovery_now(&self) -> Result<(), EngineError> {
        match &self.discovery {
            Some(discovery) => discovery
                .send_now()
                .map_err(EngineError::socket("send discovery")),
            None => Ok(()),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// The bound data address while listening. Reports the real port when the
    /// configuration asked for port 0.
    pub fn local_data_addr(&self) -> Option<SocketAddr> {
        self.local_data_addr
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn output(&self) -> AngleOutputState {
        self.output
    }

    /// Liveness of the tracked sensor.
    pub fn connection_state(&self) -> ConnectionState {
        self.tracker.state()
    }

    pub fn is_connected(&self) -> bool {
        self.tracker.is_connected()
    }

    /// `ip:port` of the connected sensor.
    pub fn peer(&self) -> Option<&str> {
        self.tracker.peer()
    }

    /// Seconds since a sample was last consumed by `tick`.
    pub fn time_since_last_packet(&self) -> f32 {
        self.tracker.time_since_last_packet()
    }

    pub fn counters(&self) -> LinkCountersSnapshot {
        self.shared.counters.snapshot()
    }

    fn emit(&mut self, event: LinkEvent) {
        self.subscribers
            .retain(|tx| match tx.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    trace!("subscriber full, event dropped");
                    true
                }
                Err(TrySendError::Disconnected(_)) => false,
            });
    }
}

impl Drop for UdpReceiverEngine {
    fn drop(&mut self) {
        if self.is_listening() {
            debug!("engine dropped while listening, stopping");
            self.stop();
        }
    }
}

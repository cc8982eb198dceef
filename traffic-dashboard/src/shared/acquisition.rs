/// Acquisition loop
///
/// Driven once per tick: in mock mode it synthesises a snapshot, in live mode
/// it makes sure the subscriber has a connection. Live snapshots arrive
/// separately through [`Acquisition::on_transport_event`].
use crate::shared::{
    mock::MockGenerator,
    mode::{ConnectionMode, SharedMode},
    types::MetricsSnapshot,
    websocket::{ConnectionStatus, LiveSubscriber, Transport, TransportEnvelope},
};
use rand::{Rng, rngs::ThreadRng};
use tracing::{debug, info};

/// Where a rendered snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Live,
    Mock,
}

impl SnapshotSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotSource::Live => "LIVE",
            SnapshotSource::Mock => "MOCK",
        }
    }
}

/// Dual-mode data acquisition behind a single snapshot output
pub struct Acquisition<T: Transport, R = ThreadRng> {
    mode: SharedMode,
    generator: MockGenerator<R>,
    subscriber: LiveSubscriber<T>,
}

impl<T: Transport, R: Rng> Acquisition<T, R> {
    pub fn new(mode: SharedMode, generator: MockGenerator<R>, subscriber: LiveSubscriber<T>) -> Self {
        Self {
            mode,
            generator,
            subscriber,
        }
    }

    pub fn mode(&self) -> &SharedMode {
        &self.mode
    }

    pub fn status(&self) -> ConnectionStatus {
        self.subscriber.status()
    }

    /// One attempt to reach the live feed, used at startup in any mode
    pub fn connect_on_startup(&mut self) {
        if let Err(e) = self.subscriber.connect() {
            info!("Initial WebSocket connection failed, using mock data: {}", e);
        }
    }

    /// Run one tick. Returns a snapshot to render in mock mode.
    ///
    /// Never fails: connection errors are handled by the subscriber.
    pub fn tick(&mut self) -> Option<MetricsSnapshot> {
        match self.mode.get() {
            ConnectionMode::Mock => Some(self.generator.generate()),
            ConnectionMode::Live => {
                self.ensure_connected();
                None
            }
        }
    }

    /// Apply a transport event, returning a live snapshot to render if any
    pub fn on_transport_event(&mut self, envelope: TransportEnvelope) -> Option<MetricsSnapshot> {
        self.subscriber.handle(envelope)
    }

    /// Close the live connection, if any
    pub fn shutdown(&mut self) {
        self.subscriber.disconnect();
    }

    fn ensure_connected(&mut self) {
        if self.subscriber.is_active() {
            return;
        }

        if let Err(e) = self.subscriber.connect() {
            debug!("Connection attempt to {} failed: {}", self.subscriber.endpoint(), e);
        }
    }
}

/// Live subscriber for the corridor status feed
///
/// Owns at most one streaming connection, turns inbound text frames into
/// [`MetricsSnapshot`]s and degrades the shared mode to mock data whenever the
/// transport fails.
use crate::shared::{
    config::validate_endpoint,
    error::DashboardError,
    mode::SharedMode,
    types::{DecodedSnapshot, MetricsSnapshot},
};
use futures::StreamExt;
use std::time::Duration;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use url::Url;

/// Lifecycle of the live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "DISCONNECTED",
            ConnectionStatus::Connecting => "CONNECTING",
            ConnectionStatus::Connected => "CONNECTED",
        }
    }
}

/// Event reported by a transport for one connection
#[derive(Debug)]
pub enum TransportEvent {
    /// Handshake completed
    Opened,
    /// Inbound text frame
    Text(String),
    /// Peer closed the connection or the stream ended
    Closed,
    /// Connect failure, timeout or read error
    Failed(DashboardError),
}

/// A [`TransportEvent`] stamped with the connection generation that produced it
#[derive(Debug)]
pub struct TransportEnvelope {
    pub generation: u64,
    pub event: TransportEvent,
}

/// Sending side handed to a transport for one connection
#[derive(Debug, Clone)]
pub struct EventSink {
    generation: u64,
    tx: mpsc::UnboundedSender<TransportEnvelope>,
}

impl EventSink {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Deliver an event, returning `false` once the subscriber is gone
    pub fn emit(&self, event: TransportEvent) -> bool {
        self.tx
            .send(TransportEnvelope {
                generation: self.generation,
                event,
            })
            .is_ok()
    }
}

/// An open (or opening) connection owned by the subscriber
pub trait Connection {
    /// Release the connection. Must not emit further events as failures.
    fn close(&mut self);
}

/// Opens connections to the feed
pub trait Transport {
    type Connection: Connection;

    /// Start connecting to `endpoint`, reporting lifecycle through `sink`.
    ///
    /// Returns an error only for failures detected before any I/O starts.
    fn open(&mut self, endpoint: &str, sink: EventSink)
    -> Result<Self::Connection, DashboardError>;
}

/// Subscriber state machine: `Disconnected → Connecting → Connected → Disconnected`
pub struct LiveSubscriber<T: Transport> {
    endpoint: String,
    transport: T,
    mode: SharedMode,
    status: ConnectionStatus,
    connection: Option<T::Connection>,
    generation: u64,
    event_tx: mpsc::UnboundedSender<TransportEnvelope>,
}

impl<T: Transport> LiveSubscriber<T> {
    /// Create a new subscriber.
    ///
    /// Returns the receiver on which every transport event arrives; feed each
    /// one back through [`LiveSubscriber::handle`].
    pub fn new(
        endpoint: impl Into<String>,
        transport: T,
        mode: SharedMode,
    ) -> (Self, mpsc::UnboundedReceiver<TransportEnvelope>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let subscriber = Self {
            endpoint: endpoint.into(),
            transport,
            mode,
            status: ConnectionStatus::Disconnected,
            connection: None,
            generation: 0,
            event_tx,
        };

        (subscriber, event_rx)
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check if a connection is established or being established
    pub fn is_active(&self) -> bool {
        self.status != ConnectionStatus::Disconnected
    }

    /// Replace any existing connection with a fresh attempt.
    ///
    /// A synchronous failure takes the same path as an asynchronous one
    /// (disconnected, mock data) before being returned.
    pub fn connect(&mut self) -> Result<(), DashboardError> {
        self.release();
        self.generation += 1;
        self.status = ConnectionStatus::Connecting;

        let sink = EventSink {
            generation: self.generation,
            tx: self.event_tx.clone(),
        };

        debug!("Connecting to {}", self.endpoint);
        match self.transport.open(&self.endpoint, sink) {
            Ok(connection) => {
                self.connection = Some(connection);
                Ok(())
            }
            Err(error) => {
                self.fail();
                Err(error)
            }
        }
    }

    /// Close the current connection without treating it as a failure
    pub fn disconnect(&mut self) {
        self.release();
        self.generation += 1;
        self.status = ConnectionStatus::Disconnected;
    }

    /// Apply one transport event, returning a snapshot to render if the event
    /// carried one.
    pub fn handle(&mut self, envelope: TransportEnvelope) -> Option<MetricsSnapshot> {
        if envelope.generation != self.generation {
            debug!(
                generation = envelope.generation,
                "Ignoring event from superseded connection"
            );
            return None;
        }

        match envelope.event {
            TransportEvent::Opened => {
                info!("WebSocket connected to {}", self.endpoint);
                self.status = ConnectionStatus::Connected;
                None
            }
            TransportEvent::Text(text) => match parse_message(&text) {
                Ok(decoded) => {
                    if !decoded.is_complete() {
                        debug!(fallbacks = ?decoded.fallbacks, "Substituted defaults for inbound fields");
                    }
                    Some(decoded.snapshot)
                }
                Err(e) => {
                    warn!("{}", e);
                    debug!("Raw message: {}", &text[..floor_char_boundary(&text, 200)]);
                    None
                }
            },
            TransportEvent::Closed => {
                info!("WebSocket disconnected");
                self.fail();
                None
            }
            TransportEvent::Failed(e) => {
                error!("WebSocket error: {}", e);
                self.fail();
                None
            }
        }
    }

    fn release(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            debug!("Closing previous connection");
            connection.close();
        }
    }

    fn fail(&mut self) {
        self.release();
        self.status = ConnectionStatus::Disconnected;
        self.mode.fall_back_to_mock();
    }
}

/// Parse one inbound text frame.
///
/// Only JSON syntax is enforced; field-level problems become defaults.
pub fn parse_message(text: &str) -> Result<DecodedSnapshot, DashboardError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(MetricsSnapshot::decode(&value))
}

fn floor_char_boundary(text: &str, max: usize) -> usize {
    if text.len() <= max {
        return text.len();
    }
    (0..=max).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0)
}

/// [`Transport`] over WebSockets using tokio-tungstenite
#[derive(Debug, Clone)]
pub struct WsTransport {
    connect_timeout: Duration,
}

impl WsTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

/// Connection task spawned by [`WsTransport`]
#[derive(Debug)]
pub struct WsConnection {
    task: JoinHandle<()>,
}

impl Connection for WsConnection {
    fn close(&mut self) {
        self.task.abort();
    }
}

impl Drop for WsConnection {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl Transport for WsTransport {
    type Connection = WsConnection;

    fn open(
        &mut self,
        endpoint: &str,
        sink: EventSink,
    ) -> Result<Self::Connection, DashboardError> {
        let url = validate_endpoint(endpoint)?;
        let connect_timeout = self.connect_timeout;

        let task = tokio::spawn(async move {
            run_connection(url, connect_timeout, sink).await;
        });

        Ok(WsConnection { task })
    }
}

/// Connect, then forward frames until the connection ends
async fn run_connection(url: Url, connect_timeout: Duration, sink: EventSink) {
    let mut ws_stream =
        match tokio::time::timeout(connect_timeout, connect_async(url.as_str())).await {
            Ok(Ok((ws_stream, _))) => ws_stream,
            Ok(Err(e)) => {
                sink.emit(TransportEvent::Failed(DashboardError::Connect {
                    url: url.to_string(),
                    reason: e.to_string(),
                }));
                return;
            }
            Err(_) => {
                sink.emit(TransportEvent::Failed(DashboardError::ConnectTimeout {
                    url: url.to_string(),
                    timeout: connect_timeout,
                }));
                return;
            }
        };

    if !sink.emit(TransportEvent::Opened) {
        return;
    }

    while let Some(msg) = ws_stream.next().await {
        let delivered = match msg {
            Ok(Message::Text(text)) => sink.emit(TransportEvent::Text(text.as_str().to_owned())),
            Ok(Message::Binary(bytes)) => match String::from_utf8(bytes.to_vec()) {
                Ok(text) => sink.emit(TransportEvent::Text(text)),
                Err(_) => {
                    debug!("Ignoring non UTF-8 binary frame ({} bytes)", bytes.len());
                    true
                }
            },
            Ok(Message::Close(_)) => {
                sink.emit(TransportEvent::Closed);
                return;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Heartbeat messages - tungstenite handles these automatically
                true
            }
            Ok(Message::Frame(_)) => true,
            Err(e) => {
                sink.emit(TransportEvent::Failed(DashboardError::Transport(e.to_string())));
                return;
            }
        };

        if !delivered {
            debug!("Subscriber dropped, stopping connection task");
            return;
        }
    }

    sink.emit(TransportEvent::Closed);
}


#[cfg(test)]
mod tests {
    use super::test_util::FakeTransport;
    use super::*;
    use crate::shared::mode::ConnectionMode;

    const VALID: &str = r#"{"main":9,"corridor":2,"amb":0,"amb_violation":false,"latency":1.0,"over2pct":0.8,"co2":20.79,"corridor_open":true}"#;

    fn subscriber(
        mode: ConnectionMode,
    ) -> (
        LiveSubscriber<FakeTransport>,
        mpsc::UnboundedReceiver<TransportEnvelope>,
        FakeTransport,
        SharedMode,
    ) {
        let transport = FakeTransport::default();
        let shared = SharedMode::new(mode);
        let (subscriber, rx) =
            LiveSubscriber::new("ws://localhost:5000/status", transport.clone(), shared.clone());
        (subscriber, rx, transport, shared)
    }

    fn pump(
        subscriber: &mut LiveSubscriber<FakeTransport>,
        rx: &mut mpsc::UnboundedReceiver<TransportEnvelope>,
    ) -> Vec<MetricsSnapshot> {
        let mut snapshots = Vec::new();
        while let Ok(envelope) = rx.try_recv() {
            snapshots.extend(subscriber.handle(envelope));
        }
        snapshots
    }

    #[test]
    fn test_connect_lifecycle() {
        let (mut subscriber, mut rx, transport, mode) = subscriber(ConnectionMode::Live);
        assert_eq!(subscriber.status(), ConnectionStatus::Disconnected);

        subscriber.connect().unwrap();
        assert_eq!(subscriber.status(), ConnectionStatus::Connecting);
        assert!(subscriber.is_active());

        transport.last_sink().emit(TransportEvent::Opened);
        pump(&mut subscriber, &mut rx);
        assert_eq!(subscriber.status(), ConnectionStatus::Connected);

        transport.last_sink().emit(TransportEvent::Text(VALID.to_string()));
        let snapshots = pump(&mut subscriber, &mut rx);
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].main, 9);
        assert!(snapshots[0].corridor_open);
        assert_eq!(mode.get(), ConnectionMode::Live);
    }

    #[test]
    fn test_malformed_message_keeps_connection() {
        let (mut subscriber, mut rx, transport, mode) = subscriber(ConnectionMode::Live);
        subscriber.connect().unwrap();
        transport.last_sink().emit(TransportEvent::Opened);
        pump(&mut subscriber, &mut rx);

        transport
            .last_sink()
            .emit(TransportEvent::Text("{not json".to_string()));
        let snapshots = pump(&mut subscriber, &mut rx);

        assert!(snapshots.is_empty());
        assert_eq!(subscriber.status(), ConnectionStatus::Connected);
        assert_eq!(mode.get(), ConnectionMode::Live);
        assert!(transport.closed.borrow().is_empty());
    }

    #[test]
    fn test_transport_failure_forces_mock() {
        let cases = [
            TransportEvent::Closed,
            TransportEvent::Failed(DashboardError::Transport("connection reset".to_string())),
            TransportEvent::Failed(DashboardError::Connect {
                url: "ws://localhost:5000/status".to_string(),
                reason: "connection refused".to_string(),
            }),
        ];

        for event in cases {
            let (mut subscriber, mut rx, transport, mode) = subscriber(ConnectionMode::Live);
            subscriber.connect().unwrap();
            transport.last_sink().emit(TransportEvent::Opened);
            transport.last_sink().emit(event);
            pump(&mut subscriber, &mut rx);

            assert_eq!(subscriber.status(), ConnectionStatus::Disconnected);
            assert_eq!(mode.get(), ConnectionMode::Mock);
            assert!(!subscriber.is_active());
        }
    }

    #[test]
    fn test_synchronous_open_failure_forces_mock() {
        let (mut subscriber, _rx, transport, mode) = subscriber(ConnectionMode::Live);
        *transport.refuse.borrow_mut() = true;

        let error = subscriber.connect().unwrap_err();

        assert!(error.is_transport());
        assert_eq!(subscriber.status(), ConnectionStatus::Disconnected);
        assert_eq!(mode.get(), ConnectionMode::Mock);
    }

    #[test]
    fn test_reconnect_releases_previous_connection_quietly() {
        let (mut subscriber, mut rx, transport, mode) = subscriber(ConnectionMode::Live);
        subscriber.connect().unwrap();
        let old = transport.last_sink();
        old.emit(TransportEvent::Opened);
        pump(&mut subscriber, &mut rx);

        subscriber.connect().unwrap();
        assert_eq!(transport.attempts(), 2);
        assert_eq!(*transport.closed.borrow(), vec![old.generation()]);

        // The old connection's close arrives late and must not count as a failure
        old.emit(TransportEvent::Closed);
        old.emit(TransportEvent::Text(VALID.to_string()));
        let snapshots = pump(&mut subscriber, &mut rx);

        assert!(snapshots.is_empty());
        assert_eq!(subscriber.status(), ConnectionStatus::Connecting);
        assert_eq!(mode.get(), ConnectionMode::Live);

        transport.last_sink().emit(TransportEvent::Opened);
        pump(&mut subscriber, &mut rx);
        assert_eq!(subscriber.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn test_disconnect_is_not_a_failure() {
        let (mut subscriber, mut rx, transport, mode) = subscriber(ConnectionMode::Live);
        subscriber.connect().unwrap();
        let sink = transport.last_sink();
        sink.emit(TransportEvent::Opened);
        pump(&mut subscriber, &mut rx);

        subscriber.disconnect();
        sink.emit(TransportEvent::Closed);
        pump(&mut subscriber, &mut rx);

        assert_eq!(subscriber.status(), ConnectionStatus::Disconnected);
        assert_eq!(mode.get(), ConnectionMode::Live);
        assert_eq!(transport.closed.borrow().len(), 1);
    }

    #[test]
    fn test_parse_message() {
        assert!(parse_message(VALID).unwrap().is_complete());
        assert!(matches!(
            parse_message("{not json"),
            Err(DashboardError::MalformedMessage(_))
        ));

        let partial = parse_message(r#"{"main": 12}"#).unwrap();
        assert_eq!(partial.snapshot.main, 12);
        assert_eq!(partial.fallbacks.len(), 7);
    }

    #[test]
    fn test_floor_char_boundary() {
        assert_eq!(floor_char_boundary("abc", 200), 3);
        let text = "→".repeat(100);
        let cut = floor_char_boundary(&text, 200);
        assert!(cut <= 200 && text.is_char_boundary(cut));
    }
}

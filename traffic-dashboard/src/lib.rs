/// Traffic Dashboard - Shared Library
///
/// Live corridor traffic metrics for the terminal, with a synthetic feed that
/// takes over whenever the live source is unavailable.
///
/// The library includes:
/// - The metrics snapshot type and its lenient JSON decoding
/// - The renderer mapping a snapshot to display fields
/// - The mock generator
/// - The live WebSocket subscriber and the acquisition loop driving both sources
/// - The ratatui display surface
pub mod shared;

// Re-export commonly used types for convenience
pub use shared::types::{DecodedSnapshot, FieldFallback, MetricsSnapshot};

pub use shared::render::{CorridorTone, DisplayFields, ViolationTone, render};

pub use shared::mock::MockGenerator;

pub use shared::mode::{ConnectionMode, ModeToggle, SharedMode};

pub use shared::websocket::{
    Connection, ConnectionStatus, EventSink, LiveSubscriber, Transport, TransportEnvelope,
    TransportEvent, WsConnection, WsTransport, parse_message,
};

pub use shared::acquisition::{Acquisition, SnapshotSource};

pub use shared::app::DashboardApp;
pub use shared::config::DashboardConfig;
pub use shared::error::DashboardError;
pub use shared::logging::init_logging;
pub use shared::widget::render_dashboard;

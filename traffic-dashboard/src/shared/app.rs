/// Dashboard view state
use crate::shared::{
    acquisition::SnapshotSource,
    mode::{ConnectionMode, ModeToggle},
    render::{DisplayFields, render},
    types::MetricsSnapshot,
    websocket::ConnectionStatus,
};
use chrono::{DateTime, Utc};

/// Everything the display surface shows
#[derive(Debug, Clone)]
pub struct DashboardApp {
    /// Fields of the latest rendered snapshot
    pub fields: Option<DisplayFields>,
    /// Source of the latest rendered snapshot
    pub source: Option<SnapshotSource>,
    /// Current mode
    pub mode: ConnectionMode,
    /// Label of the mode toggle control
    pub toggle_label: &'static str,
    /// Live connection status
    pub status: ConnectionStatus,
    /// Time the latest snapshot was rendered
    pub last_update: Option<DateTime<Utc>>,
    pub live_count: u64,
    pub mock_count: u64,
    pub should_quit: bool,
}

impl DashboardApp {
    pub fn new(mode: ConnectionMode) -> Self {
        Self {
            fields: None,
            source: None,
            mode,
            toggle_label: mode.toggle_label(),
            status: ConnectionStatus::Disconnected,
            last_update: None,
            live_count: 0,
            mock_count: 0,
            should_quit: false,
        }
    }

    /// Render a snapshot into the display fields
    pub fn show(&mut self, source: SnapshotSource, snapshot: &MetricsSnapshot) {
        self.fields = Some(render(snapshot));
        self.source = Some(source);
        self.last_update = Some(Utc::now());
        match source {
            SnapshotSource::Live => self.live_count += 1,
            SnapshotSource::Mock => self.mock_count += 1,
        }
    }

    /// Reflect a mode toggle on the control
    pub fn apply_toggle(&mut self, toggle: ModeToggle) {
        self.mode = toggle.mode;
        self.toggle_label = toggle.label;
    }

    /// Refresh mode and link status, which the subscriber may change
    pub fn sync(&mut self, mode: ConnectionMode, status: ConnectionStatus) {
        if self.mode != mode {
            self.mode = mode;
            self.toggle_label = mode.toggle_label();
        }
        self.status = status;
    }
}

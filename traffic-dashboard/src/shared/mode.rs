/// Connection mode shared by the acquisition loop, the live subscriber and the
/// mode toggle
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{info, warn};

/// Where the dashboard takes its data from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionMode {
    Live,
    #[default]
    Mock,
}

impl ConnectionMode {
    /// The opposite mode
    pub fn flipped(self) -> Self {
        match self {
            ConnectionMode::Live => ConnectionMode::Mock,
            ConnectionMode::Mock => ConnectionMode::Live,
        }
    }

    /// Label of the toggle control while in this mode, naming the next action
    pub fn toggle_label(self) -> &'static str {
        match self {
            ConnectionMode::Live => "Use Mock Data",
            ConnectionMode::Mock => "Use Real Data",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionMode::Live => "LIVE",
            ConnectionMode::Mock => "MOCK",
        }
    }
}

impl std::fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Handle to the single process-wide [`ConnectionMode`].
///
/// Clones share the same flag; readers always see the current value.
#[derive(Debug, Clone)]
pub struct SharedMode {
    mock: Arc<AtomicBool>,
}

impl Default for SharedMode {
    fn default() -> Self {
        Self::new(ConnectionMode::default())
    }
}

impl SharedMode {
    /// Create a new handle starting in `initial`
    pub fn new(initial: ConnectionMode) -> Self {
        Self {
            mock: Arc::new(AtomicBool::new(initial == ConnectionMode::Mock)),
        }
    }

    pub fn get(&self) -> ConnectionMode {
        if self.mock.load(Ordering::Relaxed) {
            ConnectionMode::Mock
        } else {
            ConnectionMode::Live
        }
    }

    pub fn set(&self, mode: ConnectionMode) {
        self.mock
            .store(mode == ConnectionMode::Mock, Ordering::Relaxed);
    }

    /// Force mock data after a transport failure
    pub fn fall_back_to_mock(&self) {
        if !self.mock.swap(true, Ordering::Relaxed) {
            warn!("Live feed lost, falling back to mock data");
        }
    }

    /// Invert the mode and return the new toggle label.
    ///
    /// Opens and closes nothing: the next acquisition tick observes the change.
    pub fn toggle(&self) -> ModeToggle {
        let previous = if self.mock.fetch_xor(true, Ordering::Relaxed) {
            ConnectionMode::Mock
        } else {
            ConnectionMode::Live
        };
        let mode = previous.flipped();

        info!(
            "Mock data {}",
            if mode == ConnectionMode::Mock {
                "enabled"
            } else {
                "disabled"
            }
        );

        ModeToggle {
            mode,
            label: mode.toggle_label(),
        }
    }
}

/// Outcome of one mode toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeToggle {
    /// Mode after the toggle
    pub mode: ConnectionMode,
    /// Label the toggle control now shows
    pub label: &'static str,
}

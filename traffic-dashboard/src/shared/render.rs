/// Metrics renderer
///
/// Maps a [`MetricsSnapshot`] to the text and severity of every display field.
/// Pure: no I/O, no state, identical output for identical input.
use crate::shared::types::MetricsSnapshot;
use ratatui::style::Color;

/// Main-route vehicle count above which a green corridor is recommended
pub const GREEN_CORRIDOR_THRESHOLD: u64 = 8;

/// Suffix appended to the corridor status when the threshold is exceeded
pub const GREEN_CORRIDOR_SUFFIX: &str = " → Recommend Green Corridor";

/// Two-state severity of the ambulance violation tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationTone {
    /// A violation occurred
    Alert,
    /// No violation
    Calm,
}

impl ViolationTone {
    /// Tile colour, two distinguishable shades of red
    pub fn color(&self) -> Color {
        match self {
            ViolationTone::Alert => Color::Rgb(239, 68, 68),
            ViolationTone::Calm => Color::Rgb(248, 113, 113),
        }
    }
}

/// Two-state severity of the corridor tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorridorTone {
    Open,
    Closed,
}

impl CorridorTone {
    /// Tile colour, two distinguishable shades of green
    pub fn color(&self) -> Color {
        match self {
            CorridorTone::Open => Color::Rgb(16, 185, 129),
            CorridorTone::Closed => Color::Rgb(52, 211, 153),
        }
    }
}

/// Every observable display field for one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFields {
    pub main_count: String,
    pub corridor_count: String,
    pub amb_count: String,
    pub violation_status: String,
    pub violation_tone: ViolationTone,
    pub latency: String,
    pub over2: String,
    pub co2: String,
    pub corridor_status: String,
    pub corridor_tone: CorridorTone,
}

impl DisplayFields {
    /// Check if the corridor status carries the green corridor recommendation
    pub fn recommends_green_corridor(&self) -> bool {
        self.corridor_status.ends_with(GREEN_CORRIDOR_SUFFIX)
    }
}

/// Render a snapshot into display fields
pub fn render(snapshot: &MetricsSnapshot) -> DisplayFields {
    let (violation_status, violation_tone) = if snapshot.amb_violation {
        ("YES", ViolationTone::Alert)
    } else {
        ("NO", ViolationTone::Calm)
    };

    let (corridor_label, corridor_tone) = if snapshot.corridor_open {
        ("OPEN", CorridorTone::Open)
    } else {
        ("CLOSED", CorridorTone::Closed)
    };

    // Fires off the main-route count alone, whatever corridor_open says
    let mut corridor_status = corridor_label.to_string();
    if snapshot.main > GREEN_CORRIDOR_THRESHOLD {
        corridor_status.push_str(GREEN_CORRIDOR_SUFFIX);
    }

    DisplayFields {
        main_count: snapshot.main.to_string(),
        corridor_count: snapshot.corridor.to_string(),
        amb_count: snapshot.amb.to_string(),
        violation_status: violation_status.to_string(),
        violation_tone,
        latency: format!("{:.2}", snapshot.latency),
        over2: format!("{} %", snapshot.over2pct),
        co2: format!("{:.2}", snapshot.co2),
        corridor_status,
        corridor_tone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(main: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            main,
            corridor: 2,
            amb: 0,
            amb_violation: false,
            latency: 1.0,
            over2pct: 0.8,
            co2: main as f64 * 2.31,
            corridor_open: true,
        }
    }

    #[test]
    fn test_render_recommendation_scenario() {
        let fields = render(&MetricsSnapshot {
            main: 9,
            corridor: 2,
            amb: 0,
            amb_violation: false,
            latency: 1.0,
            over2pct: 0.8,
            co2: 20.79,
            corridor_open: true,
        });

        assert_eq!(fields.corridor_status, "OPEN → Recommend Green Corridor");
        assert_eq!(fields.violation_status, "NO");
        assert_eq!(fields.violation_tone, ViolationTone::Calm);
        assert_eq!(fields.corridor_tone, CorridorTone::Open);
        assert_eq!(fields.main_count, "9");
        assert_eq!(fields.corridor_count, "2");
        assert_eq!(fields.amb_count, "0");
        assert_eq!(fields.latency, "1.00");
        assert_eq!(fields.over2, "0.8 %");
        assert_eq!(fields.co2, "20.79");
    }

    #[test]
    fn test_render_threshold_law() {
        for main in 0..=40 {
            let fields = render(&snapshot(main));
            assert_eq!(
                fields.recommends_green_corridor(),
                main > GREEN_CORRIDOR_THRESHOLD,
                "main = {main}"
            );
        }
    }

    #[test]
    fn test_render_suffix_ignores_corridor_open() {
        let closed = MetricsSnapshot {
            corridor_open: false,
            ..snapshot(12)
        };

        let fields = render(&closed);

        assert_eq!(fields.corridor_status, "CLOSED → Recommend Green Corridor");
        assert_eq!(fields.corridor_tone, CorridorTone::Closed);
    }

    #[test]
    fn test_render_violation_and_precision() {
        let fields = render(&MetricsSnapshot {
            amb: 1,
            amb_violation: true,
            latency: 1.23456,
            over2pct: 3.0,
            co2: 6.9300000000000015,
            ..snapshot(3)
        });

        assert_eq!(fields.violation_status, "YES");
        assert_eq!(fields.violation_tone, ViolationTone::Alert);
        assert_eq!(fields.amb_count, "1");
        assert_eq!(fields.latency, "1.23");
        assert_eq!(fields.over2, "3 %");
        assert_eq!(fields.co2, "6.93");
        assert_eq!(fields.corridor_status, "OPEN");
    }

    #[test]
    fn test_render_is_idempotent() {
        let input = snapshot(9);
        assert_eq!(render(&input), render(&input));

        let zero = MetricsSnapshot::default();
        let first = render(&zero);
        assert_eq!(first, render(&zero));
        assert_eq!(first.main_count, "0");
        assert_eq!(first.corridor_status, "CLOSED");
    }

    #[test]
    fn test_tones_are_distinguishable() {
        assert_ne!(ViolationTone::Alert.color(), ViolationTone::Calm.color());
        assert_ne!(CorridorTone::Open.color(), CorridorTone::Closed.color());
    }
}

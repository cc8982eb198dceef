/// Core data types for traffic metrics
///
/// These types match the JSON message format pushed by the corridor status
/// feed at ws://localhost:5000/status
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One point-in-time set of traffic metrics
///
/// Produced either by the mock generator or decoded from an inbound message,
/// rendered once, then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct MetricsSnapshot {
    /// Vehicle count on the main route
    pub main: u64,
    /// Vehicle count on the corridor route
    pub corridor: u64,
    /// Ambulance presence indicator (0 or 1 in practice)
    pub amb: u64,
    /// Whether an ambulance priority violation occurred
    pub amb_violation: bool,
    /// Processing latency
    pub latency: f64,
    /// Percentage of vehicles over the 2% threshold
    pub over2pct: f64,
    /// Emissions estimate
    pub co2: f64,
    /// Whether the corridor is currently open to traffic
    pub corridor_open: bool,
}

/// A field that was missing or mistyped in an inbound message and replaced by
/// its safe default
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFallback {
    /// JSON key of the substituted field
    pub field: &'static str,
    /// The value found on the wire (`None` if the key was absent)
    pub found: Option<Value>,
}

/// Result of decoding an inbound JSON value into a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSnapshot {
    pub snapshot: MetricsSnapshot,
    pub fallbacks: Vec<FieldFallback>,
}

impl DecodedSnapshot {
    /// Check if every field was taken from the message as-is
    pub fn is_complete(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

impl MetricsSnapshot {
    /// Decode a syntactically valid JSON value into a snapshot.
    ///
    /// Never fails: missing or mistyped fields fall back to `0`, `0.0` or
    /// `false` and are reported in [`DecodedSnapshot::fallbacks`]. Extra keys
    /// are ignored.
    pub fn decode(value: &Value) -> DecodedSnapshot {
        // Well-formed messages take the derived path
        if let Ok(snapshot) = MetricsSnapshot::deserialize(value) {
            return DecodedSnapshot {
                snapshot,
                fallbacks: Vec::new(),
            };
        }

        let mut fallbacks = Vec::new();
        let snapshot = MetricsSnapshot {
            main: count_field(value, "main", &mut fallbacks),
            corridor: count_field(value, "corridor", &mut fallbacks),
            amb: count_field(value, "amb", &mut fallbacks),
            amb_violation: flag_field(value, "amb_violation", &mut fallbacks),
            latency: real_field(value, "latency", &mut fallbacks),
            over2pct: real_field(value, "over2pct", &mut fallbacks),
            co2: real_field(value, "co2", &mut fallbacks),
            corridor_open: flag_field(value, "corridor_open", &mut fallbacks),
        };

        DecodedSnapshot {
            snapshot,
            fallbacks,
        }
    }
}

fn count_field(value: &Value, field: &'static str, fallbacks: &mut Vec<FieldFallback>) -> u64 {
    let raw = value.get(field);
    let decoded = raw.and_then(|v| {
        v.as_u64().or_else(|| {
            // Accept whole, non-negative floats such as `9.0`
            v.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        })
    });

    decoded.unwrap_or_else(|| {
        fallbacks.push(FieldFallback {
            field,
            found: raw.cloned(),
        });
        0
    })
}

fn real_field(value: &Value, field: &'static str, fallbacks: &mut Vec<FieldFallback>) -> f64 {
    let raw = value.get(field);
    raw.and_then(Value::as_f64).unwrap_or_else(|| {
        fallbacks.push(FieldFallback {
            field,
            found: raw.cloned(),
        });
        0.0
    })
}

fn flag_field(value: &Value, field: &'static str, fallbacks: &mut Vec<FieldFallback>) -> bool {
    let raw = value.get(field);
    raw.and_then(Value::as_bool).unwrap_or_else(|| {
        fallbacks.push(FieldFallback {
            field,
            found: raw.cloned(),
        });
        false
    })
}

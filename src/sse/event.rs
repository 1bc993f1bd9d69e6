//! Parsed SSE event records.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Event identifier.
///
/// Ids that parse as a finite number are kept in numeric form so callers can
/// compare them as numbers; anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventId {
    Numeric(f64),
    Text(String),
}

impl EventId {
    /// Build an id from a raw field value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match parse_finite(raw) {
            Some(n) => Self::Numeric(n),
            None => Self::Text(raw.to_string()),
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Numeric(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A single Server-Sent Event.
///
/// Every field is optional and only set when the stream carried it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Event {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    /// Event type (from `event:` lines).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Payload. Multiple `data:` lines are joined with `\n`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Reconnection hint in milliseconds. Never zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<f64>,
}

impl Event {
    /// Shorthand for an event carrying only a payload.
    #[must_use]
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::default()
        }
    }

    /// Check whether no field has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.event.is_none() && self.data.is_none() && self.retry.is_none()
    }

    /// The retry hint as a duration, when it is positive.
    #[must_use]
    pub fn retry_duration(&self) -> Option<Duration> {
        self.retry
            .filter(|ms| *ms > 0.0)
            .map(|ms| Duration::from_secs_f64(ms / 1000.0))
    }
}

/// Parse a trimmed value as a finite `f64`.
///
/// `inf`, `NaN` and friends parse in Rust but are rejected here.
pub(crate) fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

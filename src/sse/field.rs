//! Field/value splitting and per-field accumulation rules.

use super::event::{Event, EventId, parse_finite};

/// Split a line into `(field, value)` at the first `:`.
///
/// Returns `None` for lines without a delimiter and for comments (`:` at
/// position 0). At most one space after the delimiter is stripped.
#[must_use]
pub fn split(line: &str) -> Option<(&str, &str)> {
    match line.find(':') {
        None | Some(0) => None,
        Some(idx) => {
            let value = &line[idx + 1..];
            Some((&line[..idx], value.strip_prefix(' ').unwrap_or(value)))
        }
    }
}

/// Recognized SSE fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Data,
    Event,
    Id,
    Retry,
}

impl Field {
    const ALL: [(&'static str, Field); 4] = [
        ("data", Field::Data),
        ("event", Field::Event),
        ("id", Field::Id),
        ("retry", Field::Retry),
    ];

    /// Look up a field by its wire name. Case-sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, field)| *field)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Event => "event",
            Self::Id => "id",
            Self::Retry => "retry",
        }
    }

    /// Apply a raw value to the pending event.
    pub fn apply(self, event: &mut Event, value: &str) {
        match self {
            Self::Data => match &mut event.data {
                Some(data) => {
                    data.push('\n');
                    data.push_str(value);
                }
                None => event.data = Some(value.to_string()),
            },
            Self::Event => event.event = Some(value.to_string()),
            Self::Id => event.id = Some(EventId::parse(value)),
            // Zero and unparsable hints both mean "absent"
            Self::Retry => event.retry = parse_finite(value).filter(|ms| *ms != 0.0),
        }
    }
}

//! Input event types delivered to a recorder.
//!
//! Hosts either hand events to the recorder one at a time as they observe
//! them, or replay an append-only JSONL log where every line is one event.

use serde::{Deserialize, Serialize};

use crate::source::{Point2, SampleSource};

/// Monotonic timestamp in nanoseconds since the host started.
pub type TimestampNs = u64;

/// A single observed input event with timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Monotonic nanoseconds.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// The event payload.
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Discriminated union of event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Keyboard key transition.
    Key {
        /// Key code (e.g., "A", "Space", "LeftShift").
        code: String,
        /// Press or release.
        #[serde(default)]
        state: ButtonState,
    },

    /// Mouse button transition at a pointer position.
    MouseButton {
        /// Button index (0 = left, 1 = right, 2 = middle).
        button: u8,
        /// Press or release.
        #[serde(default)]
        state: ButtonState,
        /// Pointer position in display pixels.
        x: f32,
        y: f32,
    },

    /// A named action was performed.
    Action {
        name: String,
    },

    /// A named action was performed with a 2D value.
    ActionVector {
        name: String,
        x: f32,
        y: f32,
    },
}

/// Button/key state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ButtonState {
    #[default]
    Down,
    Up,
}

impl InputEvent {
    /// Create a key press event.
    pub fn key(timestamp_ns: TimestampNs, code: impl Into<String>) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::Key {
                code: code.into(),
                state: ButtonState::Down,
            },
        }
    }

    /// Create a mouse button press event.
    pub fn mouse_button(timestamp_ns: TimestampNs, button: u8, x: f32, y: f32) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::MouseButton {
                button,
                state: ButtonState::Down,
                x,
                y,
            },
        }
    }

    /// Create a plain action event.
    pub fn action(timestamp_ns: TimestampNs, name: impl Into<String>) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::Action { name: name.into() },
        }
    }

    /// Create a vector-valued action event.
    pub fn action_vector(timestamp_ns: TimestampNs, name: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            timestamp_ns,
            kind: EventKind::ActionVector {
                name: name.into(),
                x,
                y,
            },
        }
    }

    /// Timestamp as fractional seconds.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }
}

impl EventKind {
    /// The channel this event is recorded under.
    pub fn source(&self) -> SampleSource {
        match self {
            EventKind::Key { code, .. } => SampleSource::Key(code.clone()),
            EventKind::MouseButton { button, .. } => SampleSource::MouseButton(*button),
            EventKind::Action { name } | EventKind::ActionVector { name, .. } => {
                SampleSource::Action(name.clone())
            }
        }
    }

    /// The 2D value carried by this event, if any.
    pub fn point(&self) -> Option<Point2> {
        match self {
            EventKind::MouseButton { x, y, .. } | EventKind::ActionVector { x, y, .. } => {
                Some(Point2::new(*x, *y))
            }
            _ => None,
        }
    }

    /// Releases are observed but never counted.
    pub fn is_release(&self) -> bool {
        matches!(
            self,
            EventKind::Key {
                state: ButtonState::Up,
                ..
            } | EventKind::MouseButton {
                state: ButtonState::Up,
                ..
            }
        )
    }
}

/// Parse events from JSONL content (one JSON object per line).
///
/// Blank lines and `#` comment lines are skipped.
pub fn parse_events(jsonl: &str) -> Result<Vec<InputEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[InputEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}

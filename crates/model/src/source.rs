//! Recordable input channels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Input-collection mode of a recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Key and mouse-button presses.
    #[default]
    Discrete,
    /// Named actions, optionally carrying a 2D value.
    Action,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Discrete => "Discrete",
            Backend::Action => "Action",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend '{0}' (expected 'discrete' or 'action')")]
pub struct ParseBackendError(pub String);

impl FromStr for Backend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discrete" => Ok(Backend::Discrete),
            "action" => Ok(Backend::Action),
            _ => Err(ParseBackendError(s.to_string())),
        }
    }
}

/// A recordable channel.
///
/// Ordering is by variant then identifier, so keys sort before mouse
/// buttons and both before actions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SampleSource {
    /// Keyboard key, identified by its key code (e.g. "A", "Space").
    Key(String),
    /// Mouse button by index. Presses also record the click position.
    MouseButton(u8),
    /// Named input action.
    Action(String),
}

impl SampleSource {
    pub fn key(code: impl Into<String>) -> Self {
        Self::Key(code.into())
    }

    pub fn action(name: impl Into<String>) -> Self {
        Self::Action(name.into())
    }

    /// Name used for heatmap lookups, CSV columns, and file names.
    pub fn name(&self) -> String {
        match self {
            SampleSource::Key(code) => code.clone(),
            SampleSource::MouseButton(button) => format!("Mouse{button}"),
            SampleSource::Action(name) => name.clone(),
        }
    }

    /// The backend that records this source.
    pub fn backend(&self) -> Backend {
        match self {
            SampleSource::Key(_) | SampleSource::MouseButton(_) => Backend::Discrete,
            SampleSource::Action(_) => Backend::Action,
        }
    }
}

impl fmt::Display for SampleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleSource::Key(code) => write!(f, "Key {code}"),
            SampleSource::MouseButton(button) => write!(f, "Mouse {button}"),
            SampleSource::Action(name) => write!(f, "Action {name}"),
        }
    }
}

/// A 2D sample value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_case_insensitively() {
        assert_eq!("Discrete".parse::<Backend>(), Ok(Backend::Discrete));
        assert_eq!(" action ".parse::<Backend>(), Ok(Backend::Action));
        assert!("legacy".parse::<Backend>().is_err());
        assert_eq!(Backend::Action.to_string(), "Action");
    }

    #[test]
    fn source_names() {
        assert_eq!(SampleSource::key("Space").name(), "Space");
        assert_eq!(SampleSource::MouseButton(1).name(), "Mouse1");
        assert_eq!(SampleSource::action("Look").name(), "Look");
    }

    #[test]
    fn sources_sort_keys_before_buttons_before_actions() {
        let mut sources = vec![
            SampleSource::action("Fire"),
            SampleSource::MouseButton(0),
            SampleSource::key("S"),
            SampleSource::key("A"),
        ];
        sources.sort();
        assert_eq!(
            sources,
            vec![
                SampleSource::key("A"),
                SampleSource::key("S"),
                SampleSource::MouseButton(0),
                SampleSource::action("Fire"),
            ]
        );
    }

    #[test]
    fn source_backends() {
        assert_eq!(SampleSource::key("A").backend(), Backend::Discrete);
        assert_eq!(SampleSource::MouseButton(2).backend(), Backend::Discrete);
        assert_eq!(SampleSource::action("Move").backend(), Backend::Action);
    }
}

//! Persisted scroll state.
//!
//! The wire layout is `{"beginIndex": <int>, "offset": <number>}` with the
//! offset in density-independent units. Unknown keys are ignored and
//! missing keys default, so the format stays compatible by key name in both
//! directions. Malformed JSON is treated as "no restore data", never as an
//! error.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RestoreState {
    #[serde(rename = "beginIndex", default)]
    pub begin_index: usize,
    /// Scroll offset in vp units.
    #[serde(default)]
    pub offset: f64,
}

impl RestoreState {
    pub fn new(begin_index: usize, offset: f64) -> Self {
        Self {
            begin_index,
            offset,
        }
    }

    /// Parses restore JSON, falling back to defaults on malformed input.
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("ignoring malformed restore state: {e}");
            Self::default()
        })
    }

    pub fn to_json(&self) -> String {
        // Serialization of this shape cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

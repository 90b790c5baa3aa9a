//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::document::DEFAULT_GLYPH_SIZE;
use crate::CanvasResult;

/// Thresholds for turning raw touches into gestures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Movement in screen units before a press becomes a drag.
    pub tap_slop: f32,
    /// Maximum time between two taps of a double tap.
    pub double_tap_window_ms: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            tap_slop: 8.0,
            double_tap_window_ms: 300,
        }
    }
}

/// Configuration for the gesture coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Font size for glyphs created from dropped text.
    pub default_glyph_size: f32,
    /// Extra screen units around each glyph that still count as a hit.
    pub hit_padding: f32,
    /// Gesture recognition thresholds.
    pub recognizer: RecognizerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_glyph_size: DEFAULT_GLYPH_SIZE,
            hit_padding: 0.0,
            recognizer: RecognizerConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

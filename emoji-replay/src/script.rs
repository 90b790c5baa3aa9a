//! Replay scripts: a starting document plus a list of input steps.

use std::path::{Path, PathBuf};

use emoji_core::{CanvasError, DropPayload, Gesture, Point, Size, TouchEvent, TouchPhase};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors that can occur while loading or replaying a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script or config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// JSON parsing failed.
    #[error("failed to parse script: {0}")]
    Json(#[from] serde_json::Error),
    /// A `resolve_background` step ran with no background locator set.
    #[error("step {step}: no background to resolve")]
    NoBackground {
        /// Zero-based index of the failing step.
        step: usize,
    },
    /// The engine rejected part of the script.
    #[error("canvas error: {0}")]
    Canvas(#[from] CanvasError),
}

/// A glyph placed before the first step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphSeed {
    /// Text to draw.
    pub text: String,
    /// Horizontal offset from the document center.
    #[serde(default)]
    pub x: i32,
    /// Vertical offset from the document center.
    #[serde(default)]
    pub y: i32,
    /// Font size; the engine default when omitted.
    #[serde(default)]
    pub font_size: Option<f32>,
}

/// One input step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Raw touch event, run through the recognizer.
    Touch {
        /// The event.
        event: TouchEvent,
    },
    /// Mouse input, treated as a single finger.
    Pointer {
        /// Press, move, release or cancel.
        phase: TouchPhase,
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
        /// Timestamp in milliseconds.
        #[serde(default)]
        timestamp_ms: u64,
    },
    /// An already recognized gesture.
    Gesture {
        /// The gesture.
        gesture: Gesture,
    },
    /// Content dropped at a screen location.
    Drop {
        /// Dropped items.
        payload: DropPayload,
        /// Screen location.
        at: Point,
    },
    /// The current background locator finished loading.
    ResolveBackground {
        /// Pixel width of the image.
        width: f32,
        /// Pixel height of the image.
        height: f32,
    },
    /// The viewport changed size.
    Resize {
        /// New width.
        width: f32,
        /// New height.
        height: f32,
    },
}

/// A complete replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Initial viewport size.
    #[serde(default = "default_viewport")]
    pub viewport: Size,
    /// Background locator set before the first step.
    #[serde(default)]
    pub background: Option<Url>,
    /// Glyphs placed before the first step.
    #[serde(default)]
    pub glyphs: Vec<GlyphSeed>,
    /// Steps, in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_viewport() -> Size {
    Size::new(800.0, 600.0)
}

impl Script {
    /// Parse a script from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Json`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Io`] if the file cannot be read and
    /// [`ScriptError::Json`] if it is malformed.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        Self::from_json(&read(path)?)
    }
}

pub(crate) fn read(path: &Path) -> Result<String, ScriptError> {
    std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use emoji_core::GesturePhase;

    #[test]
    fn test_minimal_script_uses_defaults() {
        let script = Script::from_json("{}").expect("valid script");
        assert_eq!(script.viewport, Size::new(800.0, 600.0));
        assert!(script.glyphs.is_empty());
        assert!(script.steps.is_empty());
        assert!(script.background.is_none());
    }

    #[test]
    fn test_steps_parse_by_tag() {
        let json = r#"{
            "viewport": {"width": 400.0, "height": 300.0},
            "glyphs": [{"text": "🐝", "x": 3}],
            "steps": [
                {"step": "pointer", "phase": "start", "x": 1.0, "y": 2.0},
                {"step": "gesture", "gesture": {"gesture": "pinch", "data": {
                    "phase": "ended", "center": {"x": 0.0, "y": 0.0}, "scale": 2.0}}},
                {"step": "drop", "payload": {"items": [{"kind": "text", "value": "🌼"}]},
                    "at": {"x": 5.0, "y": 5.0}},
                {"step": "resolve_background", "width": 640.0, "height": 480.0},
                {"step": "resize", "width": 200.0, "height": 100.0}
            ]
        }"#;
        let script = Script::from_json(json).expect("valid script");
        assert_eq!(script.glyphs[0].x, 3);
        assert_eq!(script.glyphs[0].y, 0);
        assert_eq!(script.steps.len(), 5);
        assert_eq!(
            script.steps[1],
            Step::Gesture {
                gesture: Gesture::Pinch {
                    phase: GesturePhase::Ended,
                    center: Point::ZERO,
                    scale: 2.0,
                }
            }
        );
        assert!(matches!(script.steps[4], Step::Resize { .. }));
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        let err = Script::from_json(r#"{"steps": [{"step": "teleport"}]}"#).unwrap_err();
        assert!(matches!(err, ScriptError::Json(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Script::load(Path::new("/nonexistent/script.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/script.json"));
    }
}

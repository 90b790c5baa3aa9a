//! Input events for canvas interaction.

use serde::{Deserialize, Serialize};

use crate::drop::DropPayload;
use crate::{GlyphId, Point, Vector};

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled (e.g., palm rejection).
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position in screen coordinates.
    pub x: f32,
    /// Y position in screen coordinates.
    pub y: f32,
}

impl TouchPoint {
    /// Create a touch point.
    #[must_use]
    pub const fn new(id: u32, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    /// Position as a point.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A touch event with one or more touch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points.
    pub touches: Vec<TouchPoint>,
    /// Timestamp in milliseconds since canvas start.
    pub timestamp_ms: u64,
    /// Glyph the host already hit-tested, if any.
    #[serde(default)]
    pub target_glyph: Option<GlyphId>,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>, timestamp_ms: u64) -> Self {
        Self {
            phase,
            touches,
            timestamp_ms,
            target_glyph: None,
        }
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// Phase of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    /// The gesture is running; values are cumulative since it began.
    Changed,
    /// The gesture finished; values are final.
    Ended,
    /// The input system abandoned the gesture.
    Cancelled,
}

/// Recognized gestures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", content = "data", rename_all = "snake_case")]
pub enum Gesture {
    /// Single tap.
    Tap {
        /// Screen location.
        location: Point,
        /// Glyph under the tap, when the host resolved it.
        #[serde(default)]
        target: Option<GlyphId>,
    },

    /// Double tap.
    DoubleTap {
        /// Screen location.
        location: Point,
    },

    /// One-finger drag.
    Drag {
        /// Phase of the drag.
        phase: GesturePhase,
        /// Where the drag started (screen).
        start: Point,
        /// Current location (screen).
        location: Point,
        /// Cumulative translation since the start (screen).
        translation: Vector,
        /// Glyph under the starting point, when the host resolved it.
        #[serde(default)]
        target: Option<GlyphId>,
    },

    /// Two-finger pinch.
    Pinch {
        /// Phase of the pinch.
        phase: GesturePhase,
        /// Midpoint between the fingers (screen).
        center: Point,
        /// Cumulative scale factor (1.0 = no change).
        scale: f32,
    },
}

/// All input events the canvas can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum InputEvent {
    /// Raw touch event.
    Touch(TouchEvent),

    /// Recognized gesture.
    Gesture(Gesture),

    /// Primary mouse button, treated as a single touch.
    Pointer {
        /// Press, move, release or cancel.
        phase: TouchPhase,
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
        /// Timestamp in milliseconds since canvas start.
        timestamp_ms: u64,
    },

    /// Content dropped onto the canvas.
    Drop {
        /// Dropped items.
        payload: DropPayload,
        /// Screen location of the drop.
        location: Point,
    },
}

impl InputEvent {
    /// Convert a pointer event into the equivalent single-finger touch event.
    #[must_use]
    pub fn pointer_as_touch(phase: TouchPhase, x: f32, y: f32, timestamp_ms: u64) -> TouchEvent {
        TouchEvent::new(phase, vec![TouchPoint::new(0, x, y)], timestamp_ms)
    }
}

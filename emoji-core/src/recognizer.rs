//! Turning raw touch streams into gestures.
//!
//! One finger that stays within the tap slop is a tap; a second tap close
//! enough in time and space is a double tap. One finger that leaves the slop
//! is a drag. Two fingers are a pinch whose factor is the ratio of the
//! current finger distance to the distance when the second finger landed.

use crate::config::RecognizerConfig;
use crate::event::{Gesture, GesturePhase, TouchEvent, TouchPhase};
use crate::{GlyphId, Point};

/// Finger distances below this are too small to divide by.
const MIN_PINCH_DISTANCE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tracking {
    Idle,
    Pressed {
        start: Point,
        target: Option<GlyphId>,
    },
    Dragging {
        start: Point,
        last: Point,
        target: Option<GlyphId>,
    },
    Pinching {
        initial_distance: f32,
        center: Point,
        scale: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LastTap {
    location: Point,
    timestamp_ms: u64,
}

/// Stateful touch-to-gesture recognizer for one input device.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    config: RecognizerConfig,
    tracking: Tracking,
    last_tap: Option<LastTap>,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(RecognizerConfig::default())
    }
}

impl GestureRecognizer {
    /// Create a recognizer with the given thresholds.
    #[must_use]
    pub fn new(config: RecognizerConfig) -> Self {
        Self {
            config,
            tracking: Tracking::Idle,
            last_tap: None,
        }
    }

    /// Whether a touch sequence is in progress.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.tracking != Tracking::Idle
    }

    /// Feed one touch event; returns the gestures it completes or advances.
    pub fn process(&mut self, event: &TouchEvent) -> Vec<Gesture> {
        match event.phase {
            TouchPhase::Cancel => self.cancel(),
            TouchPhase::End => self.finish(event),
            TouchPhase::Start | TouchPhase::Move if event.is_multi_touch() => self.pinch(event),
            TouchPhase::Start | TouchPhase::Move => self.single(event),
        }
    }

    fn single(&mut self, event: &TouchEvent) -> Vec<Gesture> {
        let Some(location) = event.primary_touch().map(|t| t.position()) else {
            return Vec::new();
        };
        match self.tracking {
            Tracking::Idle => {
                self.tracking = Tracking::Pressed {
                    start: location,
                    target: event.target_glyph,
                };
                Vec::new()
            }
            Tracking::Pressed { start, target } => {
                if start.distance(location) <= self.config.tap_slop {
                    return Vec::new();
                }
                self.last_tap = None;
                self.tracking = Tracking::Dragging {
                    start,
                    last: location,
                    target,
                };
                vec![drag(GesturePhase::Changed, start, location, target)]
            }
            Tracking::Dragging { start, target, .. } => {
                self.tracking = Tracking::Dragging {
                    start,
                    last: location,
                    target,
                };
                vec![drag(GesturePhase::Changed, start, location, target)]
            }
            // A finger left a pinch; wait for the sequence to end.
            Tracking::Pinching { .. } => Vec::new(),
        }
    }

    fn pinch(&mut self, event: &TouchEvent) -> Vec<Gesture> {
        let (Some(a), Some(b)) = (event.touches.first(), event.touches.get(1)) else {
            return Vec::new();
        };
        let (a, b) = (a.position(), b.position());
        let distance = a.distance(b);
        let center = a.midpoint(b);

        let mut gestures = Vec::new();
        match self.tracking {
            Tracking::Pinching {
                initial_distance, ..
            } => {
                let scale = distance / initial_distance;
                self.tracking = Tracking::Pinching {
                    initial_distance,
                    center,
                    scale,
                };
                gestures.push(Gesture::Pinch {
                    phase: GesturePhase::Changed,
                    center,
                    scale,
                });
            }
            previous => {
                if let Tracking::Dragging { start, last, target } = previous {
                    gestures.push(drag(GesturePhase::Cancelled, start, last, target));
                }
                self.last_tap = None;
                self.tracking = Tracking::Pinching {
                    initial_distance: distance.max(MIN_PINCH_DISTANCE),
                    center,
                    scale: 1.0,
                };
            }
        }
        gestures
    }

    fn finish(&mut self, event: &TouchEvent) -> Vec<Gesture> {
        let tracking = std::mem::replace(&mut self.tracking, Tracking::Idle);
        let location = event.primary_touch().map(|t| t.position());
        match tracking {
            Tracking::Idle => Vec::new(),
            Tracking::Pressed { start, target } => {
                vec![self.tap(location.unwrap_or(start), event.timestamp_ms, target)]
            }
            Tracking::Dragging { start, last, target } => {
                vec![drag(GesturePhase::Ended, start, location.unwrap_or(last), target)]
            }
            Tracking::Pinching { center, scale, .. } => vec![Gesture::Pinch {
                phase: GesturePhase::Ended,
                center,
                scale,
            }],
        }
    }

    fn tap(&mut self, location: Point, timestamp_ms: u64, target: Option<GlyphId>) -> Gesture {
        let is_double = self.last_tap.is_some_and(|last| {
            timestamp_ms.saturating_sub(last.timestamp_ms) <= self.config.double_tap_window_ms
                && last.location.distance(location) <= self.config.tap_slop * 2.0
        });
        if is_double {
            self.last_tap = None;
            Gesture::DoubleTap { location }
        } else {
            self.last_tap = Some(LastTap {
                location,
                timestamp_ms,
            });
            Gesture::Tap { location, target }
        }
    }

    fn cancel(&mut self) -> Vec<Gesture> {
        match std::mem::replace(&mut self.tracking, Tracking::Idle) {
            Tracking::Dragging { start, last, target } => {
                vec![drag(GesturePhase::Cancelled, start, last, target)]
            }
            Tracking::Pinching { center, scale, .. } => vec![Gesture::Pinch {
                phase: GesturePhase::Cancelled,
                center,
                scale,
            }],
            Tracking::Idle | Tracking::Pressed { .. } => Vec::new(),
        }
    }
}

fn drag(phase: GesturePhase, start: Point, location: Point, target: Option<GlyphId>) -> Gesture {
    Gesture::Drag {
        phase,
        start,
        location,
        translation: location - start,
        target,
    }
}

//! Glyphs - the movable, scalable text elements placed on the canvas.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Point;

/// Unique identifier for a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlyphId(Uuid);

impl GlyphId {
    /// Create a new unique glyph ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for GlyphId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GlyphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A placed glyph.
///
/// `x` and `y` are integer offsets from the document's center. The engine
/// only ever holds snapshots of glyphs; changes go through
/// [`Document`](crate::Document) mutation requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    /// Unique identifier.
    pub id: GlyphId,
    /// The text drawn, normally a single grapheme.
    pub text: String,
    /// Horizontal offset from the document center.
    pub x: i32,
    /// Vertical offset from the document center.
    pub y: i32,
    /// Font size in document units.
    pub font_size: f32,
}

impl Glyph {
    /// Create a new glyph with a fresh ID.
    #[must_use]
    pub fn new(text: impl Into<String>, x: i32, y: i32, font_size: f32) -> Self {
        Self {
            id: GlyphId::new(),
            text: text.into(),
            x,
            y,
            font_size,
        }
    }

    /// Document-space location of the glyph's center.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // document coordinates stay far below 2^24
    pub fn location(&self) -> Point {
        Point::new(self.x as f32, self.y as f32)
    }
}

//! Error types for canvas operations.

use thiserror::Error;

use crate::GlyphId;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
///
/// None of these are fatal to the host. The gesture coordinator recovers from
/// every variant locally, usually by turning the operation into a no-op.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A viewport or image with a zero, negative or non-finite dimension.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A drag ended past a canvas edge while nothing was selected.
    #[error("Drag ended at the canvas edge with an empty selection")]
    EmptySelectionAtBoundary,

    /// A drop payload carried neither a resource locator nor usable text.
    #[error("Drop payload could not be classified")]
    UnclassifiableDrop,

    /// A scale factor that is zero, negative or not finite.
    #[error("Degenerate scale factor: {0}")]
    DegenerateScale(f32),

    /// Glyph not found in the document.
    #[error("Glyph not found: {0}")]
    GlyphNotFound(GlyphId),

    /// Glyph text was empty.
    #[error("Invalid glyph text: {0:?}")]
    InvalidText(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

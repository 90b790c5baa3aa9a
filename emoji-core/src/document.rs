//! The document the engine edits.
//!
//! The engine never owns glyphs. It reads snapshots through [`Document`] and
//! asks for changes through its mutation methods. [`InMemoryDocument`] is the
//! reference implementation used by hosts without their own storage.

use url::Url;

use crate::background::{
    background_channel, BackgroundSender, BackgroundSubscription, ResolvedBackground,
};
use crate::{CanvasError, CanvasResult, Glyph, GlyphId, Point, Size, Vector};

/// Default font size for glyphs added by dropping text.
pub const DEFAULT_GLYPH_SIZE: f32 = 40.0;

/// Smallest font size a glyph can be scaled down to.
pub const MIN_FONT_SIZE: f32 = 1.0;

/// Storage the engine reads from and sends mutation requests to.
pub trait Document {
    /// All glyphs, in drawing order.
    fn glyphs(&self) -> &[Glyph];

    /// Look up a glyph by ID.
    fn glyph(&self, id: GlyphId) -> Option<&Glyph> {
        self.glyphs().iter().find(|glyph| glyph.id == id)
    }

    /// The locator of the current background, if any.
    fn background_reference(&self) -> Option<&Url>;

    /// The background image, once it has been loaded.
    fn resolved_background(&self) -> Option<ResolvedBackground>;

    /// Subscribe to background resolution changes.
    fn subscribe_background(&self) -> BackgroundSubscription;

    /// Font size for newly dropped glyphs.
    fn default_glyph_size(&self) -> f32 {
        DEFAULT_GLYPH_SIZE
    }

    /// Whether a background is set but not yet loaded.
    fn is_loading(&self) -> bool {
        crate::background::is_loading(
            self.background_reference(),
            self.resolved_background().as_ref(),
        )
    }

    /// Add a glyph at a document-space location.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidText`] if `text` is empty.
    fn add_glyph(&mut self, text: &str, location: Point, size: f32) -> CanvasResult<GlyphId>;

    /// Move a glyph by a document-space offset.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::GlyphNotFound`] if the glyph does not exist.
    fn move_glyph(&mut self, id: GlyphId, by: Vector) -> CanvasResult<()>;

    /// Multiply a glyph's font size.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::GlyphNotFound`] if the glyph does not exist or
    /// [`CanvasError::DegenerateScale`] if `by` is not a positive finite number.
    fn scale_glyph(&mut self, id: GlyphId, by: f32) -> CanvasResult<()>;

    /// Remove a glyph.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::GlyphNotFound`] if the glyph does not exist.
    fn remove_glyph(&mut self, id: GlyphId) -> CanvasResult<Glyph>;

    /// Replace (or clear) the background locator.
    fn set_background_reference(&mut self, reference: Option<Url>);
}

/// A document held entirely in memory.
#[derive(Debug)]
pub struct InMemoryDocument {
    glyphs: Vec<Glyph>,
    background_reference: Option<Url>,
    background: BackgroundSender,
    default_glyph_size: f32,
}

impl Default for InMemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_glyph_size(DEFAULT_GLYPH_SIZE)
    }

    /// Create an empty document with a custom default glyph size.
    #[must_use]
    pub fn with_default_glyph_size(default_glyph_size: f32) -> Self {
        Self {
            glyphs: Vec::new(),
            background_reference: None,
            background: background_channel(),
            default_glyph_size,
        }
    }

    /// Insert an existing glyph snapshot, e.g. when seeding a document.
    pub fn insert(&mut self, glyph: Glyph) -> GlyphId {
        let id = glyph.id;
        self.glyphs.push(glyph);
        id
    }

    /// Number of glyphs.
    #[must_use]
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the document has no glyphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Report that the image for `reference` finished loading.
    ///
    /// Results for a locator that is no longer current are discarded.
    /// Returns whether the image was published.
    pub fn publish_resolved_background(&self, reference: &Url, size: Size) -> bool {
        if self.background_reference.as_ref() != Some(reference) {
            tracing::debug!(%reference, "discarding stale background image");
            return false;
        }
        tracing::info!(
            %reference,
            width = size.width,
            height = size.height,
            "background image resolved"
        );
        self.background.send_replace(Some(ResolvedBackground {
            reference: reference.clone(),
            size,
        }));
        true
    }

    fn glyph_mut(&mut self, id: GlyphId) -> CanvasResult<&mut Glyph> {
        self.glyphs
            .iter_mut()
            .find(|glyph| glyph.id == id)
            .ok_or(CanvasError::GlyphNotFound(id))
    }
}

#[allow(clippy::cast_possible_truncation)] // document coordinates stay well inside i32
fn to_document_unit(value: f32) -> i32 {
    value.round() as i32
}

impl Document for InMemoryDocument {
    fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    fn background_reference(&self) -> Option<&Url> {
        self.background_reference.as_ref()
    }

    fn resolved_background(&self) -> Option<ResolvedBackground> {
        self.background.borrow().clone()
    }

    fn subscribe_background(&self) -> BackgroundSubscription {
        BackgroundSubscription::new(&self.background)
    }

    fn default_glyph_size(&self) -> f32 {
        self.default_glyph_size
    }

    fn add_glyph(&mut self, text: &str, location: Point, size: f32) -> CanvasResult<GlyphId> {
        if text.is_empty() {
            return Err(CanvasError::InvalidText(text.to_string()));
        }
        let glyph = Glyph::new(
            text,
            to_document_unit(location.x),
            to_document_unit(location.y),
            size.max(MIN_FONT_SIZE),
        );
        tracing::debug!(id = %glyph.id, text, x = glyph.x, y = glyph.y, "glyph added");
        Ok(self.insert(glyph))
    }

    fn move_glyph(&mut self, id: GlyphId, by: Vector) -> CanvasResult<()> {
        let glyph = self.glyph_mut(id)?;
        glyph.x = glyph.x.saturating_add(to_document_unit(by.dx));
        glyph.y = glyph.y.saturating_add(to_document_unit(by.dy));
        Ok(())
    }

    fn scale_glyph(&mut self, id: GlyphId, by: f32) -> CanvasResult<()> {
        if !(by.is_finite() && by > 0.0) {
            return Err(CanvasError::DegenerateScale(by));
        }
        let glyph = self.glyph_mut(id)?;
        glyph.font_size = (glyph.font_size * by).round_ties_even().max(MIN_FONT_SIZE);
        Ok(())
    }

    fn remove_glyph(&mut self, id: GlyphId) -> CanvasResult<Glyph> {
        let index = self
            .glyphs
            .iter()
            .position(|glyph| glyph.id == id)
            .ok_or(CanvasError::GlyphNotFound(id))?;
        let glyph = self.glyphs.remove(index);
        tracing::debug!(id = %glyph.id, text = %glyph.text, "glyph removed");
        Ok(glyph)
    }

    fn set_background_reference(&mut self, reference: Option<Url>) {
        if self.background_reference == reference {
            return;
        }
        tracing::info!(
            reference = ?reference.as_ref().map(Url::as_str),
            "background reference changed"
        );
        self.background_reference = reference;
        self.background.send_replace(None);
    }
}

//! Routing content dropped onto the canvas.
//!
//! A drop is first tried as a resource locator, which replaces the
//! background. Only if no locator is found is it tried as text, in which
//! case every grapheme cluster becomes a glyph at the drop location.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use url::Url;

use crate::{CanvasError, CanvasResult, GlyphId};

/// URL schemes that turn a plain-text item into a background locator.
const LOCATOR_SCHEMES: &[&str] = &["http", "https", "file", "data"];

/// One item of a drop, as typed by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DropItem {
    /// Host-typed URL content.
    Locator(String),
    /// Host-typed plain text.
    Text(String),
}

/// Everything dropped in one drag-and-drop operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropPayload {
    /// The dropped items, in host order.
    pub items: Vec<DropItem>,
}

impl DropPayload {
    /// A payload with a single locator item.
    #[must_use]
    pub fn locator(value: impl Into<String>) -> Self {
        Self {
            items: vec![DropItem::Locator(value.into())],
        }
    }

    /// A payload with a single text item.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            items: vec![DropItem::Text(value.into())],
        }
    }

    /// Append another item.
    #[must_use]
    pub fn with_item(mut self, item: DropItem) -> Self {
        self.items.push(item);
        self
    }
}

/// What a drop should do to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum DropAction {
    /// Replace the background; the drop location is irrelevant.
    SetBackground(Url),
    /// Add one glyph per entry at the drop location.
    AddGlyphs(Vec<String>),
}

/// Result of a drop, reported back to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum DropOutcome {
    /// The background locator was replaced.
    BackgroundSet(Url),
    /// Glyphs were created.
    GlyphsAdded(Vec<GlyphId>),
    /// Nothing in the payload could be used.
    Unhandled,
}

impl DropOutcome {
    /// Whether the drop changed the document.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Unhandled)
    }
}

/// Classifies drop payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropRouter;

impl DropRouter {
    /// Decide what a payload does.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::UnclassifiableDrop`] when the payload holds
    /// neither a parseable locator nor any non-whitespace text.
    pub fn classify(&self, payload: &DropPayload) -> CanvasResult<DropAction> {
        if let Some(url) = payload.items.iter().find_map(as_locator) {
            return Ok(DropAction::SetBackground(url));
        }

        let glyphs: Vec<String> = payload
            .items
            .iter()
            .filter_map(|item| match item {
                DropItem::Text(text) => Some(text),
                DropItem::Locator(_) => None,
            })
            .flat_map(|text| text.graphemes(true))
            .filter(|grapheme| !grapheme.chars().all(char::is_whitespace))
            .map(String::from)
            .collect();

        if glyphs.is_empty() {
            Err(CanvasError::UnclassifiableDrop)
        } else {
            Ok(DropAction::AddGlyphs(glyphs))
        }
    }
}

fn as_locator(item: &DropItem) -> Option<Url> {
    match item {
        DropItem::Locator(value) => Url::parse(value.trim()).ok(),
        DropItem::Text(value) => Url::parse(value.trim())
            .ok()
            .filter(|url| LOCATOR_SCHEMES.contains(&url.scheme())),
    }
}

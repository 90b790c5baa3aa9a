//! The set of currently selected glyphs.

use std::collections::HashSet;

use crate::GlyphId;

/// Selected glyph identities.
///
/// Membership checks go through a hash set. Selection order is kept alongside
/// it because the drag-deletion policy breaks ties by first selection.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    members: HashSet<GlyphId>,
    order: Vec<GlyphId>,
}

impl SelectionSet {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the glyph if absent, remove it if present.
    ///
    /// Returns `true` if the glyph is selected afterwards.
    pub fn toggle(&mut self, id: GlyphId) -> bool {
        if self.members.remove(&id) {
            self.order.retain(|&selected| selected != id);
            false
        } else {
            self.members.insert(id);
            self.order.push(id);
            true
        }
    }

    /// Deselect a single glyph. Returns whether it was selected.
    pub fn remove(&mut self, id: GlyphId) -> bool {
        let removed = self.members.remove(&id);
        if removed {
            self.order.retain(|&selected| selected != id);
        }
        removed
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.members.clear();
        self.order.clear();
    }

    /// Drop members for which `keep` returns false, e.g. glyphs that no
    /// longer exist in the document.
    pub fn retain(&mut self, mut keep: impl FnMut(GlyphId) -> bool) {
        self.order.retain(|&id| keep(id));
        self.members = self.order.iter().copied().collect();
    }

    /// Whether the glyph is selected.
    #[must_use]
    pub fn contains(&self, id: GlyphId) -> bool {
        self.members.contains(&id)
    }

    /// Selected glyphs in the order they were selected.
    pub fn iter(&self) -> impl Iterator<Item = GlyphId> + '_ {
        self.order.iter().copied()
    }

    /// Number of selected glyphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

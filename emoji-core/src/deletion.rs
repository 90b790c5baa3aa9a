//! Deleting a glyph by dragging it off the canvas.
//!
//! When a glyph drag ends at or beyond one of the viewport edges, one of the
//! selected glyphs is removed: the one furthest toward that edge.

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult, Glyph, GlyphId, Point, Size};

/// A viewport edge, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// `x >= width`.
    Right,
    /// `x <= 0`.
    Left,
    /// `y >= height`.
    Down,
    /// `y <= 0`.
    Up,
}

impl Edge {
    /// The first edge (right, left, down, up) that `location` lies on or past.
    #[must_use]
    pub fn classify(location: Point, viewport: Size) -> Option<Self> {
        if location.x >= viewport.width {
            Some(Self::Right)
        } else if location.x <= 0.0 {
            Some(Self::Left)
        } else if location.y >= viewport.height {
            Some(Self::Down)
        } else if location.y <= 0.0 {
            Some(Self::Up)
        } else {
            None
        }
    }

    /// Whether `candidate` lies strictly further toward this edge than `best`.
    fn beats(self, candidate: &Glyph, best: &Glyph) -> bool {
        match self {
            Self::Right => candidate.x > best.x,
            Self::Left => candidate.x < best.x,
            Self::Down => candidate.y > best.y,
            Self::Up => candidate.y < best.y,
        }
    }

    /// The glyph furthest toward this edge; ties go to the earliest.
    #[must_use]
    pub fn extreme<'a>(self, glyphs: impl IntoIterator<Item = &'a Glyph>) -> Option<&'a Glyph> {
        glyphs.into_iter().fold(None, |best, candidate| match best {
            Some(best) if !self.beats(candidate, best) => Some(best),
            _ => Some(candidate),
        })
    }
}

/// What the policy decided for a finished glyph drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragDeletion {
    /// The edge the drag ended on.
    pub edge: Edge,
    /// The glyph to remove.
    pub glyph: GlyphId,
}

/// Decides whether a finished glyph drag deletes a glyph.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragDeletionPolicy;

impl DragDeletionPolicy {
    /// Evaluate a drag that ended at `location` (screen space).
    ///
    /// `selected` must be the currently selected glyphs in selection order.
    /// Returns `Ok(None)` when the drag ended inside the viewport.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::EmptySelectionAtBoundary`] when the drag ended on
    /// an edge but there is nothing selected to remove.
    pub fn evaluate<'a>(
        &self,
        location: Point,
        viewport: Size,
        selected: impl IntoIterator<Item = &'a Glyph>,
    ) -> CanvasResult<Option<DragDeletion>> {
        let Some(edge) = Edge::classify(location, viewport) else {
            return Ok(None);
        };
        let glyph = edge
            .extreme(selected)
            .ok_or(CanvasError::EmptySelectionAtBoundary)?;
        tracing::debug!(
            ?edge,
            glyph = %glyph.id,
            x = glyph.x,
            y = glyph.y,
            "drag ended past canvas edge"
        );
        Ok(Some(DragDeletion {
            edge,
            glyph: glyph.id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(400.0, 300.0);

    fn glyphs_at(xs: &[i32]) -> Vec<Glyph> {
        xs.iter().map(|&x| Glyph::new("🙂", x, -x, 40.0)).collect()
    }

    #[test]
    fn test_classify_priority_order() {
        assert_eq!(Edge::classify(Point::new(200.0, 150.0), VIEWPORT), None);
        assert_eq!(Edge::classify(Point::new(400.0, 150.0), VIEWPORT), Some(Edge::Right));
        assert_eq!(Edge::classify(Point::new(0.0, 150.0), VIEWPORT), Some(Edge::Left));
        assert_eq!(Edge::classify(Point::new(200.0, 300.0), VIEWPORT), Some(Edge::Down));
        assert_eq!(Edge::classify(Point::new(200.0, -4.0), VIEWPORT), Some(Edge::Up));
        // Corners resolve to the horizontal edge first.
        assert_eq!(Edge::classify(Point::new(450.0, -10.0), VIEWPORT), Some(Edge::Right));
        assert_eq!(Edge::classify(Point::new(-1.0, 320.0), VIEWPORT), Some(Edge::Left));
    }

    #[test]
    fn test_right_removes_max_x_left_removes_min_x() {
        let glyphs = glyphs_at(&[-5, 3, 10]);
        let policy = DragDeletionPolicy;

        let right = policy
            .evaluate(Point::new(410.0, 100.0), VIEWPORT, &glyphs)
            .unwrap()
            .expect("edge reached");
        assert_eq!(right.edge, Edge::Right);
        assert_eq!(right.glyph, glyphs[2].id);

        let left = policy
            .evaluate(Point::new(0.0, 100.0), VIEWPORT, &glyphs)
            .unwrap()
            .expect("edge reached");
        assert_eq!(left.edge, Edge::Left);
        assert_eq!(left.glyph, glyphs[0].id);
    }

    #[test]
    fn test_down_and_up_use_y() {
        // y = -x, so the largest y belongs to x = -5
        let glyphs = glyphs_at(&[-5, 3, 10]);
        let policy = DragDeletionPolicy;

        let down = policy
            .evaluate(Point::new(100.0, 300.0), VIEWPORT, &glyphs)
            .unwrap()
            .unwrap();
        assert_eq!(down.glyph, glyphs[0].id);

        let up = policy
            .evaluate(Point::new(100.0, 0.0), VIEWPORT, &glyphs)
            .unwrap()
            .unwrap();
        assert_eq!(up.glyph, glyphs[2].id);
    }

    #[test]
    fn test_ties_go_to_first_selected() {
        let glyphs = glyphs_at(&[7, 7, 7]);
        assert_eq!(Edge::Right.extreme(&glyphs).map(|g| g.id), Some(glyphs[0].id));
        assert_eq!(Edge::Left.extreme(&glyphs).map(|g| g.id), Some(glyphs[0].id));
    }

    #[test]
    fn test_inside_viewport_is_not_a_deletion() {
        let glyphs = glyphs_at(&[1]);
        let result = DragDeletionPolicy.evaluate(Point::new(1.0, 1.0), VIEWPORT, &glyphs);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_empty_selection_at_edge_is_reported() {
        let nothing: Vec<Glyph> = Vec::new();
        let result = DragDeletionPolicy.evaluate(Point::new(500.0, 10.0), VIEWPORT, &nothing);
        assert!(matches!(result, Err(CanvasError::EmptySelectionAtBoundary)));
    }
}

//! Mapping between document space and screen space.
//!
//! Document space is centred on the document; screen space is the viewport
//! with its origin at the top-left corner. The forward map is
//!
//! ```text
//! screen = (doc + viewport / 2) * scale + translation
//! ```
//!
//! where `scale` and `translation` are the *effective* values (steady state
//! composed with any in-flight gesture, translation already in screen
//! units). The inverse undoes each step in reverse order.

use crate::{
    CanvasError, CanvasResult, GestureDelta, Glyph, GlyphId, Point, Size, TransformState, Vector,
};

/// A snapshot of the view geometry for one render pass or one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    viewport: Size,
    scale: f32,
    translation: Vector,
}

impl CoordinateMapper {
    /// Build a mapper from the steady transform and the in-flight canvas delta.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DegenerateGeometry`] if the viewport has a
    /// non-positive or non-finite dimension.
    pub fn new(
        viewport: Size,
        steady: &TransformState,
        delta: &GestureDelta,
    ) -> CanvasResult<Self> {
        Self::from_parts(
            viewport,
            steady.effective_scale(delta),
            steady.effective_translation(delta),
        )
    }

    /// Build a mapper from an effective scale and a screen-space translation.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DegenerateGeometry`] if the viewport is
    /// degenerate, the scale is not strictly positive, or the translation is
    /// not finite.
    pub fn from_parts(viewport: Size, scale: f32, translation: Vector) -> CanvasResult<Self> {
        if !viewport.is_positive() {
            return Err(CanvasError::DegenerateGeometry(format!(
                "viewport {}x{}",
                viewport.width, viewport.height
            )));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(CanvasError::DegenerateGeometry(format!("scale {scale}")));
        }
        if !translation.is_finite() {
            return Err(CanvasError::DegenerateGeometry(format!(
                "translation ({}, {})",
                translation.dx, translation.dy
            )));
        }
        Ok(Self {
            viewport,
            scale,
            translation,
        })
    }

    /// The viewport this mapper was built for.
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Effective scale.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Effective translation in screen units.
    #[must_use]
    pub const fn translation(&self) -> Vector {
        self.translation
    }

    /// Document point to screen point.
    #[must_use]
    pub fn to_screen(&self, doc: Point) -> Point {
        (doc + self.viewport.half()) * self.scale + self.translation
    }

    /// Screen point to document point. Exact inverse of [`to_screen`](Self::to_screen).
    #[must_use]
    pub fn to_document(&self, screen: Point) -> Point {
        (screen - self.translation) / self.scale - self.viewport.half()
    }

    /// Convert a screen-space displacement into document units.
    #[must_use]
    pub fn to_document_vector(&self, screen: Vector) -> Vector {
        screen / self.scale
    }

    /// Where a glyph is drawn.
    ///
    /// `drag_offset` is the in-flight glyph drag in document units; callers
    /// pass it only for selected glyphs.
    #[must_use]
    pub fn glyph_position(&self, glyph: &Glyph, drag_offset: Option<Vector>) -> Point {
        let position = self.to_screen(glyph.location());
        match drag_offset {
            Some(offset) => position + offset * self.scale,
            None => position,
        }
    }

    /// Topmost glyph whose on-screen box contains `screen`.
    ///
    /// Each glyph occupies a square of side `font_size * scale` centred on its
    /// position, grown by `padding` screen units on every side. Later glyphs
    /// are drawn on top, so the search runs back to front.
    #[must_use]
    pub fn hit_test(&self, glyphs: &[Glyph], screen: Point, padding: f32) -> Option<GlyphId> {
        glyphs
            .iter()
            .rev()
            .find(|glyph| {
                let center = self.to_screen(glyph.location());
                let half_extent = glyph.font_size * self.scale / 2.0 + padding;
                (screen.x - center.x).abs() <= half_extent
                    && (screen.y - center.y).abs() <= half_extent
            })
            .map(|glyph| glyph.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    fn mapper(scale: f32, translation: Vector) -> CoordinateMapper {
        CoordinateMapper::from_parts(Size::new(400.0, 300.0), scale, translation)
            .expect("valid mapper")
    }

    #[test]
    fn test_identity_maps_origin_to_center() {
        let m = mapper(1.0, Vector::ZERO);
        assert!(approx(m.to_screen(Point::ZERO), Point::new(200.0, 150.0)));
    }

    #[test]
    fn test_forward_applies_center_then_scale_then_translation() {
        let m = mapper(2.0, Vector::new(10.0, -20.0));
        // ((5 + 200) * 2 + 10, (-5 + 150) * 2 - 20)
        assert!(approx(m.to_screen(Point::new(5.0, -5.0)), Point::new(420.0, 270.0)));
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = mapper(0.75, Vector::new(33.0, -12.5));
        for p in [
            Point::new(0.0, 0.0),
            Point::new(-150.0, 42.0),
            Point::new(1234.5, -987.25),
        ] {
            assert!(approx(m.to_document(m.to_screen(p)), p));
        }
    }

    #[test]
    fn test_new_composes_steady_and_delta() {
        let steady = TransformState::new(2.0, Vector::new(5.0, 0.0)).unwrap();
        let delta = GestureDelta {
            translation: Vector::new(5.0, 0.0),
            scale_factor: 0.5,
        };
        let m = CoordinateMapper::new(Size::new(100.0, 100.0), &steady, &delta).unwrap();
        assert!((m.scale() - 1.0).abs() < f32::EPSILON);
        assert_eq!(m.translation(), Vector::new(10.0, 0.0));
    }

    #[test]
    fn test_degenerate_viewport_rejected() {
        let result = CoordinateMapper::from_parts(Size::new(0.0, 300.0), 1.0, Vector::ZERO);
        assert!(matches!(result, Err(CanvasError::DegenerateGeometry(_))));
        let result = CoordinateMapper::from_parts(Size::new(400.0, -1.0), 1.0, Vector::ZERO);
        assert!(matches!(result, Err(CanvasError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_drag_offset_scaled_into_screen_units() {
        let m = mapper(2.0, Vector::ZERO);
        let glyph = Glyph::new("😀", 0, 0, 40.0);
        let plain = m.glyph_position(&glyph, None);
        let dragged = m.glyph_position(&glyph, Some(Vector::new(10.0, 5.0)));
        assert!(approx(dragged, plain + Vector::new(20.0, 10.0)));
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let m = mapper(1.0, Vector::ZERO);
        let below = Glyph::new("🐶", 0, 0, 40.0);
        let above = Glyph::new("🐱", 10, 0, 40.0);
        let glyphs = vec![below.clone(), above.clone()];

        // (205, 150) is inside both boxes
        assert_eq!(m.hit_test(&glyphs, Point::new(205.0, 150.0), 0.0), Some(above.id));
        // (182, 150) is only inside the lower glyph
        assert_eq!(m.hit_test(&glyphs, Point::new(182.0, 150.0), 0.0), Some(below.id));
        assert_eq!(m.hit_test(&glyphs, Point::new(10.0, 10.0), 0.0), None);
    }

    #[test]
    fn test_hit_test_padding_grows_box() {
        let m = mapper(1.0, Vector::ZERO);
        let glyph = Glyph::new("⭐", 0, 0, 20.0);
        let glyphs = vec![glyph.clone()];
        assert_eq!(m.hit_test(&glyphs, Point::new(215.0, 150.0), 0.0), None);
        assert_eq!(m.hit_test(&glyphs, Point::new(215.0, 150.0), 6.0), Some(glyph.id));
    }
}

//! Gesture coordination: the single entry point a host view drives.
//!
//! The coordinator owns the steady transform, the selection and one
//! [`GestureState`] per continuous gesture. In-flight values only affect
//! rendering; they reach the steady transform or the document when the
//! gesture ends, and vanish if it is cancelled.
//!
//! Canvas panning and glyph dragging are tracked separately. A drag that
//! starts on a selected glyph moves the selection; any other drag pans the
//! canvas. Pinching zooms the canvas when nothing is selected and scales the
//! selected glyphs otherwise.

use serde::Serialize;

use crate::background::BackgroundSubscription;
use crate::config::EngineConfig;
use crate::deletion::{DragDeletion, DragDeletionPolicy};
use crate::drop::{DropAction, DropOutcome, DropPayload, DropRouter};
use crate::event::{Gesture, GesturePhase, InputEvent, TouchEvent};
use crate::recognizer::GestureRecognizer;
use crate::transform::{GestureDelta, GestureState, TransformState, MIN_SCALE};
use crate::zoom::zoom_to_fit;
use crate::{
    CanvasError, CanvasResult, CoordinateMapper, Document, Glyph, GlyphId, Point, SelectionSet,
    Size, Vector,
};

/// What handling one gesture did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum GestureOutcome {
    /// Nothing changed.
    Ignored,
    /// A continuous gesture advanced; only rendering is affected.
    InProgress,
    /// A tap toggled one glyph.
    SelectionToggled {
        /// The tapped glyph.
        glyph: GlyphId,
        /// Whether it is selected now.
        selected: bool,
    },
    /// A background tap cleared the selection.
    SelectionCleared,
    /// The steady transform was reset to fit the background.
    ZoomedToFit {
        /// The new steady scale.
        scale: f32,
    },
    /// A canvas pan was committed.
    CanvasPanned {
        /// New steady translation (document units).
        translation: Vector,
    },
    /// A canvas pinch was committed.
    CanvasZoomed {
        /// New steady scale.
        scale: f32,
    },
    /// A pinch scaled the selected glyphs.
    GlyphsScaled {
        /// How many glyphs were scaled.
        count: usize,
    },
    /// A drag moved the selected glyphs.
    GlyphsMoved {
        /// How many glyphs were moved.
        count: usize,
        /// The glyph deleted by dragging past an edge, if any.
        deleted: Option<DragDeletion>,
    },
    /// The gesture was cancelled and its delta discarded.
    Cancelled,
    /// Content was dropped.
    Dropped(DropOutcome),
}

/// A glyph ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphRender {
    /// Glyph ID.
    pub id: GlyphId,
    /// Text to draw.
    pub text: String,
    /// Screen position of the glyph's center.
    pub position: Point,
    /// Font size in screen units.
    pub font_size: f32,
    /// Whether to draw the selection highlight.
    pub selected: bool,
}

/// Placement of the background image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BackgroundRender {
    /// Screen position of the image center.
    pub center: Point,
    /// Scale applied to the image's pixel size.
    pub scale: f32,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Background placement, once an image is resolved.
    pub background: Option<BackgroundRender>,
    /// A background is set but still loading; glyphs are withheld meanwhile.
    pub loading: bool,
    /// Glyphs in drawing order.
    pub glyphs: Vec<GlyphRender>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragKind {
    Canvas,
    Glyphs,
}

/// Turns gestures into transform changes and document mutations.
#[derive(Debug)]
pub struct GestureCoordinator {
    config: EngineConfig,
    steady: TransformState,
    selection: SelectionSet,
    pan: GestureState<Vector>,
    pinch: GestureState<f32>,
    glyph_drag: GestureState<Vector>,
    recognizer: GestureRecognizer,
    background: Option<BackgroundSubscription>,
    deletion: DragDeletionPolicy,
    router: DropRouter,
}

impl Default for GestureCoordinator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GestureCoordinator {
    /// Create a coordinator with an identity transform and empty selection.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            recognizer: GestureRecognizer::new(config.recognizer.clone()),
            config,
            steady: TransformState::identity(),
            selection: SelectionSet::new(),
            pan: GestureState::Idle,
            pinch: GestureState::Idle,
            glyph_drag: GestureState::Idle,
            background: None,
            deletion: DragDeletionPolicy,
            router: DropRouter,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The steady transform.
    #[must_use]
    pub const fn steady(&self) -> &TransformState {
        &self.steady
    }

    /// Replace the steady transform, e.g. when restoring a view.
    pub fn set_steady(&mut self, steady: TransformState) {
        self.steady = steady;
    }

    /// The current selection.
    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Whether any continuous gesture is in flight.
    #[must_use]
    pub fn is_gesture_active(&self) -> bool {
        self.pan.is_active() || self.pinch.is_active() || self.glyph_drag.is_active()
    }

    // ------------------------------------------------------------------
    // Background subscription
    // ------------------------------------------------------------------

    /// Start observing the document's background image.
    pub fn subscribe_background<D: Document>(&mut self, doc: &D) {
        self.background = Some(doc.subscribe_background());
    }

    /// Stop observing the background image.
    pub fn unsubscribe_background(&mut self) {
        self.background = None;
    }

    /// Check for a newly resolved background and fit it into `viewport`.
    ///
    /// Returns `true` if the steady transform changed.
    pub fn poll_background(&mut self, viewport: Size) -> bool {
        let Some(update) = self.background.as_mut().and_then(BackgroundSubscription::poll) else {
            return false;
        };
        let Some(image) = update else {
            return false;
        };
        match zoom_to_fit(Some(image.size), viewport) {
            Ok(fit) => {
                tracing::debug!(
                    scale = fit.scale(),
                    reference = %image.reference,
                    "fitting new background"
                );
                self.steady = fit;
                true
            }
            Err(e) => {
                tracing::debug!("Skipping zoom to fit: {e}");
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// The in-flight canvas delta. A pinch only zooms the canvas while
    /// nothing is selected; otherwise it previews on the selected glyphs.
    #[must_use]
    pub fn canvas_delta(&self) -> GestureDelta {
        let scale_factor = self.canvas_pinch_factor();
        let scale = self.steady.effective_scale(&GestureDelta {
            translation: Vector::ZERO,
            scale_factor,
        });
        GestureDelta {
            translation: self.pan.value().map_or(Vector::ZERO, |t| t / scale),
            scale_factor,
        }
    }

    fn canvas_pinch_factor(&self) -> f32 {
        if self.selection.is_empty() {
            self.pinch.value().unwrap_or(1.0)
        } else {
            1.0
        }
    }

    fn glyph_pinch_factor(&self) -> f32 {
        if self.selection.is_empty() {
            1.0
        } else {
            self.pinch.value().unwrap_or(1.0)
        }
    }

    /// Mapper for the current effective transform.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DegenerateGeometry`] for a degenerate viewport.
    pub fn mapper(&self, viewport: Size) -> CanvasResult<CoordinateMapper> {
        CoordinateMapper::new(viewport, &self.steady, &self.canvas_delta())
    }

    /// Glyph under a screen point.
    #[must_use]
    pub fn glyph_at<D: Document>(&self, doc: &D, viewport: Size, screen: Point) -> Option<GlyphId> {
        self.mapper(viewport)
            .ok()?
            .hit_test(doc.glyphs(), screen, self.config.hit_padding)
    }

    /// Lay out one frame.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DegenerateGeometry`] for a degenerate viewport;
    /// the host should skip drawing.
    pub fn render<D: Document>(&self, doc: &D, viewport: Size) -> CanvasResult<RenderFrame> {
        let mapper = self.mapper(viewport)?;
        let background = doc.resolved_background().map(|_| BackgroundRender {
            center: Point::ZERO + viewport.half() + mapper.translation(),
            scale: mapper.scale(),
        });
        let loading = doc.is_loading();
        if loading {
            return Ok(RenderFrame {
                background,
                loading,
                glyphs: Vec::new(),
            });
        }

        let drag_offset = self.glyph_drag.value().map(|t| mapper.to_document_vector(t));
        let selected_scale = self.steady.scale() * self.glyph_pinch_factor();
        let glyphs = doc
            .glyphs()
            .iter()
            .map(|glyph| {
                let selected = self.selection.contains(glyph.id);
                let (offset, scale) = if selected {
                    (drag_offset, selected_scale)
                } else {
                    (None, mapper.scale())
                };
                GlyphRender {
                    id: glyph.id,
                    text: glyph.text.clone(),
                    position: mapper.glyph_position(glyph, offset),
                    font_size: glyph.font_size * scale,
                    selected,
                }
            })
            .collect();

        Ok(RenderFrame {
            background,
            loading,
            glyphs,
        })
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Handle any input event.
    pub fn handle_input<D: Document>(
        &mut self,
        doc: &mut D,
        event: &InputEvent,
        viewport: Size,
    ) -> Vec<GestureOutcome> {
        match event {
            InputEvent::Touch(touch) => self.handle_touch(doc, touch, viewport),
            InputEvent::Gesture(gesture) => vec![self.handle_gesture(doc, gesture, viewport)],
            InputEvent::Pointer {
                phase,
                x,
                y,
                timestamp_ms,
            } => {
                let touch = InputEvent::pointer_as_touch(*phase, *x, *y, *timestamp_ms);
                self.handle_touch(doc, &touch, viewport)
            }
            InputEvent::Drop { payload, location } => {
                vec![GestureOutcome::Dropped(self.handle_drop(doc, payload, *location, viewport))]
            }
        }
    }

    /// Run a raw touch event through the recognizer and handle what it yields.
    pub fn handle_touch<D: Document>(
        &mut self,
        doc: &mut D,
        event: &TouchEvent,
        viewport: Size,
    ) -> Vec<GestureOutcome> {
        self.recognizer
            .process(event)
            .iter()
            .map(|gesture| self.handle_gesture(doc, gesture, viewport))
            .collect()
    }

    /// Handle one recognized gesture.
    pub fn handle_gesture<D: Document>(
        &mut self,
        doc: &mut D,
        gesture: &Gesture,
        viewport: Size,
    ) -> GestureOutcome {
        match gesture {
            Gesture::Tap { location, target } => self.tap(doc, *location, *target, viewport),
            Gesture::DoubleTap { .. } => self.double_tap(doc, viewport),
            Gesture::Drag {
                phase,
                start,
                location,
                translation,
                target,
            } => match phase {
                GesturePhase::Changed => {
                    self.drag_changed(doc, *start, *target, *translation, viewport)
                }
                GesturePhase::Ended => {
                    self.drag_ended(doc, *start, *target, *location, *translation, viewport)
                }
                GesturePhase::Cancelled => self.drag_cancelled(),
            },
            Gesture::Pinch { phase, scale, .. } => match phase {
                GesturePhase::Changed => self.pinch_changed(*scale),
                GesturePhase::Ended => self.pinch_ended(doc, *scale),
                GesturePhase::Cancelled => {
                    if self.pinch.cancel() {
                        tracing::debug!("pinch cancelled");
                        GestureOutcome::Cancelled
                    } else {
                        GestureOutcome::Ignored
                    }
                }
            },
        }
    }

    fn tap<D: Document>(
        &mut self,
        doc: &D,
        location: Point,
        target: Option<GlyphId>,
        viewport: Size,
    ) -> GestureOutcome {
        let target = target
            .filter(|id| doc.glyph(*id).is_some())
            .or_else(|| self.glyph_at(doc, viewport, location));
        match target {
            Some(glyph) => {
                let selected = self.selection.toggle(glyph);
                tracing::debug!(%glyph, selected, "glyph tapped");
                GestureOutcome::SelectionToggled { glyph, selected }
            }
            None => {
                self.selection.clear();
                tracing::debug!("background tapped, selection cleared");
                GestureOutcome::SelectionCleared
            }
        }
    }

    fn double_tap<D: Document>(&mut self, doc: &D, viewport: Size) -> GestureOutcome {
        let image = doc.resolved_background().map(|image| image.size);
        match zoom_to_fit(image, viewport) {
            Ok(fit) => {
                self.steady = fit;
                tracing::debug!(scale = fit.scale(), "zoomed to fit");
                GestureOutcome::ZoomedToFit { scale: fit.scale() }
            }
            Err(e) => {
                tracing::debug!("Skipping zoom to fit: {e}");
                GestureOutcome::Ignored
            }
        }
    }

    fn drag_kind<D: Document>(
        &self,
        doc: &D,
        start: Point,
        target: Option<GlyphId>,
        viewport: Size,
    ) -> DragKind {
        let target = target.or_else(|| self.glyph_at(doc, viewport, start));
        match target {
            Some(id) if self.selection.contains(id) => DragKind::Glyphs,
            _ => DragKind::Canvas,
        }
    }

    fn active_drag(&self) -> Option<DragKind> {
        if self.glyph_drag.is_active() {
            Some(DragKind::Glyphs)
        } else if self.pan.is_active() {
            Some(DragKind::Canvas)
        } else {
            None
        }
    }

    fn drag_changed<D: Document>(
        &mut self,
        doc: &D,
        start: Point,
        target: Option<GlyphId>,
        translation: Vector,
        viewport: Size,
    ) -> GestureOutcome {
        if !translation.is_finite() {
            return GestureOutcome::Ignored;
        }
        let kind = self
            .active_drag()
            .unwrap_or_else(|| self.drag_kind(&*doc, start, target, viewport));
        match kind {
            DragKind::Glyphs => self.glyph_drag.update(translation),
            DragKind::Canvas => self.pan.update(translation),
        }
        GestureOutcome::InProgress
    }

    fn drag_ended<D: Document>(
        &mut self,
        doc: &mut D,
        start: Point,
        target: Option<GlyphId>,
        location: Point,
        translation: Vector,
        viewport: Size,
    ) -> GestureOutcome {
        let kind = self
            .active_drag()
            .unwrap_or_else(|| self.drag_kind(&*doc, start, target, viewport));
        self.glyph_drag.end();
        self.pan.end();
        if !translation.is_finite() {
            if kind == DragKind::Glyphs {
                self.selection.clear();
            }
            return GestureOutcome::Ignored;
        }

        let scale = self.steady.effective_scale(&self.canvas_delta());
        let by = translation / scale;
        match kind {
            DragKind::Canvas => {
                self.steady.commit_pan(by);
                tracing::debug!(dx = by.dx, dy = by.dy, "canvas pan committed");
                GestureOutcome::CanvasPanned {
                    translation: self.steady.translation,
                }
            }
            DragKind::Glyphs => self.commit_glyph_drag(doc, by, location, viewport),
        }
    }

    fn commit_glyph_drag<D: Document>(
        &mut self,
        doc: &mut D,
        by: Vector,
        location: Point,
        viewport: Size,
    ) -> GestureOutcome {
        self.selection.retain(|id| doc.glyph(id).is_some());

        let mut count = 0;
        for id in self.selection.iter() {
            match doc.move_glyph(id, by) {
                Ok(()) => count += 1,
                Err(e) => tracing::warn!(%id, "Failed to move glyph: {e}"),
            }
        }

        let selected: Vec<Glyph> = self
            .selection
            .iter()
            .filter_map(|id| doc.glyph(id).cloned())
            .collect();
        let deleted = match self.deletion.evaluate(location, viewport, &selected) {
            Ok(Some(deletion)) => match doc.remove_glyph(deletion.glyph) {
                Ok(_) => Some(deletion),
                Err(e) => {
                    tracing::warn!(glyph = %deletion.glyph, "Failed to remove glyph: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e @ CanvasError::EmptySelectionAtBoundary) => {
                tracing::debug!("No glyph to delete: {e}");
                None
            }
            Err(e) => {
                tracing::warn!("Drag deletion failed: {e}");
                None
            }
        };

        self.selection.clear();
        tracing::debug!(count, deleted = deleted.is_some(), "glyph drag committed");
        GestureOutcome::GlyphsMoved { count, deleted }
    }

    fn drag_cancelled(&mut self) -> GestureOutcome {
        let discarded = self.glyph_drag.cancel() | self.pan.cancel();
        if discarded {
            tracing::debug!("drag cancelled");
            GestureOutcome::Cancelled
        } else {
            GestureOutcome::Ignored
        }
    }

    fn pinch_changed(&mut self, scale: f32) -> GestureOutcome {
        if !scale.is_finite() {
            return GestureOutcome::Ignored;
        }
        self.pinch.update(scale.max(MIN_SCALE));
        GestureOutcome::InProgress
    }

    fn pinch_ended<D: Document>(&mut self, doc: &mut D, scale: f32) -> GestureOutcome {
        self.pinch.end();
        if !scale.is_finite() {
            tracing::debug!("{}", CanvasError::DegenerateScale(scale));
            return GestureOutcome::Ignored;
        }

        if self.selection.is_empty() {
            return match self.steady.commit_pinch(scale) {
                Ok(scale) => {
                    tracing::debug!(scale, "canvas zoom committed");
                    GestureOutcome::CanvasZoomed { scale }
                }
                Err(e) => {
                    tracing::debug!("Ignoring pinch: {e}");
                    GestureOutcome::Ignored
                }
            };
        }

        self.selection.retain(|id| doc.glyph(id).is_some());
        let factor = scale.max(MIN_SCALE);
        let mut count = 0;
        for id in self.selection.iter() {
            match doc.scale_glyph(id, factor) {
                Ok(()) => count += 1,
                Err(e) => tracing::warn!(%id, "Failed to scale glyph: {e}"),
            }
        }
        self.selection.clear();
        tracing::debug!(count, factor, "selected glyphs scaled");
        GestureOutcome::GlyphsScaled { count }
    }

    // ------------------------------------------------------------------
    // Drop
    // ------------------------------------------------------------------

    /// Handle content dropped at a screen location.
    pub fn handle_drop<D: Document>(
        &mut self,
        doc: &mut D,
        payload: &DropPayload,
        location: Point,
        viewport: Size,
    ) -> DropOutcome {
        let action = match self.router.classify(payload) {
            Ok(action) => action,
            Err(e) => {
                tracing::debug!("Drop not handled: {e}");
                return DropOutcome::Unhandled;
            }
        };

        match action {
            DropAction::SetBackground(url) => {
                tracing::info!(%url, "background dropped");
                doc.set_background_reference(Some(url.clone()));
                DropOutcome::BackgroundSet(url)
            }
            DropAction::AddGlyphs(texts) => {
                let mapper = match self.mapper(viewport) {
                    Ok(mapper) => mapper,
                    Err(e) => {
                        tracing::debug!("Drop not handled: {e}");
                        return DropOutcome::Unhandled;
                    }
                };
                let at = mapper.to_document(location);
                let size = doc.default_glyph_size();
                let added: Vec<GlyphId> = texts
                    .iter()
                    .filter_map(|text| match doc.add_glyph(text, at, size) {
                        Ok(id) => Some(id),
                        Err(e) => {
                            tracing::warn!("Failed to add glyph: {e}");
                            None
                        }
                    })
                    .collect();
                if added.is_empty() {
                    DropOutcome::Unhandled
                } else {
                    DropOutcome::GlyphsAdded(added)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryDocument;
    use url::Url;

    const VIEWPORT: Size = Size::new(400.0, 300.0);

    fn drag(phase: GesturePhase, start: Point, translation: Vector) -> Gesture {
        Gesture::Drag {
            phase,
            start,
            location: start + translation,
            translation,
            target: None,
        }
    }

    fn pinch(phase: GesturePhase, scale: f32) -> Gesture {
        Gesture::Pinch {
            phase,
            center: Point::new(200.0, 150.0),
            scale,
        }
    }

    fn tap_on(id: GlyphId) -> Gesture {
        Gesture::Tap {
            location: Point::ZERO,
            target: Some(id),
        }
    }

    fn setup() -> (GestureCoordinator, InMemoryDocument) {
        (GestureCoordinator::default(), InMemoryDocument::new())
    }

    #[test]
    fn test_tap_toggles_and_background_clears() {
        let (mut c, mut doc) = setup();
        let a = doc.insert(Glyph::new("🐝", 0, 0, 40.0));
        let b = doc.insert(Glyph::new("🌻", 50, 0, 40.0));

        c.handle_gesture(&mut doc, &tap_on(a), VIEWPORT);
        c.handle_gesture(&mut doc, &tap_on(b), VIEWPORT);
        assert_eq!(c.selection().len(), 2);

        let outcome = c.handle_gesture(&mut doc, &tap_on(a), VIEWPORT);
        assert_eq!(outcome, GestureOutcome::SelectionToggled { glyph: a, selected: false });
        assert!(c.selection().contains(b));

        let outcome = c.handle_gesture(
            &mut doc,
            &Gesture::Tap {
                location: Point::new(5.0, 5.0),
                target: None,
            },
            VIEWPORT,
        );
        assert_eq!(outcome, GestureOutcome::SelectionCleared);
        assert!(c.selection().is_empty());
    }

    #[test]
    fn test_tap_hit_tests_when_host_gives_no_target() {
        let (mut c, mut doc) = setup();
        let id = doc.insert(Glyph::new("🎈", 0, 0, 40.0));
        // Document origin maps to the viewport center at identity.
        c.handle_gesture(
            &mut doc,
            &Gesture::Tap {
                location: Point::new(205.0, 148.0),
                target: None,
            },
            VIEWPORT,
        );
        assert!(c.selection().contains(id));
    }

    #[test]
    fn test_pan_commits_translation_divided_by_scale() {
        let (mut c, mut doc) = setup();
        c.set_steady(TransformState::new(2.0, Vector::ZERO).unwrap());

        let start = Point::new(10.0, 10.0);
        c.handle_gesture(
            &mut doc,
            &drag(GesturePhase::Changed, start, Vector::new(20.0, 0.0)),
            VIEWPORT,
        );
        assert!(c.is_gesture_active());
        assert_eq!(c.canvas_delta().translation, Vector::new(10.0, 0.0));

        let outcome = c.handle_gesture(
            &mut doc,
            &drag(GesturePhase::Ended, start, Vector::new(40.0, -20.0)),
            VIEWPORT,
        );
        assert_eq!(
            outcome,
            GestureOutcome::CanvasPanned {
                translation: Vector::new(20.0, -10.0)
            }
        );
        assert!(!c.is_gesture_active());
        assert!(c.canvas_delta().is_identity());
    }

    #[test]
    fn test_pan_ignores_selection() {
        let (mut c, mut doc) = setup();
        let id = doc.insert(Glyph::new("🐙", 100, 100, 40.0));
        c.handle_gesture(&mut doc, &tap_on(id), VIEWPORT);

        // Starts on empty background, so it pans even though a glyph is selected.
        let start = Point::new(10.0, 10.0);
        c.handle_gesture(
            &mut doc,
            &drag(GesturePhase::Ended, start, Vector::new(30.0, 0.0)),
            VIEWPORT,
        );
        assert_eq!(c.steady().translation, Vector::new(30.0, 0.0));
        assert!(c.selection().contains(id));
        assert_eq!(doc.glyph(id).unwrap().x, 100);
    }

    #[test]
    fn test_cancelled_drag_leaves_steady_state() {
        let (mut c, mut doc) = setup();
        let start = Point::new(10.0, 10.0);
        c.handle_gesture(
            &mut doc,
            &drag(GesturePhase::Changed, start, Vector::new(50.0, 50.0)),
            VIEWPORT,
        );
        let outcome = c.handle_gesture(
            &mut doc,
            &drag(GesturePhase::Cancelled, start, Vector::new(50.0, 50.0)),
            VIEWPORT,
        );
        assert_eq!(outcome, GestureOutcome::Cancelled);
        assert_eq!(c.steady().translation, Vector::ZERO);
    }

    #[test]
    fn test_pinch_without_selection_zooms_canvas() {
        let (mut c, mut doc) = setup();
        c.handle_gesture(&mut doc, &pinch(GesturePhase::Changed, 1.5), VIEWPORT);
        assert!((c.mapper(VIEWPORT).unwrap().scale() - 1.5).abs() < 1e-5);

        let outcome = c.handle_gesture(&mut doc, &pinch(GesturePhase::Ended, 2.0), VIEWPORT);
        assert_eq!(outcome, GestureOutcome::CanvasZoomed { scale: 2.0 });
        assert!((c.steady().scale() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_pinch_with_selection_scales_glyphs() {
        let (mut c, mut doc) = setup();
        let a = doc.insert(Glyph::new("🦊", 0, 0, 40.0));
        let b = doc.insert(Glyph::new("🐻", 60, 0, 20.0));
        let untouched = doc.insert(Glyph::new("🐼", -60, 0, 30.0));
        c.handle_gesture(&mut doc, &tap_on(a), VIEWPORT);
        c.handle_gesture(&mut doc, &tap_on(b), VIEWPORT);

        c.handle_gesture(&mut doc, &pinch(GesturePhase::Changed, 2.0), VIEWPORT);
        // Canvas keeps its scale while the selection previews the pinch.
        let frame = c.render(&doc, VIEWPORT).unwrap();
        assert!((frame.glyphs[0].font_size - 80.0).abs() < 1e-4);
        assert!((frame.glyphs[2].font_size - 30.0).abs() < 1e-4);

        let outcome = c.handle_gesture(&mut doc, &pinch(GesturePhase::Ended, 2.0), VIEWPORT);
        assert_eq!(outcome, GestureOutcome::GlyphsScaled { count: 2 });
        assert!((c.steady().scale() - 1.0).abs() < f32::EPSILON);
        assert!((doc.glyph(a).unwrap().font_size - 80.0).abs() < f32::EPSILON);
        assert!((doc.glyph(b).unwrap().font_size - 40.0).abs() < f32::EPSILON);
        assert!((doc.glyph(untouched).unwrap().font_size - 30.0).abs() < f32::EPSILON);
        assert!(c.selection().is_empty());
    }

    #[test]
    fn test_pinch_to_zero_is_clamped() {
        let (mut c, mut doc) = setup();
        c.handle_gesture(&mut doc, &pinch(GesturePhase::Ended, 0.0), VIEWPORT);
        assert!(c.steady().scale() > 0.0);
        c.handle_gesture(&mut doc, &pinch(GesturePhase::Ended, -2.0), VIEWPORT);
        assert!(c.steady().scale() > 0.0);
    }

    #[test]
    fn test_glyph_drag_moves_only_selected() {
        let (mut c, mut doc) = setup();
        let a = doc.insert(Glyph::new("🍋", 0, 0, 40.0));
        let b = doc.insert(Glyph::new("🍉", 40, 40, 40.0));
        let other = doc.insert(Glyph::new("🍇", -80, 0, 40.0));
        c.handle_gesture(&mut doc, &tap_on(a), VIEWPORT);
        c.handle_gesture(&mut doc, &tap_on(b), VIEWPORT);

        let start = Point::new(200.0, 150.0);
        c.handle_gesture(
            &mut doc,
            &drag(GesturePhase::Changed, start, Vector::new(10.0, 20.0)),
            VIEWPORT,
        );
        let frame = c.render(&doc, VIEWPORT).unwrap();
        assert_eq!(frame.glyphs[0].position, Point::new(210.0, 170.0));
        assert_eq!(frame.glyphs[2].position, Point::new(120.0, 150.0));
        // The canvas itself did not move.
        assert!(c.canvas_delta().is_identity());

        let outcome = c.handle_gesture(
            &mut doc,
            &drag(GesturePhase::Ended, start, Vector::new(10.0, 20.0)),
            VIEWPORT,
        );
        assert_eq!(outcome, GestureOutcome::GlyphsMoved { count: 2, deleted: None });
        assert_eq!((doc.glyph(a).unwrap().x, doc.glyph(a).unwrap().y), (10, 20));
        assert_eq!((doc.glyph(b).unwrap().x, doc.glyph(b).unwrap().y), (50, 60));
        assert_eq!((doc.glyph(other).unwrap().x, doc.glyph(other).unwrap().y), (-80, 0));
        assert!(c.selection().is_empty());
    }

    #[test]
    fn test_glyph_drag_with_invalid_translation_still_clears_selection() {
        let (mut c, mut doc) = setup();
        let id = doc.insert(Glyph::new("🦔", 0, 0, 40.0));
        c.handle_gesture(&mut doc, &tap_on(id), VIEWPORT);

        let start = Point::new(200.0, 150.0);
        let outcome = c.handle_gesture(
            &mut doc,
            &drag(GesturePhase::Ended, start, Vector::new(f32::NAN, 0.0)),
            VIEWPORT,
        );
        assert_eq!(outcome, GestureOutcome::Ignored);
        assert!(c.selection().is_empty());
        assert_eq!(doc.glyph(id).unwrap().x, 0);
        assert!(!c.is_gesture_active());
    }

    #[test]
    fn test_drag_from_unselected_glyph_pans() {
        let (mut c, mut doc) = setup();
        let id = doc.insert(Glyph::new("🐢", 0, 0, 40.0));
        let start = Point::new(200.0, 150.0);
        let outcome = c.handle_gesture(
            &mut doc,
            &drag(GesturePhase::Ended, start, Vector::new(15.0, 0.0)),
            VIEWPORT,
        );
        assert!(matches!(outcome, GestureOutcome::CanvasPanned { .. }));
        assert_eq!(doc.glyph(id).unwrap().x, 0);
    }

    #[test]
    fn test_drag_past_right_edge_deletes_rightmost() {
        let (mut c, mut doc) = setup();
        let left = doc.insert(Glyph::new("⬅", -5, 0, 20.0));
        let middle = doc.insert(Glyph::new("⏺", 3, 40, 20.0));
        let right = doc.insert(Glyph::new("➡", 10, -40, 20.0));
        for id in [left, middle, right] {
            c.handle_gesture(&mut doc, &tap_on(id), VIEWPORT);
        }

        let start = Point::new(195.0, 150.0);
        let outcome = c.handle_gesture(
            &mut doc,
            &Gesture::Drag {
                phase: GesturePhase::Ended,
                start,
                location: Point::new(400.0, 150.0),
                translation: Vector::new(205.0, 0.0),
                target: Some(left),
            },
            VIEWPORT,
        );
        match outcome {
            GestureOutcome::GlyphsMoved { count: 3, deleted: Some(deletion) } => {
                assert_eq!(deletion.glyph, right);
            }
            other => panic!("Expected deletion, got {other:?}"),
        }
        assert!(doc.glyph(right).is_none());
        assert_eq!(doc.glyph(left).unwrap().x, 200);
        assert!(c.selection().is_empty());
    }

    #[test]
    fn test_double_tap_fits_background_and_keeps_selection() {
        let (mut c, mut doc) = setup();
        let id = doc.insert(Glyph::new("🌵", 0, 0, 40.0));
        c.handle_gesture(&mut doc, &tap_on(id), VIEWPORT);

        let url = Url::parse("https://example.com/desert.png").unwrap();
        doc.set_background_reference(Some(url.clone()));
        doc.publish_resolved_background(&url, Size::new(800.0, 300.0));
        c.set_steady(TransformState::new(3.0, Vector::new(9.0, 9.0)).unwrap());

        let outcome = c.handle_gesture(
            &mut doc,
            &Gesture::DoubleTap { location: Point::ZERO },
            VIEWPORT,
        );
        assert_eq!(outcome, GestureOutcome::ZoomedToFit { scale: 0.5 });
        assert_eq!(c.steady().translation, Vector::ZERO);
        assert!(c.selection().contains(id));
    }

    #[test]
    fn test_double_tap_without_background_is_noop() {
        let (mut c, mut doc) = setup();
        c.set_steady(TransformState::new(3.0, Vector::new(1.0, 2.0)).unwrap());
        let outcome = c.handle_gesture(
            &mut doc,
            &Gesture::DoubleTap { location: Point::ZERO },
            VIEWPORT,
        );
        assert_eq!(outcome, GestureOutcome::Ignored);
        assert!((c.steady().scale() - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_drop_text_lands_at_inverse_mapped_location() {
        let (mut c, mut doc) = setup();
        c.set_steady(TransformState::new(2.0, Vector::ZERO).unwrap());
        // (to_screen(p) = (p + (200, 150)) * 2), so (500, 400) is document (50, 50)
        let outcome = c.handle_drop(
            &mut doc,
            &DropPayload::text("🐳🐬"),
            Point::new(500.0, 400.0),
            VIEWPORT,
        );
        match outcome {
            DropOutcome::GlyphsAdded(ids) => {
                assert_eq!(ids.len(), 2);
                for id in ids {
                    let glyph = doc.glyph(id).unwrap();
                    assert_eq!((glyph.x, glyph.y), (50, 50));
                    assert!((glyph.font_size - 40.0).abs() < f32::EPSILON);
                }
            }
            other => panic!("Expected glyphs, got {other:?}"),
        }
    }

    #[test]
    fn test_drop_locator_sets_background_without_glyphs() {
        let (mut c, mut doc) = setup();
        let outcome = c.handle_drop(
            &mut doc,
            &DropPayload::text("https://example.com/beach.jpg"),
            Point::new(10.0, 10.0),
            VIEWPORT,
        );
        assert!(matches!(outcome, DropOutcome::BackgroundSet(_)));
        assert!(doc.is_empty());
        assert!(doc.is_loading());
    }

    #[test]
    fn test_drop_unhandled() {
        let (mut c, mut doc) = setup();
        let outcome = c.handle_drop(&mut doc, &DropPayload::default(), Point::ZERO, VIEWPORT);
        assert_eq!(outcome, DropOutcome::Unhandled);
        let outcome = c.handle_drop(
            &mut doc,
            &DropPayload::text("🙂"),
            Point::ZERO,
            Size::new(0.0, 0.0),
        );
        assert_eq!(outcome, DropOutcome::Unhandled);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_render_withholds_glyphs_while_loading() {
        let (c, mut doc) = setup();
        doc.insert(Glyph::new("🐌", 0, 0, 40.0));
        doc.set_background_reference(Some(Url::parse("https://example.com/slow.png").unwrap()));
        let frame = c.render(&doc, VIEWPORT).unwrap();
        assert!(frame.loading);
        assert!(frame.glyphs.is_empty());
        assert!(frame.background.is_none());
    }

    #[test]
    fn test_render_rejects_degenerate_viewport() {
        let (c, doc) = setup();
        assert!(matches!(
            c.render(&doc, Size::new(0.0, 100.0)),
            Err(CanvasError::DegenerateGeometry(_))
        ));
    }
}

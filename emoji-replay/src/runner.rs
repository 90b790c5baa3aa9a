//! Replaying a script against the engine.

use emoji_core::{
    Document, EngineConfig, GestureCoordinator, GestureOutcome, Glyph, GlyphId, InMemoryDocument,
    InputEvent, RenderFrame, Size, TransformState,
};
use serde::Serialize;

use crate::script::{Script, ScriptError, Step};

/// Outcomes of one replayed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// Zero-based step index.
    pub index: usize,
    /// Everything the coordinator reported for the step.
    pub outcomes: Vec<GestureOutcome>,
}

/// Final state after a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Per-step outcomes.
    pub steps: Vec<StepReport>,
    /// Final steady transform.
    pub steady: TransformState,
    /// Selected glyphs, in selection order.
    pub selection: Vec<GlyphId>,
    /// Final document glyphs.
    pub glyphs: Vec<Glyph>,
    /// Final viewport.
    pub viewport: Size,
    /// Final frame; absent when the viewport is degenerate.
    pub frame: Option<RenderFrame>,
}

/// A document and coordinator being driven by a script.
#[derive(Debug)]
pub struct Replay {
    document: InMemoryDocument,
    coordinator: GestureCoordinator,
    viewport: Size,
}

impl Replay {
    /// Seed a document from `script` and subscribe to its background.
    #[must_use]
    pub fn new(script: &Script, config: EngineConfig) -> Self {
        let mut document = InMemoryDocument::with_default_glyph_size(config.default_glyph_size);
        for seed in &script.glyphs {
            let size = seed.font_size.unwrap_or(config.default_glyph_size);
            document.insert(Glyph::new(seed.text.clone(), seed.x, seed.y, size));
        }
        document.set_background_reference(script.background.clone());

        let mut coordinator = GestureCoordinator::new(config);
        coordinator.subscribe_background(&document);

        Self {
            document,
            coordinator,
            viewport: script.viewport,
        }
    }

    /// Apply one step.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::NoBackground`] for a `resolve_background` step
    /// when no background locator is set.
    pub fn apply(&mut self, index: usize, step: &Step) -> Result<Vec<GestureOutcome>, ScriptError> {
        tracing::debug!(index, ?step, "applying step");
        let outcomes = match step {
            Step::Touch { event } => self.input(&InputEvent::Touch(event.clone())),
            Step::Pointer {
                phase,
                x,
                y,
                timestamp_ms,
            } => self.input(&InputEvent::Pointer {
                phase: *phase,
                x: *x,
                y: *y,
                timestamp_ms: *timestamp_ms,
            }),
            Step::Gesture { gesture } => self.input(&InputEvent::Gesture(gesture.clone())),
            Step::Drop { payload, at } => self.input(&InputEvent::Drop {
                payload: payload.clone(),
                location: *at,
            }),
            Step::ResolveBackground { width, height } => {
                let reference = self
                    .document
                    .background_reference()
                    .cloned()
                    .ok_or(ScriptError::NoBackground { step: index })?;
                if !self
                    .document
                    .publish_resolved_background(&reference, Size::new(*width, *height))
                {
                    tracing::warn!(%reference, "Background resolution was discarded");
                }
                Vec::new()
            }
            Step::Resize { width, height } => {
                self.viewport = Size::new(*width, *height);
                tracing::info!(width, height, "viewport resized");
                Vec::new()
            }
        };
        Ok(self.poll(outcomes))
    }

    fn input(&mut self, event: &InputEvent) -> Vec<GestureOutcome> {
        self.coordinator
            .handle_input(&mut self.document, event, self.viewport)
    }

    fn poll(&mut self, mut outcomes: Vec<GestureOutcome>) -> Vec<GestureOutcome> {
        if self.coordinator.poll_background(self.viewport) {
            outcomes.push(GestureOutcome::ZoomedToFit {
                scale: self.coordinator.steady().scale(),
            });
        }
        outcomes
    }

    /// Stop observing the background and produce the final report.
    #[must_use]
    pub fn finish(mut self, steps: Vec<StepReport>) -> Report {
        self.coordinator.unsubscribe_background();
        let frame = match self.coordinator.render(&self.document, self.viewport) {
            Ok(frame) => Some(frame),
            Err(e) => {
                tracing::warn!("Skipping final frame: {e}");
                None
            }
        };
        Report {
            steps,
            steady: *self.coordinator.steady(),
            selection: self.coordinator.selection().iter().collect(),
            glyphs: self.document.glyphs().to_vec(),
            viewport: self.viewport,
            frame,
        }
    }
}

/// Replay every step of `script` and report the final state.
///
/// # Errors
///
/// Returns the first [`ScriptError`] a step produces.
pub fn run_script(script: &Script, config: EngineConfig) -> Result<Report, ScriptError> {
    let mut replay = Replay::new(script, config);
    let mut steps = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.iter().enumerate() {
        let outcomes = replay.apply(index, step)?;
        steps.push(StepReport { index, outcomes });
    }
    tracing::info!(steps = steps.len(), "replay finished");
    Ok(replay.finish(steps))
}

//! Steady-state view transform and its composition with in-flight gestures.
//!
//! The view keeps a persisted [`TransformState`] and, while a gesture is
//! running, a transient [`GestureDelta`]. Rendering always uses the
//! composition of the two; the delta is folded into the steady state only
//! when the gesture ends.

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult, Vector};

/// Smallest steady or effective scale the view will accept.
pub const MIN_SCALE: f32 = 1.0e-3;

/// The persisted zoom and pan of the view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    /// Zoom factor, always `>= MIN_SCALE`.
    scale: f32,
    /// Pan offset in document units.
    pub translation: Vector,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformState {
    /// Scale 1, no translation.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            scale: 1.0,
            translation: Vector::ZERO,
        }
    }

    /// Create a transform, clamping the scale into the valid range.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DegenerateScale`] if `scale` is not finite.
    pub fn new(scale: f32, translation: Vector) -> CanvasResult<Self> {
        Ok(Self {
            scale: clamp_scale(scale)?,
            translation,
        })
    }

    /// The steady zoom factor.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Steady scale combined with the in-flight pinch factor.
    #[must_use]
    pub fn effective_scale(&self, delta: &GestureDelta) -> f32 {
        let scale = self.scale * delta.scale_factor;
        if scale.is_finite() {
            scale.max(MIN_SCALE)
        } else {
            self.scale
        }
    }

    /// Steady plus in-flight translation, converted to screen units with the
    /// effective scale so a pan made during a pinch tracks the zoom.
    #[must_use]
    pub fn effective_translation(&self, delta: &GestureDelta) -> Vector {
        (self.translation + delta.translation) * self.effective_scale(delta)
    }

    /// Fold a finished pan (already in document units) into the steady state.
    pub fn commit_pan(&mut self, translation: Vector) {
        if translation.is_finite() {
            self.translation += translation;
        }
    }

    /// Fold a finished pinch into the steady scale.
    ///
    /// Factors that would take the scale to zero or below are clamped to
    /// [`MIN_SCALE`].
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DegenerateScale`] if `factor` is not finite; the
    /// steady scale is unchanged in that case.
    pub fn commit_pinch(&mut self, factor: f32) -> CanvasResult<f32> {
        if !factor.is_finite() {
            return Err(CanvasError::DegenerateScale(factor));
        }
        self.scale = clamp_scale(self.scale * factor)?;
        Ok(self.scale)
    }
}

fn clamp_scale(scale: f32) -> CanvasResult<f32> {
    if scale.is_finite() {
        Ok(scale.max(MIN_SCALE))
    } else {
        Err(CanvasError::DegenerateScale(scale))
    }
}

/// The transient contribution of an in-progress canvas gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureDelta {
    /// In-flight pan in document units.
    pub translation: Vector,
    /// In-flight pinch factor.
    pub scale_factor: f32,
}

impl Default for GestureDelta {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl GestureDelta {
    /// No translation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vector::ZERO,
        scale_factor: 1.0,
    };

    /// Whether this delta changes nothing.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Per-recognizer gesture state: `Idle -> Active(value) -> Idle`.
///
/// The value is committed by whoever calls [`end`](Self::end) and simply
/// dropped by [`cancel`](Self::cancel).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum GestureState<T> {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Gesture in progress with its latest value.
    Active(T),
}

impl<T: Copy> GestureState<T> {
    /// Record the latest value, starting the gesture if it was idle.
    pub fn update(&mut self, value: T) {
        *self = Self::Active(value);
    }

    /// Finish the gesture and hand back its final value for committing.
    pub fn end(&mut self) -> Option<T> {
        match std::mem::take(self) {
            Self::Active(value) => Some(value),
            Self::Idle => None,
        }
    }

    /// Abandon the gesture. Returns whether anything was discarded.
    pub fn cancel(&mut self) -> bool {
        std::mem::take(self).is_active()
    }

    /// The latest value, if active.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        match self {
            Self::Active(value) => Some(*value),
            Self::Idle => None,
        }
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

//! Zoom-to-fit: the steady transform that shows a whole image in the viewport.

use crate::{CanvasError, CanvasResult, Size, TransformState, Vector};

/// Compute the transform that fits `image` inside `viewport`.
///
/// The scale is the smaller of the horizontal and vertical ratios and the
/// translation is reset to zero.
///
/// # Errors
///
/// Returns [`CanvasError::DegenerateGeometry`] when there is no image or when
/// any image or viewport dimension is not strictly positive. Callers treat
/// this as "leave the steady state alone".
pub fn zoom_to_fit(image: Option<Size>, viewport: Size) -> CanvasResult<TransformState> {
    let image = image
        .ok_or_else(|| CanvasError::DegenerateGeometry("no background image".to_string()))?;
    if !image.is_positive() {
        return Err(CanvasError::DegenerateGeometry(format!(
            "image {}x{}",
            image.width, image.height
        )));
    }
    if !viewport.is_positive() {
        return Err(CanvasError::DegenerateGeometry(format!(
            "viewport {}x{}",
            viewport.width, viewport.height
        )));
    }

    let h_zoom = viewport.width / image.width;
    let v_zoom = viewport.height / image.height;
    TransformState::new(h_zoom.min(v_zoom), Vector::ZERO)
}

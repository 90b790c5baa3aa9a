//! # Emoji Canvas Core
//!
//! View-transform and gesture-composition engine for an emoji art canvas:
//! glyphs placed on a document over an optional background image, viewed
//! through a pannable, zoomable transform.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              GestureCoordinator             │
//! ├─────────────────────────────────────────────┤
//! │  Input            │  View                   │
//! │  - Touch/pointer  │  - Steady transform     │
//! │  - Recognizer     │  - In-flight deltas     │
//! │  - Drop routing   │  - Coordinate mapper    │
//! ├─────────────────────────────────────────────┤
//! │  Document         │  Background             │
//! │  - Glyphs         │  - Locator              │
//! │  - Selection      │  - Resolved image       │
//! │  - Drag deletion  │  - Zoom to fit          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The host feeds [`InputEvent`]s into a [`GestureCoordinator`] together with
//! a [`Document`] and the current viewport size, then asks it to
//! [`render`](GestureCoordinator::render) a frame.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod background;
pub mod config;
pub mod coordinator;
pub mod deletion;
pub mod document;
pub mod drop;
pub mod error;
pub mod event;
pub mod geometry;
pub mod glyph;
pub mod mapper;
pub mod recognizer;
pub mod selection;
pub mod transform;
pub mod zoom;

pub use background::{
    background_channel, BackgroundSender, BackgroundSubscription, ResolvedBackground,
};
pub use config::{EngineConfig, RecognizerConfig};
pub use coordinator::{
    BackgroundRender, GestureCoordinator, GestureOutcome, GlyphRender, RenderFrame,
};
pub use deletion::{DragDeletion, DragDeletionPolicy, Edge};
pub use document::{Document, InMemoryDocument, DEFAULT_GLYPH_SIZE, MIN_FONT_SIZE};
pub use drop::{DropAction, DropItem, DropOutcome, DropPayload, DropRouter};
pub use error::{CanvasError, CanvasResult};
pub use event::{Gesture, GesturePhase, InputEvent, TouchEvent, TouchPhase, TouchPoint};
pub use geometry::{Point, Size, Vector};
pub use glyph::{Glyph, GlyphId};
pub use mapper::CoordinateMapper;
pub use recognizer::GestureRecognizer;
pub use selection::SelectionSet;
pub use transform::{GestureDelta, GestureState, TransformState, MIN_SCALE};
pub use zoom::zoom_to_fit;

/// Emoji canvas core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

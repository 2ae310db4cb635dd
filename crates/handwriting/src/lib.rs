//! Cursive handwriting engine - learning and reproducing a user's hand
//!
//! This crate holds the core algorithms behind handwritten AI responses:
//! - [`types`] - Points, strokes, bounds, and training samples
//! - [`input`] - Pointer normalization and palm rejection
//! - [`validation`] - Geometry checks at sample ingestion
//! - [`library`] - In-memory keyed sample collection
//! - [`profile`] - Statistical style profile extraction
//! - [`mood`] - Lexicon-based mood classification and deltas
//! - [`synth`] - Text-to-stroke synthesis with fallback glyphs
//! - [`outline`] - Pressure-weighted filled outline rendering
//! - [`layout`] - Canvas placement for synthesized blocks
//!
//! Everything here is synchronous and free of I/O; the async training-sample
//! store lives in the `cursive-store` crate.

pub mod constants;
pub mod input;
pub mod layout;
pub mod library;
pub mod mood;
pub mod outline;
pub mod profile;
pub mod synth;
pub mod types;
pub mod validation;

pub use constants::*;
pub use input::*;
pub use layout::*;
pub use library::*;
pub use mood::*;
pub use outline::*;
pub use profile::*;
pub use synth::*;
pub use types::*;
pub use validation::*;

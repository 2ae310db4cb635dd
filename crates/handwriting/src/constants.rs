//! Shared constants for the handwriting engine.

/// Variation slots held per training key
pub const DEFAULT_VARIATIONS_PER_KEY: usize = 3;

/// Pressure assigned when the input device reports none
pub const DEFAULT_PRESSURE: f32 = 0.5;

/// Default stroke width in pixels
pub const DEFAULT_STROKE_WIDTH: f32 = 3.0;

/// Fixed placement origin for an empty canvas
pub const DEFAULT_ORIGIN: (f32, f32) = (50.0, 50.0);

/// Slant clamp applied to the effective profile, degrees
pub const MAX_SLANT_DEG: f32 = 45.0;

/// Maximum per-unit positional jitter at messiness 1.0, pixels
pub const MAX_JITTER_PX: f32 = 3.0;

/// Baseline-to-baseline advance for multi-line synthesis, pixels
pub const DEFAULT_LINE_HEIGHT: f32 = 64.0;

/// Nominal x-height used to size procedural fallback glyphs, pixels
pub const FALLBACK_X_HEIGHT: f32 = 32.0;

/// Horizontal advance for a space character, pixels
pub const SPACE_ADVANCE: f32 = 18.0;

/// Gap kept between a placed block and surrounding content, pixels
pub const PLACEMENT_PADDING: f32 = 8.0;

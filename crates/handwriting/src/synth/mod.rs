//! Text-to-stroke synthesis.
//!
//! Turns arbitrary text plus a style profile into positioned synthetic
//! strokes. Trained keys are resolved greedily (word > ligature > character)
//! and rendered from a randomly chosen stored variation; untrained
//! characters fall back to procedural skeleton glyphs, so synthesis never
//! fails. Mood modulates geometry only, never which variation is picked.

mod glyphs;
mod tokenizer;

pub use glyphs::fallback_glyph;
pub use tokenizer::{tokenize, Token};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    DEFAULT_LINE_HEIGHT, DEFAULT_STROKE_WIDTH, MAX_JITTER_PX, SPACE_ADVANCE,
};
use crate::library::SampleLibrary;
use crate::mood::MoodDelta;
use crate::profile::StyleProfile;
use crate::types::{Bounds, Stroke, StrokeOrigin};

/// Minimum horizontal advance per unit, so dot-like glyphs still move the pen
const MIN_ADVANCE: f32 = 6.0;

/// How one text segment was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    /// Rendered from a stored training sample
    Trained { variation: usize },
    /// No trained sample existed; a placeholder skeleton was substituted
    Fallback,
}

/// A resolved mapping from a text segment to a chosen sample or fallback
/// glyph, with its placed bounds. Diagnostic output of synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisUnit {
    pub key: String,
    pub kind: UnitKind,
    pub bounds: Bounds,
}

/// Output of one synthesis call. Strokes are absolute-positioned and
/// ephemeral until etched by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub strokes: Vec<Stroke>,
    pub bounds: Bounds,
    pub units: Vec<SynthesisUnit>,
}

impl Synthesis {
    fn empty() -> Self {
        Self {
            strokes: Vec::new(),
            bounds: Bounds::ZERO,
            units: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

/// Text-to-stroke synthesizer with an injectable random source.
///
/// Entropy-seeded by default; [`TextSynthesizer::with_seed`] makes variation
/// selection and jitter fully reproducible for tests.
pub struct TextSynthesizer {
    rng: StdRng,
    ink: [f32; 4],
    width: f32,
}

impl Default for TextSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSynthesizer {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic synthesizer for testing
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            ink: [0.0, 0.0, 0.0, 1.0],
            width: DEFAULT_STROKE_WIDTH,
        }
    }

    /// Set the ink color applied to synthesized strokes
    pub fn set_ink(&mut self, color: [f32; 4]) {
        self.ink = color;
    }

    /// Set the pen width applied to synthesized strokes
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// Synthesize strokes for `text` in the style of `profile`, optionally
    /// modulated by a mood delta.
    ///
    /// Never fails: untrained characters become `Fallback` units with
    /// placeholder glyphs. Empty text yields empty output with a zero-area
    /// bounding box.
    pub fn synthesize(
        &mut self,
        text: &str,
        library: &SampleLibrary,
        profile: &StyleProfile,
        mood: Option<&MoodDelta>,
    ) -> Synthesis {
        if text.is_empty() {
            return Synthesis::empty();
        }

        let effective = mood.map_or(*profile, |d| profile.with_mood(d));
        let jitter_scale = mood.map_or(1.0, |d| d.jitter_scale);
        let jitter_amp = effective.messiness * MAX_JITTER_PX * jitter_scale;
        let spacing = effective.spacing_ratio.max(0.0);

        // Trained sample geometry already carries the measured base slant,
        // so trained units are sheared only by the mood/override delta.
        // Fallback glyphs are upright skeletons and take the full slant.
        let trained_shear = (effective.slant_deg - profile.slant_deg).to_radians().tan();
        let fallback_shear = effective.slant_deg.to_radians().tan();

        let mut out = Synthesis::empty();
        let mut cursor = Vec2::ZERO;

        for token in tokenize(text, library) {
            match token {
                Token::Space => cursor.x += SPACE_ADVANCE,
                Token::Newline => {
                    cursor.x = 0.0;
                    cursor.y += DEFAULT_LINE_HEIGHT;
                }
                Token::Key(key) => {
                    let variations = library.samples(&key);
                    let pick = self.rng.gen_range(0..variations.len());
                    let sample = &variations[pick];

                    let unit_strokes = normalize_trained(sample.strokes.clone());
                    let bounds =
                        self.emit_unit(unit_strokes, cursor, trained_shear, jitter_amp, &mut out);
                    debug!("unit {:?}: trained variation {}", key, sample.variation);
                    out.units.push(SynthesisUnit {
                        key,
                        kind: UnitKind::Trained {
                            variation: sample.variation,
                        },
                        bounds,
                    });
                    cursor.x += bounds.width().max(MIN_ADVANCE) * (1.0 + spacing);
                }
                Token::Untrained(c) => {
                    let unit_strokes = glyphs::fallback_glyph(c);
                    let bounds =
                        self.emit_unit(unit_strokes, cursor, fallback_shear, jitter_amp, &mut out);
                    debug!("unit {:?}: no trained sample, using fallback glyph", c);
                    out.units.push(SynthesisUnit {
                        key: c.to_string(),
                        kind: UnitKind::Fallback,
                        bounds,
                    });
                    cursor.x += bounds.width().max(MIN_ADVANCE) * (1.0 + spacing);
                }
            }
        }

        out.bounds = out
            .strokes
            .iter()
            .map(Stroke::bounds)
            .reduce(Bounds::union)
            .unwrap_or(Bounds::ZERO);
        out
    }

    /// Shear, jitter, position, and restyle one unit's strokes, appending
    /// them to the output. Returns the placed unit bounds.
    fn emit_unit(
        &mut self,
        mut unit_strokes: Vec<Stroke>,
        cursor: Vec2,
        shear: f32,
        jitter_amp: f32,
        out: &mut Synthesis,
    ) -> Bounds {
        let jitter = Vec2::new(
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-1.0..=1.0),
        ) * jitter_amp;

        let mut bounds: Option<Bounds> = None;
        for stroke in &mut unit_strokes {
            for p in &mut stroke.points {
                // Shear about the unit baseline (local y = 0)
                p.x -= p.y * shear;
                p.x += cursor.x + jitter.x;
                p.y += cursor.y + jitter.y;
            }
            stroke.origin = StrokeOrigin::Synthetic;
            stroke.color = self.ink;
            stroke.width = self.width;

            let b = stroke.bounds();
            bounds = Some(bounds.map_or(b, |acc| acc.union(b)));
        }

        out.strokes.extend(unit_strokes);
        bounds.unwrap_or(Bounds::ZERO)
    }
}

/// Move a trained sample into unit-local space: left edge at x = 0, bounding
/// box bottom on the baseline (y = 0). Captured samples carry no baseline
/// metadata, so the box bottom stands in for it.
fn normalize_trained(mut strokes: Vec<Stroke>) -> Vec<Stroke> {
    let Some(bounds) = strokes
        .iter()
        .map(Stroke::bounds)
        .reduce(Bounds::union)
    else {
        return strokes;
    };
    let offset = Vec2::new(-bounds.min.x, -bounds.max.y);
    for stroke in &mut strokes {
        stroke.translate(offset);
    }
    strokes
}

/// Cancel-and-replace commit gate for per-response synthesis.
///
/// Each incoming AI response calls [`begin`](Self::begin) for a generation
/// token; a finished synthesis is committed only while its token is still
/// current, so a superseded in-flight synthesis is discarded and at most one
/// result per response slot reaches the canvas.
#[derive(Debug, Default)]
pub struct ResponseSlot {
    generation: AtomicU64,
    committed: Mutex<Option<Synthesis>>,
}

impl ResponseSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new synthesis request, superseding any in-flight one.
    pub fn begin(&self) -> u64 {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.committed.lock().expect("ResponseSlot lock poisoned") = None;
        token
    }

    /// Current generation token
    pub fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Commit a finished synthesis if its token is still current.
    ///
    /// Returns false (and drops the result) when a newer request has begun.
    pub fn commit(&self, token: u64, synthesis: Synthesis) -> bool {
        if token != self.current() {
            debug!("discarding superseded synthesis (token {token})");
            return false;
        }
        *self.committed.lock().expect("ResponseSlot lock poisoned") = Some(synthesis);
        true
    }

    /// Take the committed result for the canvas, if any.
    pub fn take(&self) -> Option<Synthesis> {
        self.committed
            .lock()
            .expect("ResponseSlot lock poisoned")
            .take()
    }
}

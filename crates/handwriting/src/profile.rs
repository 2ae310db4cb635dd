//! Style profile extraction.
//!
//! Derives aggregate handwriting statistics from stored training samples.
//! Extraction never fails: any statistic with too little data falls back to
//! its documented neutral default, so an empty sample set yields exactly
//! [`StyleProfile::default`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::MAX_SLANT_DEG;
use crate::mood::MoodDelta;
use crate::types::{KeyKind, Point, TrainingSample};

/// Mean point-to-point velocity below this is Slow, px/ms
const SPEED_SLOW_MAX: f32 = 0.4;
/// Mean point-to-point velocity above this is Fast, px/ms
const SPEED_FAST_MIN: f32 = 1.2;
/// Centered moving-average window for the messiness reference curve
const SMOOTH_WINDOW: usize = 5;
/// Perceptual scale mapping raw wobble ratio into 0..=1
const MESSINESS_SCALE: f32 = 10.0;

/// Handwriting speed bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum SpeedClass {
    Slow = 0,
    #[default]
    Medium = 1,
    Fast = 2,
}

/// Aggregate pen pressure statistics across all sample points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureStats {
    pub min: f32,
    pub max: f32,
    pub avg: f32,
    /// Coefficient of variation: std dev / mean
    pub cv: f32,
}

impl Default for PressureStats {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 0.5,
            avg: 0.5,
            cv: 0.0,
        }
    }
}

/// Aggregate statistical description of a user's handwriting.
///
/// Always derived from samples via [`compute_profile`], never hand-edited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Mean slant of near-vertical pen segments; positive leans right
    pub slant_deg: f32,
    /// Mean inter-glyph gap / mean glyph width
    pub spacing_ratio: f32,
    /// Hand wobble relative to an idealized smooth path, 0..=1
    pub messiness: f32,
    /// Std dev of per-sample vertical start positions, pixels
    pub baseline_var_px: f32,
    pub pressure: PressureStats,
    pub speed: SpeedClass,
    /// Majority of multi-letter samples written without lifting the pen
    pub connect_letters: bool,
}

impl Default for StyleProfile {
    /// Neutral defaults used whenever a statistic has too little data
    fn default() -> Self {
        Self {
            slant_deg: 0.0,
            spacing_ratio: 0.25,
            messiness: 0.15,
            baseline_var_px: 0.0,
            pressure: PressureStats::default(),
            speed: SpeedClass::Medium,
            connect_letters: false,
        }
    }
}

impl StyleProfile {
    /// Base profile plus a mood delta, additively combined and clamped.
    pub fn with_mood(&self, delta: &MoodDelta) -> Self {
        Self {
            slant_deg: (self.slant_deg + delta.slant_delta_deg).clamp(-MAX_SLANT_DEG, MAX_SLANT_DEG),
            messiness: (self.messiness + delta.messiness_delta).clamp(0.0, 1.0),
            ..*self
        }
    }
}

/// Compute a style profile from training samples.
///
/// Each statistic degrades independently to its neutral default when the
/// samples carry no usable measurement for it; the call itself never fails.
pub fn compute_profile<'a, I>(samples: I) -> StyleProfile
where
    I: IntoIterator<Item = &'a TrainingSample>,
{
    let samples: Vec<&TrainingSample> = samples.into_iter().collect();
    let defaults = StyleProfile::default();

    let profile = StyleProfile {
        slant_deg: slant_deg(&samples).unwrap_or(defaults.slant_deg),
        spacing_ratio: spacing_ratio(&samples).unwrap_or(defaults.spacing_ratio),
        messiness: messiness(&samples).unwrap_or(defaults.messiness),
        baseline_var_px: baseline_var(&samples).unwrap_or(defaults.baseline_var_px),
        pressure: pressure_stats(&samples).unwrap_or_default(),
        speed: speed_class(&samples).unwrap_or(defaults.speed),
        connect_letters: connect_letters(&samples).unwrap_or(defaults.connect_letters),
    };

    debug!(
        "computed profile from {} samples: slant={:.1}deg spacing={:.2} messiness={:.2} speed={:?}",
        samples.len(),
        profile.slant_deg,
        profile.spacing_ratio,
        profile.messiness,
        profile.speed
    );

    profile
}

/// Length-weighted mean angle-from-vertical of predominantly vertical
/// segments, degrees. Positive means the writing leans right.
fn slant_deg(samples: &[&TrainingSample]) -> Option<f32> {
    let mut weighted_sum = 0.0f32;
    let mut weight = 0.0f32;

    for sample in samples {
        for stroke in &sample.strokes {
            for pair in stroke.points.windows(2) {
                let mut d = pair[1].pos() - pair[0].pos();
                // Only near-vertical segments carry slant information
                if d.y.abs() <= d.x.abs() {
                    continue;
                }
                // Orient downward (canvas y grows down) so up- and
                // down-strokes agree on direction
                if d.y < 0.0 {
                    d = -d;
                }
                let len = d.length();
                if len <= f32::EPSILON {
                    continue;
                }
                // A right slant puts the top of a downstroke right of its
                // bottom, i.e. x decreases while y increases
                let angle = (-d.x).atan2(d.y).to_degrees();
                weighted_sum += angle * len;
                weight += len;
            }
        }
    }

    (weight > 0.0).then(|| weighted_sum / weight)
}

/// Mean positive horizontal gap between adjacent glyph boxes over mean glyph
/// width, using only multi-letter samples where adjacency is known.
fn spacing_ratio(samples: &[&TrainingSample]) -> Option<f32> {
    let mut gaps = Vec::new();
    let mut widths = Vec::new();

    for sample in samples {
        if sample.kind() == KeyKind::Character || sample.strokes.len() < 2 {
            continue;
        }
        let mut boxes: Vec<_> = sample.strokes.iter().map(|s| s.bounds()).collect();
        boxes.sort_by(|a, b| a.min.x.total_cmp(&b.min.x));

        for pair in boxes.windows(2) {
            let gap = pair[1].min.x - pair[0].max.x;
            if gap > 0.0 {
                gaps.push(gap);
            }
        }
        widths.extend(boxes.iter().map(|b| b.width()).filter(|w| *w > 0.0));
    }

    if gaps.is_empty() || widths.is_empty() {
        return None;
    }
    let mean_gap = gaps.iter().sum::<f32>() / gaps.len() as f32;
    let mean_width = widths.iter().sum::<f32>() / widths.len() as f32;
    Some(mean_gap / mean_width)
}

/// RMS distance of each stroke's points from the same stroke smoothed by a
/// centered moving average, normalized by the stroke's bounding-box diagonal
/// and scaled into 0..=1.
///
/// Only interior points with a full centered window contribute; truncated
/// edge windows would read curvature at the stroke ends as wobble.
fn messiness(samples: &[&TrainingSample]) -> Option<f32> {
    let half = SMOOTH_WINDOW / 2;
    let mut per_stroke = Vec::new();

    for sample in samples {
        for stroke in &sample.strokes {
            if stroke.points.len() < SMOOTH_WINDOW {
                continue;
            }
            let diagonal = stroke.bounds().diagonal();
            if diagonal <= f32::EPSILON {
                continue;
            }

            let interior = half..stroke.points.len() - half;
            let count = interior.len();
            let mean_sq = interior
                .map(|i| {
                    let window = &stroke.points[i - half..=i + half];
                    let centroid =
                        window.iter().map(Point::pos).sum::<Vec2>() / window.len() as f32;
                    stroke.points[i].pos().distance_squared(centroid)
                })
                .sum::<f32>()
                / count as f32;

            per_stroke.push((mean_sq.sqrt() / diagonal * MESSINESS_SCALE).clamp(0.0, 1.0));
        }
    }

    (!per_stroke.is_empty()).then(|| per_stroke.iter().sum::<f32>() / per_stroke.len() as f32)
}

/// Population std dev of each sample's vertical start position.
fn baseline_var(samples: &[&TrainingSample]) -> Option<f32> {
    let ys: Vec<f32> = samples
        .iter()
        .filter_map(|s| s.strokes.first())
        .filter_map(|s| s.points.first())
        .map(|p| p.y)
        .collect();
    if ys.len() < 2 {
        return None;
    }
    let mean = ys.iter().sum::<f32>() / ys.len() as f32;
    let var = ys.iter().map(|y| (y - mean).powi(2)).sum::<f32>() / ys.len() as f32;
    Some(var.sqrt())
}

/// Min/max/mean/coefficient-of-variation of pressure across all points.
fn pressure_stats(samples: &[&TrainingSample]) -> Option<PressureStats> {
    let pressures: Vec<f32> = samples
        .iter()
        .flat_map(|s| &s.strokes)
        .flat_map(|s| &s.points)
        .map(|p| p.pressure)
        .collect();
    if pressures.is_empty() {
        return None;
    }

    let min = pressures.iter().copied().fold(f32::INFINITY, f32::min);
    let max = pressures.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let avg = pressures.iter().sum::<f32>() / pressures.len() as f32;
    let var = pressures.iter().map(|p| (p - avg).powi(2)).sum::<f32>() / pressures.len() as f32;
    let cv = if avg > f32::EPSILON {
        var.sqrt() / avg
    } else {
        0.0
    };

    Some(PressureStats { min, max, avg, cv })
}

/// Mean point-to-point velocity bucketed at fixed thresholds.
fn speed_class(samples: &[&TrainingSample]) -> Option<SpeedClass> {
    let mut total = 0.0f32;
    let mut count = 0usize;

    for sample in samples {
        for stroke in &sample.strokes {
            for pair in stroke.points.windows(2) {
                let dt = pair[1].timestamp_ms.saturating_sub(pair[0].timestamp_ms);
                if dt == 0 {
                    continue;
                }
                total += pair[0].pos().distance(pair[1].pos()) / dt as f32;
                count += 1;
            }
        }
    }

    if count == 0 {
        return None;
    }
    let mean = total / count as f32;
    Some(if mean < SPEED_SLOW_MAX {
        SpeedClass::Slow
    } else if mean < SPEED_FAST_MIN {
        SpeedClass::Medium
    } else {
        SpeedClass::Fast
    })
}

/// True when a majority of multi-letter samples are a single unbroken stroke.
fn connect_letters(samples: &[&TrainingSample]) -> Option<bool> {
    let multi: Vec<_> = samples
        .iter()
        .filter(|s| s.kind() != KeyKind::Character)
        .collect();
    if multi.is_empty() {
        return None;
    }
    let connected = multi.iter().filter(|s| s.is_connected()).count();
    Some(connected * 2 > multi.len())
}

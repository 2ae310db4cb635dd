//! Core data types for the handwriting engine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_STROKE_WIDTH;

/// Origin of a stroke on the canvas.
///
/// Synthesized strokes stay `Synthetic` (and ephemeral) until the user
/// explicitly etches them into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum StrokeOrigin {
    #[default]
    Human = 0,
    Synthetic = 1,
}

/// A single timestamped, pressure-tagged point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    /// Pen pressure in 0..=1. Devices without pressure report 0.5.
    pub pressure: f32,
    /// Capture time in milliseconds
    pub timestamp_ms: u64,
}

impl Point {
    pub fn new(x: f32, y: f32, pressure: f32, timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            pressure,
            timestamp_ms,
        }
    }

    /// Position as a vector, dropping pressure and time
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Zero-area box at the origin
    pub const ZERO: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Exact min/max over a set of positions. Returns None for an empty set.
    pub fn from_positions<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }

    /// Grow the box to contain a position
    pub fn include(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Smallest box containing both
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

}

/// One continuous pen path: an ordered run of pressure-tagged points.
///
/// Immutable once committed to the canvas; the engine only ever builds new
/// strokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    /// RGBA color, linear 0..=1 per channel
    pub color: [f32; 4],
    /// Nominal pen diameter in pixels
    pub width: f32,
    pub origin: StrokeOrigin,
}

impl Stroke {
    /// A human-drawn stroke with default ink
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            color: [0.0, 0.0, 0.0, 1.0],
            width: DEFAULT_STROKE_WIDTH,
            origin: StrokeOrigin::Human,
        }
    }

    /// Exact min/max of this stroke's own points.
    ///
    /// Zero-area box at the origin for a pointless stroke (which validation
    /// rejects at ingestion anyway).
    pub fn bounds(&self) -> Bounds {
        Bounds::from_positions(self.points.iter().map(Point::pos)).unwrap_or(Bounds::ZERO)
    }

    /// Shift every point by an offset
    pub fn translate(&mut self, offset: Vec2) {
        for p in &mut self.points {
            p.x += offset.x;
            p.y += offset.y;
        }
    }
}

/// What a training key describes, by its character count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyKind {
    /// Single character
    Character,
    /// Two-character connected pair
    Ligature,
    /// Whole trained word
    Word,
}

impl KeyKind {
    /// Classify a training key by its character count
    pub fn of(key: &str) -> Self {
        match key.chars().count() {
            0 | 1 => Self::Character,
            2 => Self::Ligature,
            _ => Self::Word,
        }
    }
}

/// A captured training sample: all strokes for one variation of a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Character, ligature pair, or whole word
    pub key: String,
    /// Slot index; unique per key
    pub variation: usize,
    pub strokes: Vec<Stroke>,
}

impl TrainingSample {
    pub fn new(key: impl Into<String>, variation: usize, strokes: Vec<Stroke>) -> Self {
        Self {
            key: key.into(),
            variation,
            strokes,
        }
    }

    pub fn kind(&self) -> KeyKind {
        KeyKind::of(&self.key)
    }

    /// Union of all stroke bounds
    pub fn bounds(&self) -> Bounds {
        self.strokes
            .iter()
            .map(Stroke::bounds)
            .reduce(Bounds::union)
            .unwrap_or(Bounds::ZERO)
    }

    /// Letters written with a single unbroken pen path
    pub fn is_connected(&self) -> bool {
        self.strokes.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(coords: &[(f32, f32)]) -> Stroke {
        Stroke::new(
            coords
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Point::new(x, y, 0.5, i as u64 * 10))
                .collect(),
        )
    }

    #[test]
    fn test_stroke_bounds_exact_min_max() {
        let s = stroke(&[(10.0, 20.0), (30.0, 5.0), (25.0, 40.0)]);
        let b = s.bounds();
        assert_eq!(b.min, Vec2::new(10.0, 5.0));
        assert_eq!(b.max, Vec2::new(30.0, 40.0));
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Bounds::new(Vec2::new(5.0, -5.0), Vec2::new(20.0, 8.0));
        let u = a.union(b);
        assert_eq!(u.min, Vec2::new(0.0, -5.0));
        assert_eq!(u.max, Vec2::new(20.0, 10.0));
    }

    #[test]
    fn test_key_kind_by_char_count() {
        assert_eq!(KeyKind::of("a"), KeyKind::Character);
        assert_eq!(KeyKind::of("th"), KeyKind::Ligature);
        assert_eq!(KeyKind::of("the"), KeyKind::Word);
    }

    #[test]
    fn test_stroke_translate() {
        let mut s = stroke(&[(1.0, 2.0), (3.0, 4.0)]);
        s.translate(Vec2::new(10.0, -2.0));
        assert_eq!(s.points[0].x, 11.0);
        assert_eq!(s.points[0].y, 0.0);
        assert_eq!(s.points[1].x, 13.0);
        assert_eq!(s.points[1].y, 2.0);
    }

    #[test]
    fn test_sample_connectivity() {
        let connected = TrainingSample::new("th", 0, vec![stroke(&[(0.0, 0.0), (10.0, 0.0)])]);
        assert!(connected.is_connected());

        let lifted = TrainingSample::new(
            "th",
            1,
            vec![
                stroke(&[(0.0, 0.0), (5.0, 0.0)]),
                stroke(&[(8.0, 0.0), (12.0, 0.0)]),
            ],
        );
        assert!(!lifted.is_connected());
    }
}

//! Procedural fallback glyphs for untrained characters.
//!
//! When no trained sample exists for a character the synthesizer substitutes
//! a minimal stroke skeleton so synthesis never fails. Glyphs are built in a
//! local space with the baseline at y = 0 and y growing downward: the
//! x-height band spans -X_HEIGHT..0, ascenders reach above it and descenders
//! dip below.

use glam::Vec2;

use crate::constants::FALLBACK_X_HEIGHT;
use crate::types::{Point, Stroke};

const ASCENDER: f32 = FALLBACK_X_HEIGHT * 1.45;
const DESCENDER: f32 = FALLBACK_X_HEIGHT * 0.45;
/// Regular glyph advance width
const WIDTH: f32 = FALLBACK_X_HEIGHT * 0.6;
/// Width of narrow glyphs (i, l, punctuation)
const NARROW: f32 = FALLBACK_X_HEIGHT * 0.25;
/// Synthetic inter-point interval, ms
const DT_MS: u64 = 16;

/// Build the placeholder skeleton for one untrained character.
pub fn fallback_glyph(c: char) -> Vec<Stroke> {
    let x = FALLBACK_X_HEIGHT;
    match c {
        'i' => vec![
            line(Vec2::new(NARROW / 2.0, -x), Vec2::new(NARROW / 2.0, 0.0), 6, 0),
            dot(Vec2::new(NARROW / 2.0, -x * 1.3), 100),
        ],
        'l' => vec![line(
            Vec2::new(NARROW / 2.0, -ASCENDER),
            Vec2::new(NARROW / 2.0, 0.0),
            8,
            0,
        )],
        't' => vec![
            line(Vec2::new(WIDTH / 2.0, -ASCENDER * 0.9), Vec2::new(WIDTH / 2.0, 0.0), 8, 0),
            line(Vec2::new(0.0, -x * 0.9), Vec2::new(WIDTH, -x * 0.9), 4, 160),
        ],
        'b' | 'd' | 'f' | 'h' | 'k' => vec![
            line(Vec2::new(0.0, -ASCENDER), Vec2::new(0.0, 0.0), 8, 0),
            arc(Vec2::new(WIDTH * 0.4, -x / 2.0), WIDTH * 0.45, -90.0, 90.0, 8, 160),
        ],
        'g' | 'j' | 'p' | 'q' | 'y' => vec![
            arc(Vec2::new(WIDTH / 2.0, -x / 2.0), WIDTH * 0.45, 60.0, 300.0, 8, 0),
            line(Vec2::new(WIDTH * 0.9, -x / 2.0), Vec2::new(WIDTH * 0.9, DESCENDER), 6, 160),
        ],
        '.' => vec![dot(Vec2::new(NARROW / 2.0, 0.0), 0)],
        ',' => vec![line(
            Vec2::new(NARROW / 2.0, 0.0),
            Vec2::new(0.0, DESCENDER * 0.6),
            4,
            0,
        )],
        '!' => vec![
            line(Vec2::new(NARROW / 2.0, -ASCENDER), Vec2::new(NARROW / 2.0, -x * 0.3), 6, 0),
            dot(Vec2::new(NARROW / 2.0, 0.0), 120),
        ],
        '?' => vec![
            arc(Vec2::new(WIDTH / 2.0, -ASCENDER * 0.7), WIDTH * 0.45, 180.0, 400.0, 8, 0),
            dot(Vec2::new(WIDTH / 2.0, 0.0), 160),
        ],
        '-' => vec![line(Vec2::new(0.0, -x / 2.0), Vec2::new(WIDTH, -x / 2.0), 4, 0)],
        c if c.is_ascii_digit() => vec![
            arc(Vec2::new(WIDTH / 2.0, -x * 0.75), WIDTH * 0.4, 180.0, 360.0, 6, 0),
            line(Vec2::new(WIDTH * 0.9, -x * 0.75), Vec2::new(WIDTH * 0.9, 0.0), 6, 120),
        ],
        // Generic letter skeleton: an open bowl spanning the x-height band
        _ => vec![arc(Vec2::new(WIDTH / 2.0, -x / 2.0), WIDTH * 0.48, 45.0, 315.0, 10, 0)],
    }
}

/// Straight segment with evenly spaced points.
fn line(from: Vec2, to: Vec2, n: usize, t0: u64) -> Stroke {
    let n = n.max(2);
    let points = (0..n)
        .map(|i| {
            let t = i as f32 / (n - 1) as f32;
            let p = from.lerp(to, t);
            Point::new(p.x, p.y, 0.5, t0 + i as u64 * DT_MS)
        })
        .collect();
    Stroke::new(points)
}

/// Circular arc, angles in degrees measured clockwise from the +x axis
/// (canvas y grows down).
fn arc(center: Vec2, radius: f32, start_deg: f32, end_deg: f32, n: usize, t0: u64) -> Stroke {
    let n = n.max(2);
    let points = (0..n)
        .map(|i| {
            let t = i as f32 / (n - 1) as f32;
            let a = (start_deg + (end_deg - start_deg) * t).to_radians();
            Point::new(
                center.x + radius * a.cos(),
                center.y + radius * a.sin(),
                0.5,
                t0 + i as u64 * DT_MS,
            )
        })
        .collect();
    Stroke::new(points)
}

/// Minimal two-point mark used for dots on i, punctuation.
fn dot(at: Vec2, t0: u64) -> Stroke {
    Stroke::new(vec![
        Point::new(at.x, at.y, 0.5, t0),
        Point::new(at.x + 0.8, at.y + 0.4, 0.5, t0 + DT_MS),
    ])
}

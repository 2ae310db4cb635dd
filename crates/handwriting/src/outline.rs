//! Pressure-weighted stroke outline rendering.
//!
//! Converts a point+pressure stream into a closed filled polygon with
//! variable width, instead of naive point-to-point segments. Rendering is
//! deterministic for identical input: all handwriting variation originates
//! upstream in the synthesizer, and this function is safe to call once per
//! animation frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::types::{Point, Stroke};

/// Segments used for a round end cap
const CAP_SEGMENTS: usize = 8;
/// Segments used for the degenerate-input dot polygon
const DOT_SEGMENTS: usize = 16;
/// Smallest half-width the outline ever collapses to, pixels
const MIN_RADIUS: f32 = 0.1;

/// Outline rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlineParams {
    /// How strongly low pressure narrows the line, 0..=1
    pub thinning: f32,
    /// Curve-fit strength applied to the path before offsetting, 0..=1
    pub smoothing: f32,
    /// Input decimation strength, suppressing micro-jitter, 0..=1
    pub streamline: f32,
    /// Round cap at the stroke start
    pub cap_start: bool,
    /// Round cap at the stroke end
    pub cap_end: bool,
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self {
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
            cap_start: true,
            cap_end: true,
        }
    }
}

/// One outline polygon vertex, laid out for direct GPU upload.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(C)]
pub struct OutlineVertex {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for OutlineVertex {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// A closed filled polygon outlining one stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Outline {
    /// Closed loop; the last vertex implicitly connects to the first
    pub vertices: Vec<OutlineVertex>,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Raw vertex bytes for vertex-buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Render a stroke into a pressure-weighted filled outline.
///
/// Degenerate input (no points, a single point, or a stroke whose points
/// collapse to one position) renders a minimal dot rather than erroring.
pub fn render_outline(stroke: &Stroke, params: &OutlineParams) -> Outline {
    let path = streamline_path(&stroke.points, params.streamline, stroke.width);

    match path.len() {
        0 => Outline::default(),
        1 => dot(path[0].0, radius_for(stroke.width, path[0].1, params.thinning)),
        _ => ribbon(&path, stroke.width, params),
    }
}

/// Half-width of the outline at a given pressure.
fn radius_for(width: f32, pressure: f32, thinning: f32) -> f32 {
    let thinning = thinning.clamp(0.0, 1.0);
    (width / 2.0 * (1.0 - thinning * (1.0 - pressure))).max(MIN_RADIUS)
}

/// Exponential-follower pass plus minimum-distance decimation.
///
/// The follower trails the raw input, filtering micro-jitter; points that
/// barely move are dropped entirely. Duplicate positions are always dropped
/// so downstream tangents stay well-defined. The true final input position
/// is kept so the stroke reaches its end.
fn streamline_path(points: &[Point], streamline: f32, width: f32) -> Vec<(Vec2, f32)> {
    let streamline = streamline.clamp(0.0, 1.0);
    let follow = 1.0 - 0.75 * streamline;
    let min_dist = width * 0.15 * streamline;

    let mut out: Vec<(Vec2, f32)> = Vec::with_capacity(points.len());
    for p in points {
        match out.last() {
            None => out.push((p.pos(), p.pressure)),
            Some(&(prev, _)) => {
                let followed = prev.lerp(p.pos(), follow);
                if followed.distance(prev) > min_dist.max(f32::EPSILON) {
                    out.push((followed, p.pressure));
                }
            }
        }
    }

    // Snap the final point to the true input end
    let out_len = out.len();
    if let (Some(last_in), Some(last_out)) = (points.last(), out.last_mut()) {
        if out_len > 1 {
            last_out.0 = last_in.pos();
            last_out.1 = last_in.pressure;
        }
    }

    out
}

/// Build the closed polygon: left rib forward, end cap, right rib backward,
/// start cap.
fn ribbon(path: &[(Vec2, f32)], width: f32, params: &OutlineParams) -> Outline {
    let positions = smooth_positions(path, params.smoothing);
    let n = positions.len();

    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    let mut last_dir = Vec2::X;

    for i in 0..n {
        let dir = match i {
            0 => positions[1] - positions[0],
            _ if i == n - 1 => positions[n - 1] - positions[n - 2],
            _ => positions[i + 1] - positions[i - 1],
        };
        let dir = if dir.length_squared() > f32::EPSILON {
            dir.normalize()
        } else {
            last_dir
        };
        last_dir = dir;

        let perp = Vec2::new(-dir.y, dir.x);
        let r = radius_for(width, path[i].1, params.thinning);
        left.push(positions[i] + perp * r);
        right.push(positions[i] - perp * r);
    }

    let mut vertices: Vec<OutlineVertex> = Vec::with_capacity(2 * n + 2 * CAP_SEGMENTS);
    vertices.extend(left.iter().copied().map(OutlineVertex::from));

    // End cap: sweep from the left rib around the tip to the right rib
    let end_r = radius_for(width, path[n - 1].1, params.thinning);
    if params.cap_end {
        let end_perp = (left[n - 1] - positions[n - 1]).normalize_or_zero();
        arc_into(&mut vertices, positions[n - 1], end_r, end_perp);
    }

    vertices.extend(right.iter().rev().copied().map(OutlineVertex::from));

    // Start cap: sweep from the right rib back around to the left rib
    let start_r = radius_for(width, path[0].1, params.thinning);
    if params.cap_start {
        let start_perp = (right[0] - positions[0]).normalize_or_zero();
        arc_into(&mut vertices, positions[0], start_r, start_perp);
    }

    Outline { vertices }
}

/// One relaxation pass pulling interior points toward their neighbors'
/// midpoint; endpoints stay anchored.
fn smooth_positions(path: &[(Vec2, f32)], smoothing: f32) -> Vec<Vec2> {
    let smoothing = smoothing.clamp(0.0, 1.0);
    let mut positions: Vec<Vec2> = path.iter().map(|&(p, _)| p).collect();
    if smoothing == 0.0 || positions.len() < 3 {
        return positions;
    }
    let source = positions.clone();
    for i in 1..source.len() - 1 {
        let midpoint = (source[i - 1] + source[i + 1]) / 2.0;
        positions[i] = source[i].lerp(midpoint, 0.5 * smoothing);
    }
    positions
}

/// Append a semicircular cap sweeping clockwise (in canvas coordinates) from
/// `from_dir` half-way around `center`, excluding both endpoints.
fn arc_into(vertices: &mut Vec<OutlineVertex>, center: Vec2, radius: f32, from_dir: Vec2) {
    if from_dir == Vec2::ZERO {
        return;
    }
    let start_angle = from_dir.y.atan2(from_dir.x);
    for k in 1..CAP_SEGMENTS {
        let angle = start_angle - std::f32::consts::PI * k as f32 / CAP_SEGMENTS as f32;
        let v = center + radius * Vec2::new(angle.cos(), angle.sin());
        vertices.push(v.into());
    }
}

/// Minimal dot polygon for degenerate input.
fn dot(center: Vec2, radius: f32) -> Outline {
    let vertices = (0..DOT_SEGMENTS)
        .map(|k| {
            let angle = std::f32::consts::TAU * k as f32 / DOT_SEGMENTS as f32;
            (center + radius * Vec2::new(angle.cos(), angle.sin())).into()
        })
        .collect();
    Outline { vertices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke_with_pressure(coords: &[(f32, f32)], pressure: f32) -> Stroke {
        Stroke::new(
            coords
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Point::new(x, y, pressure, i as u64 * 16))
                .collect(),
        )
    }

    fn outline_height(outline: &Outline) -> f32 {
        let ys: Vec<f32> = outline.vertices.iter().map(|v| v.y).collect();
        ys.iter().copied().fold(f32::NEG_INFINITY, f32::max)
            - ys.iter().copied().fold(f32::INFINITY, f32::min)
    }

    #[test]
    fn test_render_is_deterministic() {
        let stroke = stroke_with_pressure(&[(0.0, 0.0), (20.0, 5.0), (40.0, 0.0)], 0.7);
        let params = OutlineParams::default();
        assert_eq!(render_outline(&stroke, &params), render_outline(&stroke, &params));
    }

    #[test]
    fn test_single_point_renders_a_dot() {
        let stroke = stroke_with_pressure(&[(10.0, 10.0)], 0.5);
        let outline = render_outline(&stroke, &OutlineParams::default());
        assert_eq!(outline.len(), DOT_SEGMENTS);
    }

    #[test]
    fn test_zero_length_stroke_renders_a_dot() {
        let stroke = stroke_with_pressure(&[(10.0, 10.0), (10.0, 10.0), (10.0, 10.0)], 0.5);
        let outline = render_outline(&stroke, &OutlineParams::default());
        assert_eq!(outline.len(), DOT_SEGMENTS);
    }

    #[test]
    fn test_empty_stroke_renders_nothing() {
        let stroke = Stroke::new(vec![]);
        assert!(render_outline(&stroke, &OutlineParams::default()).is_empty());
    }

    #[test]
    fn test_pressure_narrows_the_outline() {
        let params = OutlineParams {
            thinning: 1.0,
            smoothing: 0.0,
            streamline: 0.0,
            cap_start: false,
            cap_end: false,
        };
        let light = stroke_with_pressure(&[(0.0, 0.0), (50.0, 0.0)], 0.1);
        let heavy = stroke_with_pressure(&[(0.0, 0.0), (50.0, 0.0)], 1.0);

        assert!(
            outline_height(&render_outline(&light, &params))
                < outline_height(&render_outline(&heavy, &params))
        );
    }

    #[test]
    fn test_caps_add_vertices() {
        let stroke = stroke_with_pressure(&[(0.0, 0.0), (50.0, 0.0)], 0.5);
        let without = OutlineParams {
            cap_start: false,
            cap_end: false,
            ..Default::default()
        };
        let with = OutlineParams::default();

        assert!(
            render_outline(&stroke, &with).len() > render_outline(&stroke, &without).len()
        );
    }

    #[test]
    fn test_streamline_decimates_dense_jitter() {
        let coords: Vec<(f32, f32)> = (0..200)
            .map(|i| (i as f32 * 0.05, if i % 2 == 0 { 0.02 } else { -0.02 }))
            .collect();
        let stroke = stroke_with_pressure(&coords, 0.5);

        let raw = OutlineParams {
            streamline: 0.0,
            ..Default::default()
        };
        let streamlined = OutlineParams {
            streamline: 1.0,
            ..Default::default()
        };

        assert!(
            render_outline(&stroke, &streamlined).len() < render_outline(&stroke, &raw).len()
        );
    }

    #[test]
    fn test_vertex_bytes_are_gpu_uploadable() {
        let stroke = stroke_with_pressure(&[(0.0, 0.0), (50.0, 0.0)], 0.5);
        let outline = render_outline(&stroke, &OutlineParams::default());
        assert_eq!(
            outline.as_bytes().len(),
            outline.len() * std::mem::size_of::<OutlineVertex>()
        );
    }
}

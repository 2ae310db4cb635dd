//! Canvas placement for synthesized text blocks.
//!
//! Decides where on the infinite canvas a new block lands relative to
//! existing content, resolves overlaps, and hands out per-line positions for
//! multi-line responses.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{DEFAULT_ORIGIN, PLACEMENT_PADDING};
use crate::types::Bounds;

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_bounds(bounds: Bounds) -> Self {
        Self {
            x: bounds.min.x,
            y: bounds.min.y,
            w: bounds.width(),
            h: bounds.height(),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Rectangle grown by `pad` on every side
    pub fn expand(&self, pad: f32) -> Self {
        Self {
            x: self.x - pad,
            y: self.y - pad,
            w: self.w + 2.0 * pad,
            h: self.h + 2.0 * pad,
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Role of a region of existing canvas content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionRole {
    /// The user's current selection
    Selection,
    /// A previously placed AI response block
    AiResponse,
    /// Any other committed content
    Content,
}

/// A bounding box of existing canvas content, used to avoid overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementRegion {
    pub rect: Rect,
    pub role: RegionRole,
}

impl PlacementRegion {
    pub fn new(rect: Rect, role: RegionRole) -> Self {
        Self { rect, role }
    }
}

/// Choose where the next synthesized block of size `block` should land.
///
/// Priority: below the current selection, else below the last AI response
/// (stacking conversation turns vertically), else below the lowest existing
/// region, else the fixed default origin. The candidate is then pushed
/// downward out of any overlap and clamped to stay within `canvas`.
pub fn place_next(
    existing: &[PlacementRegion],
    last_selection: Option<Rect>,
    last_ai_response: Option<Rect>,
    canvas: Vec2,
    margin: f32,
    block: Vec2,
) -> Vec2 {
    let anchor = if let Some(selection) = last_selection {
        Vec2::new(selection.x, selection.bottom() + margin)
    } else if let Some(response) = last_ai_response {
        Vec2::new(response.x, response.bottom() + margin)
    } else if let Some(lowest) = existing
        .iter()
        .map(|r| r.rect)
        .max_by(|a, b| a.bottom().total_cmp(&b.bottom()))
    {
        Vec2::new(lowest.x, lowest.bottom() + margin)
    } else {
        return clamp_to_canvas(Vec2::new(DEFAULT_ORIGIN.0, DEFAULT_ORIGIN.1), canvas, block);
    };

    let placed = resolve_overlap(anchor, existing, canvas, margin, block);
    clamp_to_canvas(placed, canvas, block)
}

/// Push the candidate downward in margin-sized steps until it clears every
/// padding-expanded region; fall back to a margin-pitch grid scan when the
/// canvas bottom is reached.
fn resolve_overlap(
    anchor: Vec2,
    existing: &[PlacementRegion],
    canvas: Vec2,
    margin: f32,
    block: Vec2,
) -> Vec2 {
    let step = margin.max(1.0);

    let mut candidate = Rect::new(anchor.x, anchor.y, block.x, block.y);
    while candidate.bottom() <= canvas.y {
        if is_free(&candidate, existing) {
            return Vec2::new(candidate.x, candidate.y);
        }
        candidate.y += step;
    }

    // Downward search ran off the canvas: scan a grid for any free cell
    debug!("placement fell back to grid scan for {}x{} block", block.x, block.y);
    let mut y = step;
    while y + block.y <= canvas.y {
        let mut x = step;
        while x + block.x <= canvas.x {
            let cell = Rect::new(x, y, block.x, block.y);
            if is_free(&cell, existing) {
                return Vec2::new(x, y);
            }
            x += step;
        }
        y += step;
    }

    // Crowded canvas: keep the anchor and let clamping settle it
    anchor
}

fn is_free(candidate: &Rect, existing: &[PlacementRegion]) -> bool {
    existing
        .iter()
        .all(|r| !candidate.intersects(&r.rect.expand(PLACEMENT_PADDING)))
}

fn clamp_to_canvas(pos: Vec2, canvas: Vec2, block: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, (canvas.x - block.x).max(0.0)),
        pos.y.clamp(0.0, (canvas.y - block.y).max(0.0)),
    )
}

/// Lazy per-line positions for a multi-line block.
///
/// Line positions are computed one at a time as the synthesizer consumes
/// them, so a long response never has to be measured up front.
#[derive(Debug, Clone)]
pub struct LineFlow {
    start: Vec2,
    line_height: f32,
    available_width: f32,
    next_line: usize,
}

impl LineFlow {
    pub fn new(start: Vec2, line_height: f32, available_width: f32) -> Self {
        Self {
            start,
            line_height,
            available_width,
            next_line: 0,
        }
    }

    /// Width available for wrapping each line
    pub fn available_width(&self) -> f32 {
        self.available_width
    }

    /// Position of the next line's left edge
    pub fn next_line(&mut self) -> Vec2 {
        let pos = Vec2::new(
            self.start.x,
            self.start.y + self.next_line as f32 * self.line_height,
        );
        self.next_line += 1;
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Vec2 = Vec2::new(800.0, 600.0);
    const BLOCK: Vec2 = Vec2::new(200.0, 40.0);

    fn region(x: f32, y: f32, w: f32, h: f32) -> PlacementRegion {
        PlacementRegion::new(Rect::new(x, y, w, h), RegionRole::Content)
    }

    #[test]
    fn test_rect_from_bounds() {
        let bounds = Bounds::new(Vec2::new(10.0, 20.0), Vec2::new(60.0, 50.0));
        assert_eq!(Rect::from_bounds(bounds), Rect::new(10.0, 20.0, 50.0, 30.0));
    }

    #[test]
    fn test_empty_canvas_uses_default_origin() {
        let pos = place_next(&[], None, None, CANVAS, 40.0, BLOCK);
        assert_eq!(pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_selection_takes_priority() {
        let selection = Rect::new(100.0, 200.0, 150.0, 30.0);
        let response = Rect::new(400.0, 400.0, 150.0, 30.0);
        let pos = place_next(&[], Some(selection), Some(response), CANVAS, 40.0, BLOCK);
        assert_eq!(pos, Vec2::new(100.0, 230.0 + 40.0));
    }

    #[test]
    fn test_stacks_below_last_ai_response() {
        let response = Rect::new(60.0, 100.0, 150.0, 30.0);
        let pos = place_next(&[], None, Some(response), CANVAS, 40.0, BLOCK);
        assert_eq!(pos, Vec2::new(60.0, 170.0));
    }

    #[test]
    fn test_places_below_lowest_region() {
        let existing = [region(50.0, 50.0, 200.0, 40.0)];
        let pos = place_next(&existing, None, None, CANVAS, 40.0, BLOCK);
        assert_eq!(pos.x, 50.0);
        assert!(pos.y >= 130.0);
    }

    #[test]
    fn test_never_intersects_existing_regions() {
        let existing = [
            region(50.0, 50.0, 200.0, 40.0),
            region(50.0, 130.0, 200.0, 40.0),
            region(50.0, 210.0, 200.0, 40.0),
        ];
        let pos = place_next(&existing, None, None, CANVAS, 40.0, BLOCK);
        let placed = Rect::new(pos.x, pos.y, BLOCK.x, BLOCK.y);
        for r in &existing {
            assert!(!placed.intersects(&r.rect.expand(PLACEMENT_PADDING)));
        }
    }

    #[test]
    fn test_result_stays_within_canvas() {
        let low = Rect::new(700.0, 580.0, 90.0, 15.0);
        let pos = place_next(&[], None, Some(low), CANVAS, 40.0, BLOCK);
        assert!(pos.x >= 0.0 && pos.x + BLOCK.x <= CANVAS.x);
        assert!(pos.y >= 0.0 && pos.y + BLOCK.y <= CANVAS.y);
    }

    #[test]
    fn test_grid_fallback_finds_a_free_cell() {
        // Wall of content straight down the anchor column
        let existing: Vec<PlacementRegion> = (0..15)
            .map(|i| region(40.0, i as f32 * 40.0, 300.0, 40.0))
            .collect();
        let pos = place_next(&existing, None, None, CANVAS, 40.0, BLOCK);
        let placed = Rect::new(pos.x, pos.y, BLOCK.x, BLOCK.y);
        for r in &existing {
            assert!(!placed.intersects(&r.rect.expand(PLACEMENT_PADDING)));
        }
    }

    #[test]
    fn test_line_flow_is_lazy_and_even() {
        let mut flow = LineFlow::new(Vec2::new(50.0, 100.0), 64.0, 500.0);
        assert_eq!(flow.next_line(), Vec2::new(50.0, 100.0));
        assert_eq!(flow.next_line(), Vec2::new(50.0, 164.0));
        assert_eq!(flow.next_line(), Vec2::new(50.0, 228.0));
        assert_eq!(flow.available_width(), 500.0);
    }
}

//! Pointer input normalization.
//!
//! Raw pointer/touch events arrive with mixed shapes depending on the device;
//! the device class is resolved exactly once here into [`DeviceKind`] and no
//! downstream code ever inspects a raw event again. The normalizer also
//! applies palm rejection: while a pen contact is down, stray touch contacts
//! are discarded.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::DEFAULT_PRESSURE;
use crate::types::Point;

/// Input device class, resolved once at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum DeviceKind {
    Pen = 0,
    Touch = 1,
    Mouse = 2,
}

impl DeviceKind {
    /// Map a raw `pointerType` descriptor string. Unknown descriptors fall
    /// back to Mouse, which is always accepted as drawing input.
    pub fn from_pointer_type(raw: &str) -> Self {
        match raw {
            "pen" => Self::Pen,
            "touch" => Self::Touch,
            _ => Self::Mouse,
        }
    }
}

/// Phase of a pointer contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactPhase {
    Down,
    Move,
    Up,
}

/// One raw pointer event as delivered by the platform shell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPointerEvent {
    pub x: f32,
    pub y: f32,
    /// None when the device does not report pressure
    pub pressure: Option<f32>,
    pub device: DeviceKind,
    pub phase: ContactPhase,
    /// Platform contact identifier, stable for the lifetime of one contact
    pub contact_id: u64,
    pub timestamp_ms: u64,
}

/// Pure point mapping: clamp pressure, substitute the device default when
/// pressure is unreported.
pub fn normalize_point(event: &RawPointerEvent) -> Point {
    let pressure = match event.pressure {
        Some(p) if p.is_finite() => p.clamp(0.0, 1.0),
        _ => DEFAULT_PRESSURE,
    };
    Point::new(event.x, event.y, pressure, event.timestamp_ms)
}

/// Stateful event gate in front of [`normalize_point`].
///
/// Tracks which pen contacts are currently down so touch contacts can be
/// rejected as palm input while the pen is active. A touch contact is only
/// accepted as drawing input when no pen contact is concurrently down.
#[derive(Debug, Default)]
pub struct InputNormalizer {
    active_pens: HashSet<u64>,
}

impl InputNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while at least one pen contact is down
    pub fn pen_active(&self) -> bool {
        !self.active_pens.is_empty()
    }

    /// Accept or reject one raw event, returning the normalized point for
    /// accepted drawing input.
    pub fn accept(&mut self, event: &RawPointerEvent) -> Option<Point> {
        match event.device {
            DeviceKind::Pen => {
                match event.phase {
                    ContactPhase::Down => {
                        self.active_pens.insert(event.contact_id);
                    }
                    ContactPhase::Up => {
                        self.active_pens.remove(&event.contact_id);
                    }
                    ContactPhase::Move => {}
                }
                Some(normalize_point(event))
            }
            DeviceKind::Touch => {
                if self.pen_active() {
                    debug!(
                        "palm rejection: discarding touch contact {} while pen is down",
                        event.contact_id
                    );
                    None
                } else {
                    Some(normalize_point(event))
                }
            }
            DeviceKind::Mouse => Some(normalize_point(event)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(device: DeviceKind, phase: ContactPhase, contact_id: u64) -> RawPointerEvent {
        RawPointerEvent {
            x: 10.0,
            y: 20.0,
            pressure: Some(0.8),
            device,
            phase,
            contact_id,
            timestamp_ms: 100,
        }
    }

    #[test]
    fn test_device_kind_resolution() {
        assert_eq!(DeviceKind::from_pointer_type("pen"), DeviceKind::Pen);
        assert_eq!(DeviceKind::from_pointer_type("touch"), DeviceKind::Touch);
        assert_eq!(DeviceKind::from_pointer_type("mouse"), DeviceKind::Mouse);
        assert_eq!(DeviceKind::from_pointer_type("???"), DeviceKind::Mouse);
    }

    #[test]
    fn test_pressure_default_and_clamp() {
        let mut e = event(DeviceKind::Mouse, ContactPhase::Move, 1);
        e.pressure = None;
        assert_eq!(normalize_point(&e).pressure, DEFAULT_PRESSURE);

        e.pressure = Some(3.0);
        assert_eq!(normalize_point(&e).pressure, 1.0);

        e.pressure = Some(-0.5);
        assert_eq!(normalize_point(&e).pressure, 0.0);

        e.pressure = Some(f32::NAN);
        assert_eq!(normalize_point(&e).pressure, DEFAULT_PRESSURE);
    }

    #[test]
    fn test_palm_rejection_while_pen_down() {
        let mut normalizer = InputNormalizer::new();

        assert!(normalizer
            .accept(&event(DeviceKind::Pen, ContactPhase::Down, 1))
            .is_some());

        // Concurrent touch is a palm: discarded
        assert!(normalizer
            .accept(&event(DeviceKind::Touch, ContactPhase::Down, 2))
            .is_none());

        assert!(normalizer
            .accept(&event(DeviceKind::Pen, ContactPhase::Up, 1))
            .is_some());

        // Pen lifted: touch becomes drawing input again
        assert!(normalizer
            .accept(&event(DeviceKind::Touch, ContactPhase::Move, 2))
            .is_some());
    }

    #[test]
    fn test_mouse_unaffected_by_pen_state() {
        let mut normalizer = InputNormalizer::new();
        normalizer.accept(&event(DeviceKind::Pen, ContactPhase::Down, 1));
        assert!(normalizer
            .accept(&event(DeviceKind::Mouse, ContactPhase::Move, 3))
            .is_some());
    }
}

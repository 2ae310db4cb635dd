//! Geometry validation for training-sample ingestion.
//!
//! Samples that fail these checks are rejected at the store boundary and
//! never persisted; the training UI surfaces the error so the user can
//! redo the capture.

use thiserror::Error;

use crate::types::{Stroke, TrainingSample};

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("sample has no strokes")]
    NoStrokes,
    #[error("stroke {stroke} has no points")]
    EmptyStroke { stroke: usize },
    #[error("non-finite coordinate at stroke {stroke}, point {point}")]
    NonFiniteCoordinate { stroke: usize, point: usize },
    #[error("pressure {value} outside 0..=1 at stroke {stroke}, point {point}")]
    PressureOutOfRange {
        stroke: usize,
        point: usize,
        value: f32,
    },
    #[error("timestamp goes backwards at stroke {stroke}, point {point}")]
    NonMonotonicTimestamp { stroke: usize, point: usize },
    #[error("variation {variation} exceeds the {slots} slots per key")]
    VariationOutOfRange { variation: usize, slots: usize },
}

/// Validate a single stroke's geometry.
///
/// `stroke` is the stroke's index within its sample, used for error context.
pub fn validate_stroke(stroke: usize, s: &Stroke) -> Result<(), SampleError> {
    if s.points.is_empty() {
        return Err(SampleError::EmptyStroke { stroke });
    }

    let mut last_ts = 0u64;
    for (point, p) in s.points.iter().enumerate() {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(SampleError::NonFiniteCoordinate { stroke, point });
        }
        if !p.pressure.is_finite() || !(0.0..=1.0).contains(&p.pressure) {
            return Err(SampleError::PressureOutOfRange {
                stroke,
                point,
                value: p.pressure,
            });
        }
        // Timestamps must be non-decreasing within a stroke
        if point > 0 && p.timestamp_ms < last_ts {
            return Err(SampleError::NonMonotonicTimestamp { stroke, point });
        }
        last_ts = p.timestamp_ms;
    }

    Ok(())
}

/// Validate every stroke in a training sample.
pub fn validate_sample(sample: &TrainingSample) -> Result<(), SampleError> {
    if sample.strokes.is_empty() {
        return Err(SampleError::NoStrokes);
    }
    for (i, s) in sample.strokes.iter().enumerate() {
        validate_stroke(i, s)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn sample_with(points: Vec<Point>) -> TrainingSample {
        TrainingSample::new("a", 0, vec![Stroke::new(points)])
    }

    #[test]
    fn test_valid_sample_passes() {
        let sample = sample_with(vec![
            Point::new(0.0, 0.0, 0.4, 0),
            Point::new(1.0, 2.0, 0.6, 10),
            Point::new(2.0, 3.0, 0.5, 10),
        ]);
        assert!(validate_sample(&sample).is_ok());
    }

    #[test]
    fn test_rejects_nan_coordinate() {
        let sample = sample_with(vec![
            Point::new(0.0, 0.0, 0.5, 0),
            Point::new(f32::NAN, 1.0, 0.5, 10),
        ]);
        assert!(matches!(
            validate_sample(&sample),
            Err(SampleError::NonFiniteCoordinate { stroke: 0, point: 1 })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_pressure() {
        let sample = sample_with(vec![Point::new(0.0, 0.0, 1.5, 0)]);
        assert!(matches!(
            validate_sample(&sample),
            Err(SampleError::PressureOutOfRange { .. })
        ));
    }

    #[test]
    fn test_rejects_backwards_timestamps() {
        let sample = sample_with(vec![
            Point::new(0.0, 0.0, 0.5, 100),
            Point::new(1.0, 1.0, 0.5, 50),
        ]);
        assert!(matches!(
            validate_sample(&sample),
            Err(SampleError::NonMonotonicTimestamp { .. })
        ));
    }

    #[test]
    fn test_rejects_empty() {
        let sample = TrainingSample::new("a", 0, vec![]);
        assert!(matches!(validate_sample(&sample), Err(SampleError::NoStrokes)));

        let sample = TrainingSample::new("a", 0, vec![Stroke::new(vec![])]);
        assert!(matches!(
            validate_sample(&sample),
            Err(SampleError::EmptyStroke { stroke: 0 })
        ));
    }
}

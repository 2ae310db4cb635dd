//! In-memory keyed collection of validated training samples.
//!
//! The library is both the store's local cache and the synthesizer's lookup
//! structure. Every insert runs geometry validation, so downstream code can
//! assume well-formed strokes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::DEFAULT_VARIATIONS_PER_KEY;
use crate::types::TrainingSample;
use crate::validation::{validate_sample, SampleError};

/// Keyed collection of training samples with a fixed number of variation
/// slots per key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleLibrary {
    variations_per_key: usize,
    samples: HashMap<String, Vec<TrainingSample>>,
}

impl Default for SampleLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleLibrary {
    pub fn new() -> Self {
        Self::with_variations(DEFAULT_VARIATIONS_PER_KEY)
    }

    /// Library with a custom number of variation slots per key
    pub fn with_variations(variations_per_key: usize) -> Self {
        Self {
            variations_per_key: variations_per_key.max(1),
            samples: HashMap::new(),
        }
    }

    pub fn variations_per_key(&self) -> usize {
        self.variations_per_key
    }

    /// Validate and insert a sample, overwriting any sample already in the
    /// same (key, variation) slot.
    pub fn insert(&mut self, sample: TrainingSample) -> Result<(), SampleError> {
        if sample.variation >= self.variations_per_key {
            return Err(SampleError::VariationOutOfRange {
                variation: sample.variation,
                slots: self.variations_per_key,
            });
        }
        if let Err(e) = validate_sample(&sample) {
            warn!("rejected training sample for key {:?}: {}", sample.key, e);
            return Err(e);
        }

        let slots = self.samples.entry(sample.key.clone()).or_default();
        match slots.iter_mut().find(|s| s.variation == sample.variation) {
            Some(slot) => *slot = sample,
            None => slots.push(sample),
        }
        Ok(())
    }

    /// All stored variations for a key, empty if untrained
    pub fn samples(&self, key: &str) -> &[TrainingSample] {
        self.samples.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.samples.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    /// Every sample across all keys
    pub fn iter(&self) -> impl Iterator<Item = &TrainingSample> {
        self.samples.values().flatten()
    }

    /// Total stored samples across all keys
    pub fn sample_count(&self) -> usize {
        self.samples.values().map(Vec::len).sum()
    }

    pub fn key_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop every sample. Used on retrain, which replaces the set wholesale.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

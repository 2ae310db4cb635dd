//! Remote keyed sample store contract.

use std::collections::HashMap;

use handwriting::TrainingSample;
use tokio::sync::RwLock;

use crate::SyncError;

/// Contract the engine expects from remote sample persistence.
///
/// The backing service is only reachable while the user is authenticated;
/// callers bound every await with a timeout and fall back to the local
/// cache, so implementations are free to fail fast.
#[allow(async_fn_in_trait)]
pub trait RemoteSampleStore {
    /// All stored variations for a key
    async fn get(&self, key: &str) -> Result<Vec<TrainingSample>, SyncError>;

    /// Insert or overwrite one (key, variation) slot
    async fn put(&self, key: &str, sample: &TrainingSample) -> Result<(), SyncError>;

    /// Wipe every sample for this user
    async fn delete_all(&self) -> Result<(), SyncError>;
}

/// In-process remote store used by tests and offline development.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    samples: RwLock<HashMap<String, Vec<TrainingSample>>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total stored samples across all keys
    pub async fn sample_count(&self) -> usize {
        self.samples.read().await.values().map(Vec::len).sum()
    }
}

impl RemoteSampleStore for MemoryRemote {
    async fn get(&self, key: &str) -> Result<Vec<TrainingSample>, SyncError> {
        Ok(self.samples.read().await.get(key).cloned().unwrap_or_default())
    }

    async fn put(&self, key: &str, sample: &TrainingSample) -> Result<(), SyncError> {
        let mut samples = self.samples.write().await;
        let slots = samples.entry(key.to_string()).or_default();
        match slots.iter_mut().find(|s| s.variation == sample.variation) {
            Some(slot) => *slot = sample.clone(),
            None => slots.push(sample.clone()),
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), SyncError> {
        self.samples.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handwriting::{Point, Stroke};

    fn sample(key: &str, variation: usize) -> TrainingSample {
        TrainingSample::new(
            key,
            variation,
            vec![Stroke::new(vec![
                Point::new(0.0, 0.0, 0.5, 0),
                Point::new(10.0, 0.0, 0.5, 16),
            ])],
        )
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let remote = MemoryRemote::new();
        remote.put("a", &sample("a", 0)).await.unwrap();
        remote.put("a", &sample("a", 1)).await.unwrap();

        assert_eq!(remote.get("a").await.unwrap().len(), 2);
        assert!(remote.get("b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_overwrites_slot() {
        let remote = MemoryRemote::new();
        remote.put("a", &sample("a", 0)).await.unwrap();
        remote.put("a", &sample("a", 0)).await.unwrap();
        assert_eq!(remote.sample_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_all() {
        let remote = MemoryRemote::new();
        remote.put("a", &sample("a", 0)).await.unwrap();
        remote.delete_all().await.unwrap();
        assert_eq!(remote.sample_count().await, 0);
    }
}

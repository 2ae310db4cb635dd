//! Local-first sample store with queued remote sync.

use std::collections::VecDeque;
use std::sync::RwLock;
use std::time::Duration;

use handwriting::{
    compute_profile, SampleError, SampleLibrary, Stroke, StyleProfile, TrainingSample,
};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::remote::RemoteSampleStore;
use crate::MemoryRemote;

/// How long a remote read may stall before the local cache answers instead
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Training sample store: immediate local cache plus a serialized queue of
/// remote writes.
///
/// One store instance belongs to one user, so the queue doubles as the
/// per-user write serialization required during a training burst. The
/// derived style profile is cached behind a dirty flag and only recomputed
/// on demand after the sample set changed.
pub struct SampleStore<R> {
    library: RwLock<SampleLibrary>,
    remote: Option<R>,
    authenticated: bool,
    read_timeout: Duration,
    /// Samples awaiting remote sync, oldest first
    pending: Mutex<VecDeque<TrainingSample>>,
    profile: RwLock<ProfileCache>,
}

struct ProfileCache {
    cached: StyleProfile,
    dirty: bool,
}

impl SampleStore<MemoryRemote> {
    /// Store with no remote backing: everything stays in the local cache.
    pub fn local() -> Self {
        Self {
            library: RwLock::new(SampleLibrary::new()),
            remote: None,
            authenticated: false,
            read_timeout: DEFAULT_READ_TIMEOUT,
            pending: Mutex::new(VecDeque::new()),
            profile: RwLock::new(ProfileCache {
                cached: StyleProfile::default(),
                dirty: true,
            }),
        }
    }
}

impl<R: RemoteSampleStore> SampleStore<R> {
    /// Store backed by a remote. `authenticated` gates every remote call.
    pub fn with_remote(remote: R, authenticated: bool) -> Self {
        Self {
            library: RwLock::new(SampleLibrary::new()),
            remote: Some(remote),
            authenticated,
            read_timeout: DEFAULT_READ_TIMEOUT,
            pending: Mutex::new(VecDeque::new()),
            profile: RwLock::new(ProfileCache {
                cached: StyleProfile::default(),
                dirty: true,
            }),
        }
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    fn remote_reachable(&self) -> Option<&R> {
        self.authenticated.then_some(()).and(self.remote.as_ref())
    }

    /// Validate and store one captured sample.
    ///
    /// Invalid geometry is rejected synchronously and never stored - this is
    /// the one failure the training UI surfaces, since the capture should be
    /// redone. Valid samples land in the local cache immediately and are
    /// queued for remote sync.
    pub async fn add_sample(
        &self,
        key: &str,
        variation: usize,
        strokes: Vec<Stroke>,
    ) -> Result<(), SampleError> {
        let sample = TrainingSample::new(key, variation, strokes);

        self.library
            .write()
            .expect("sample library lock poisoned")
            .insert(sample.clone())?;
        self.invalidate_profile();

        if self.remote_reachable().is_some() {
            self.pending.lock().await.push_back(sample);
        }
        Ok(())
    }

    /// All locally cached variations for a key, empty if untrained.
    pub fn samples(&self, key: &str) -> Vec<TrainingSample> {
        self.library
            .read()
            .expect("sample library lock poisoned")
            .samples(key)
            .to_vec()
    }

    /// Clone of the whole local cache, for handing to the synthesizer.
    pub fn snapshot(&self) -> SampleLibrary {
        self.library
            .read()
            .expect("sample library lock poisoned")
            .clone()
    }

    /// Read one key, preferring the remote copy.
    ///
    /// The remote answer is authoritative when it arrives within the read
    /// timeout: it replaces the local slots for that key. On timeout or any
    /// remote failure the local cache answers silently.
    pub async fn fetch(&self, key: &str) -> Vec<TrainingSample> {
        if let Some(remote) = self.remote_reachable() {
            match timeout(self.read_timeout, remote.get(key)).await {
                // A remote answer with samples is authoritative; an empty
                // answer (key never synced) falls through to the cache
                Ok(Ok(remote_samples)) if !remote_samples.is_empty() => {
                    let mut library = self.library.write().expect("sample library lock poisoned");
                    for sample in &remote_samples {
                        if let Err(e) = library.insert(sample.clone()) {
                            warn!("dropping invalid remote sample for {key:?}: {e}");
                        }
                    }
                    drop(library);
                    self.invalidate_profile();
                    return remote_samples;
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!("remote read failed for {key:?}, using local cache: {e}"),
                Err(_) => warn!("remote read timed out for {key:?}, using local cache"),
            }
        }
        self.samples(key)
    }

    /// Drain the write queue, one put in flight at a time.
    ///
    /// Stops at the first failure; the failed sample and everything behind
    /// it stay queued for a later retry. Returns how many samples synced.
    pub async fn sync_pending(&self) -> usize {
        let Some(remote) = self.remote_reachable() else {
            return 0;
        };

        let mut pending = self.pending.lock().await;
        let mut synced = 0;
        while let Some(sample) = pending.pop_front() {
            match timeout(self.read_timeout, remote.put(&sample.key, &sample)).await {
                Ok(Ok(())) => synced += 1,
                Ok(Err(e)) => {
                    warn!("remote sync failed for {:?}, will retry: {e}", sample.key);
                    pending.push_front(sample);
                    break;
                }
                Err(_) => {
                    warn!("remote sync timed out for {:?}, will retry", sample.key);
                    pending.push_front(sample);
                    break;
                }
            }
        }
        debug!("synced {synced} pending samples, {} remaining", pending.len());
        synced
    }

    /// Samples still waiting for remote sync
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Wipe the local cache and, when authenticated, the remote copy.
    ///
    /// Used on retrain, which replaces the sample set wholesale. A remote
    /// failure is logged and absorbed.
    pub async fn clear_all(&self) {
        self.library
            .write()
            .expect("sample library lock poisoned")
            .clear();
        self.pending.lock().await.clear();
        self.invalidate_profile();

        if let Some(remote) = self.remote_reachable() {
            match timeout(self.read_timeout, remote.delete_all()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("remote clear failed: {e}"),
                Err(_) => warn!("remote clear timed out"),
            }
        }
    }

    /// The current style profile, recomputed only when the sample set
    /// changed since the last call.
    pub fn profile(&self) -> StyleProfile {
        {
            let cache = self.profile.read().expect("profile cache lock poisoned");
            if !cache.dirty {
                return cache.cached;
            }
        }

        let library = self.library.read().expect("sample library lock poisoned");
        let computed = compute_profile(library.iter());
        drop(library);

        let mut cache = self.profile.write().expect("profile cache lock poisoned");
        cache.cached = computed;
        cache.dirty = false;
        computed
    }

    /// Serialize the local cache for persistence between sessions.
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }

    /// Replace the local cache from a serialized snapshot.
    pub fn restore_json(&self, json: &str) -> Result<(), serde_json::Error> {
        let library: SampleLibrary = serde_json::from_str(json)?;
        *self.library.write().expect("sample library lock poisoned") = library;
        self.invalidate_profile();
        Ok(())
    }

    fn invalidate_profile(&self) {
        self.profile
            .write()
            .expect("profile cache lock poisoned")
            .dirty = true;
    }
}

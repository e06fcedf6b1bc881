use moka::sync::Cache;
use uuid::Uuid;

use crate::engine::ProgressReport;

/// Upper bound on projects kept in memory at once.
pub const DEFAULT_CAPACITY: u64 = 256;

/// Computed reports keyed by project, tagged with the input fingerprint they
/// were built from.
///
/// One report per project: a newer fingerprint overwrites the older one, and a
/// stale fingerprint simply misses. Least recently used projects are evicted
/// past the capacity.
pub struct ProgressCache {
    inner: Cache<Uuid, (blake3::Hash, ProgressReport)>,
}

impl Default for ProgressCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ProgressCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(max_capacity).build(),
        }
    }

    pub fn get(&self, project_id: Uuid, fingerprint: blake3::Hash) -> Option<ProgressReport> {
        self.inner
            .get(&project_id)
            .filter(|(cached, _)| *cached == fingerprint)
            .map(|(_, report)| report)
    }

    pub fn insert(&self, project_id: Uuid, fingerprint: blake3::Hash, report: ProgressReport) {
        self.inner.insert(project_id, (fingerprint, report));
    }

    pub fn invalidate(&self, project_id: Uuid) {
        self.inner.invalidate(&project_id);
    }

    pub fn len(&self) -> usize {
        // Counts lag behind writes until pending maintenance runs.
        self.inner.run_pending_tasks();
        self.inner.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

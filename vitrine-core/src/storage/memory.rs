use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, warn};
use vitrine_model::{
    ArtworkId, ArtworkRequest, ArtworkStatus, LocatedCandidate, LocatedId, QueueItem, QueueKind,
};

use super::ArtworkStorage;
use crate::scheduling::QueueSource;
use crate::{ArtworkError, Result};

/// Process-local storage, used for tests and embedded setups.
#[derive(Clone, Debug, Default)]
pub struct InMemoryArtworkStorage {
    requests: Arc<Mutex<HashMap<ArtworkId, ArtworkRequest>>>,
    fail_next_persist: Arc<AtomicBool>,
}

impl InMemoryArtworkStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, request: ArtworkRequest) -> ArtworkId {
        let id = request.id;
        self.requests.lock().insert(id, request);
        id
    }

    pub fn get(&self, id: ArtworkId) -> Option<ArtworkRequest> {
        self.requests.lock().get(&id).cloned()
    }

    /// Applies `update` to a stored request in place.
    pub fn update<F>(&self, id: ArtworkId, update: F) -> bool
    where
        F: FnOnce(&mut ArtworkRequest),
    {
        match self.requests.lock().get_mut(&id) {
            Some(request) => {
                update(request);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }

    /// Makes the next `persist_result` call fail.
    pub fn fail_next_persist(&self) {
        self.fail_next_persist.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl QueueSource for InMemoryArtworkStorage {
    async fn fetch_queue(&self, kind: QueueKind, max_results: usize) -> Result<Vec<QueueItem>> {
        if kind != QueueKind::ArtworkScan {
            return Ok(Vec::new());
        }

        let mut items: Vec<QueueItem> = self
            .requests
            .lock()
            .values()
            .filter(|request| request.status.is_queueable())
            .map(QueueItem::from)
            .collect();
        items.sort();
        items.truncate(max_results);
        Ok(items)
    }
}

#[async_trait]
impl ArtworkStorage for InMemoryArtworkStorage {
    async fn get_required_artwork(&self, id: ArtworkId) -> Result<ArtworkRequest> {
        self.get(id)
            .ok_or_else(|| ArtworkError::NotFound(format!("artwork request {id}")))
    }

    async fn persist_result(
        &self,
        request: &ArtworkRequest,
        located: &[LocatedCandidate],
    ) -> Result<()> {
        if self.fail_next_persist.swap(false, Ordering::SeqCst) {
            warn!(target: "artwork::store", artwork = %request.id, "Injected persistence failure");
            return Err(ArtworkError::Storage(format!(
                "failed to persist artwork request {}",
                request.id
            )));
        }

        let mut requests = self.requests.lock();
        let stored = requests
            .get_mut(&request.id)
            .ok_or_else(|| ArtworkError::NotFound(format!("artwork request {}", request.id)))?;

        stored.located = located
            .iter()
            .cloned()
            .map(|mut candidate| {
                candidate.artwork_id = request.id;
                candidate.id.get_or_insert_with(LocatedId::new);
                candidate
            })
            .collect();
        stored.status = request.status;
        stored.updated_at = Some(Utc::now());

        debug!(
            target: "artwork::store",
            artwork = %request.id,
            status = %stored.status,
            located = stored.located.len(),
            "Stored artwork result"
        );
        Ok(())
    }

    async fn mark_errored(&self, id: ArtworkId) -> Result<()> {
        let updated = self.update(id, |request| {
            request.status = ArtworkStatus::Error;
            request.updated_at = Some(Utc::now());
        });
        if updated {
            Ok(())
        } else {
            Err(ArtworkError::NotFound(format!("artwork request {id}")))
        }
    }
}

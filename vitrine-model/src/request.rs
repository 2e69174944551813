use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::artwork::{ArtworkStatus, ArtworkType};
use crate::ids::ArtworkId;
use crate::located::LocatedCandidate;
use crate::owner::ArtworkOwner;

/// One artwork slot to fill, with its owner resolved and the candidates
/// stored by earlier scans.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtworkRequest {
    pub id: ArtworkId,
    pub artwork_type: ArtworkType,
    pub owner: ArtworkOwner,
    pub status: ArtworkStatus,
    pub located: Vec<LocatedCandidate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ArtworkRequest {
    pub fn new(artwork_type: ArtworkType, owner: ArtworkOwner) -> Self {
        Self {
            id: ArtworkId::new(),
            artwork_type,
            owner,
            status: ArtworkStatus::New,
            located: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Timestamp the queue orders by: last update, else creation.
    pub fn queue_timestamp(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// Queues a pipeline can drain.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum QueueKind {
    ArtworkScan,
}

/// Lightweight projection of a queued request, ordered oldest first.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueItem {
    pub id: ArtworkId,
    pub artwork_type: Option<ArtworkType>,
    pub last_modified: DateTime<Utc>,
}

impl QueueItem {
    /// Builds an item from the two timestamp columns, preferring `updated`.
    pub fn new(
        id: ArtworkId,
        artwork_type: Option<ArtworkType>,
        created: DateTime<Utc>,
        updated: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            artwork_type,
            last_modified: updated.unwrap_or(created),
        }
    }
}

impl From<&ArtworkRequest> for QueueItem {
    fn from(request: &ArtworkRequest) -> Self {
        QueueItem::new(
            request.id,
            Some(request.artwork_type),
            request.created_at,
            request.updated_at,
        )
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.last_modified
            .cmp(&other.last_modified)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn queue_items_order_by_best_available_timestamp() {
        let base = Utc::now();
        let stale_update = QueueItem::new(
            ArtworkId::new(),
            None,
            base - Duration::hours(10),
            Some(base - Duration::hours(1)),
        );
        let never_updated = QueueItem::new(
            ArtworkId::new(),
            Some(ArtworkType::Poster),
            base - Duration::hours(5),
            None,
        );

        let mut items = vec![stale_update.clone(), never_updated.clone()];
        items.sort();
        assert_eq!(items, vec![never_updated, stale_update]);
    }
}

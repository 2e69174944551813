use std::collections::HashMap;

use tracing::trace;
use vitrine_model::{CandidateKey, LocatedCandidate};

/// Outcome of merging one scan into the stored candidate set.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReconcileSummary {
    pub inserted: usize,
    pub resurrected: usize,
    pub unchanged: usize,
    /// Fresh candidates dropped because an earlier fresh one had the same key.
    pub duplicates: usize,
}

impl ReconcileSummary {
    pub fn changed(&self) -> bool {
        self.inserted > 0 || self.resurrected > 0
    }
}

/// Merges `fresh` into `existing`.
///
/// Unknown keys are appended; a soft-deleted match is resurrected in place;
/// a live match is left as is. Stored candidates missing from `fresh` are
/// kept untouched, so applying the same scan twice changes nothing.
pub fn reconcile(
    existing: &mut Vec<LocatedCandidate>,
    fresh: Vec<LocatedCandidate>,
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();

    let mut index: HashMap<CandidateKey, usize> = HashMap::with_capacity(existing.len());
    for (position, candidate) in existing.iter().enumerate() {
        index.entry(candidate.key()).or_insert(position);
    }
    let stored = existing.len();

    for candidate in fresh {
        let key = candidate.key();
        match index.get(&key).copied() {
            Some(position) if position >= stored => {
                summary.duplicates += 1;
            }
            Some(position) => {
                let current = &mut existing[position];
                if current.resurrect() {
                    trace!(
                        target: "artwork::scan",
                        location = %current.location,
                        status = %current.status,
                        "resurrected deleted candidate"
                    );
                    summary.resurrected += 1;
                } else {
                    summary.unchanged += 1;
                }
            }
            None => {
                index.insert(key, existing.len());
                existing.push(candidate);
                summary.inserted += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_model::{ArtworkDetail, ArtworkId, ArtworkStatus};

    use crate::artwork::located::online_candidate;

    fn scan(artwork_id: ArtworkId, urls: &[&str]) -> Vec<LocatedCandidate> {
        urls.iter()
            .map(|url| online_candidate(artwork_id, ArtworkDetail::new("themoviedb", *url)))
            .collect()
    }

    #[test]
    fn same_scan_twice_is_a_no_op() {
        let artwork_id = ArtworkId::new();
        let urls = ["https://img.example/a.jpg", "https://img.example/b.jpg"];
        let mut stored = Vec::new();

        let first = reconcile(&mut stored, scan(artwork_id, &urls));
        assert_eq!(first.inserted, 2);

        let snapshot = stored.clone();
        let second = reconcile(&mut stored, scan(artwork_id, &urls));
        assert_eq!(second.inserted, 0);
        assert_eq!(second.unchanged, 2);
        assert!(!second.changed());
        assert_eq!(stored, snapshot);
    }

    #[test]
    fn deleted_match_is_resurrected_in_place() {
        let artwork_id = ArtworkId::new();
        let mut stored = scan(artwork_id, &["https://img.example/a.jpg"]);
        stored[0].status = ArtworkStatus::Done;
        stored[0].mark_deleted();

        let summary = reconcile(&mut stored, scan(artwork_id, &["https://img.example/a.jpg"]));

        assert_eq!(summary.resurrected, 1);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, ArtworkStatus::Done);
        assert_eq!(stored[0].previous_status, None);
    }

    #[test]
    fn duplicate_keys_in_one_scan_collapse() {
        let artwork_id = ArtworkId::new();
        let mut stored = Vec::new();
        let summary = reconcile(
            &mut stored,
            scan(artwork_id, &["https://img.example/a.jpg", "https://img.example/a.jpg"]),
        );

        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn candidates_not_rediscovered_are_kept() {
        let artwork_id = ArtworkId::new();
        let mut stored = scan(artwork_id, &["https://img.example/old.jpg"]);

        reconcile(&mut stored, scan(artwork_id, &["https://img.example/new.jpg"]));

        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].status, ArtworkStatus::New);
    }
}

mod memory;

use async_trait::async_trait;
use vitrine_model::{ArtworkId, ArtworkRequest, LocatedCandidate};

use crate::Result;
use crate::scheduling::QueueSource;

pub use memory::InMemoryArtworkStorage;

/// Durable home of artwork requests and their candidates.
///
/// Implementations serialize their own writes per request; the scan
/// service never holds storage state across requests.
#[async_trait]
pub trait ArtworkStorage: QueueSource {
    /// Loads a request with its owner view and stored candidates.
    async fn get_required_artwork(&self, id: ArtworkId) -> Result<ArtworkRequest>;

    /// Stores the full reconciled candidate set together with the request
    /// status carried by `request`.
    async fn persist_result(
        &self,
        request: &ArtworkRequest,
        located: &[LocatedCandidate],
    ) -> Result<()>;

    async fn mark_errored(&self, id: ArtworkId) -> Result<()>;
}

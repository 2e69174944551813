//! Core data model definitions shared across Vitrine crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod artwork;
pub mod detail;
pub mod error;
pub mod ids;
pub mod located;
pub mod owner;
pub mod request;

// Intentionally curated re-exports for downstream consumers.
pub use artwork::{ArtworkStatus, ArtworkType, ImageType};
pub use detail::ArtworkDetail;
pub use error::{ModelError, Result as ModelResult};
pub use ids::{
    ArtworkId, BoxedSetId, EpisodeId, LocatedId, MovieId, PersonId, SeasonId,
    SeriesId, StageFileId,
};
pub use located::{
    AttachedImage, CandidateKey, CandidateLocation, LocatedCandidate, SourceKind,
    StageFile,
};
pub use owner::{
    ArtworkOwner, BoxedSetView, EpisodeView, MovieView, OwnerKind, OwnerSlots,
    PersonView, SeasonView, SeriesView, SourceIds, VideoFileView,
};
pub use request::{ArtworkRequest, QueueItem, QueueKind};

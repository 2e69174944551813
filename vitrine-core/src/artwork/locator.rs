//! Local and embedded artwork lookup.

use async_trait::async_trait;
use vitrine_model::{ArtworkOwner, ArtworkType, AttachedImage, EpisodeView, StageFile};

use crate::Result;

/// What a locator is asked to find.
#[derive(Clone, Copy, Debug)]
pub struct LocateTarget<'a> {
    pub artwork_type: ArtworkType,
    pub owner: &'a ArtworkOwner,
    /// 1-based position of an episode inside a multi-episode file, 0 when
    /// the file holds one episode or the position is unknown.
    pub part: u32,
}

/// Finds image files on disk belonging to an owner.
#[async_trait]
pub trait ArtworkLocator: Send + Sync {
    async fn locate(&self, target: &LocateTarget<'_>) -> Result<Vec<StageFile>>;
}

/// Finds images embedded in the owner's media containers.
#[async_trait]
pub trait AttachmentScanner: Send + Sync {
    async fn scan_attachments(&self, target: &LocateTarget<'_>) -> Result<Vec<AttachedImage>>;
}

/// Position of `episode` within its video file.
pub fn episode_part(episode: &EpisodeView) -> u32 {
    let Some(video) = episode.video_file.as_ref() else {
        return 0;
    };

    let mut numbers = video.episodes.clone();
    numbers.sort_unstable();
    numbers.dedup();

    if numbers.len() <= 1 {
        return 0;
    }

    numbers
        .iter()
        .position(|number| *number == episode.episode)
        .and_then(|index| u32::try_from(index + 1).ok())
        .unwrap_or(0)
}

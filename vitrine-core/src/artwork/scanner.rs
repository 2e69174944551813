//! Online scanner contracts.
//!
//! One capability trait per owner kind. A provider implements whichever
//! traits it can serve; every method defaults to "nothing found", so a
//! poster-only provider only overrides `posters`.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use vitrine_model::{
    ArtworkDetail, BoxedSetView, EpisodeView, MovieView, PersonView, SeasonView,
    SeriesView,
};

/// Failure talking to a provider. "Not found" is never an error: scanners
/// return an empty list instead.
#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type ScanResult = std::result::Result<Vec<ArtworkDetail>, ScannerError>;

/// Registry partitions; a scanner can sit in several at once.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum ScannerCategory {
    Movie,
    /// Series, seasons and episodes.
    Series,
    Person,
    BoxedSet,
}

impl ScannerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScannerCategory::Movie => "movie",
            ScannerCategory::Series => "series",
            ScannerCategory::Person => "person",
            ScannerCategory::BoxedSet => "boxset",
        }
    }
}

impl fmt::Display for ScannerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait ArtworkScanner: Send + Sync {
    /// Identifier used in priority lists; matched case-insensitively.
    fn scanner_name(&self) -> &str;
}

#[async_trait]
pub trait MovieArtworkScanner: ArtworkScanner {
    async fn posters(&self, _movie: &MovieView) -> ScanResult {
        Ok(Vec::new())
    }

    async fn fanarts(&self, _movie: &MovieView) -> ScanResult {
        Ok(Vec::new())
    }
}

/// Series-level or season-level owner handed to a series scanner.
#[derive(Clone, Copy, Debug)]
pub enum SeriesTarget<'a> {
    Series(&'a SeriesView),
    Season(&'a SeasonView),
}

impl SeriesTarget<'_> {
    pub fn series(&self) -> &SeriesView {
        match self {
            SeriesTarget::Series(series) => series,
            SeriesTarget::Season(season) => &season.series,
        }
    }

    /// Season number, `None` for the series itself.
    pub fn season(&self) -> Option<i32> {
        match self {
            SeriesTarget::Series(_) => None,
            SeriesTarget::Season(season) => Some(season.season),
        }
    }
}

#[async_trait]
pub trait SeriesArtworkScanner: ArtworkScanner {
    async fn posters(&self, _target: SeriesTarget<'_>) -> ScanResult {
        Ok(Vec::new())
    }

    async fn fanarts(&self, _target: SeriesTarget<'_>) -> ScanResult {
        Ok(Vec::new())
    }

    async fn banners(&self, _target: SeriesTarget<'_>) -> ScanResult {
        Ok(Vec::new())
    }

    async fn video_images(&self, _episode: &EpisodeView) -> ScanResult {
        Ok(Vec::new())
    }
}

#[async_trait]
pub trait PersonArtworkScanner: ArtworkScanner {
    /// Looks up the provider id for a person whose id is not yet known.
    async fn resolve_person_id(
        &self,
        _person: &PersonView,
    ) -> std::result::Result<Option<String>, ScannerError> {
        Ok(None)
    }

    async fn photos(&self, _person_id: &str) -> ScanResult {
        Ok(Vec::new())
    }
}

#[async_trait]
pub trait BoxedSetArtworkScanner: ArtworkScanner {
    async fn posters(&self, _set: &BoxedSetView) -> ScanResult {
        Ok(Vec::new())
    }

    async fn fanarts(&self, _set: &BoxedSetView) -> ScanResult {
        Ok(Vec::new())
    }

    async fn banners(&self, _set: &BoxedSetView) -> ScanResult {
        Ok(Vec::new())
    }
}

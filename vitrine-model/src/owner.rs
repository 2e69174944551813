//! Artwork owners and the read-only views handed to scanners.
//!
//! Scanners never see persisted entities. The storage layer projects each
//! owner into one of the view types below, carrying only what a scanner or
//! file locator is allowed to look at.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ModelError;
use crate::ids::{BoxedSetId, EpisodeId, MovieId, PersonId, SeasonId, SeriesId};
use crate::located::StageFile;

/// The entity variant an artwork slot belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OwnerKind {
    Movie,
    Series,
    Season,
    Episode,
    BoxedSet,
    Person,
}

impl OwnerKind {
    /// Lowercase token used in configuration keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerKind::Movie => "movie",
            OwnerKind::Series => "series",
            OwnerKind::Season => "season",
            OwnerKind::Episode => "episode",
            OwnerKind::BoxedSet => "boxset",
            OwnerKind::Person => "person",
        }
    }
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider specific identifiers keyed by lowercase source name
/// (`themoviedb`, `imdb`, ...).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SourceIds(BTreeMap<String, String>);

impl SourceIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `source`, ignoring blank values.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.0
            .get(&source.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|id| !id.trim().is_empty())
    }

    pub fn insert(&mut self, source: impl AsRef<str>, id: impl Into<String>) {
        self.0.insert(source.as_ref().to_ascii_lowercase(), id.into());
    }

    pub fn with(mut self, source: impl AsRef<str>, id: impl Into<String>) -> Self {
        self.insert(source, id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovieView {
    pub id: MovieId,
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub source_ids: SourceIds,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesView {
    pub id: SeriesId,
    pub title: String,
    pub original_title: Option<String>,
    pub year: Option<i32>,
    pub source_ids: SourceIds,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeasonView {
    pub id: SeasonId,
    pub series: SeriesView,
    pub season: i32,
    pub year: Option<i32>,
    pub source_ids: SourceIds,
}

/// The media file an episode lives in, together with every episode number
/// that file carries (multi-episode rips hold more than one).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VideoFileView {
    pub file: StageFile,
    pub episodes: Vec<i32>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeView {
    pub id: EpisodeId,
    pub series: SeriesView,
    pub season: i32,
    /// Negative when the video was never matched to an episode.
    pub episode: i32,
    pub title: Option<String>,
    pub source_ids: SourceIds,
    pub video_file: Option<VideoFileView>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxedSetView {
    pub id: BoxedSetId,
    pub name: String,
    pub source_ids: SourceIds,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersonView {
    pub id: PersonId,
    pub name: String,
    pub source_ids: SourceIds,
}

/// The single entity an artwork slot belongs to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum ArtworkOwner {
    Movie(MovieView),
    Series(SeriesView),
    Season(SeasonView),
    Episode(EpisodeView),
    BoxedSet(BoxedSetView),
    Person(PersonView),
}

impl ArtworkOwner {
    pub fn kind(&self) -> OwnerKind {
        match self {
            ArtworkOwner::Movie(_) => OwnerKind::Movie,
            ArtworkOwner::Series(_) => OwnerKind::Series,
            ArtworkOwner::Season(_) => OwnerKind::Season,
            ArtworkOwner::Episode(_) => OwnerKind::Episode,
            ArtworkOwner::BoxedSet(_) => OwnerKind::BoxedSet,
            ArtworkOwner::Person(_) => OwnerKind::Person,
        }
    }

    /// Human readable label used in log records.
    pub fn label(&self) -> String {
        match self {
            ArtworkOwner::Movie(movie) => match movie.year {
                Some(year) => format!("{} ({year})", movie.title),
                None => movie.title.clone(),
            },
            ArtworkOwner::Series(series) => series.title.clone(),
            ArtworkOwner::Season(season) => {
                format!("{} S{:02}", season.series.title, season.season)
            }
            ArtworkOwner::Episode(episode) => format!(
                "{} S{:02}E{:02}",
                episode.series.title, episode.season, episode.episode
            ),
            ArtworkOwner::BoxedSet(set) => set.name.clone(),
            ArtworkOwner::Person(person) => person.name.clone(),
        }
    }
}

/// Row-shaped owner references as a relational store keeps them: one
/// nullable column per owner kind. Converting into [`ArtworkOwner`] enforces
/// that exactly one column is populated.
#[derive(Clone, Debug, Default)]
pub struct OwnerSlots {
    pub movie: Option<MovieView>,
    pub series: Option<SeriesView>,
    pub season: Option<SeasonView>,
    pub episode: Option<EpisodeView>,
    pub boxed_set: Option<BoxedSetView>,
    pub person: Option<PersonView>,
}

impl TryFrom<OwnerSlots> for ArtworkOwner {
    type Error = ModelError;

    fn try_from(slots: OwnerSlots) -> Result<Self, Self::Error> {
        let OwnerSlots {
            movie,
            series,
            season,
            episode,
            boxed_set,
            person,
        } = slots;

        let mut owners: Vec<ArtworkOwner> = Vec::with_capacity(1);
        owners.extend(movie.map(ArtworkOwner::Movie));
        owners.extend(series.map(ArtworkOwner::Series));
        owners.extend(season.map(ArtworkOwner::Season));
        owners.extend(episode.map(ArtworkOwner::Episode));
        owners.extend(boxed_set.map(ArtworkOwner::BoxedSet));
        owners.extend(person.map(ArtworkOwner::Person));

        match owners.len() {
            1 => Ok(owners.remove(0)),
            0 => Err(ModelError::InvalidOwner(
                "artwork has no owner reference".to_string(),
            )),
            n => {
                let kinds: Vec<&str> = owners.iter().map(|o| o.kind().as_str()).collect();
                Err(ModelError::InvalidOwner(format!(
                    "artwork references {n} owners ({})",
                    kinds.join(", ")
                )))
            }
        }
    }
}

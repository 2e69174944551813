use std::{fmt, str::FromStr};

use crate::error::ModelError;

/// Logical artwork categories an owner can carry.
///
/// Stored and configured in lowercase (`poster`, `fanart`, ...).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ArtworkType {
    Poster,
    Fanart,
    Banner,
    /// Episode still, owned by a single episode.
    VideoImage,
    /// Portrait of a person.
    Photo,
}

impl ArtworkType {
    pub const ALL: [ArtworkType; 5] = [
        ArtworkType::Poster,
        ArtworkType::Fanart,
        ArtworkType::Banner,
        ArtworkType::VideoImage,
        ArtworkType::Photo,
    ];

    /// Canonical lowercase representation used in configuration keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtworkType::Poster => "poster",
            ArtworkType::Fanart => "fanart",
            ArtworkType::Banner => "banner",
            ArtworkType::VideoImage => "videoimage",
            ArtworkType::Photo => "photo",
        }
    }

    /// Parses a value using ASCII-case-insensitive matching.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| value.eq_ignore_ascii_case(kind.as_str()))
    }
}

impl FromStr for ArtworkType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtworkType::parse(s)
            .ok_or_else(|| ModelError::InvalidValue(format!("unknown artwork type '{s}'")))
    }
}

impl fmt::Display for ArtworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing status shared by artwork requests and located candidates.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ArtworkStatus {
    #[default]
    New,
    Updated,
    Done,
    NotFound,
    Error,
    /// Located on disk but not readable; never eligible for download.
    Invalid,
    /// Soft-deleted. The pre-deletion status is kept alongside.
    Deleted,
}

impl ArtworkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtworkStatus::New => "NEW",
            ArtworkStatus::Updated => "UPDATED",
            ArtworkStatus::Done => "DONE",
            ArtworkStatus::NotFound => "NOTFOUND",
            ArtworkStatus::Error => "ERROR",
            ArtworkStatus::Invalid => "INVALID",
            ArtworkStatus::Deleted => "DELETED",
        }
    }

    /// Whether a request in this status belongs in the scan queue.
    pub fn is_queueable(&self) -> bool {
        matches!(self, ArtworkStatus::New | ArtworkStatus::Updated)
    }
}

impl fmt::Display for ArtworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image container format of a candidate, when known.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ImageType {
    Jpg,
    Png,
    Gif,
    Bmp,
    Webp,
}

impl ImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::Jpg => "jpg",
            ImageType::Png => "png",
            ImageType::Gif => "gif",
            ImageType::Bmp => "bmp",
            ImageType::Webp => "webp",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageType::Jpg),
            "png" => Some(ImageType::Png),
            "gif" => Some(ImageType::Gif),
            "bmp" => Some(ImageType::Bmp),
            "webp" => Some(ImageType::Webp),
            _ => None,
        }
    }

    /// Infers the format from the trailing extension of a path or URL path,
    /// ignoring any query string or fragment.
    pub fn from_location(location: &str) -> Option<Self> {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let file_name = path.rsplit(['/', '\\']).next()?;
        let (_, ext) = file_name.rsplit_once('.')?;
        Self::from_extension(ext)
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

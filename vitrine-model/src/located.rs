use std::fmt;
use std::path::PathBuf;

use crate::artwork::{ArtworkStatus, ImageType};
use crate::ids::{ArtworkId, LocatedId, StageFileId};

/// Discovery channel a candidate came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SourceKind {
    LocalFile,
    Attachment,
    OnlineProvider,
}

impl SourceKind {
    /// Rank used downstream to pick a winner; lower wins.
    pub fn priority_tier(&self) -> i32 {
        match self {
            SourceKind::LocalFile => 1,
            SourceKind::Attachment => 8,
            SourceKind::OnlineProvider => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::LocalFile => "local-file",
            SourceKind::Attachment => "attachment",
            SourceKind::OnlineProvider => "online-provider",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file handle owned by the stage (import) layer.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageFile {
    pub id: StageFileId,
    pub path: PathBuf,
    /// Content digest recorded when the file was staged, if any.
    pub hash_code: Option<String>,
}

impl StageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            id: StageFileId::new(),
            path: path.into(),
            hash_code: None,
        }
    }
}

/// An image embedded in a media container.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttachedImage {
    /// Container the attachment lives in.
    pub file: StageFile,
    /// Attachment index inside the container.
    pub attachment_id: u32,
    pub image_type: Option<ImageType>,
}

/// Where a candidate image can be fetched from.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value", rename_all = "snake_case"))]
pub enum CandidateLocation {
    StageFile(StageFile),
    Url(String),
}

impl CandidateLocation {
    /// Stable reference used for identity. Stage files are referenced by
    /// path, since locators restage the same file under a new id each scan.
    pub fn reference(&self) -> String {
        match self {
            CandidateLocation::StageFile(file) => file.path.to_string_lossy().into_owned(),
            CandidateLocation::Url(url) => url.clone(),
        }
    }
}

impl fmt::Display for CandidateLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateLocation::StageFile(file) => write!(f, "{}", file.path.display()),
            CandidateLocation::Url(url) => f.write_str(url),
        }
    }
}

/// Identity of a candidate across scan runs.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CandidateKey {
    pub source_kind: SourceKind,
    /// `source` + `:` + location reference.
    pub location: String,
    pub hash_code: Option<String>,
}

/// One discovered image location for an artwork slot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocatedCandidate {
    /// Assigned by storage once persisted.
    pub id: Option<LocatedId>,
    pub artwork_id: ArtworkId,
    pub source_kind: SourceKind,
    /// Scanner name, `file`, or `attachment#N`.
    pub source: String,
    pub location: CandidateLocation,
    pub hash_code: Option<String>,
    pub image_type: Option<ImageType>,
    pub language_code: Option<String>,
    pub rating: Option<i32>,
    pub priority: i32,
    pub status: ArtworkStatus,
    /// Status recorded at soft deletion, restored on resurrection.
    pub previous_status: Option<ArtworkStatus>,
}

impl LocatedCandidate {
    pub fn key(&self) -> CandidateKey {
        CandidateKey {
            source_kind: self.source_kind,
            location: format!("{}:{}", self.source, self.location.reference()),
            hash_code: self.hash_code.clone(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.status == ArtworkStatus::Deleted
    }

    /// Soft-deletes the candidate, remembering the current status.
    pub fn mark_deleted(&mut self) {
        if !self.is_deleted() {
            self.previous_status = Some(self.status);
            self.status = ArtworkStatus::Deleted;
        }
    }

    /// Restores the pre-deletion status. Returns `false` when the candidate
    /// was not deleted.
    pub fn resurrect(&mut self) -> bool {
        if !self.is_deleted() {
            return false;
        }
        self.status = self.previous_status.take().unwrap_or(ArtworkStatus::New);
        true
    }
}

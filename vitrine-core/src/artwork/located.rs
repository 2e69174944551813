//! Turns raw scan results into candidate records.
//!
//! Each builder stamps the priority tier of its discovery channel, so the
//! tier of a candidate never depends on which scanner produced it.

use url::Url;
use vitrine_model::{
    ArtworkDetail, ArtworkId, ArtworkStatus, AttachedImage, CandidateLocation, ImageType,
    LocatedCandidate, SourceKind, StageFile,
};

pub const LOCAL_SOURCE: &str = "file";

fn readable_status(readable: bool) -> ArtworkStatus {
    if readable {
        ArtworkStatus::New
    } else {
        ArtworkStatus::Invalid
    }
}

/// Candidate for an image file found next to the media.
pub fn local_candidate(artwork_id: ArtworkId, file: StageFile, readable: bool) -> LocatedCandidate {
    let image_type = file
        .path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageType::from_extension);

    LocatedCandidate {
        id: None,
        artwork_id,
        source_kind: SourceKind::LocalFile,
        source: LOCAL_SOURCE.to_string(),
        hash_code: file.hash_code.clone(),
        location: CandidateLocation::StageFile(file),
        image_type,
        language_code: None,
        rating: None,
        priority: SourceKind::LocalFile.priority_tier(),
        status: readable_status(readable),
        previous_status: None,
    }
}

/// Candidate for an image embedded in a media container.
pub fn attached_candidate(
    artwork_id: ArtworkId,
    image: AttachedImage,
    readable: bool,
) -> LocatedCandidate {
    let AttachedImage {
        file,
        attachment_id,
        image_type,
    } = image;

    LocatedCandidate {
        id: None,
        artwork_id,
        source_kind: SourceKind::Attachment,
        source: format!("attachment#{attachment_id}"),
        hash_code: file.hash_code.clone(),
        location: CandidateLocation::StageFile(file),
        image_type,
        language_code: None,
        rating: None,
        priority: SourceKind::Attachment.priority_tier(),
        status: readable_status(readable),
        previous_status: None,
    }
}

/// Candidate for a provider result. A missing hash code is derived from the
/// URL so the same remote image keeps its identity across runs.
pub fn online_candidate(artwork_id: ArtworkId, detail: ArtworkDetail) -> LocatedCandidate {
    let ArtworkDetail {
        source,
        url,
        hash_code,
        image_type,
        language_code,
        rating,
    } = detail;

    let hash_code = hash_code
        .filter(|hash| !hash.trim().is_empty())
        .or_else(|| simple_hash_code(&url));
    let image_type = image_type.or_else(|| ImageType::from_location(&url));

    LocatedCandidate {
        id: None,
        artwork_id,
        source_kind: SourceKind::OnlineProvider,
        source,
        location: CandidateLocation::Url(url),
        hash_code,
        image_type,
        language_code,
        rating,
        priority: SourceKind::OnlineProvider.priority_tier(),
        status: ArtworkStatus::New,
        previous_status: None,
    }
}

/// Last path segment of `url` up to its first `.`.
///
/// `None` when there is no segment, no dot, or nothing before the dot.
pub fn simple_hash_code(url: &str) -> Option<String> {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .map(str::to_string),
    }?;

    match segment.find('.') {
        Some(index) if index > 0 => Some(segment[..index].to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_code_is_file_stem_of_last_segment() {
        assert_eq!(
            simple_hash_code("https://image.tmdb.org/t/p/original/kqjL17yufvn9OVLyXYpvtyrFfak.jpg"),
            Some("kqjL17yufvn9OVLyXYpvtyrFfak".to_string())
        );
        assert_eq!(
            simple_hash_code("https://artworks.example/banners/graphical/12345-g.tar.jpg?w=300"),
            Some("12345-g".to_string())
        );
        assert_eq!(simple_hash_code("https://img.example/posters/"), None);
        assert_eq!(simple_hash_code("https://img.example/.hidden"), None);
        assert_eq!(simple_hash_code("relative/path/abc.png"), Some("abc".to_string()));
    }

    #[test]
    fn tiers_follow_discovery_channel() {
        let artwork_id = ArtworkId::new();
        let file = StageFile::new("/media/movies/Heat (1995)/poster.jpg");

        let local = local_candidate(artwork_id, file.clone(), true);
        assert_eq!(local.priority, 1);
        assert_eq!(local.status, ArtworkStatus::New);
        assert_eq!(local.image_type, Some(ImageType::Jpg));

        let attached = attached_candidate(
            artwork_id,
            AttachedImage {
                file,
                attachment_id: 2,
                image_type: Some(ImageType::Png),
            },
            false,
        );
        assert_eq!(attached.priority, 8);
        assert_eq!(attached.status, ArtworkStatus::Invalid);
        assert_eq!(attached.source, "attachment#2");

        let online = online_candidate(
            artwork_id,
            ArtworkDetail::new("themoviedb", "https://img.example/p/abc.webp").with_rating(7),
        );
        assert_eq!(online.priority, 10);
        assert_eq!(online.status, ArtworkStatus::New);
        assert_eq!(online.hash_code.as_deref(), Some("abc"));
        assert_eq!(online.image_type, Some(ImageType::Webp));
        assert_eq!(online.rating, Some(7));
    }
}

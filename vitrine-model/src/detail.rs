use crate::artwork::ImageType;

/// Artwork reference returned by an online scanner.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtworkDetail {
    /// Provider the image came from, usually the scanner name.
    pub source: String,
    pub url: String,
    pub hash_code: Option<String>,
    pub image_type: Option<ImageType>,
    pub language_code: Option<String>,
    pub rating: Option<i32>,
}

impl ArtworkDetail {
    pub fn new(source: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            url: url.into(),
            hash_code: None,
            image_type: None,
            language_code: None,
            rating: None,
        }
    }

    pub fn with_hash_code(mut self, hash_code: impl Into<String>) -> Self {
        self.hash_code = Some(hash_code.into());
        self
    }

    pub fn with_language(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = Some(language_code.into());
        self
    }

    pub fn with_rating(mut self, rating: i32) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_image_type(mut self, image_type: ImageType) -> Self {
        self.image_type = Some(image_type);
        self
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("text content cannot be empty")]
    EmptyText,

    #[error("image upload cannot be empty")]
    EmptyUpload,

    #[error("invalid image url: {0}")]
    InvalidUrl(String),
}

//
// ─── CONTENT KIND ──────────────────────────────────────────────────────────────
//

/// Presentation kind of a piece of content. Matching questions are grouped by
/// the kinds of their two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Image,
}

impl ContentKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
        }
    }
}

//
// ─── CONTENT REF ───────────────────────────────────────────────────────────────
//

/// What a matching item (or any authored field) shows.
///
/// Exactly one variant is authoritative: plain text, an image already stored by
/// the backend, or raw bytes of an image that has not been uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentRef {
    Text(String),
    ExistingImage(Url),
    NewImageUpload(Vec<u8>),
}

impl ContentRef {
    /// Text content; surrounding whitespace is kept as authored.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyText` for blank input.
    pub fn text(raw: impl Into<String>) -> Result<Self, ContentError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ContentError::EmptyText);
        }
        Ok(ContentRef::Text(raw))
    }

    /// Reference to an image the backend already hosts.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::InvalidUrl` when `raw` is not an absolute URL.
    pub fn existing_image(raw: impl AsRef<str>) -> Result<Self, ContentError> {
        let raw = raw.as_ref().trim();
        Url::parse(raw)
            .map(ContentRef::ExistingImage)
            .map_err(|_| ContentError::InvalidUrl(raw.to_owned()))
    }

    /// Image bytes waiting to be uploaded.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyUpload` for an empty buffer.
    pub fn new_upload(bytes: Vec<u8>) -> Result<Self, ContentError> {
        if bytes.is_empty() {
            return Err(ContentError::EmptyUpload);
        }
        Ok(ContentRef::NewImageUpload(bytes))
    }

    /// Re-check a value that may have been built directly or deserialized.
    ///
    /// # Errors
    ///
    /// Returns the same errors as the constructors.
    pub fn validate(&self) -> Result<(), ContentError> {
        match self {
            ContentRef::Text(text) if text.trim().is_empty() => Err(ContentError::EmptyText),
            ContentRef::NewImageUpload(bytes) if bytes.is_empty() => {
                Err(ContentError::EmptyUpload)
            }
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentRef::Text(_) => ContentKind::Text,
            ContentRef::ExistingImage(_) | ContentRef::NewImageUpload(_) => ContentKind::Image,
        }
    }

    #[must_use]
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            ContentRef::ExistingImage(url) => Some(url),
            _ => None,
        }
    }

    /// Short human-readable label for terminals and logs.
    #[must_use]
    pub fn display_label(&self) -> String {
        match self {
            ContentRef::Text(text) => text.clone(),
            ContentRef::ExistingImage(url) => format!("[image {url}]"),
            ContentRef::NewImageUpload(bytes) => format!("[pending upload, {} bytes]", bytes.len()),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(ContentRef::text("   ").unwrap_err(), ContentError::EmptyText);
    }

    #[test]
    fn image_variants_share_a_kind() {
        let hosted = ContentRef::existing_image("https://cdn.example.com/a.png").unwrap();
        let upload = ContentRef::new_upload(vec![1, 2, 3]).unwrap();
        assert_eq!(hosted.kind(), ContentKind::Image);
        assert_eq!(upload.kind(), ContentKind::Image);
        assert_eq!(ContentRef::text("cat").unwrap().kind(), ContentKind::Text);
    }

    #[test]
    fn relative_url_is_rejected() {
        let err = ContentRef::existing_image("a.png").unwrap_err();
        assert!(matches!(err, ContentError::InvalidUrl(_)));
    }

    #[test]
    fn empty_upload_is_rejected() {
        assert_eq!(
            ContentRef::new_upload(Vec::new()).unwrap_err(),
            ContentError::EmptyUpload
        );
    }

    #[test]
    fn deserialized_blank_text_fails_validation() {
        let content: ContentRef = serde_json::from_str(r#"{"text":"  "}"#).unwrap();
        assert_eq!(content.validate(), Err(ContentError::EmptyText));
    }

    #[test]
    fn existing_image_deserializes_from_url_string() {
        let content: ContentRef =
            serde_json::from_str(r#"{"existing_image":"https://cdn.example.com/dog.jpg"}"#)
                .unwrap();
        assert_eq!(
            content.as_url().map(Url::as_str),
            Some("https://cdn.example.com/dog.jpg")
        );
    }
}

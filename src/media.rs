use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Svg,
    Video,
    Unknown,
}

impl MediaRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), content_type: None }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Content type wins over the URL suffix; the suffix ignores any query string.
    pub fn kind(&self) -> MediaKind {
        if let Some(content_type) = self.content_type.as_deref() {
            let content_type = content_type.to_lowercase();
            if content_type.contains("svg") {
                return MediaKind::Svg;
            }
            if content_type.starts_with("video/") {
                return MediaKind::Video;
            }
            if content_type.starts_with("image/") {
                return MediaKind::Image;
            }
        }

        let path = self.url.split(['?', '#']).next().unwrap_or("");
        let extension = path.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()).unwrap_or_default();
        match extension.as_str() {
            "svg" => MediaKind::Svg,
            "mp4" | "mov" | "m4v" | "webm" | "mkv" | "m3u8" => MediaKind::Video,
            "png" | "jpg" | "jpeg" | "bmp" | "gif" | "webp" => MediaKind::Image,
            _ => MediaKind::Unknown,
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind() == MediaKind::Video
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_takes_precedence_over_suffix() {
        let media = MediaRef::new("https://cdn.example.com/clip.jpg").with_content_type("video/mp4");
        assert_eq!(media.kind(), MediaKind::Video);
    }

    #[test]
    fn svg_is_detected_from_either_source() {
        assert_eq!(MediaRef::new("logo.SVG").kind(), MediaKind::Svg);
        assert_eq!(MediaRef::new("logo").with_content_type("image/svg+xml").kind(), MediaKind::Svg);
    }

    #[test]
    fn suffix_ignores_query_string() {
        let media = MediaRef::new("https://videos.example.com/hero.mp4?fm=webm&q=80");
        assert!(media.is_video());
    }

    #[test]
    fn unrecognised_media_is_unknown() {
        assert_eq!(MediaRef::new("https://example.com/asset").kind(), MediaKind::Unknown);
        assert_eq!(MediaRef::new("notes.txt").kind(), MediaKind::Unknown);
    }
}

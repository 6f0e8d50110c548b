use crate::media::MediaRef;

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub title: String,
    pub eyebrow_media: Option<MediaRef>,
    pub eyebrow_text: String,
    pub target_url: String,
    pub background_media: Option<MediaRef>,
    pub dark_backdrop: bool,
}

impl Slide {
    /// A slide can be shown only with a title, an eyebrow text and a background.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.eyebrow_text.trim().is_empty()
            && self.background_media.as_ref().is_some_and(|media| !media.url.trim().is_empty())
    }

    pub fn has_video(&self) -> bool {
        self.background_media.as_ref().is_some_and(MediaRef::is_video)
    }

    pub fn video(&self) -> Option<&MediaRef> {
        self.background_media.as_ref().filter(|media| media.is_video())
    }
}

#[cfg(test)]
pub(crate) fn sample_slide(title: &str, background: Option<MediaRef>) -> Slide {
    Slide {
        title: title.to_string(),
        eyebrow_media: None,
        eyebrow_text: format!("{title} eyebrow"),
        target_url: format!("https://example.com/{}", title.to_lowercase()),
        background_media: background,
        dark_backdrop: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_slide_needs_title_eyebrow_and_background() {
        let slide = sample_slide("One", Some(MediaRef::new("one.jpg")));
        assert!(slide.is_complete());

        let mut missing_title = slide.clone();
        missing_title.title = "  ".to_string();
        assert!(!missing_title.is_complete());

        let mut missing_eyebrow = slide.clone();
        missing_eyebrow.eyebrow_text.clear();
        assert!(!missing_eyebrow.is_complete());

        let missing_background = sample_slide("One", None);
        assert!(!missing_background.is_complete());
    }

    #[test]
    fn eyebrow_media_and_target_url_are_optional() {
        let mut slide = sample_slide("Two", Some(MediaRef::new("two.png")));
        slide.target_url.clear();
        slide.eyebrow_media = None;
        assert!(slide.is_complete());
    }

    #[test]
    fn video_is_reported_only_for_video_backgrounds() {
        let image = sample_slide("Image", Some(MediaRef::new("a.png")));
        let video = sample_slide("Video", Some(MediaRef::new("a.mp4")));
        assert!(!image.has_video());
        assert!(image.video().is_none());
        assert!(video.has_video());
        assert_eq!(video.video().map(|m| m.url.as_str()), Some("a.mp4"));
    }
}

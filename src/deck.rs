use serde::Deserialize;

use crate::constants::SLIDE_SLOTS;
use crate::media::MediaRef;
use crate::slide::Slide;

/// The hero slider record as the content source delivers it: five positional
/// slots, every field optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawHeroSlider {
    pub slide1_title: Option<String>,
    pub slide1_eyebrow_image: Option<MediaRef>,
    pub slide1_eyebrow_text: Option<String>,
    pub slide1_target_url: Option<String>,
    pub slide1_mobile_image_or_video: Option<MediaRef>,
    pub slide1_enable_dark_backdrop: Option<bool>,

    pub slide2_title: Option<String>,
    pub slide2_eyebrow_image: Option<MediaRef>,
    pub slide2_eyebrow_text: Option<String>,
    pub slide2_target_url: Option<String>,
    pub slide2_mobile_image_or_video: Option<MediaRef>,
    pub slide2_enable_dark_backdrop: Option<bool>,

    pub slide3_title: Option<String>,
    pub slide3_eyebrow_image: Option<MediaRef>,
    pub slide3_eyebrow_text: Option<String>,
    pub slide3_target_url: Option<String>,
    pub slide3_mobile_image_or_video: Option<MediaRef>,
    pub slide3_enable_dark_backdrop: Option<bool>,

    // Slot 4 names its link differently in the content model
    pub slide4_title: Option<String>,
    pub slide4_eyebrow_image: Option<MediaRef>,
    pub slide4_eyebrow_text: Option<String>,
    pub slide4_target_link: Option<String>,
    pub slide4_mobile_image_or_video: Option<MediaRef>,
    pub slide4_enable_dark_backdrop: Option<bool>,

    pub slide5_title: Option<String>,
    pub slide5_eyebrow_image: Option<MediaRef>,
    pub slide5_eyebrow_text: Option<String>,
    pub slide5_target_url: Option<String>,
    pub slide5_mobile_image_or_video: Option<MediaRef>,
    pub slide5_enable_dark_backdrop: Option<bool>,
}

impl RawHeroSlider {
    fn slots(&self) -> [Slide; SLIDE_SLOTS] {
        [
            slot(&self.slide1_title, &self.slide1_eyebrow_image, &self.slide1_eyebrow_text, &self.slide1_target_url, &self.slide1_mobile_image_or_video, self.slide1_enable_dark_backdrop),
            slot(&self.slide2_title, &self.slide2_eyebrow_image, &self.slide2_eyebrow_text, &self.slide2_target_url, &self.slide2_mobile_image_or_video, self.slide2_enable_dark_backdrop),
            slot(&self.slide3_title, &self.slide3_eyebrow_image, &self.slide3_eyebrow_text, &self.slide3_target_url, &self.slide3_mobile_image_or_video, self.slide3_enable_dark_backdrop),
            slot(&self.slide4_title, &self.slide4_eyebrow_image, &self.slide4_eyebrow_text, &self.slide4_target_link, &self.slide4_mobile_image_or_video, self.slide4_enable_dark_backdrop),
            slot(&self.slide5_title, &self.slide5_eyebrow_image, &self.slide5_eyebrow_text, &self.slide5_target_url, &self.slide5_mobile_image_or_video, self.slide5_enable_dark_backdrop),
        ]
    }
}

fn slot(
    title: &Option<String>,
    eyebrow_media: &Option<MediaRef>,
    eyebrow_text: &Option<String>,
    target_url: &Option<String>,
    background_media: &Option<MediaRef>,
    dark_backdrop: Option<bool>,
) -> Slide {
    Slide {
        title: title.clone().unwrap_or_default(),
        eyebrow_media: eyebrow_media.clone(),
        eyebrow_text: eyebrow_text.clone().unwrap_or_default(),
        target_url: target_url.clone().unwrap_or_default(),
        background_media: background_media.clone(),
        dark_backdrop: dark_backdrop.unwrap_or(false),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeckPolicy {
    /// Drop slides missing a title, eyebrow text or background.
    #[default]
    CompleteOnly,
    /// Keep every slot, in order.
    KeepAll,
}

/// Ordered, immutable sequence of slides. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideDeck {
    slides: Vec<Slide>,
}

impl SlideDeck {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }

    pub fn from_raw(raw: &RawHeroSlider, policy: DeckPolicy) -> Self {
        let mut slides = Vec::with_capacity(SLIDE_SLOTS);
        for (position, slide) in raw.slots().into_iter().enumerate() {
            match policy {
                DeckPolicy::KeepAll => slides.push(slide),
                DeckPolicy::CompleteOnly if slide.is_complete() => slides.push(slide),
                DeckPolicy::CompleteOnly => {
                    tracing::debug!(slot = position + 1, "skipping incomplete slide");
                }
            }
        }
        Self { slides }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    pub fn videos(&self) -> impl Iterator<Item = &MediaRef> {
        self.slides.iter().filter_map(Slide::video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_from_json(json: &str) -> RawHeroSlider {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn maps_positional_slots_in_order_including_slot_four_link() {
        let raw = raw_from_json(
            r#"{
                "slide1Title": "First", "slide1EyebrowText": "one", "slide1TargetUrl": "/one",
                "slide1MobileImageOrVideo": { "url": "one.mp4", "contentType": "video/mp4" },
                "slide1EnableDarkBackdrop": true,
                "slide4Title": "Fourth", "slide4EyebrowText": "four", "slide4TargetLink": "/four",
                "slide4MobileImageOrVideo": { "url": "four.jpg" }
            }"#,
        );

        let deck = SlideDeck::from_raw(&raw, DeckPolicy::CompleteOnly);
        assert_eq!(deck.len(), 2);

        let first = deck.get(0).unwrap();
        assert_eq!(first.title, "First");
        assert!(first.dark_backdrop);
        assert!(first.has_video());

        let fourth = deck.get(1).unwrap();
        assert_eq!(fourth.title, "Fourth");
        assert_eq!(fourth.target_url, "/four");
        assert!(!fourth.dark_backdrop);
    }

    #[test]
    fn keep_all_preserves_every_slot() {
        let raw = raw_from_json(r#"{ "slide2Title": "Only title" }"#);
        let deck = SlideDeck::from_raw(&raw, DeckPolicy::KeepAll);
        assert_eq!(deck.len(), SLIDE_SLOTS);
        assert_eq!(deck.get(1).unwrap().title, "Only title");
        assert!(!deck.get(1).unwrap().is_complete());
    }

    #[test]
    fn empty_record_yields_empty_deck() {
        let deck = SlideDeck::from_raw(&RawHeroSlider::default(), DeckPolicy::CompleteOnly);
        assert!(deck.is_empty());
        assert_eq!(deck.videos().count(), 0);
    }

    #[test]
    fn videos_lists_only_video_backgrounds() {
        let raw = raw_from_json(
            r#"{
                "slide1Title": "A", "slide1EyebrowText": "a", "slide1MobileImageOrVideo": { "url": "a.mp4" },
                "slide2Title": "B", "slide2EyebrowText": "b", "slide2MobileImageOrVideo": { "url": "b.png" },
                "slide3Title": "C", "slide3EyebrowText": "c", "slide3MobileImageOrVideo": { "url": "c", "contentType": "video/webm" }
            }"#,
        );
        let deck = SlideDeck::from_raw(&raw, DeckPolicy::CompleteOnly);
        let urls: Vec<_> = deck.videos().map(|m| m.url.as_str()).collect();
        assert_eq!(urls, vec!["a.mp4", "c"]);
    }
}

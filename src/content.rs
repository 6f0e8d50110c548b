use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::deck::RawHeroSlider;
use crate::error::ContentError;

/// Supplies the raw hero slider record. Called once per session; no retry or caching.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_hero(&self) -> Result<RawHeroSlider, ContentError>;
}

/// Reads the record from a JSON file, either bare or wrapped in a
/// `{ "data": { "blockHomeHeroSlider": ... } }` query response.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HeroDocument {
    Envelope { data: HeroData },
    Bare(RawHeroSlider),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeroData {
    block_home_hero_slider: RawHeroSlider,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn parse_hero(path: &Path, text: &str) -> Result<RawHeroSlider, ContentError> {
    let document: HeroDocument = serde_json::from_str(text)
        .map_err(|source| ContentError::Parse { path: path.to_path_buf(), source })?;
    Ok(match document {
        HeroDocument::Envelope { data } => data.block_home_hero_slider,
        HeroDocument::Bare(raw) => raw,
    })
}

#[async_trait]
impl ContentSource for JsonFileSource {
    async fn fetch_hero(&self) -> Result<RawHeroSlider, ContentError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ContentError::Read { path: self.path.clone(), source })?;
        parse_hero(&self.path, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{DeckPolicy, SlideDeck};

    #[test]
    fn accepts_bare_record() {
        let raw = parse_hero(Path::new("hero.json"), r#"{ "slide1Title": "Hello" }"#).unwrap();
        assert_eq!(raw.slide1_title.as_deref(), Some("Hello"));
    }

    #[test]
    fn accepts_query_envelope() {
        let raw = parse_hero(
            Path::new("hero.json"),
            r#"{ "data": { "blockHomeHeroSlider": {
                "slide2Title": "Wrapped", "slide2EyebrowText": "eyebrow",
                "slide2MobileImageOrVideo": { "url": "bg.jpg", "contentType": "image/jpeg" }
            } } }"#,
        )
        .unwrap();
        let deck = SlideDeck::from_raw(&raw, DeckPolicy::CompleteOnly);
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.get(0).unwrap().title, "Wrapped");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_hero(Path::new("broken.json"), "{ not json").unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let source = JsonFileSource::new("/nonexistent/stories/hero.json");
        let err = source.fetch_hero().await.unwrap_err();
        assert!(matches!(err, ContentError::Read { .. }));
    }

    #[tokio::test]
    async fn reads_record_from_disk() {
        let path = std::env::temp_dir().join(format!("stories-hero-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{ "slide5Title": "From disk" }"#).await.unwrap();
        let raw = JsonFileSource::new(&path).fetch_hero().await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();
        assert_eq!(raw.slide5_title.as_deref(), Some("From disk"));
    }
}

pub mod config;
pub mod constants;
pub mod content;
pub mod deck;
pub mod error;
pub mod ffmpeg;
pub mod media;
pub mod navigation;
pub mod orchestrator;
pub mod playback;
pub mod player;
pub mod progress;
pub mod session;
pub mod slide;
pub mod state;
pub mod timer;

#[cfg(feature = "viewer")]
pub mod texture_loader;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use config::CarouselConfig;
pub use deck::{DeckPolicy, RawHeroSlider, SlideDeck};
pub use orchestrator::{Orchestrator, OrchestratorState, RenderState};
pub use session::{CarouselSession, SessionHandles, SessionSummary};
pub use state::{CarouselState, SlideSignal, Transition, TransitionCause, Visit};

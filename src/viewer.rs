use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use raylib::prelude::*;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::Instant;

use crate::config::CarouselConfig;
use crate::constants::*;
use crate::deck::SlideDeck;
use crate::media::MediaRef;
use crate::navigation::NavIntent;
use crate::orchestrator::RenderState;
use crate::player::ClockedPlayer;
use crate::session::{CarouselSession, SessionHandles};
use crate::texture_loader::{load_texture_with_exif_rotation, local_image_path};

// Textures keyed by URL; None marks media that failed to load so it is not retried every frame
type TextureCache = HashMap<String, Option<Texture2D>>;

pub fn run(runtime: &Runtime, deck: SlideDeck, player: ClockedPlayer, config: &CarouselConfig) -> Result<()> {
    let (session, handles) = CarouselSession::new(deck, player, config);
    let SessionHandles { intents, render } = handles;
    let session_task = runtime.spawn(session.run(std::future::pending()));

    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH, RENDER_HEIGHT)
        .title("Stories")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // Declared after the window so textures are unloaded before it closes
    let mut textures = TextureCache::new();

    while !rl.window_should_close() {
        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) || rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            send_intent(&intents, NavIntent::Next);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            send_intent(&intents, NavIntent::Previous);
        }

        let frame = render.borrow().clone();
        let fractions = frame.fractions(Instant::now());

        if let Some(slide) = &frame.slide {
            for media in [slide.background_media.as_ref(), slide.eyebrow_media.as_ref()].into_iter().flatten() {
                ensure_texture(&mut rl, &thread, &mut textures, media);
            }
        }

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        draw_frame(&mut d, &frame, &fractions, &textures);
    }

    // Closing the input ends the session, which tears the carousel down
    drop(intents);
    let summary = runtime.block_on(session_task)?;
    tracing::info!(transitions = summary.transitions, loops = summary.loops, "viewer closed");
    Ok(())
}

/// Shows a load failure for a few seconds, the way the window reports errors.
pub fn show_error(message: &str) {
    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH, RENDER_HEIGHT)
        .title("Stories")
        .build();
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    let mut d = rl.begin_drawing(&thread);
    d.clear_background(Color::BLACK);
    d.draw_text(&format!("Error: {}", message), 20, 20, 20, Color::RED);
    drop(d);
    std::thread::sleep(Duration::from_secs(5));
}

fn send_intent(intents: &Sender<NavIntent>, intent: NavIntent) {
    match intents.try_send(intent) {
        Ok(()) => tracing::debug!(?intent, "queued navigation"),
        Err(TrySendError::Full(_)) => tracing::debug!(?intent, "navigation queue full, key press dropped"),
        Err(TrySendError::Closed(_)) => tracing::warn!("carousel session is gone"),
    }
}

fn ensure_texture(rl: &mut RaylibHandle, thread: &RaylibThread, textures: &mut TextureCache, media: &MediaRef) {
    if textures.contains_key(&media.url) {
        return;
    }
    let texture = local_image_path(media).and_then(|path| load_texture_with_exif_rotation(rl, thread, &path));
    match texture {
        Ok(texture) => {
            textures.insert(media.url.clone(), Some(texture));
        }
        Err(e) => {
            tracing::warn!(url = %media.url, error = %e, "media unavailable, falling back");
            textures.insert(media.url.clone(), None);
        }
    }
}

fn texture_for<'a>(textures: &'a TextureCache, media: Option<&MediaRef>) -> Option<&'a Texture2D> {
    media.and_then(|media| textures.get(&media.url)).and_then(Option::as_ref)
}

fn draw_frame(d: &mut RaylibDrawHandle, frame: &RenderState, fractions: &[f32], textures: &TextureCache) {
    // Idle carousel renders nothing
    let Some(slide) = &frame.slide else {
        return;
    };

    let sw = d.get_screen_width() as f32;
    let sh = d.get_screen_height() as f32;

    // --- Background, scaled to cover the screen ---
    if let Some(texture) = texture_for(textures, slide.background_media.as_ref()) {
        let tw = texture.width() as f32;
        let th = texture.height() as f32;
        let scale = (sw / tw).max(sh / th);
        let (dw, dh) = (tw * scale, th * scale);
        d.draw_texture_pro(
            texture,
            Rectangle::new(0.0, 0.0, tw, th),
            Rectangle::new((sw - dw) * 0.5, (sh - dh) * 0.5, dw, dh),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
    } else if slide.has_video() {
        d.draw_text("VIDEO", 20, sh as i32 / 2, 20, Color::GRAY);
    }

    if slide.dark_backdrop {
        d.draw_rectangle(0, 0, sw as i32, sh as i32, Color::new(0, 0, 0, 128));
    }

    // --- Eyebrow image, or its text when the image is missing ---
    let eyebrow_y = sh as i32 / 2 - 80;
    match texture_for(textures, slide.eyebrow_media.as_ref()) {
        Some(texture) => {
            let scale = 40.0 / texture.height().max(1) as f32;
            d.draw_texture_ex(texture, Vector2::new(40.0, eyebrow_y as f32), 0.0, scale, Color::WHITE);
        }
        None => d.draw_text(&slide.eyebrow_text, 40, eyebrow_y, 16, Color::WHITE),
    }

    d.draw_text(&slide.title.to_uppercase(), 40, eyebrow_y + 48, 42, Color::WHITE);

    // --- Progress bars, centered along the bottom ---
    let count = fractions.len() as i32;
    let total_width = count * PROGRESS_BAR_WIDTH + (count - 1).max(0) * PROGRESS_BAR_GAP;
    let mut x = (sw as i32 - total_width) / 2;
    let y = sh as i32 - 60;
    for fraction in fractions {
        d.draw_rectangle(x, y, PROGRESS_BAR_WIDTH, PROGRESS_BAR_HEIGHT, Color::new(255, 255, 255, 77));
        let filled = (PROGRESS_BAR_WIDTH as f32 * fraction).round() as i32;
        d.draw_rectangle(x, y, filled, PROGRESS_BAR_HEIGHT, Color::WHITE);
        x += PROGRESS_BAR_WIDTH + PROGRESS_BAR_GAP;
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::media::MediaRef;
use crate::playback::{MediaElement, PlaybackStatus};

/// Media element that plays by the clock: position is wall time since
/// `play()`, duration comes from a table probed ahead of time.
pub struct ClockedPlayer {
    durations: HashMap<String, Duration>,
    interval: Duration,
    statuses: broadcast::Sender<PlaybackStatus>,
    loaded: Option<Duration>,
    ticker: Option<(JoinHandle<()>, Arc<AtomicBool>)>,
}

impl ClockedPlayer {
    pub fn new(durations: HashMap<String, Duration>, interval: Duration) -> Self {
        let (statuses, _) = broadcast::channel(64);
        Self { durations, interval, statuses, loaded: None, ticker: None }
    }

    fn halt(&mut self) {
        if let Some((task, stopped)) = self.ticker.take() {
            stopped.store(true, Ordering::SeqCst);
            task.abort();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.ticker.is_some()
    }
}

impl MediaElement for ClockedPlayer {
    fn load(&mut self, media: &MediaRef) {
        self.halt();
        self.loaded = self.durations.get(&media.url).copied();
        if self.loaded.is_none() {
            tracing::warn!(url = %media.url, "video not loadable, no playback status will be reported");
        }
    }

    fn play(&mut self) {
        self.halt();
        let Some(duration) = self.loaded else {
            return;
        };

        let statuses = self.statuses.clone();
        let stopped = Arc::new(AtomicBool::new(false));
        let ticker_stopped = stopped.clone();
        let interval = self.interval;
        let task = tokio::spawn(async move {
            let started = Instant::now();
            let duration_millis = duration.as_millis() as u64;
            let mut ticks = tokio::time::interval(interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticks.tick().await;
                if ticker_stopped.load(Ordering::SeqCst) {
                    return;
                }
                let position_millis = (started.elapsed().as_millis() as u64).min(duration_millis);
                let did_just_finish = position_millis >= duration_millis;
                let _ = statuses.send(PlaybackStatus { is_loaded: true, did_just_finish, position_millis, duration_millis });
                if did_just_finish {
                    return;
                }
            }
        });
        self.ticker = Some((task, stopped));
    }

    fn stop(&mut self) {
        self.halt();
    }

    fn subscribe(&self) -> broadcast::Receiver<PlaybackStatus> {
        self.statuses.subscribe()
    }
}

impl Drop for ClockedPlayer {
    fn drop(&mut self) {
        self.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    fn player() -> ClockedPlayer {
        let durations = HashMap::from([("clip.mp4".to_string(), Duration::from_millis(1_000))]);
        ClockedPlayer::new(durations, Duration::from_millis(250))
    }

    #[tokio::test(start_paused = true)]
    async fn reports_progress_then_finishes() {
        let mut player = player();
        let mut statuses = player.subscribe();
        player.load(&MediaRef::new("clip.mp4"));
        player.play();

        let first = statuses.recv().await.unwrap();
        assert!(first.is_loaded);
        assert_eq!(first.position_millis, 0);
        assert_eq!(first.duration_millis, 1_000);

        let mut last = first;
        while !last.did_just_finish {
            let status = statuses.recv().await.unwrap();
            assert!(status.position_millis >= last.position_millis);
            last = status;
        }
        assert_eq!(last.position_millis, 1_000);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_silences_the_stream() {
        let mut player = player();
        let mut statuses = player.subscribe();
        player.load(&MediaRef::new("clip.mp4"));
        player.play();
        statuses.recv().await.unwrap();

        player.stop();
        assert!(!player.is_playing());
        assert!(timeout(Duration::from_secs(5), statuses.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_media_never_loads() {
        let mut player = player();
        let mut statuses = player.subscribe();
        player.load(&MediaRef::new("missing.mp4"));
        player.play();
        assert!(!player.is_playing());
        assert!(timeout(Duration::from_secs(5), statuses.recv()).await.is_err());
    }
}

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::media::MediaRef;
use crate::state::{SlideSignal, Visit};

/// Status update reported by a media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackStatus {
    pub is_loaded: bool,
    pub did_just_finish: bool,
    pub position_millis: u64,
    pub duration_millis: u64,
}

/// Finished means loaded and either flagged as finished or within `tolerance`
/// of a known, non-zero end.
pub fn is_finished(status: &PlaybackStatus, tolerance: Duration) -> bool {
    if !status.is_loaded {
        return false;
    }
    if status.did_just_finish {
        return true;
    }
    let tolerance = tolerance.as_millis() as u64;
    status.position_millis > 0
        && status.duration_millis > 0
        && status.position_millis >= status.duration_millis.saturating_sub(tolerance)
}

/// The single playback surface shared by all slides. Only the current slide
/// drives it.
pub trait MediaElement: Send {
    fn load(&mut self, media: &MediaRef);
    fn play(&mut self);
    fn stop(&mut self);
    fn subscribe(&self) -> broadcast::Receiver<PlaybackStatus>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionHandle(u64);

struct Subscription {
    handle: SubscriptionHandle,
    visit: Visit,
    task: JoinHandle<()>,
}

/// Watches a media element's status stream on behalf of one visit and reports
/// `PlaybackFinished` at most once.
pub struct PlaybackMonitor {
    subscription: Option<Subscription>,
    tolerance: Duration,
    next_handle: u64,
}

impl PlaybackMonitor {
    pub fn new(tolerance: Duration) -> Self {
        Self { subscription: None, tolerance, next_handle: 0 }
    }

    /// Must be called from within a tokio runtime.
    pub fn subscribe(
        &mut self,
        visit: Visit,
        mut statuses: broadcast::Receiver<PlaybackStatus>,
        signals: UnboundedSender<SlideSignal>,
    ) -> SubscriptionHandle {
        self.unsubscribe_current();

        self.next_handle += 1;
        let handle = SubscriptionHandle(self.next_handle);
        let tolerance = self.tolerance;
        let task = tokio::spawn(async move {
            loop {
                match statuses.recv().await {
                    Ok(status) if is_finished(&status, tolerance) => {
                        let _ = signals.send(SlideSignal::PlaybackFinished(visit));
                        return;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "playback status stream lagged");
                    }
                    Err(RecvError::Closed) => return,
                }
            }
        });
        tracing::debug!(index = visit.index, generation = visit.generation, "playback monitor subscribed");

        self.subscription = Some(Subscription { handle, visit, task });
        handle
    }

    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        if self.subscription.as_ref().is_some_and(|sub| sub.handle == handle) {
            self.unsubscribe_current();
        }
    }

    fn unsubscribe_current(&mut self) {
        if let Some(sub) = self.subscription.take() {
            sub.task.abort();
            tracing::debug!(index = sub.visit.index, generation = sub.visit.generation, "playback monitor unsubscribed");
        }
    }

    pub fn subscribed_for(&self) -> Option<Visit> {
        self.subscription.as_ref().map(|sub| sub.visit)
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }
}

impl Drop for PlaybackMonitor {
    fn drop(&mut self) {
        self.unsubscribe_current();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    const TOLERANCE: Duration = Duration::from_millis(100);

    fn loaded(position_millis: u64, duration_millis: u64) -> PlaybackStatus {
        PlaybackStatus { is_loaded: true, did_just_finish: false, position_millis, duration_millis }
    }

    #[test]
    fn explicit_flag_finishes_loaded_media() {
        let status = PlaybackStatus { did_just_finish: true, ..loaded(0, 0) };
        assert!(is_finished(&status, TOLERANCE));

        let unloaded = PlaybackStatus { is_loaded: false, ..status };
        assert!(!is_finished(&unloaded, TOLERANCE));
    }

    #[test]
    fn position_within_tolerance_finishes() {
        assert!(!is_finished(&loaded(3_899, 4_000), TOLERANCE));
        assert!(is_finished(&loaded(3_900, 4_000), TOLERANCE));
        assert!(is_finished(&loaded(4_000, 4_000), TOLERANCE));
    }

    #[test]
    fn unknown_position_or_duration_never_finishes() {
        assert!(!is_finished(&loaded(0, 50), TOLERANCE));
        assert!(!is_finished(&loaded(500, 0), TOLERANCE));
        assert!(!is_finished(&PlaybackStatus::default(), TOLERANCE));
    }

    #[tokio::test(start_paused = true)]
    async fn reports_finished_once_per_subscription() {
        let (status_tx, _) = broadcast::channel(16);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut monitor = PlaybackMonitor::new(TOLERANCE);
        let visit = Visit { index: 1, generation: 3 };
        monitor.subscribe(visit, status_tx.subscribe(), tx.clone());
        tokio::task::yield_now().await;

        status_tx.send(loaded(1_000, 4_000)).unwrap();
        status_tx.send(loaded(3_950, 4_000)).unwrap();
        status_tx.send(PlaybackStatus { did_just_finish: true, ..loaded(4_000, 4_000) }).unwrap();

        assert_eq!(rx.recv().await.unwrap(), SlideSignal::PlaybackFinished(visit));
        assert!(timeout(Duration::from_secs(5), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn unsubscribed_monitor_stays_silent() {
        let (status_tx, _) = broadcast::channel(16);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut monitor = PlaybackMonitor::new(TOLERANCE);
        let handle = monitor.subscribe(Visit { index: 0, generation: 1 }, status_tx.subscribe(), tx.clone());
        monitor.unsubscribe(handle);
        monitor.unsubscribe(handle);
        assert!(!monitor.is_subscribed());

        let _ = status_tx.send(PlaybackStatus { did_just_finish: true, ..loaded(10, 10) });
        assert!(timeout(Duration::from_secs(5), rx.recv()).await.is_err());
    }
}

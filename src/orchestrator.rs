use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;

use crate::config::CarouselConfig;
use crate::deck::SlideDeck;
use crate::playback::{MediaElement, PlaybackMonitor, SubscriptionHandle};
use crate::progress::ProgressTrack;
use crate::slide::Slide;
use crate::state::{CarouselState, SlideSignal, Transition, TransitionCause, Visit};
use crate::timer::{DeadlineTimer, TimerHandle};

/// Snapshot of what the orchestrator currently holds armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorState {
    pub current_index: Option<usize>,
    pub active_deadline: Option<TimerHandle>,
    pub active_playback: Option<SubscriptionHandle>,
}

/// Everything the render layer needs for one frame.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub state: CarouselState,
    pub slide: Option<Slide>,
    pub progress: ProgressTrack,
}

impl RenderState {
    pub fn idle() -> Self {
        Self { state: CarouselState::Idle, slide: None, progress: ProgressTrack::new(Duration::ZERO) }
    }

    pub fn fractions(&self, now: Instant) -> Vec<f32> {
        self.progress.fractions(now)
    }
}

pub struct Orchestrator<P: MediaElement> {
    deck: SlideDeck,
    state: CarouselState,
    armed: Option<Visit>,
    generation: u64,

    progress: ProgressTrack,
    deadline: DeadlineTimer,
    playback: PlaybackMonitor,
    player: P,

    active_deadline: Option<TimerHandle>,
    active_playback: Option<SubscriptionHandle>,
    playing: bool,

    signals: UnboundedSender<SlideSignal>,
    slide_duration: Duration,
}

impl<P: MediaElement> Orchestrator<P> {
    pub fn new(deck: SlideDeck, player: P, signals: UnboundedSender<SlideSignal>, config: &CarouselConfig) -> Self {
        let mut progress = ProgressTrack::new(config.slide_duration);
        progress.reset(deck.len());
        Self {
            deck,
            state: CarouselState::Idle,
            armed: None,
            generation: 0,
            progress,
            deadline: DeadlineTimer::new(),
            playback: PlaybackMonitor::new(config.finish_tolerance),
            player,
            active_deadline: None,
            active_playback: None,
            playing: false,
            signals,
            slide_duration: config.slide_duration,
        }
    }

    /// Shows the first slide. Stays idle on an empty deck.
    pub fn start(&mut self) -> Option<Transition> {
        if self.deck.is_empty() {
            tracing::info!("deck is empty, carousel stays idle");
            return None;
        }
        Some(self.transition(0, TransitionCause::Start))
    }

    /// Swaps in a rebuilt deck and starts it from the first slide.
    pub fn replace_deck(&mut self, deck: SlideDeck) -> Option<Transition> {
        self.teardown();
        self.deck = deck;
        self.progress.reset(self.deck.len());
        self.start()
    }

    /// Acts on the first completion signal of the armed visit; anything else is stale.
    pub fn handle_signal(&mut self, signal: SlideSignal) -> Option<Transition> {
        let visit = signal.visit();
        if self.armed != Some(visit) {
            tracing::debug!(?signal, armed = ?self.armed, "discarding stale signal");
            return None;
        }

        // The winner cancels the other signal before anything else happens
        let cause = match signal {
            SlideSignal::Expired(_) => {
                self.release_playback();
                TransitionCause::Deadline
            }
            SlideSignal::PlaybackFinished(_) => {
                self.release_deadline();
                TransitionCause::PlaybackFinished
            }
        };
        self.step_forward(cause)
    }

    pub fn advance(&mut self) -> Option<Transition> {
        self.step_forward(TransitionCause::Deadline)
    }

    pub fn next(&mut self) -> Option<Transition> {
        self.step_forward(TransitionCause::Next)
    }

    pub fn previous(&mut self) -> Option<Transition> {
        let CarouselState::Showing(index) = self.state else {
            return None;
        };
        let len = self.deck.len();
        Some(self.transition((index + len - 1) % len, TransitionCause::Previous))
    }

    fn step_forward(&mut self, cause: TransitionCause) -> Option<Transition> {
        let CarouselState::Showing(index) = self.state else {
            return None;
        };
        Some(self.transition((index + 1) % self.deck.len(), cause))
    }

    /// Leaves the current slide and enters `to` in one step: nothing of the old
    /// visit stays armed once this returns.
    fn transition(&mut self, to: usize, cause: TransitionCause) -> Transition {
        let now = Instant::now();
        let from = match self.state {
            CarouselState::Showing(index) => Some(index),
            CarouselState::Idle => None,
        };
        if let Some(index) = from {
            self.release_deadline();
            self.release_playback();
            self.progress.cancel(index, now);
        }

        self.generation += 1;
        let visit = Visit { index: to, generation: self.generation };
        self.armed = Some(visit);
        self.state = CarouselState::Showing(to);

        self.progress.enter(to, now);
        self.active_deadline = Some(self.deadline.arm(visit, self.slide_duration, self.signals.clone()));

        if let Some(video) = self.deck.get(to).and_then(Slide::video) {
            // Subscribe before loading so no status of the new media is missed
            let statuses = self.player.subscribe();
            self.active_playback = Some(self.playback.subscribe(visit, statuses, self.signals.clone()));
            self.player.load(video);
            self.player.play();
            self.playing = true;
        }

        let transition = Transition { from, to, cause };
        tracing::info!(from = ?transition.from, to, cause = ?cause, generation = visit.generation, "slide entered");
        transition
    }

    fn release_deadline(&mut self) {
        if let Some(handle) = self.active_deadline.take() {
            self.deadline.disarm(handle);
        }
    }

    fn release_playback(&mut self) {
        if let Some(handle) = self.active_playback.take() {
            self.playback.unsubscribe(handle);
        }
        if self.playing {
            self.player.stop();
            self.playing = false;
        }
    }

    /// Disarms everything and goes idle. Signals delivered afterwards are discarded.
    pub fn teardown(&mut self) {
        if let CarouselState::Showing(index) = self.state {
            self.progress.cancel(index, Instant::now());
        }
        self.release_deadline();
        self.release_playback();
        self.armed = None;
        self.state = CarouselState::Idle;
    }

    pub fn state(&self) -> CarouselState {
        self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            CarouselState::Showing(index) => Some(index),
            CarouselState::Idle => None,
        }
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.current_index().and_then(|index| self.deck.get(index))
    }

    pub fn current_visit(&self) -> Option<Visit> {
        self.armed
    }

    pub fn deck(&self) -> &SlideDeck {
        &self.deck
    }

    pub fn progress(&self) -> &ProgressTrack {
        &self.progress
    }

    pub fn fractions(&self, now: Instant) -> Vec<f32> {
        self.progress.fractions(now)
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn orchestrator_state(&self) -> OrchestratorState {
        OrchestratorState {
            current_index: self.current_index(),
            active_deadline: self.active_deadline,
            active_playback: self.active_playback,
        }
    }

    pub fn is_deadline_armed(&self) -> bool {
        self.deadline.is_armed()
    }

    pub fn is_playback_subscribed(&self) -> bool {
        self.playback.is_subscribed()
    }

    pub fn render_state(&self) -> RenderState {
        RenderState {
            state: self.state,
            slide: self.current_slide().cloned(),
            progress: self.progress.clone(),
        }
    }
}

impl<P: MediaElement> Drop for Orchestrator<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

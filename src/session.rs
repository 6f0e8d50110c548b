use std::future::Future;

use tokio::sync::{mpsc, watch};

use crate::config::CarouselConfig;
use crate::deck::SlideDeck;
use crate::navigation::{NavIntent, NavigationController};
use crate::orchestrator::{Orchestrator, RenderState};
use crate::playback::MediaElement;
use crate::state::{SlideSignal, Transition, TransitionCause};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub transitions: u64,
    pub loops: u32,
}

/// Handles the host keeps to drive and observe a running session.
pub struct SessionHandles {
    pub intents: mpsc::Sender<NavIntent>,
    pub render: watch::Receiver<RenderState>,
}

/// Runs one carousel: every notification (deadline, playback, user input) is
/// handled to completion before the next one is looked at.
pub struct CarouselSession<P: MediaElement> {
    orchestrator: Orchestrator<P>,
    navigation: NavigationController,
    signals: mpsc::UnboundedReceiver<SlideSignal>,
    intents: mpsc::Receiver<NavIntent>,
    render: watch::Sender<RenderState>,
    max_loops: Option<u32>,
}

impl<P: MediaElement> CarouselSession<P> {
    pub fn new(deck: SlideDeck, player: P, config: &CarouselConfig) -> (Self, SessionHandles) {
        let (signal_tx, signals) = mpsc::unbounded_channel();
        let (intent_tx, intents) = mpsc::channel(16);
        let (render, render_rx) = watch::channel(RenderState::idle());

        let session = Self {
            orchestrator: Orchestrator::new(deck, player, signal_tx, config),
            navigation: NavigationController::new(),
            signals,
            intents,
            render,
            max_loops: config.max_loops,
        };
        (session, SessionHandles { intents: intent_tx, render: render_rx })
    }

    /// Runs until `shutdown` resolves, every intent sender is gone, or the
    /// configured number of loops has been shown. Always tears down before returning.
    pub async fn run<F>(mut self, shutdown: F) -> SessionSummary
    where
        F: Future<Output = ()>,
    {
        let mut summary = SessionSummary::default();
        tokio::pin!(shutdown);

        if let Some(transition) = self.orchestrator.start() {
            self.record(&mut summary, transition);
        }
        self.publish();

        if self.orchestrator.deck().is_empty() {
            // Nothing will ever be armed; just wait for the host to go away
            tokio::select! {
                _ = &mut shutdown => {}
                _ = async { while self.intents.recv().await.is_some() {} } => {}
            }
            return summary;
        }

        loop {
            let transition = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    break;
                }
                Some(signal) = self.signals.recv() => self.orchestrator.handle_signal(signal),
                intent = self.intents.recv() => match intent {
                    Some(intent) => self.navigation.apply(&mut self.orchestrator, intent),
                    None => {
                        tracing::info!("input closed");
                        break;
                    }
                },
            };

            if let Some(transition) = transition {
                self.record(&mut summary, transition);
                self.publish();
            }

            if self.max_loops.is_some_and(|max| summary.loops >= max) {
                tracing::info!(loops = summary.loops, "loop limit reached");
                break;
            }
        }

        self.orchestrator.teardown();
        self.publish();
        summary
    }

    fn record(&self, summary: &mut SessionSummary, transition: Transition) {
        summary.transitions += 1;
        let automatic = matches!(transition.cause, TransitionCause::Deadline | TransitionCause::PlaybackFinished);
        if automatic && transition.to == 0 {
            summary.loops += 1;
        }
    }

    fn publish(&self) {
        self.render.send_replace(self.orchestrator.render_state());
    }
}

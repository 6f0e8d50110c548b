use crate::orchestrator::Orchestrator;
use crate::playback::MediaElement;
use crate::state::Transition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    Next,
    Previous,
}

/// A line of user input, as the headless host reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Navigate(NavIntent),
    Quit,
}

impl HostCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "n" | "next" | ">" => Some(HostCommand::Navigate(NavIntent::Next)),
            "p" | "prev" | "previous" | "<" => Some(HostCommand::Navigate(NavIntent::Previous)),
            "q" | "quit" | "exit" => Some(HostCommand::Quit),
            _ => None,
        }
    }
}

/// Manual navigation. Not subject to the deadline/playback race: it always
/// moves immediately and cancels whatever the current slide had armed.
#[derive(Debug, Default)]
pub struct NavigationController {
    manual_moves: u64,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply<P: MediaElement>(&mut self, orchestrator: &mut Orchestrator<P>, intent: NavIntent) -> Option<Transition> {
        let transition = match intent {
            NavIntent::Next => orchestrator.next(),
            NavIntent::Previous => orchestrator.previous(),
        };
        if transition.is_some() {
            self.manual_moves += 1;
        } else {
            tracing::debug!(?intent, "navigation ignored, carousel is idle");
        }
        transition
    }

    pub fn manual_moves(&self) -> u64 {
        self.manual_moves
    }
}

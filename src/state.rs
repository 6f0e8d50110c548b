#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CarouselState {
    Idle,           // Empty deck or torn down, nothing armed
    Showing(usize), // Displaying the slide at this index
}

/// One stay on a slide. The generation makes two visits to the same index distinct.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Visit {
    pub index: usize,
    pub generation: u64,
}

/// Completion notifications racing to end a visit.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SlideSignal {
    Expired(Visit),
    PlaybackFinished(Visit),
}

impl SlideSignal {
    pub fn visit(&self) -> Visit {
        match self {
            SlideSignal::Expired(visit) | SlideSignal::PlaybackFinished(visit) => *visit,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TransitionCause {
    Start,
    Deadline,
    PlaybackFinished,
    Next,
    Previous,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Transition {
    pub from: Option<usize>,
    pub to: usize,
    pub cause: TransitionCause,
}

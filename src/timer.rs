use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::state::{SlideSignal, Visit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u64);

struct ArmedDeadline {
    handle: TimerHandle,
    visit: Visit,
    task: JoinHandle<()>,
}

/// Single cancellable deadline. Arming again replaces whatever was armed.
pub struct DeadlineTimer {
    armed: Option<ArmedDeadline>,
    next_handle: u64,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self { armed: None, next_handle: 0 }
    }

    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, visit: Visit, duration: Duration, signals: UnboundedSender<SlideSignal>) -> TimerHandle {
        self.disarm_current();

        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        let task = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            // Receiver gone means the session ended
            let _ = signals.send(SlideSignal::Expired(visit));
        });
        tracing::debug!(index = visit.index, generation = visit.generation, ?duration, "deadline armed");

        self.armed = Some(ArmedDeadline { handle, visit, task });
        handle
    }

    /// Cancels `handle` if it is still the armed one; anything else is a no-op.
    pub fn disarm(&mut self, handle: TimerHandle) {
        if self.armed.as_ref().is_some_and(|armed| armed.handle == handle) {
            self.disarm_current();
        }
    }

    fn disarm_current(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.task.abort();
            tracing::debug!(index = armed.visit.index, generation = armed.visit.generation, "deadline disarmed");
        }
    }

    pub fn armed_for(&self) -> Option<Visit> {
        self.armed.as_ref().map(|armed| armed.visit)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

impl Default for DeadlineTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.disarm_current();
    }
}

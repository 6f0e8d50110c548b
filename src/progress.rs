use std::time::Duration;
use tokio::time::Instant;

/// Fraction of `duration` covered after `elapsed`, clamped to [0, 1].
pub fn ramp_fraction(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0) as f32
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Ramp {
    index: usize,
    started_at: Instant,
}

/// One progress fraction per slide. At most one of them ramps at a time, and
/// its value is computed from the sample time rather than stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTrack {
    fractions: Vec<f32>,
    ramp: Option<Ramp>,
    duration: Duration,
}

impl ProgressTrack {
    pub fn new(duration: Duration) -> Self {
        Self { fractions: Vec::new(), ramp: None, duration }
    }

    pub fn reset(&mut self, deck_len: usize) {
        self.fractions = vec![0.0; deck_len];
        self.ramp = None;
    }

    pub fn enter(&mut self, index: usize, now: Instant) {
        if index >= self.fractions.len() {
            return;
        }
        for (i, fraction) in self.fractions.iter_mut().enumerate() {
            *fraction = if i < index { 1.0 } else { 0.0 };
        }
        self.ramp = Some(Ramp { index, started_at: now });
    }

    /// Freezes the ramp of `index` at its value at `now`. No-op for any other index.
    pub fn cancel(&mut self, index: usize, now: Instant) {
        if let Some(ramp) = self.ramp.filter(|ramp| ramp.index == index) {
            self.fractions[index] = ramp_fraction(now.saturating_duration_since(ramp.started_at), self.duration);
            self.ramp = None;
        }
    }

    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }

    pub fn ramping_index(&self) -> Option<usize> {
        self.ramp.map(|ramp| ramp.index)
    }

    pub fn fraction(&self, index: usize, now: Instant) -> f32 {
        match self.ramp {
            Some(ramp) if ramp.index == index => {
                ramp_fraction(now.saturating_duration_since(ramp.started_at), self.duration)
            }
            _ => self.fractions.get(index).copied().unwrap_or(0.0),
        }
    }

    pub fn fractions(&self, now: Instant) -> Vec<f32> {
        (0..self.fractions.len()).map(|i| self.fraction(i, now)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const D: Duration = Duration::from_millis(10_000);

    #[test]
    fn ramp_fraction_is_clamped() {
        assert_eq!(ramp_fraction(Duration::ZERO, D), 0.0);
        assert_eq!(ramp_fraction(Duration::from_millis(2_500), D), 0.25);
        assert_eq!(ramp_fraction(Duration::from_millis(30_000), D), 1.0);
        assert_eq!(ramp_fraction(Duration::from_millis(5), Duration::ZERO), 1.0);
    }

    #[test]
    fn reset_allocates_zeroed_fractions() {
        let mut track = ProgressTrack::new(D);
        track.reset(4);
        assert_eq!(track.fractions(Instant::now()), vec![0.0; 4]);
        assert_eq!(track.ramping_index(), None);
    }

    #[test]
    fn enter_fills_earlier_and_clears_later_slides() {
        let start = Instant::now();
        let mut track = ProgressTrack::new(D);
        track.reset(4);
        track.enter(3, start);
        track.enter(1, start);

        let sampled = track.fractions(start + Duration::from_millis(5_000));
        assert_eq!(sampled, vec![1.0, 0.5, 0.0, 0.0]);
        assert_eq!(track.ramping_index(), Some(1));
    }

    #[test]
    fn ramp_is_monotonic_and_saturates() {
        let start = Instant::now();
        let mut track = ProgressTrack::new(D);
        track.reset(2);
        track.enter(0, start);

        let mut previous = 0.0;
        for ms in (0..=12_000).step_by(500) {
            let value = track.fraction(0, start + Duration::from_millis(ms));
            assert!(value >= previous);
            previous = value;
        }
        assert_eq!(previous, 1.0);
    }

    #[test]
    fn cancel_freezes_only_the_ramping_index() {
        let start = Instant::now();
        let mut track = ProgressTrack::new(D);
        track.reset(3);
        track.enter(1, start);

        track.cancel(0, start + Duration::from_millis(1_000));
        assert_eq!(track.ramping_index(), Some(1));

        track.cancel(1, start + Duration::from_millis(4_000));
        assert_eq!(track.ramping_index(), None);
        assert_eq!(track.fraction(1, start + Duration::from_millis(9_000)), 0.4);

        track.enter(2, start + Duration::from_millis(4_000));
        assert_eq!(track.fractions(start + Duration::from_millis(4_000)), vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn out_of_range_enter_is_ignored() {
        let start = Instant::now();
        let mut track = ProgressTrack::new(D);
        track.reset(0);
        track.enter(0, start);
        assert!(track.is_empty());
        assert_eq!(track.ramping_index(), None);
        assert_eq!(track.fraction(0, start), 0.0);
    }
}

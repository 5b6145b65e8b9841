use serde::Serialize;

use crate::domain::models::InitEvent;

/// Cumulative progress of one initialization run as seen by the consumer.
///
/// Both counters only grow. `current` may run ahead of `maximum` until a late length hint
/// arrives; that is a normal state, not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    maximum: u64,
    current: u64,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn maximum(&self) -> u64 {
        self.maximum
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn add_maximum(&mut self, added: u64) {
        self.maximum = self.maximum.saturating_add(added);
    }

    pub fn advance(&mut self, delta: u64) {
        self.current = self.current.saturating_add(delta);
    }

    /// Folds a progress event into the counters. Terminal events leave them untouched.
    pub fn apply(&mut self, event: &InitEvent) {
        match event {
            InitEvent::ContentLengthIncreased(added) => self.add_maximum(*added),
            InitEvent::ProgressAdvanced(delta) => self.advance(*delta),
            InitEvent::Failed(_) | InitEvent::Succeeded(_) => {}
        }
    }

    /// Upper bound for a progress bar, widened when `current` has overrun `maximum`.
    pub fn display_maximum(&self) -> u64 {
        self.maximum.max(self.current)
    }

    pub fn is_overrun(&self) -> bool {
        self.current > self.maximum
    }

    /// Completion percentage, clamped to 100. `None` while no length is known.
    pub fn percent(&self) -> Option<u8> {
        if self.maximum == 0 {
            return None;
        }
        let percent = (u128::from(self.current) * 100) / u128::from(self.maximum);
        Some(percent.min(100) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_hints_and_deltas() {
        let mut progress = ProgressState::new();
        assert_eq!(progress.percent(), None);

        progress.apply(&InitEvent::ContentLengthIncreased(1000));
        progress.apply(&InitEvent::ProgressAdvanced(200));
        assert_eq!(progress.percent(), Some(20));
        progress.apply(&InitEvent::ProgressAdvanced(300));
        progress.apply(&InitEvent::ProgressAdvanced(500));

        assert_eq!(progress.maximum(), 1000);
        assert_eq!(progress.current(), 1000);
        assert_eq!(progress.percent(), Some(100));
    }

    #[test]
    fn overrun_is_tolerated_until_the_next_hint() {
        let mut progress = ProgressState::new();
        progress.add_maximum(500);
        progress.advance(450);
        progress.advance(150);

        assert!(progress.is_overrun());
        assert_eq!(progress.display_maximum(), 600);
        assert_eq!(progress.percent(), Some(100));

        progress.add_maximum(300);
        assert!(!progress.is_overrun());
        assert_eq!(progress.maximum(), 800);
        assert_eq!(progress.display_maximum(), 800);
        assert_eq!(progress.percent(), Some(75));
    }

    #[test]
    fn counters_saturate_instead_of_wrapping() {
        let mut progress = ProgressState::new();
        progress.add_maximum(u64::MAX);
        progress.add_maximum(1);
        progress.advance(u64::MAX);
        progress.advance(5);
        assert_eq!(progress.maximum(), u64::MAX);
        assert_eq!(progress.current(), u64::MAX);
        assert_eq!(progress.percent(), Some(100));
    }
}

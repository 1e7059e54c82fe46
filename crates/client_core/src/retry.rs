/// Counter and flag governing automatic re-fetch after a failed list load.
///
/// `attempt_count` is zero whenever `is_retrying` is false; the fields are
/// private so the only way to move between the two is through the methods
/// below.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    attempt_count: u32,
    is_retrying: bool,
}

impl RetryState {
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn is_retrying(&self) -> bool {
        self.is_retrying
    }

    /// Enter auto-retry mode at attempt 1.
    pub fn begin(&mut self) {
        self.attempt_count = 1;
        self.is_retrying = true;
    }

    /// Count a failed fetch. Returns false (and changes nothing) outside auto-retry mode.
    pub fn record_failure(&mut self) -> bool {
        if !self.is_retrying {
            return false;
        }
        self.attempt_count = self.attempt_count.saturating_add(1);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn wants_timer(&self) -> bool {
        self.attempt_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    enum Step {
        Begin,
        Fail,
        Reset,
    }

    #[test]
    fn failures_outside_retry_mode_are_not_counted() {
        let mut retry = RetryState::default();
        assert!(!retry.record_failure());
        assert_eq!(retry, RetryState::default());
        assert!(!retry.wants_timer());
    }

    #[test]
    fn failures_in_retry_mode_increment_from_one() {
        let mut retry = RetryState::default();
        retry.begin();
        assert_eq!(retry.attempt_count(), 1);
        assert!(retry.record_failure());
        assert!(retry.record_failure());
        assert_eq!(retry.attempt_count(), 3);
        assert!(retry.is_retrying());
        assert!(retry.wants_timer());

        retry.reset();
        assert_eq!(retry.attempt_count(), 0);
        assert!(!retry.is_retrying());
    }

    #[test]
    fn counter_is_zero_whenever_not_retrying() {
        let sequences: &[&[Step]] = &[
            &[Step::Fail, Step::Begin, Step::Fail, Step::Reset, Step::Fail],
            &[Step::Begin, Step::Begin, Step::Fail, Step::Fail, Step::Fail],
            &[Step::Reset, Step::Fail, Step::Begin, Step::Reset, Step::Begin],
        ];

        for sequence in sequences {
            let mut retry = RetryState::default();
            for step in sequence.iter() {
                let before = retry;
                match step {
                    Step::Begin => retry.begin(),
                    Step::Fail => {
                        retry.record_failure();
                    }
                    Step::Reset => retry.reset(),
                }
                if !retry.is_retrying() {
                    assert_eq!(retry.attempt_count(), 0);
                }
                if matches!(step, Step::Fail) && retry.attempt_count() > before.attempt_count() {
                    assert!(before.is_retrying());
                }
            }
        }
    }
}

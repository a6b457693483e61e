/// Result of a single one-second tick on the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Not running; nothing changed.
    Idle,
    Ticked { remaining_secs: u32, time_low: bool },
    /// Reached zero on this tick; the countdown is now stopped.
    Expired,
}

/// State of the clock all matching groups share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SharedClock {
    remaining_secs: u32,
    low_flagged: bool,
}

/// One-second-resolution countdown bound to the current step.
///
/// Questions get a fresh clock on every entry. Matching groups share one clock
/// that is kept aside while the player visits other steps: the first group
/// entered starts it from the quiz's matching limit and later groups resume it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining_secs: u32,
    running: bool,
    low_flagged: bool,
    on_matching: bool,
    matching: Option<SharedClock>,
}

impl Countdown {
    /// Seconds left on the clock of the current step.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Restart from `secs` for a question. The shared matching clock is untouched.
    pub fn start(&mut self, secs: u32) {
        self.remaining_secs = secs;
        self.running = secs > 0;
        self.low_flagged = false;
        self.on_matching = false;
    }

    /// Start the shared matching clock, once per session.
    ///
    /// Returns false (and changes nothing) when it was already started.
    pub fn start_matching(&mut self, secs: u32) -> bool {
        if self.matching.is_some() {
            return false;
        }
        self.matching = Some(SharedClock {
            remaining_secs: secs,
            low_flagged: false,
        });
        self.resume_matching();
        true
    }

    /// Continue the shared matching clock where it was left; stays stopped at
    /// zero or when it was never started.
    pub fn resume_matching(&mut self) {
        let Some(clock) = self.matching else {
            return;
        };
        self.remaining_secs = clock.remaining_secs;
        self.low_flagged = clock.low_flagged;
        self.on_matching = true;
        self.running = clock.remaining_secs > 0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and show zero, for steps without a clock of their own.
    pub fn clear(&mut self) {
        self.stop();
        self.remaining_secs = 0;
        self.on_matching = false;
    }

    /// Advance by one second.
    ///
    /// `time_low` is set on the first tick at or below `time_low_secs`; zero
    /// disables it.
    pub fn tick(&mut self, time_low_secs: u32) -> CountdownTick {
        if !self.running {
            return CountdownTick::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        let time_low = time_low_secs > 0
            && !self.low_flagged
            && self.remaining_secs > 0
            && self.remaining_secs <= time_low_secs;
        if time_low {
            self.low_flagged = true;
        }
        if self.on_matching {
            if let Some(clock) = self.matching.as_mut() {
                clock.remaining_secs = self.remaining_secs;
                clock.low_flagged = self.low_flagged;
            }
        }

        if self.remaining_secs == 0 {
            self.running = false;
            return CountdownTick::Expired;
        }
        CountdownTick::Ticked {
            remaining_secs: self.remaining_secs,
            time_low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn low_flags(countdown: &mut Countdown, ticks: usize, threshold: u32) -> Vec<bool> {
        (0..ticks)
            .map(|_| match countdown.tick(threshold) {
                CountdownTick::Ticked { time_low, .. } => time_low,
                _ => false,
            })
            .collect()
    }

    #[test]
    fn counts_down_to_expiry() {
        let mut countdown = Countdown::default();
        countdown.start(2);

        assert_eq!(
            countdown.tick(0),
            CountdownTick::Ticked {
                remaining_secs: 1,
                time_low: false
            }
        );
        assert_eq!(countdown.tick(0), CountdownTick::Expired);
        assert!(!countdown.is_running());
        assert_eq!(countdown.tick(0), CountdownTick::Idle);
    }

    #[test]
    fn flags_time_low_exactly_once() {
        let mut countdown = Countdown::default();
        countdown.start(4);
        assert_eq!(low_flags(&mut countdown, 3, 2), vec![false, true, false]);
    }

    #[test]
    fn short_limit_still_flags_time_low() {
        let mut countdown = Countdown::default();
        countdown.start(5);
        assert_eq!(low_flags(&mut countdown, 3, 5), vec![true, false, false]);
    }

    #[test]
    fn stopped_countdown_does_not_move() {
        let mut countdown = Countdown::default();
        countdown.start(10);
        countdown.stop();
        assert_eq!(countdown.tick(3), CountdownTick::Idle);
        assert_eq!(countdown.remaining_secs(), 10);
    }

    #[test]
    fn matching_clock_starts_only_once() {
        let mut countdown = Countdown::default();
        assert!(countdown.start_matching(60));
        countdown.tick(0);
        countdown.stop();

        assert!(!countdown.start_matching(60));
        countdown.resume_matching();
        assert_eq!(countdown.remaining_secs(), 59);
        assert!(countdown.is_running());
    }

    #[test]
    fn question_clock_leaves_matching_clock_alone() {
        let mut countdown = Countdown::default();
        countdown.start_matching(30);
        for _ in 0..4 {
            countdown.tick(0);
        }

        countdown.start(3);
        for _ in 0..3 {
            countdown.tick(0);
        }
        assert_eq!(countdown.remaining_secs(), 0);

        countdown.resume_matching();
        assert_eq!(countdown.remaining_secs(), 26);
        assert!(countdown.is_running());
    }

    #[test]
    fn matching_time_low_is_not_repeated_after_resume() {
        let mut countdown = Countdown::default();
        countdown.start_matching(4);
        assert_eq!(low_flags(&mut countdown, 2, 3), vec![true, false]);

        countdown.start(10);
        countdown.resume_matching();
        assert_eq!(low_flags(&mut countdown, 1, 3), vec![false]);
    }

    #[test]
    fn exhausted_matching_clock_stays_stopped() {
        let mut countdown = Countdown::default();
        countdown.start_matching(1);
        assert_eq!(countdown.tick(0), CountdownTick::Expired);
        countdown.clear();
        countdown.resume_matching();
        assert!(!countdown.is_running());
        assert_eq!(countdown.remaining_secs(), 0);
    }

    #[test]
    fn clear_shows_zero() {
        let mut countdown = Countdown::default();
        countdown.start(10);
        countdown.clear();
        assert_eq!(countdown.remaining_secs(), 0);
        assert!(!countdown.is_running());
    }
}

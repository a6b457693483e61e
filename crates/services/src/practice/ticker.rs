use log::debug;
use tokio::time::{self, Duration, Instant, Interval, MissedTickBehavior};

use super::grading::StepResult;
use super::service::{PracticeSession, TickOutcome};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One-second timer feeding `PracticeSession::tick`.
///
/// The first tick fires one period after creation. Late ticks are delayed
/// rather than bursted, so a stalled loop never skips seconds of countdown.
#[derive(Debug)]
pub struct SecondTicker {
    interval: Interval,
}

impl SecondTicker {
    #[must_use]
    pub fn new() -> Self {
        let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    /// Restart the period from now, e.g. after moving to another step.
    pub fn reset(&mut self) {
        self.interval.reset();
    }
}

impl Default for SecondTicker {
    fn default() -> Self {
        Self::new()
    }
}

/// Tick the session until the current step is graded or its countdown stops.
///
/// Returns the result when time ran out on this step.
pub async fn run_until_settled(
    session: &mut PracticeSession,
    ticker: &mut SecondTicker,
) -> Option<StepResult> {
    while session.timer_running() && !session.is_current_graded() {
        ticker.tick().await;
        match session.tick() {
            TickOutcome::Ticked { remaining_secs } => {
                debug!("{remaining_secs}s left on step {}", session.current_index() + 1);
            }
            TickOutcome::Expired(result) => return Some(result),
            TickOutcome::Idle => return None,
        }
    }
    None
}

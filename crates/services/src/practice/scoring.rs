use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

use quiz_core::model::QuizId;
use quiz_core::time::elapsed_secs;

use super::grading::StepResult;
use super::plan::{Step, StepKey};

//
// ─── PERFORMANCE TIER ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PerformanceTier {
    NeedsImprovement,
    Fair,
    Good,
    VeryGood,
    Excellent,
}

impl PerformanceTier {
    /// Lower bounds are inclusive: 90 is excellent, 89 is very good.
    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90.. => PerformanceTier::Excellent,
            80..=89 => PerformanceTier::VeryGood,
            70..=79 => PerformanceTier::Good,
            60..=69 => PerformanceTier::Fair,
            _ => PerformanceTier::NeedsImprovement,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "excellent",
            PerformanceTier::VeryGood => "very good",
            PerformanceTier::Good => "good",
            PerformanceTier::Fair => "fair",
            PerformanceTier::NeedsImprovement => "needs improvement",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `round(100 * correct / total)`, half rounded up; zero when `total` is zero.
#[must_use]
pub fn percentage(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    let rounded = (correct * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

//
// ─── RUNNING SCORE ─────────────────────────────────────────────────────────────
//

/// Score while the session is still in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreSnapshot {
    pub earned_points: u32,
    /// Points available across steps graded so far.
    pub graded_points: u32,
    pub total_points: u32,
    pub graded_steps: usize,
    pub correct_steps: usize,
    pub scoreable_steps: usize,
}

impl ScoreSnapshot {
    #[must_use]
    pub fn from_results(steps: &[Step], results: &HashMap<StepKey, StepResult>) -> Self {
        let mut snapshot = ScoreSnapshot::default();
        for step in steps.iter().filter(|s| s.is_scoreable()) {
            snapshot.scoreable_steps += 1;
            snapshot.total_points = snapshot.total_points.saturating_add(step.points());
            if let Some(result) = results.get(&step.key()) {
                snapshot.graded_steps += 1;
                snapshot.graded_points = snapshot.graded_points.saturating_add(result.points_possible);
                if result.is_correct {
                    snapshot.correct_steps += 1;
                    snapshot.earned_points = snapshot.earned_points.saturating_add(result.points_earned);
                }
            }
        }
        snapshot
    }
}

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

/// Per-step line of the final review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReview {
    pub step: StepKey,
    pub is_correct: bool,
    pub points_possible: u32,
    pub points_earned: u32,
    /// `(correct, total)` pairs for matching groups.
    pub pair_score: Option<(usize, usize)>,
}

/// Final report of a finished practice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSummary {
    pub quiz_id: QuizId,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub earned_points: u32,
    pub total_points: u32,
    pub correct_steps: usize,
    pub scoreable_steps: usize,
    pub percentage: u8,
    pub tier: PerformanceTier,
    pub steps: Vec<StepReview>,
}

impl PracticeSummary {
    /// Aggregate results over the scoreable steps; a step without a result
    /// counts as incorrect.
    #[must_use]
    pub fn from_results(
        quiz_id: QuizId,
        steps: &[Step],
        results: &HashMap<StepKey, StepResult>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let snapshot = ScoreSnapshot::from_results(steps, results);
        let reviews = steps
            .iter()
            .filter(|s| s.is_scoreable())
            .map(|step| {
                let result = results.get(&step.key());
                StepReview {
                    step: step.key(),
                    is_correct: result.is_some_and(|r| r.is_correct),
                    points_possible: step.points(),
                    points_earned: result.map_or(0, |r| r.points_earned),
                    pair_score: result.and_then(StepResult::pair_score),
                }
            })
            .collect();
        let percentage = percentage(snapshot.correct_steps, snapshot.scoreable_steps);

        Self {
            quiz_id,
            started_at,
            completed_at,
            earned_points: snapshot.earned_points,
            total_points: snapshot.total_points,
            correct_steps: snapshot.correct_steps,
            scoreable_steps: snapshot.scoreable_steps,
            percentage,
            tier: PerformanceTier::from_percentage(percentage),
            steps: reviews,
        }
    }

    #[must_use]
    pub fn duration_secs(&self) -> u64 {
        elapsed_secs(self.started_at, self.completed_at)
    }
}

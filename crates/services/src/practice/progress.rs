/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeProgress {
    pub total_steps: usize,
    /// 1-based position of the current step; 0 for an empty session.
    pub position: usize,
    pub scoreable_steps: usize,
    pub graded_steps: usize,
    pub is_finished: bool,
}

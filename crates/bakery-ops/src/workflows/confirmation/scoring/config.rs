use serde::{Deserialize, Serialize};

/// Numeric policy of the confirmation heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Score for a client with no delivery on record.
    pub no_history_score: u8,
    /// Score for a client with exactly one delivery on record.
    pub single_history_score: u8,
    /// Periodicity quoted when the client has none configured.
    pub fallback_periodicity_days: u32,
    pub base_score: f64,
    pub late_penalty_per_day: f64,
    /// Days before the expected date still considered on time.
    pub early_tolerance_days: i64,
    pub early_penalty_per_day: f64,
    /// Baseline weight applied when the cadence rests on a single gap.
    pub sparse_history_weight: f64,
    pub reschedule_penalty: i32,
    pub urgent_reschedule_penalty: i32,
    pub urgent_reschedule_hours: i64,
    /// Reschedules within this many days of the order are linked when no id matches.
    pub proximity_window_days: i64,
    pub advancement_bonus: i32,
    pub repeated_postponement_threshold: usize,
    pub repeated_postponement_penalty: i32,
    pub min_score: u8,
    pub max_score: u8,
    /// Scores strictly above this are `High`.
    pub high_tier_above: u8,
    /// Scores at or above this (and not `High`) are `Medium`.
    pub medium_tier_from: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            no_history_score: 70,
            single_history_score: 80,
            fallback_periodicity_days: 14,
            base_score: 95.0,
            late_penalty_per_day: 2.0,
            early_tolerance_days: 3,
            early_penalty_per_day: 1.5,
            sparse_history_weight: 0.5,
            reschedule_penalty: 15,
            urgent_reschedule_penalty: 10,
            urgent_reschedule_hours: 24,
            proximity_window_days: 7,
            advancement_bonus: 5,
            repeated_postponement_threshold: 2,
            repeated_postponement_penalty: 20,
            min_score: 5,
            max_score: 99,
            high_tier_above: 85,
            medium_tier_from: 50,
        }
    }
}

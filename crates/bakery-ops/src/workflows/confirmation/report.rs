use std::collections::HashMap;

use serde::Serialize;

use super::domain::{ConfirmationScore, ScoreKey, ScoreTier};

/// Order that could not be scored, kept so callers can show an "unscored" state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedOrder {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreBatch {
    pub scores: HashMap<ScoreKey, ConfirmationScore>,
    pub skipped: Vec<SkippedOrder>,
}

impl ScoreBatch {
    pub fn get(&self, key: &str) -> Option<&ConfirmationScore> {
        self.scores.get(&ScoreKey(key.to_string()))
    }

    /// Scores ordered by key, for stable rendering.
    pub fn sorted(&self) -> Vec<(&ScoreKey, &ConfirmationScore)> {
        let mut entries: Vec<_> = self.scores.iter().collect();
        entries.sort_by(|left, right| left.0.cmp(right.0));
        entries
    }

    pub fn summary(&self) -> TierSummary {
        let mut summary = TierSummary {
            skipped: self.skipped.len(),
            ..TierSummary::default()
        };

        for score in self.scores.values() {
            match score.tier {
                ScoreTier::High => summary.high += 1,
                ScoreTier::Medium => summary.medium += 1,
                ScoreTier::Low => summary.low += 1,
            }
        }

        if !self.scores.is_empty() {
            let total: u32 = self.scores.values().map(|score| u32::from(score.score)).sum();
            summary.mean_score = Some(f64::from(total) / self.scores.len() as f64);
        }

        summary
    }
}

/// Tier counts for dashboard badges.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TierSummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_score: Option<f64>,
}

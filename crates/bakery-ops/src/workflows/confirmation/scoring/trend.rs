use super::super::domain::{RescheduleKind, RescheduleRecord};
use super::config::ScoringConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TrendSignals {
    pub advancements: usize,
    pub postponements: usize,
    pub linked_postponements: usize,
    pub advancing_client: bool,
    pub repeatedly_postponed: bool,
}

pub(crate) fn trend_vector(
    client_reschedules: &[&RescheduleRecord],
    linked: &[&RescheduleRecord],
    config: &ScoringConfig,
) -> (i32, TrendSignals) {
    if client_reschedules.is_empty() {
        return (0, TrendSignals::default());
    }

    let advancements = count_kind(client_reschedules, RescheduleKind::Advancement);
    let postponements = count_kind(client_reschedules, RescheduleKind::Postponement);
    let linked_postponements = count_kind(linked, RescheduleKind::Postponement);

    let advancing_client = advancements > postponements;
    let repeatedly_postponed = linked_postponements >= config.repeated_postponement_threshold;

    let mut vector = 0;
    if advancing_client {
        vector += config.advancement_bonus;
    }
    if repeatedly_postponed {
        vector -= config.repeated_postponement_penalty;
    }

    let signals = TrendSignals {
        advancements,
        postponements,
        linked_postponements,
        advancing_client,
        repeatedly_postponed,
    };

    (vector, signals)
}

fn count_kind(records: &[&RescheduleRecord], kind: RescheduleKind) -> usize {
    records.iter().filter(|record| record.kind == kind).count()
}

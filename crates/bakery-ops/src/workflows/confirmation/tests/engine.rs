use chrono::{Duration, NaiveDate};

use super::common::*;
use crate::workflows::confirmation::domain::{
    ClientId, DeliveryRecord, OrderRequest, RecordKind, RescheduleKind, ScoreKey, ScoreTier,
};
use crate::workflows::confirmation::{compute_scores, ScoringConfig};

#[test]
fn single_delivery_quotes_client_periodicity() {
    let mut request = order(None, 20);
    request.periodicity_days = Some(7);

    let batch = engine().score_batch(&[request, order(Some("ord-x"), 20)], &deliveries(&[0]), &[]);

    let configured = batch.get(CLIENT).expect("client scored");
    assert_eq!(configured.score, 80);
    assert_eq!(configured.tier, ScoreTier::Medium);
    assert!(configured.explanation.contains("7 days"));
    assert_eq!(configured.factors.baseline, 80);

    let fallback = batch.get("ord-x").expect("order scored");
    assert!(fallback.explanation.contains("14 days"));
}

#[test]
fn non_delivery_records_do_not_count_as_history() {
    let mut history = deliveries(&[0, 14, 28]);
    for record in history.iter_mut().skip(1) {
        record.kind = RecordKind::Other("return".to_string());
    }

    let batch = engine().score_batch(&[order(None, 42)], &history, &[]);

    assert_eq!(batch.get(CLIENT).expect("client scored").score, 80);
}

#[test]
fn unsorted_history_is_sorted_before_cadence() {
    let batch = engine().score_batch(&[order(None, 42)], &deliveries(&[28, 0, 14]), &[]);

    assert_eq!(batch.get(CLIENT).expect("client scored").score, 95);
}

#[test]
fn malformed_orders_are_skipped_without_aborting() {
    let orders = vec![
        OrderRequest {
            client_id: None,
            order_id: Some("ord-anon".to_string()),
            scheduled_date: Some("2025-04-14".to_string()),
            periodicity_days: None,
        },
        OrderRequest {
            scheduled_date: Some("amanhã".to_string()),
            ..order(Some("ord-bad-date"), 0)
        },
        order(Some("ord-ok"), 42),
    ];

    let batch = engine().score_batch(&orders, &deliveries(&[0, 14, 28]), &[]);

    assert_eq!(batch.scores.len(), 1);
    assert!(batch.get("ord-ok").is_some());
    assert_eq!(batch.skipped.len(), 2);
    assert_eq!(batch.skipped[0].index, 0);
    assert!(batch.skipped[1].reason.contains("amanhã"));

    let summary = batch.summary();
    assert_eq!(summary.high, 1);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.mean_score, Some(95.0));
}

#[test]
fn cadence_beyond_the_calendar_skips_only_that_order() {
    let far_client = "pdv-fim-do-calendario";
    let mut history = deliveries(&[0, 14, 28]);
    for date in [NaiveDate::MAX - Duration::days(30), NaiveDate::MAX] {
        history.push(DeliveryRecord {
            client_id: ClientId(far_client.to_string()),
            date,
            quantity: 12.0,
            kind: RecordKind::Delivery,
        });
    }
    let far_order = OrderRequest {
        client_id: Some(far_client.to_string()),
        ..order(Some("ord-far"), 42)
    };

    let batch = engine().score_batch(&[far_order, order(Some("ord-near"), 42)], &history, &[]);

    assert_eq!(batch.scores.len(), 1);
    assert_eq!(batch.get("ord-near").expect("scored").score, 95);
    assert_eq!(batch.skipped.len(), 1);
    assert_eq!(batch.skipped[0].index, 0);
    assert_eq!(batch.skipped[0].order_id.as_deref(), Some("ord-far"));
    assert!(batch.skipped[0].reason.contains("out of range"));
}

#[test]
fn clients_are_scored_against_their_own_history() {
    let mut history = deliveries(&[0, 14, 28]);
    history.extend(deliveries_for("pdv-outro", &[0, 7]));
    let other = OrderRequest {
        client_id: Some("pdv-outro".to_string()),
        ..order(Some("ord-outro"), 14)
    };

    let batch = engine().score_batch(&[order(Some("ord-a"), 42), other], &history, &[]);

    assert_eq!(batch.get("ord-a").expect("scored").score, 95);
    assert_eq!(batch.get("ord-outro").expect("scored").score, 95);
}

#[test]
fn proximity_linked_reschedules_penalize_unlinked_orders() {
    let reschedules = vec![
        reschedule(None, 40, RescheduleKind::Postponement, hours_before(40, 72)),
        reschedule(None, 60, RescheduleKind::Postponement, hours_before(60, 2)),
    ];

    let batch = engine().score_batch(&[order(None, 42)], &deliveries(&[0, 14, 28]), &reschedules);

    let score = batch.get(CLIENT).expect("client scored");
    assert_eq!(score.factors.volatility_penalty, -15);
    assert_eq!(score.score, 80);
}

#[test]
fn repeated_postponements_of_one_order_hit_trend() {
    let reschedules = vec![
        reschedule(Some("ord-7"), 38, RescheduleKind::Postponement, hours_before(38, 96)),
        reschedule(Some("ord-7"), 40, RescheduleKind::Postponement, hours_before(40, 96)),
    ];

    let batch =
        engine().score_batch(&[order(Some("ord-7"), 42)], &deliveries(&[0, 14, 28]), &reschedules);

    let score = batch.get("ord-7").expect("order scored");
    assert_eq!(score.factors.volatility_penalty, -30);
    assert_eq!(score.factors.trend_vector, -20);
    assert_eq!(score.score, 45);
    assert_eq!(score.tier, ScoreTier::Low);
    assert!(score.explanation.contains("postponed repeatedly"));
}

#[test]
fn advancing_clients_get_a_bonus_even_without_links() {
    let reschedules = vec![
        reschedule(None, 2, RescheduleKind::Advancement, hours_before(2, 96)),
        reschedule(None, 16, RescheduleKind::Advancement, hours_before(16, 96)),
    ];

    let batch = engine().score_batch(&[order(None, 50)], &deliveries(&[0, 14, 28]), &reschedules);

    let score = batch.get(CLIENT).expect("client scored");
    assert_eq!(score.factors.trend_vector, 5);
    assert_eq!(score.factors.volatility_penalty, 0);
    assert_eq!(score.score, 84);
    assert!(score.explanation.contains("tends to advance"));
}

#[test]
fn score_never_leaves_the_five_to_ninety_nine_band() {
    let reschedules: Vec<_> = (0..8)
        .map(|n| reschedule(Some("ord-z"), 90 + n, RescheduleKind::Postponement, hours_before(90, 1)))
        .collect();

    let batch = engine().score_batch(
        &[order(Some("ord-z"), 400), order(Some("ord-early"), -200)],
        &deliveries(&[0, 14, 28]),
        &reschedules,
    );

    for (_, score) in batch.scores.iter() {
        assert!((5..=99).contains(&score.score));
    }
    assert_eq!(batch.get("ord-z").expect("scored").score, 5);
    assert_eq!(batch.get("ord-z").expect("scored").tier, ScoreTier::Low);
}

#[test]
fn score_of_eighty_five_stays_medium() {
    // deviation +5 -> baseline 85
    let batch = engine().score_batch(&[order(None, 47)], &deliveries(&[0, 14, 28]), &[]);

    let score = batch.get(CLIENT).expect("client scored");
    assert_eq!(score.score, 85);
    assert_eq!(score.tier, ScoreTier::Medium);
}

#[test]
fn compute_scores_is_idempotent() {
    let orders = vec![order(Some("ord-1"), 42), order(Some("ord-2"), 50)];
    let history = deliveries(&[0, 14, 28]);
    let reschedules = vec![reschedule(
        Some("ord-2"),
        50,
        RescheduleKind::Postponement,
        hours_before(50, 30),
    )];
    let config = ScoringConfig::default();

    let first = compute_scores(&orders, &history, &reschedules, &config);
    let second = compute_scores(&orders, &history, &reschedules, &config);

    assert_eq!(first, second);
    assert_eq!(first[&ScoreKey("ord-2".to_string())].score, 64);
}

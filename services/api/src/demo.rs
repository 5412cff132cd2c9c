use bakery_ops::config::AppConfig;
use bakery_ops::error::AppError;
use bakery_ops::workflows::confirmation::{
    ClientId, ConfirmationScoreEngine, DeliveryRecord, HistoryImporter, HistoryWindow, OrderId,
    OrderRequest, RecordKind, RescheduleKind, RescheduleRecord, ScoreBatch,
};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Orders CSV (client_id,order_id,scheduled_date,periodicity_days)
    #[arg(long)]
    pub(crate) orders: PathBuf,
    /// Delivery history CSV (client_id,date,quantity,type)
    #[arg(long)]
    pub(crate) deliveries: PathBuf,
    /// Reschedule history CSV (client_id,order_id,original_date,new_date,type,created_at)
    #[arg(long)]
    pub(crate) reschedules: Option<PathBuf>,
    /// Anchor date for the history windows (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the scores as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Delivery date of the demo route (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) route_date: Option<NaiveDate>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        orders,
        deliveries,
        reschedules,
        today,
        json,
    } = args;

    let config = AppConfig::load()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let orders = HistoryImporter::orders_from_path(orders)?;
    let deliveries = HistoryImporter::deliveries_from_path(deliveries)?;
    let reschedules = match reschedules {
        Some(path) => HistoryImporter::reschedules_from_path(path)?,
        None => Vec::new(),
    };

    let batch = score_with_window(
        &ConfirmationScoreEngine::new(config.scoring),
        &config.history,
        &orders,
        &deliveries,
        &reschedules,
        today,
    );

    if json {
        render_json(&batch);
    } else {
        render_scores(&batch, today);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let route_date = args
        .route_date
        .unwrap_or_else(|| Local::now().date_naive());
    let today = route_date - Duration::days(1);

    println!("Confirmation score demo");
    let (orders, deliveries, reschedules) = demo_route(route_date);
    let batch = score_with_window(
        &ConfirmationScoreEngine::default(),
        &HistoryWindow::default(),
        &orders,
        &deliveries,
        &reschedules,
        today,
    );
    render_scores(&batch, today);

    Ok(())
}

fn score_with_window(
    engine: &ConfirmationScoreEngine,
    window: &HistoryWindow,
    orders: &[OrderRequest],
    deliveries: &[DeliveryRecord],
    reschedules: &[RescheduleRecord],
    today: NaiveDate,
) -> ScoreBatch {
    let deliveries = window.select_deliveries(deliveries, orders, today);
    let reschedules = window.select_reschedules(reschedules, orders, today);
    engine.score_batch(orders, &deliveries, &reschedules)
}

/// Four PDVs covering the on-cadence, overdue, rescheduled and new-client cases.
fn demo_route(
    route_date: NaiveDate,
) -> (Vec<OrderRequest>, Vec<DeliveryRecord>, Vec<RescheduleRecord>) {
    let history = |client: &str, days_ago: &[i64]| -> Vec<DeliveryRecord> {
        days_ago
            .iter()
            .map(|ago| DeliveryRecord {
                client_id: ClientId(client.to_string()),
                date: route_date - Duration::days(*ago),
                quantity: 36.0,
                kind: RecordKind::Delivery,
            })
            .collect()
    };
    let order = |client: &str, order_id: &str| OrderRequest {
        client_id: Some(client.to_string()),
        order_id: Some(order_id.to_string()),
        scheduled_date: Some(route_date.to_string()),
        periodicity_days: Some(7),
    };

    let mut deliveries = history("pdv-padaria-sol", &[21, 14, 7]);
    deliveries.extend(history("pdv-mercadinho-lua", &[30, 23, 16]));
    deliveries.extend(history("pdv-cafe-estacao", &[28, 14]));

    let orders = vec![
        order("pdv-padaria-sol", "PED-1001"),
        order("pdv-mercadinho-lua", "PED-1002"),
        order("pdv-cafe-estacao", "PED-1003"),
        order("pdv-emporio-novo", "PED-1004"),
    ];

    let postponed = |hours_before: i64, original_ago: i64| RescheduleRecord {
        client_id: ClientId("pdv-cafe-estacao".to_string()),
        order_id: Some(OrderId("PED-1003".to_string())),
        original_date: route_date - Duration::days(original_ago),
        new_date: route_date,
        kind: RescheduleKind::Postponement,
        created_at: (route_date - Duration::days(original_ago))
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight - Duration::hours(hours_before))
            .unwrap_or_default(),
    };
    let reschedules = vec![postponed(6, 3), postponed(72, 6)];

    (orders, deliveries, reschedules)
}

pub(crate) fn render_scores(batch: &ScoreBatch, today: NaiveDate) {
    println!("History evaluated as of {}", today);

    if batch.scores.is_empty() {
        println!("\nNo orders scored");
    } else {
        println!("\nScores");
        for (key, score) in batch.sorted() {
            println!(
                "- {}: {}% [{}] baseline {} | volatility {} | trend {}",
                key,
                score.score,
                score.tier.label(),
                score.factors.baseline,
                score.factors.volatility_penalty,
                score.factors.trend_vector
            );
            println!("  {}", score.explanation);
        }
    }

    if !batch.skipped.is_empty() {
        println!("\nSkipped orders");
        for skipped in &batch.skipped {
            println!(
                "- row {} ({}): {}",
                skipped.index + 1,
                skipped
                    .order_id
                    .as_deref()
                    .or(skipped.client_id.as_deref())
                    .unwrap_or("unidentified"),
                skipped.reason
            );
        }
    }

    let summary = batch.summary();
    println!(
        "\nSummary: {} high | {} medium | {} low | {} skipped",
        summary.high, summary.medium, summary.low, summary.skipped
    );
    if let Some(mean) = summary.mean_score {
        println!("Average confirmation score: {:.1}%", mean);
    }
}

fn render_json(batch: &ScoreBatch) {
    let payload = serde_json::json!({
        "scores": batch
            .sorted()
            .into_iter()
            .map(|(key, score)| serde_json::json!({ "key": key, "score": score }))
            .collect::<Vec<_>>(),
        "skipped": batch.skipped,
        "summary": batch.summary(),
    });
    match serde_json::to_string_pretty(&payload) {
        Ok(json) => println!("{}", json),
        Err(err) => println!("Score payload unavailable: {}", err),
    }
}

use bakery_ops::workflows::confirmation::{
    ConfirmationScoreEngine, HistoryImporter, HistoryWindow, ScoreTier, ScoringConfig,
};
use chrono::NaiveDate;

const ORDERS: &str = "client_id,order_id,scheduled_date,periodicity_days\n\
pdv-centro,ord-1,2025-09-15,14\n\
pdv-bairro,ord-2,2025-09-15,\n\
,ord-3,2025-09-15,7\n";

const DELIVERIES: &str = "client_id,date,quantity,type\n\
pdv-centro,2025-05-01,80,delivery\n\
pdv-centro,2025-08-18,80,delivery\n\
pdv-centro,2025-09-01,75,delivery\n\
pdv-centro,2025-09-05,12,return\n\
pdv-bairro,2025-09-01,20,entrega\n";

const RESCHEDULES: &str = "client_id,order_id,original_date,new_date,type,created_at\n\
pdv-centro,ord-1,2025-09-13,2025-09-15,postponement,2025-09-12T18:30:00Z\n\
pdv-centro,,2025-03-01,2025-02-27,antecipacao,2025-02-26T10:00:00Z\n";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 10).expect("valid date")
}

#[test]
fn csv_exports_flow_through_the_window_into_scores() {
    let orders = HistoryImporter::orders_from_reader(ORDERS.as_bytes()).expect("orders parse");
    let deliveries =
        HistoryImporter::deliveries_from_reader(DELIVERIES.as_bytes()).expect("deliveries parse");
    let reschedules = HistoryImporter::reschedules_from_reader(RESCHEDULES.as_bytes())
        .expect("reschedules parse");

    let window = HistoryWindow::default();
    let deliveries = window.select_deliveries(&deliveries, &orders, today());
    let reschedules = window.select_reschedules(&reschedules, &orders, today());
    assert_eq!(deliveries.len(), 3);
    assert_eq!(reschedules.len(), 1);

    let batch = ConfirmationScoreEngine::new(ScoringConfig::default()).score_batch(
        &orders,
        &deliveries,
        &reschedules,
    );

    // 2025-08-18 -> 2025-09-01 is a 14 day cadence; 2025-09-15 is on time,
    // minus a linked last-minute postponement.
    let centro = batch.get("ord-1").expect("ord-1 scored");
    assert_eq!(centro.factors.baseline, 95);
    assert_eq!(centro.factors.volatility_penalty, -25);
    assert_eq!(centro.score, 70);

    let bairro = batch.get("ord-2").expect("ord-2 scored");
    assert_eq!(bairro.score, 80);
    assert_eq!(bairro.tier, ScoreTier::Medium);

    assert_eq!(batch.skipped.len(), 1);
    assert_eq!(batch.skipped[0].order_id.as_deref(), Some("ord-3"));
}

#[test]
fn missing_files_surface_io_errors() {
    let err = HistoryImporter::deliveries_from_path("/nonexistent/entregas.csv")
        .expect_err("missing file");
    assert!(err.to_string().contains("failed to read history export"));
}

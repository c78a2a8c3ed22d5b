mod common;

use backend_application::commands::{check_in_commands, evaluation_commands, fine_commands};
use backend_application::queries::fine_queries;
use backend_application::AppError;
use backend_domain::ports::FineRepository;
use backend_domain::{EventType, Fine, FineFilter, FineId, FineQuery, FineStatus, ShiftId};

use common::*;

async fn late_fine(h: &Harness) -> Fine {
    seed_settings(&h.state).await;
    let checkpoint = seed_checkpoint(&h.state).await;
    let shift_id = seed_night_shift(&h.state, &checkpoint, "shift-pay").await;
    h.clock.set(at(1, 22, 30));
    check_in_commands::submit_check_in(
        &h.state,
        scan(
            &shift_id,
            EventType::Arrival,
            at_post(),
            &checkpoint.checkpoint.qr_token,
            at(1, 22, 30),
        ),
    )
    .await
    .expect("check-in");
    h.clock.set(at(1, 22, 35));
    evaluation_commands::evaluate_shift(&h.state, &shift_id)
        .await
        .expect("settle");
    h.store
        .fetch_fine_for_shift(&shift_id)
        .await
        .expect("fetch fine")
        .expect("late fine")
}

#[tokio::test]
async fn mark_paid_stamps_payment_and_credits_ledger_once() {
    let h = harness().await;
    let fine = late_fine(&h).await;

    h.clock.set(at(2, 9, 0));
    let paid = fine_commands::mark_paid(&h.state, &fine.id, Some(" bendahara ".to_string()))
        .await
        .expect("mark paid");
    assert!(paid.is_paid());
    assert_eq!(paid.paid_at, Some(at(2, 9, 0)));
    assert_eq!(paid.paid_by.as_deref(), Some("bendahara"));

    let credits = h.ledger.credits();
    assert_eq!(credits.len(), 1);
    assert_eq!(credits[0].fine_id, fine.id);
    assert_eq!(credits[0].amount, 20_000);
    assert_eq!(credits[0].acting_admin, "bendahara");

    h.clock.set(at(2, 10, 0));
    let again = fine_commands::mark_paid(&h.state, &fine.id, None).await;
    assert!(matches!(again, Err(AppError::AlreadyPaid(_))));
    let stored = fine_queries::get_fine(&h.state, &fine.id)
        .await
        .expect("get fine");
    assert_eq!(stored.paid_at, Some(at(2, 9, 0)));
    assert_eq!(h.ledger.credits().len(), 1);

    let summary = fine_queries::fine_summary(&h.state).await.expect("summary");
    assert_eq!(summary.total_count, 1);
    assert_eq!(summary.paid_count, 1);
    assert_eq!(summary.paid_amount, 20_000);
    assert_eq!(summary.unpaid_count, 0);

    let unpaid = fine_queries::list_fines(
        &h.state,
        FineQuery {
            status: Some(FineFilter::Unpaid),
        },
    )
    .await
    .expect("list unpaid");
    assert!(unpaid.is_empty());
}

#[tokio::test]
async fn concurrent_payments_transition_exactly_once() {
    let h = harness().await;
    let fine = late_fine(&h).await;
    h.clock.set(at(2, 9, 0));

    let (first, second) = tokio::join!(
        fine_commands::mark_paid(&h.state, &fine.id, Some("bendahara".to_string())),
        fine_commands::mark_paid(&h.state, &fine.id, Some("ketua-rt".to_string())),
    );
    let outcomes = [first, second];
    let paid = outcomes.iter().filter(|result| result.is_ok()).count();
    let rejected = outcomes
        .iter()
        .filter(|result| matches!(result, Err(AppError::AlreadyPaid(_))))
        .count();
    assert_eq!(paid, 1);
    assert_eq!(rejected, 1);
    assert_eq!(h.ledger.credits().len(), 1);
}

#[tokio::test]
async fn failed_ledger_credit_rolls_payment_back() {
    let h = harness().await;
    let fine = late_fine(&h).await;
    h.clock.set(at(2, 9, 0));
    h.ledger.fail(true);

    let result = fine_commands::mark_paid(&h.state, &fine.id, None).await;
    assert!(matches!(result, Err(AppError::LedgerCredit(_))));
    let stored = fine_queries::get_fine(&h.state, &fine.id)
        .await
        .expect("get fine");
    assert_eq!(stored.status, FineStatus::Unpaid);
    assert!(stored.paid_at.is_none());
    assert!(stored.paid_by.is_none());
    assert!(h.ledger.credits().is_empty());

    h.ledger.fail(false);
    let paid = fine_commands::mark_paid(&h.state, &fine.id, None)
        .await
        .expect("retry");
    assert_eq!(paid.paid_by.as_deref(), Some(fine_commands::DEFAULT_ACTING_ADMIN));
    assert_eq!(h.ledger.credits().len(), 1);
}

#[tokio::test]
async fn unknown_fine_is_not_found() {
    let h = harness().await;
    let result = fine_commands::mark_paid(&h.state, &FineId::from("missing"), None).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(h.ledger.credits().is_empty());
}

#[tokio::test]
async fn fines_list_most_recent_first_and_filter_by_status() {
    let h = harness().await;
    seed_settings(&h.state).await;
    let checkpoint = seed_checkpoint(&h.state).await;
    let first_night = seed_night_shift(&h.state, &checkpoint, "shift-night-1").await;
    let second_night =
        seed_shift(&h.state, &checkpoint, "shift-night-2", at(2, 22, 0), at(3, 4, 0)).await;

    h.clock.set(at(2, 4, 1));
    evaluation_commands::evaluate_ended_shifts(&h.state)
        .await
        .expect("first sweep");
    h.clock.set(at(3, 4, 1));
    evaluation_commands::evaluate_ended_shifts(&h.state)
        .await
        .expect("second sweep");

    let all = fine_queries::list_fines(&h.state, FineQuery::default())
        .await
        .expect("list all");
    let shifts: Vec<&ShiftId> = all.iter().map(|view| &view.fine.shift_id).collect();
    assert_eq!(shifts, vec![&second_night, &first_night]);
    assert_eq!(all[0].fine.generated_at, at(3, 4, 1));
    assert_eq!(all[1].shift_starts_at, at(1, 22, 0));

    h.clock.set(at(3, 9, 0));
    fine_commands::mark_paid(&h.state, &all[1].fine.id, Some("bendahara".to_string()))
        .await
        .expect("pay first night");

    let paid = fine_queries::list_fines(
        &h.state,
        FineQuery {
            status: Some(FineFilter::Paid),
        },
    )
    .await
    .expect("list paid");
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].fine.shift_id, first_night);

    let unpaid = fine_queries::list_fines(
        &h.state,
        FineQuery {
            status: Some(FineFilter::Unpaid),
        },
    )
    .await
    .expect("list unpaid");
    assert_eq!(unpaid.len(), 1);
    assert_eq!(unpaid[0].fine.shift_id, second_night);

    let summary = fine_queries::fine_summary(&h.state).await.expect("summary");
    assert_eq!(summary.total_count, 2);
    assert_eq!(summary.paid_amount, 50_000);
    assert_eq!(summary.unpaid_amount, 50_000);
}

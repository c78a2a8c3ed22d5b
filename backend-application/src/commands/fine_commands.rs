use tracing::{error, info, warn};

use crate::{AppError, AppState};
use backend_domain::{normalize_optional_text, Fine, FineId, LedgerCredit, PaymentTransition};

pub const DEFAULT_ACTING_ADMIN: &str = "admin";

/// UNPAID -> PAID followed by the wallet credit. A failed credit reverts the
/// transition so the fine never stays PAID without a ledger entry.
pub async fn mark_paid(
    state: &AppState,
    fine_id: &FineId,
    acting_admin: Option<String>,
) -> Result<Fine, AppError> {
    let acting_admin =
        normalize_optional_text(acting_admin).unwrap_or_else(|| DEFAULT_ACTING_ADMIN.to_string());
    let paid_at = state.clock.now();

    let transition = state
        .fine_repo
        .mark_paid(fine_id, paid_at, &acting_admin)
        .await
        .map_err(AppError::Internal)?;
    let fine = match transition {
        PaymentTransition::Paid(fine) => fine,
        PaymentTransition::AlreadyPaid(_) => {
            return Err(AppError::AlreadyPaid(fine_id.to_string()));
        }
        PaymentTransition::NotFound => {
            return Err(AppError::NotFound(format!("fine '{}'", fine_id)));
        }
    };

    let credit = LedgerCredit::for_fine(&fine, &acting_admin, paid_at);
    if let Err(err) = state.ledger.credit(&credit).await {
        state.metrics.record_ledger_failure();
        warn!("ledger credit for fine {} failed: {:#}", fine_id, err);
        let reverted = state
            .fine_repo
            .revert_payment(fine_id, paid_at)
            .await
            .map_err(|revert_err| {
                error!(
                    "fine {} left PAID after failed ledger credit: {:#}",
                    fine_id, revert_err
                );
                AppError::Internal(revert_err)
            })?;
        if !reverted {
            error!("fine {} payment could not be reverted", fine_id);
        }
        return Err(AppError::LedgerCredit(err.to_string()));
    }

    state.metrics.record_fine_paid();
    info!(
        "fine {} paid by {} ({} credited)",
        fine.id, acting_admin, fine.amount
    );
    Ok(fine)
}

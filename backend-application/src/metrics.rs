use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    check_ins_accepted: AtomicU64,
    check_ins_rejected: AtomicU64,
    fines_generated: AtomicU64,
    fines_paid: AtomicU64,
    ledger_failures: AtomicU64,
}

impl Metrics {
    pub fn record_check_in(&self, accepted: bool) {
        if accepted {
            self.check_ins_accepted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.check_ins_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_fine_generated(&self) {
        self.fines_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fine_paid(&self) {
        self.fines_paid.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ledger_failure(&self) {
        self.ledger_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let accepted = self.check_ins_accepted.load(Ordering::Relaxed);
        let rejected = self.check_ins_rejected.load(Ordering::Relaxed);
        let generated = self.fines_generated.load(Ordering::Relaxed);
        let paid = self.fines_paid.load(Ordering::Relaxed);
        let ledger_failures = self.ledger_failures.load(Ordering::Relaxed);

        format!(
            "# TYPE ronda_check_ins_accepted_total counter\n\
ronda_check_ins_accepted_total {}\n\
# TYPE ronda_check_ins_rejected_total counter\n\
ronda_check_ins_rejected_total {}\n\
# TYPE ronda_fines_generated_total counter\n\
ronda_fines_generated_total {}\n\
# TYPE ronda_fines_paid_total counter\n\
ronda_fines_paid_total {}\n\
# TYPE ronda_ledger_failures_total counter\n\
ronda_ledger_failures_total {}\n",
            accepted, rejected, generated, paid, ledger_failures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_counters() {
        let metrics = Metrics::default();
        metrics.record_check_in(true);
        metrics.record_check_in(false);
        metrics.record_check_in(false);
        metrics.record_fine_generated();
        let text = metrics.render_prometheus();
        assert!(text.contains("ronda_check_ins_accepted_total 1\n"));
        assert!(text.contains("ronda_check_ins_rejected_total 2\n"));
        assert!(text.contains("ronda_fines_generated_total 1\n"));
        assert!(text.contains("ronda_fines_paid_total 0\n"));
    }
}

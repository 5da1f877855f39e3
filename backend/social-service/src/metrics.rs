//! Social graph metrics
//!
//! Prometheus counters for conflict-ignored mutations and reconciliation drift

use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, IntCounterVec};

static CONFLICT_IGNORED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "social_conflict_ignored_total",
        "Mutations that collapsed to a no-op because the record already matched",
        &["operation"]
    )
    .expect("Failed to register conflict ignored metric")
});

static DRIFT_CORRECTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "social_drift_corrections_total",
        "Records whose cached counters or sets were corrected by reconciliation",
        &["record"]
    )
    .expect("Failed to register drift corrections metric")
});

static RECONCILE_RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "social_reconcile_runs_total",
        "Reconciliation sweeps (success/error)",
        &["status"]
    )
    .expect("Failed to register reconcile runs metric")
});

/// Record a duplicate follow, an unfollow of a missing edge or a repeated delete
pub fn record_conflict_ignored(operation: &str) {
    CONFLICT_IGNORED_TOTAL.with_label_values(&[operation]).inc();
}

/// Record one drifted record healed by reconciliation (account/content)
pub fn record_drift_corrected(record: &str) {
    DRIFT_CORRECTIONS_TOTAL.with_label_values(&[record]).inc();
}

pub fn record_reconcile_run(status: &str) {
    RECONCILE_RUNS_TOTAL.with_label_values(&[status]).inc();
}

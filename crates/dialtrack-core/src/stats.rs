//! Call statistics aggregation
//!
//! Folds the store's department/status rollup into the dashboard summary.
//! The rollup comes from a single query, so `total` is always consistent
//! with the per-class counts.

use crate::models::{Department, StatusBreakdownRow, ANSWERED_STATUSES, FAILED_STATUSES};
use serde::Serialize;
use std::collections::BTreeMap;

/// Dashboard call statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct CallStats {
    /// Count of all call records
    pub total: i64,

    /// Calls whose status is completed or answered
    pub answered: i64,

    /// Calls whose status is failed, busy, no-answer, or canceled
    pub failed: i64,

    /// Per-department counts; departments with zero rows are absent, and
    /// records with no department are counted in `total` only
    pub by_department: BTreeMap<Department, i64>,
}

impl CallStats {
    /// Fold a department/status rollup into summary statistics
    pub fn from_breakdown(rows: &[StatusBreakdownRow]) -> Self {
        let mut stats = CallStats::default();

        for row in rows {
            stats.total += row.count;

            if let Some(status) = row.status.as_deref() {
                if ANSWERED_STATUSES.contains(&status) {
                    stats.answered += row.count;
                } else if FAILED_STATUSES.contains(&status) {
                    stats.failed += row.count;
                }
            }

            if let Some(dept) = row.department.as_deref().and_then(|d| Department::parse(d).ok()) {
                *stats.by_department.entry(dept).or_insert(0) += row.count;
            }
        }

        stats
    }
}

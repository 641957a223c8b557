//! Dashboard statistics DTOs

use dialtrack_core::models::Department;
use dialtrack_core::stats::CallStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Dashboard statistics response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total: i64,
    pub answered: i64,
    pub failed: i64,
    pub by_department: BTreeMap<Department, i64>,
}

impl From<CallStats> for StatsResponse {
    fn from(stats: CallStats) -> Self {
        Self {
            total: stats.total,
            answered: stats.answered,
            failed: stats.failed,
            by_department: stats.by_department,
        }
    }
}

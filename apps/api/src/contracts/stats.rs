use serde::Serialize;

use crate::models::contract::ContractStatus;

/// Counters shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total: u64,
    pub completed: u64,
    pub degraded: u64,
    pub failed: u64,
    /// Everything not `completed`, matching how the dashboard counts "pending review".
    pub pending: u64,
    pub average_risk_score: Option<f64>,
}

/// Builds the dashboard counters from per-status row counts.
pub fn summarize(
    status_counts: &[(ContractStatus, i64)],
    average_risk_score: Option<f64>,
) -> DashboardStats {
    let count = |status: ContractStatus| -> u64 {
        status_counts
            .iter()
            .filter(|(s, _)| *s == status)
            .map(|(_, n)| u64::try_from(*n).unwrap_or(0))
            .sum()
    };

    let total: u64 = status_counts
        .iter()
        .map(|(_, n)| u64::try_from(*n).unwrap_or(0))
        .sum();
    let completed = count(ContractStatus::Completed);

    DashboardStats {
        total,
        completed,
        degraded: count(ContractStatus::Degraded),
        failed: count(ContractStatus::Failed),
        pending: total - completed,
        average_risk_score: average_risk_score.map(|s| (s * 10.0).round() / 10.0),
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::scoring::Risk;
use crate::analysis::DegradedReason;

/// Lifecycle of an uploaded contract. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum ContractStatus {
    Analyzing,
    /// Analysis stored from a genuine model answer.
    Completed,
    /// Analysis stored, but it is the fallback placeholder.
    Degraded,
    Failed,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
            Self::Degraded => "degraded",
            Self::Failed => "failed",
        }
    }

    /// Final status once an analysis has been stored.
    pub fn after_analysis(degraded_reason: Option<&DegradedReason>) -> Self {
        match degraded_reason {
            Some(_) => Self::Degraded,
            None => Self::Completed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContractRow {
    pub id: Uuid,
    pub filename: String,
    pub s3_key: Option<String>,
    pub status: ContractStatus,
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub parties: String,
    pub contract_value: String,
    pub start_date: String,
    pub end_date: String,
    pub key_terms: Json<Vec<String>>,
    pub risks: Json<Vec<Risk>>,
    pub risk_score: f64,
    pub degraded_reason: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::scoring::RiskLevel;
use crate::contracts::ingest::{process_upload, ContractUpload, UploadResponse};
use crate::contracts::repository::{
    average_risk_score, count_by_status, get_analysis, get_contract, list_contracts,
};
use crate::contracts::stats::{summarize, DashboardStats};
use crate::errors::AppError;
use crate::models::contract::{AnalysisRow, ContractRow};
use crate::state::AppState;

/// Name of the multipart field carrying the PDF.
const FILE_FIELD: &str = "file";

#[derive(Serialize)]
pub struct AnalysisView {
    #[serde(flatten)]
    pub analysis: AnalysisRow,
    pub risk_level: RiskLevel,
}

impl From<AnalysisRow> for AnalysisView {
    fn from(analysis: AnalysisRow) -> Self {
        let risk_level = RiskLevel::from_score(analysis.risk_score);
        Self {
            analysis,
            risk_level,
        }
    }
}

#[derive(Serialize)]
pub struct ContractDetailResponse {
    pub contract: ContractRow,
    pub analysis: Option<AnalysisView>,
}

/// POST /api/v1/contracts
///
/// Multipart upload with a single `file` field. Analysis runs inline.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let response = process_upload(&state, upload).await?;
    Ok(Json(response))
}

async fn read_upload(mut multipart: Multipart) -> Result<ContractUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        return Ok(ContractUpload { filename, bytes });
    }

    Err(AppError::Validation(format!(
        "Missing '{FILE_FIELD}' field in upload"
    )))
}

/// GET /api/v1/contracts
pub async fn handle_list_contracts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContractRow>>, AppError> {
    let contracts = list_contracts(&state.db).await?;
    Ok(Json(contracts))
}

/// GET /api/v1/contracts/stats
pub async fn handle_contract_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let counts = count_by_status(&state.db).await?;
    let average = average_risk_score(&state.db).await?;
    Ok(Json(summarize(&counts, average)))
}

/// GET /api/v1/contracts/:id
///
/// `analysis` is null while the contract is still analyzing or when it failed.
pub async fn handle_get_contract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContractDetailResponse>, AppError> {
    let contract = get_contract(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Contract {id} not found")))?;
    let analysis = get_analysis(&state.db, id).await?.map(AnalysisView::from);

    Ok(Json(ContractDetailResponse { contract, analysis }))
}

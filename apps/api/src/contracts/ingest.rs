//! Upload pipeline: validate → record → store PDF → extract text → analyze → persist.

use bytes::Bytes;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::contracts::extract::{extract_pdf_text, validate_pdf_filename};
use crate::contracts::repository::{insert_contract, save_analysis, set_s3_key, set_status};
use crate::contracts::storage::store_contract_pdf;
use crate::errors::AppError;
use crate::models::contract::ContractStatus;
use crate::state::AppState;

/// A PDF received from the client, before any validation.
#[derive(Debug)]
pub struct ContractUpload {
    pub filename: String,
    pub bytes: Bytes,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub contract_id: Uuid,
    pub status: ContractStatus,
    pub risk_score: f64,
}

/// Checks the upload before anything is written.
pub fn validate_upload(upload: &ContractUpload) -> Result<String, AppError> {
    let filename = validate_pdf_filename(&upload.filename)?;
    if upload.bytes.is_empty() {
        return Err(AppError::Validation(format!("{filename} is empty")));
    }
    Ok(filename)
}

pub async fn process_upload(
    state: &AppState,
    upload: ContractUpload,
) -> Result<UploadResponse, AppError> {
    let filename = validate_upload(&upload)?;

    let contract_id = Uuid::new_v4();
    insert_contract(&state.db, contract_id, &filename)
        .await
        .map_err(AppError::Internal)?;

    match analyze_upload(state, contract_id, &filename, upload.bytes).await {
        Ok(response) => Ok(response),
        Err(e) => {
            if let Err(status_err) = set_status(&state.db, contract_id, ContractStatus::Failed).await
            {
                error!("Could not mark contract {contract_id} as failed: {status_err:?}");
            }
            Err(e)
        }
    }
}

async fn analyze_upload(
    state: &AppState,
    contract_id: Uuid,
    filename: &str,
    bytes: Bytes,
) -> Result<UploadResponse, AppError> {
    let s3_key = store_contract_pdf(
        &state.s3,
        &state.config.s3_bucket,
        contract_id,
        filename,
        bytes.clone(),
    )
    .await?;
    set_s3_key(&state.db, contract_id, &s3_key)
        .await
        .map_err(AppError::Internal)?;

    let text = extract_pdf_text(bytes).await?;
    if text.trim().is_empty() {
        info!("Contract {contract_id} has no extractable text; analyzing anyway");
    }

    let outcome = state.analyzer.analyze_detailed(&text).await;
    let status = ContractStatus::after_analysis(outcome.degraded_reason());
    let degraded_reason = outcome.degraded_reason().map(|r| r.to_string());
    let analysis = outcome.into_result();

    save_analysis(
        &state.db,
        contract_id,
        &analysis,
        status,
        degraded_reason.as_deref(),
    )
    .await
    .map_err(AppError::Internal)?;

    Ok(UploadResponse {
        contract_id,
        status,
        risk_score: analysis.risk_score,
    })
}

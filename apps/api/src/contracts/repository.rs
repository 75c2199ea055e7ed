use anyhow::Result;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::models::contract::{AnalysisRow, ContractRow, ContractStatus};

/// Inserts a new contract row in the `analyzing` state.
pub async fn insert_contract(pool: &PgPool, id: Uuid, filename: &str) -> Result<ContractRow> {
    let row = sqlx::query_as::<_, ContractRow>(
        "INSERT INTO contracts (id, filename, status) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(id)
    .bind(filename)
    .bind(ContractStatus::Analyzing)
    .fetch_one(pool)
    .await?;

    info!("Created contract {id} for '{filename}'");
    Ok(row)
}

pub async fn set_s3_key(pool: &PgPool, id: Uuid, s3_key: &str) -> Result<()> {
    sqlx::query("UPDATE contracts SET s3_key = $1 WHERE id = $2")
        .bind(s3_key)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_status(pool: &PgPool, id: Uuid, status: ContractStatus) -> Result<()> {
    sqlx::query("UPDATE contracts SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Stores the analysis and moves the contract to `status` in one transaction.
/// Analyses are write-once: a contract never gets a second row.
pub async fn save_analysis(
    pool: &PgPool,
    contract_id: Uuid,
    analysis: &AnalysisResult,
    status: ContractStatus,
    degraded_reason: Option<&str>,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO analysis_results
            (id, contract_id, parties, contract_value, start_date, end_date,
             key_terms, risks, risk_score, degraded_reason)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(contract_id)
    .bind(&analysis.parties)
    .bind(&analysis.contract_value)
    .bind(&analysis.start_date)
    .bind(&analysis.end_date)
    .bind(Json(&analysis.key_terms))
    .bind(Json(&analysis.risks))
    .bind(analysis.risk_score)
    .bind(degraded_reason)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE contracts SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(contract_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(
        "Stored analysis for contract {contract_id} (status {}, risk_score {})",
        status.as_str(),
        analysis.risk_score
    );
    Ok(())
}

/// Returns every contract, newest first.
pub async fn list_contracts(pool: &PgPool) -> Result<Vec<ContractRow>> {
    Ok(
        sqlx::query_as::<_, ContractRow>("SELECT * FROM contracts ORDER BY upload_date DESC")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn get_contract(pool: &PgPool, id: Uuid) -> Result<Option<ContractRow>> {
    Ok(
        sqlx::query_as::<_, ContractRow>("SELECT * FROM contracts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn get_analysis(pool: &PgPool, contract_id: Uuid) -> Result<Option<AnalysisRow>> {
    Ok(sqlx::query_as::<_, AnalysisRow>(
        "SELECT * FROM analysis_results WHERE contract_id = $1",
    )
    .bind(contract_id)
    .fetch_optional(pool)
    .await?)
}

/// Number of contracts in each status. Statuses with no contracts are absent.
pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(ContractStatus, i64)>> {
    Ok(sqlx::query_as::<_, (ContractStatus, i64)>(
        "SELECT status, COUNT(*) FROM contracts GROUP BY status",
    )
    .fetch_all(pool)
    .await?)
}

/// Mean risk score across stored analyses, `None` when there are none.
pub async fn average_risk_score(pool: &PgPool) -> Result<Option<f64>> {
    Ok(
        sqlx::query_scalar::<_, Option<f64>>("SELECT AVG(risk_score) FROM analysis_results")
            .fetch_one(pool)
            .await?,
    )
}

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::analysis::ContractAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// Wraps the injected `Completer`; the only path to the LLM.
    pub analyzer: ContractAnalyzer,
    pub config: Config,
}

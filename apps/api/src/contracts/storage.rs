use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// Object key for an uploaded contract's original PDF.
pub fn contract_object_key(contract_id: Uuid, filename: &str) -> String {
    format!("contracts/{contract_id}/{filename}")
}

/// Uploads the original PDF and returns its object key.
pub async fn store_contract_pdf(
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    contract_id: Uuid,
    filename: &str,
    bytes: Bytes,
) -> Result<String, AppError> {
    let key = contract_object_key(contract_id, filename);

    s3.put_object()
        .bucket(s3_bucket)
        .key(&key)
        .body(ByteStream::from(bytes))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

    info!("Uploaded contract PDF to s3://{}/{}", s3_bucket, key);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_layout() {
        let id = Uuid::nil();
        assert_eq!(
            contract_object_key(id, "tender.pdf"),
            "contracts/00000000-0000-0000-0000-000000000000/tender.pdf"
        );
    }
}

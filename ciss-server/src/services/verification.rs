//! AI document verification
//!
//! Before an uploaded proof is accepted, the enrollment pipeline asks an
//! external verification endpoint whether the image actually shows the
//! claimed document type. The endpoint receives the image as a data URI and
//! answers with a match verdict and a reason.
//!
//! With no endpoint configured the check is skipped, so the server works
//! standalone in development.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use shared::ErrorCode;

use crate::utils::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest<'a> {
    photo_data_uri: String,
    expected_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    is_match: bool,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DocumentVerifier {
    http: reqwest::Client,
    endpoint: Option<String>,
}

impl DocumentVerifier {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Check that `data` shows a document of `expected_type`
    ///
    /// Returns `Ok(())` on a match or when verification is disabled; a
    /// negative verdict maps to a 422 carrying the endpoint's reason.
    pub async fn verify(
        &self,
        data: &[u8],
        content_type: &str,
        expected_type: &str,
    ) -> Result<(), AppError> {
        let Some(endpoint) = &self.endpoint else {
            tracing::debug!(expected_type, "document verification disabled, skipping");
            return Ok(());
        };

        let request = VerifyRequest {
            photo_data_uri: format!("data:{};base64,{}", content_type, BASE64.encode(data)),
            expected_type,
        };

        let response = self
            .http
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AppError::with_message(
                    ErrorCode::NetworkError,
                    format!("Document verification request failed: {e}"),
                )
            })?;

        if !response.status().is_success() {
            return Err(AppError::with_message(ErrorCode::NetworkError, format!(
                "Document verification service returned {}",
                response.status()
            )));
        }

        let verdict: VerifyResponse = response.json().await.map_err(|e| {
            AppError::with_message(
                ErrorCode::NetworkError,
                format!("Invalid verification response: {e}"),
            )
        })?;

        if !verdict.is_match {
            let reason = verdict
                .reason
                .unwrap_or_else(|| "Document does not match the expected type".to_string());
            tracing::warn!(expected_type, reason = %reason, "document verification rejected");
            return Err(
                AppError::with_message(ErrorCode::DocumentVerificationFailed, reason)
            );
        }

        Ok(())
    }
}

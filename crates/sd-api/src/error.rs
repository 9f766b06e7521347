use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::{borrow::Cow, future::Future};
use thiserror::Error;
use tracing::error;

use sd_common::db::{
    ActivityStorageError, AuditStorageError, ClientStorageError, CustomFieldStorageError,
    CustomValueStorageError, EmployeeStorageError, InvoiceStorageError, JobStorageError,
    KpiTargetStorageError, PaymentStorageError, ProspectStorageError, ScoreStorageError,
    UserRoleStorageError,
};

tokio::task_local! {
    static REQUEST_ID: String;
}

fn sanitize_message(message: &str) -> String {
    const MAX_LEN: usize = 240;

    let mut cleaned = message
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .replace(['\n', '\r'], " ");

    cleaned = cleaned
        .split_whitespace()
        .map(|token| {
            if token.contains("://") {
                "[redacted-url]".to_string()
            } else if let Some((base, _)) = token.split_once('?') {
                if base.is_empty() {
                    "[redacted-query]".to_string()
                } else {
                    format!("{base}?[redacted]")
                }
            } else if token.starts_with('/') || token.contains('\\') {
                "[redacted-path]".to_string()
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.len() > MAX_LEN {
        let cut = (0..=MAX_LEN)
            .rev()
            .find(|idx| cleaned.is_char_boundary(*idx))
            .unwrap_or(0);
        cleaned.truncate(cut);
        cleaned.push('…');
    }

    if cleaned.trim().is_empty() {
        "unexpected error".to_string()
    } else {
        cleaned
    }
}

pub async fn with_request_id<Fut, T>(request_id: Option<String>, fut: Fut) -> T
where
    Fut: Future<Output = T>,
{
    if let Some(request_id) = request_id {
        REQUEST_ID.scope(request_id, fut).await
    } else {
        fut.await
    }
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|value| value.clone()).ok()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("database error: {0}")]
    Database(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("too many requests: {0}")]
    TooManyRequests(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The restricted-access answer every denied view or mutation gets.
    pub fn restricted() -> Self {
        ApiError::Forbidden("restricted access".into())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
    request_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let code = self.code();
        let request_id = current_request_id();

        error!(
            code,
            status = %status,
            request_id = request_id.as_deref().unwrap_or(""),
            error = %self,
            "api_error"
        );

        let body = Json(ErrorResponse {
            code,
            message: self.public_message().into_owned(),
            request_id,
        });

        (status, body).into_response()
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::TooManyRequests(_) => "too_many_requests",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
            ApiError::Database(_) => "database_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> Cow<'static, str> {
        match self {
            ApiError::BadRequest(msg) => Cow::Owned(sanitize_message(msg)),
            ApiError::Unauthorized(_) => Cow::Borrowed("unauthorized"),
            ApiError::Forbidden(_) => Cow::Borrowed("forbidden"),
            ApiError::NotFound(msg) => Cow::Owned(sanitize_message(msg)),
            ApiError::Conflict(msg) => Cow::Owned(sanitize_message(msg)),
            ApiError::TooManyRequests(_) => Cow::Borrowed("too many requests"),
            ApiError::ServiceUnavailable(_) => Cow::Borrowed("service unavailable"),
            ApiError::Database(_) | ApiError::Internal(_) => Cow::Borrowed("internal server error"),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ClientStorageError> for ApiError {
    fn from(value: ClientStorageError) -> Self {
        match value {
            ClientStorageError::NotFound(id) => ApiError::NotFound(format!("client {id} not found")),
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<EmployeeStorageError> for ApiError {
    fn from(value: EmployeeStorageError) -> Self {
        ApiError::Database(value.to_string())
    }
}

impl From<JobStorageError> for ApiError {
    fn from(value: JobStorageError) -> Self {
        match value {
            JobStorageError::NotFound(id) => ApiError::NotFound(format!("job {id} not found")),
            JobStorageError::AlreadyAssigned => {
                ApiError::Conflict("recruiter already assigned to job".into())
            }
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<ActivityStorageError> for ApiError {
    fn from(value: ActivityStorageError) -> Self {
        ApiError::Database(value.to_string())
    }
}

impl From<ProspectStorageError> for ApiError {
    fn from(value: ProspectStorageError) -> Self {
        match value {
            ProspectStorageError::NotFound(id) => {
                ApiError::NotFound(format!("prospect {id} not found"))
            }
            ProspectStorageError::ProbabilityOutOfRange => {
                ApiError::BadRequest("probability must be between 0 and 100".into())
            }
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<InvoiceStorageError> for ApiError {
    fn from(value: InvoiceStorageError) -> Self {
        match value {
            InvoiceStorageError::NotFound(id) => {
                ApiError::NotFound(format!("invoice {id} not found"))
            }
            InvoiceStorageError::NonPositiveAmount => {
                ApiError::BadRequest("invoice amount must be positive".into())
            }
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<PaymentStorageError> for ApiError {
    fn from(value: PaymentStorageError) -> Self {
        ApiError::Database(value.to_string())
    }
}

impl From<ScoreStorageError> for ApiError {
    fn from(value: ScoreStorageError) -> Self {
        match value {
            ScoreStorageError::NotFound(id) => ApiError::NotFound(format!("score {id} not found")),
            ScoreStorageError::SubScoreOutOfRange => {
                ApiError::BadRequest("sub-scores must be between 1 and 5".into())
            }
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<KpiTargetStorageError> for ApiError {
    fn from(value: KpiTargetStorageError) -> Self {
        match value {
            KpiTargetStorageError::NotFound(id) => {
                ApiError::NotFound(format!("kpi target {id} not found"))
            }
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<CustomFieldStorageError> for ApiError {
    fn from(value: CustomFieldStorageError) -> Self {
        match value {
            CustomFieldStorageError::NotFound(id) => {
                ApiError::NotFound(format!("custom field {id} not found"))
            }
            CustomFieldStorageError::FieldCapReached(department) => ApiError::BadRequest(format!(
                "department {department} already has the maximum number of active custom fields"
            )),
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<CustomValueStorageError> for ApiError {
    fn from(value: CustomValueStorageError) -> Self {
        ApiError::Database(value.to_string())
    }
}

impl From<UserRoleStorageError> for ApiError {
    fn from(value: UserRoleStorageError) -> Self {
        ApiError::Database(value.to_string())
    }
}

impl From<AuditStorageError> for ApiError {
    fn from(value: AuditStorageError) -> Self {
        ApiError::Database(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;

    #[tokio::test]
    async fn includes_request_id_in_response_body_when_present() {
        let err = ApiError::Internal("boom".into());
        let response = with_request_id(Some("req-123".into()), async { err.into_response() }).await;

        let (parts, body) = response.into_parts();
        assert_eq!(parts.status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = body.collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["request_id"], "req-123");
    }

    #[test]
    fn sanitizer_redacts_urls_and_paths() {
        let cleaned = sanitize_message("failed to reach postgres://user:pw@db/ops at /var/run");
        assert!(cleaned.contains("[redacted-url]"));
        assert!(cleaned.contains("[redacted-path]"));
        assert!(!cleaned.contains("postgres://"));
    }

    #[tokio::test]
    async fn forbidden_hides_internal_detail() {
        let response = ApiError::restricted().into_response();
        let (parts, body) = response.into_parts();
        assert_eq!(parts.status, StatusCode::FORBIDDEN);
        let bytes = body.collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "forbidden");
        assert_eq!(json["message"], "forbidden");
    }
}

//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use inkwell_core::error::{DomainError, RepoError};
use inkwell_core::ports::{AuthError, StorageError};
use inkwell_shared::ErrorResponse;

const ASSISTANT_FAILURE: &str =
    "The assistant service is unavailable right now. Please try again later.";
const IDENTITY_PROVIDER_FAILURE: &str =
    "Could not reach the sign-in provider. Please try again later.";

/// External service behind a 502. Its error detail stays in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Assistant,
    IdentityProvider,
}

impl Upstream {
    fn user_message(self) -> &'static str {
        match self {
            Upstream::Assistant => ASSISTANT_FAILURE,
            Upstream::IdentityProvider => IDENTITY_PROVIDER_FAILURE,
        }
    }
}

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    BadGateway(Upstream, String),
    /// Optional service is not configured.
    Unavailable(String),
    /// Internal failure whose detail is safe to show.
    Database(String),
    /// Required server setting is missing. The detail is shown.
    Misconfigured(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::BadGateway(upstream, msg) => write!(f, "Bad gateway ({:?}): {}", upstream, msg),
            AppError::Unavailable(msg) => write!(f, "Unavailable: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Misconfigured(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadGateway(..) => StatusCode::BAD_GATEWAY,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Misconfigured(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized(detail),
            AppError::Forbidden(detail) => ErrorResponse::forbidden(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::BadGateway(upstream, detail) => {
                tracing::error!(?upstream, "Upstream failure: {}", detail);
                ErrorResponse::bad_gateway(upstream.user_message())
            }
            AppError::Unavailable(detail) => ErrorResponse::service_unavailable(detail),
            AppError::Database(detail) => {
                tracing::error!("Database error: {}", detail);
                ErrorResponse::internal_error().with_detail(detail)
            }
            AppError::Misconfigured(detail) => {
                tracing::error!("Configuration error: {}", detail);
                ErrorResponse::internal_error().with_detail(detail)
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::Unauthorized("Authentication required".into()),
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
            err @ DomainError::CounterUpdate { .. } => AppError::Database(err.to_string()),
            DomainError::Repo(e) => e.into(),
            DomainError::Auth(e) => e.into(),
            DomainError::Storage(e) => e.into(),
            DomainError::Completion(e) => AppError::BadGateway(Upstream::Assistant, e.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => AppError::Database(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::Forbidden(err.to_string()),
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::MissingAuth => {
                AppError::Unauthorized(err.to_string())
            }
            AuthError::Provider(msg) => AppError::BadGateway(Upstream::IdentityProvider, msg),
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotConfigured => AppError::Misconfigured(err.to_string()),
            StorageError::Signing(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use inkwell_core::ports::CompletionError;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_rt::test]
    async fn test_forbidden_keeps_message() {
        let err: AppError = DomainError::forbidden("you can not access draft blogs").into();
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["detail"], "you can not access draft blogs");
        assert_eq!(body["status"], 403);
    }

    #[actix_rt::test]
    async fn test_duplicate_is_conflict() {
        let err: AppError = DomainError::Duplicate("email already exists".into()).into();
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["detail"], "email already exists");
    }

    #[actix_rt::test]
    async fn test_query_error_detail_is_shown() {
        let err: AppError = DomainError::Repo(RepoError::Query("relation missing".into())).into();
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "relation missing");
    }

    #[actix_rt::test]
    async fn test_completion_failure_is_generic_bad_gateway() {
        let err: AppError = DomainError::Completion(CompletionError::Status {
            status: 500,
            body: "secret upstream body".into(),
        })
        .into();
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["detail"], ASSISTANT_FAILURE);
    }

    #[actix_rt::test]
    async fn test_identity_provider_failure_names_sign_in() {
        let err: AppError =
            DomainError::Auth(AuthError::Provider("tokeninfo returned 503".into())).into();
        assert!(matches!(err, AppError::BadGateway(Upstream::IdentityProvider, _)));

        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["detail"], IDENTITY_PROVIDER_FAILURE);
        assert!(!body.to_string().contains("tokeninfo"));
    }

    #[actix_rt::test]
    async fn test_missing_storage_config_is_configuration_error() {
        let err: AppError = StorageError::NotConfigured.into();
        assert!(matches!(err, AppError::Misconfigured(_)));
        assert!(err.to_string().starts_with("Configuration error"));

        let expected = StorageError::NotConfigured.to_string();
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], expected);
    }

    #[actix_rt::test]
    async fn test_counter_update_names_slug() {
        let err: AppError = DomainError::CounterUpdate {
            slug: "my-post-abc".into(),
            source: RepoError::NotFound,
        }
        .into();
        let (status, body) = body_of(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("my-post-abc"));
    }
}

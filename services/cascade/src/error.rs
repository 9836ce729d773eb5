use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use fitfusion_core::error::ErrorBody;

/// Failure reported by a [`StoreGateway`](crate::domain::repository::StoreGateway).
/// Whatever the variant, the failed call mutated nothing.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("batch conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure reported by an [`IdentityGateway`](crate::domain::repository::IdentityGateway).
/// Logged, never propagated once the store side has committed.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
    #[error("identity provider rejected credential deletion: {0}")]
    Rejected(String),
}

/// Why the permission guard refused a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    Unauthenticated,
    NotATrainer,
    NotYourClient,
}

impl DenialReason {
    pub fn code(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::NotATrainer => "not-a-trainer",
            Self::NotYourClient => "not-your-client",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unauthenticated => "user must be authenticated",
            Self::NotATrainer => "only trainers can perform this operation",
            Self::NotYourClient => "client does not belong to this trainer",
        })
    }
}

/// Cascade service error variants.
#[derive(Debug, thiserror::Error)]
pub enum CascadeServiceError {
    #[error("authentication required")]
    AuthenticationRequired,
    #[error("{0}")]
    PermissionDenied(DenialReason),
    #[error("invalid argument: {0} is required")]
    InvalidArgument(&'static str),
    /// Read or scan failed while planning. Nothing was mutated.
    #[error("failed to build cascade plan")]
    Planner(#[source] StoreError),
    /// Batch commit failed. The failed batch mutated nothing.
    #[error("failed to commit cascade batch")]
    Executor(#[source] StoreError),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<DenialReason> for CascadeServiceError {
    fn from(reason: DenialReason) -> Self {
        match reason {
            DenialReason::Unauthenticated => Self::AuthenticationRequired,
            other => Self::PermissionDenied(other),
        }
    }
}

impl CascadeServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "UNAUTHENTICATED",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Planner(_) | Self::Executor(_) | Self::Internal(_) => "INTERNAL",
        }
    }

    /// Planner and executor failures leave the store untouched, so the
    /// whole invocation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Planner(_) | Self::Executor(_))
    }

    fn is_internal(&self) -> bool {
        matches!(self, Self::Planner(_) | Self::Executor(_) | Self::Internal(_))
    }
}

impl IntoResponse for CascadeServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Planner(_) | Self::Executor(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // 4xx are expected client errors; only internal failures are logged,
        // with the full source chain.
        if self.is_internal() {
            let kind = self.kind();
            let message = match &self {
                Self::Planner(_) | Self::Executor(_) => "Failed to delete client",
                _ => "internal error",
            };
            let error = anyhow::Error::new(self);
            tracing::error!(error = %format!("{error:#}"), kind, "internal error");
            return ErrorBody::new(kind, message).into_response_with(status);
        }
        let body = ErrorBody::new(self.kind(), self.to_string());
        let body = match self {
            Self::PermissionDenied(reason) => body.with_reason(reason.code()),
            Self::AuthenticationRequired => body.with_reason(DenialReason::Unauthenticated.code()),
            _ => body,
        };
        body.into_response_with(status)
    }
}

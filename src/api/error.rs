use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::{RuleError, StoreError, ValidationError};

/// An error surfaced to HTTP clients as `{error, kind, position?, offset?}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<usize>,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn rejected(status: StatusCode, kind: &'static str, error: String) -> Self {
        Self {
            status,
            body: ErrorBody {
                error,
                kind,
                position: None,
                offset: None,
            },
        }
    }
}

impl From<RuleError> for ApiError {
    fn from(err: RuleError) -> Self {
        let message = err.to_string();
        let (status, kind, position, offset) = match &err {
            RuleError::Lex(e) => (StatusCode::BAD_REQUEST, "lex_error", None, Some(e.offset())),
            RuleError::Parse(e) => (
                StatusCode::BAD_REQUEST,
                "parse_error",
                Some(e.position()),
                e.offset(),
            ),
            RuleError::Eval(_) => (StatusCode::UNPROCESSABLE_ENTITY, "eval_error", None, None),
            RuleError::Store(StoreError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "not_found", None, None)
            }
            RuleError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error", None, None),
        };
        Self {
            status,
            body: ErrorBody {
                error: message,
                kind,
                position,
                offset,
            },
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        RuleError::from(err).into()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        RuleError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::rejected(rejection.status(), "invalid_body", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::rejected(rejection.status(), "invalid_path", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::rejected(rejection.status(), "invalid_query", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

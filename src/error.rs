use crate::external::ExternalError;
use crate::team::MemberNotFound;
use crate::validation::ValidationErrors;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    errors: Vec<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::MissingCredentials(_)
            | AppError::Upstream(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn team_not_found() -> Self {
        AppError::NotFound("No team found with the given id".to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MemberNotFound> for AppError {
    fn from(err: MemberNotFound) -> Self {
        AppError::NotFound(err.to_string())
    }
}

impl From<ExternalError> for AppError {
    fn from(err: ExternalError) -> Self {
        match err {
            ExternalError::MissingCredentials(what) => AppError::MissingCredentials(what),
            ExternalError::HandleNotFound(detail) => AppError::BadRequest(format!("Error: {detail}")),
            ExternalError::UserNotFound(detail) => {
                AppError::BadRequest(format!("Validation error: user doesn't exist! {detail}"))
            }
            ExternalError::RepoNotFound(_) => {
                AppError::NotFound("GitHub repo doesn't exist for this team!".to_string())
            }
            ExternalError::OAuth(detail) => AppError::BadRequest(detail),
            ExternalError::Http(detail) | ExternalError::InvalidResponse(detail) => {
                AppError::Upstream(detail)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        }

        let body = match self {
            AppError::Validation(errors) => ErrorBody {
                message: "Validation error".to_string(),
                errors: errors.messages(),
            },
            // storage and internal details stay in the log
            AppError::Database(_) | AppError::Internal(_) => ErrorBody {
                message: "Internal server error".to_string(),
                errors: Vec::new(),
            },
            other => ErrorBody {
                message: other.to_string(),
                errors: Vec::new(),
            },
        };

        (status, Json(body)).into_response()
    }
}

use application::ApplicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        use application::ApplicationError as AppErr;
        use domain::DomainError;

        let message = error.to_string();
        match error {
            AppErr::Domain(DomainError::Validation { .. }) => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_ARGUMENT",
                message,
            ),
            AppErr::Domain(DomainError::SenderNotActive { .. }) => ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "SENDER_NOT_ACTIVE",
                message,
            ),
            AppErr::Domain(DomainError::ParticipantAlreadyExists { .. }) => {
                ApiError::new(StatusCode::CONFLICT, "PARTICIPANT_EXISTS", message)
            }
            AppErr::Domain(DomainError::ParticipantNotFound { .. }) => {
                ApiError::new(StatusCode::NOT_FOUND, "PARTICIPANT_NOT_FOUND", message)
            }
            AppErr::Domain(DomainError::MessageNotFound { .. }) => {
                ApiError::new(StatusCode::NOT_FOUND, "MESSAGE_NOT_FOUND", message)
            }
            AppErr::Domain(DomainError::NotMessageOwner { .. }) => {
                ApiError::new(StatusCode::UNAUTHORIZED, "NOT_MESSAGE_OWNER", message)
            }
            AppErr::Repository(repo_err) => match repo_err {
                domain::RepositoryError::NotFound => ApiError::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "requested resource not found",
                ),
                domain::RepositoryError::Conflict => {
                    ApiError::new(StatusCode::CONFLICT, "CONFLICT", "resource already exists")
                }
                domain::RepositoryError::Storage { message } => {
                    tracing::error!(error = %message, "存储层错误");
                    ApiError::new(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INFRASTRUCTURE_ERROR",
                        format!("storage error: {}", message),
                    )
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

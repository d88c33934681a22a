use axum::http::StatusCode;
use thiserror::Error;

/// Failures of tracker operations. Messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("Please enter a project name")]
    EmptyProjectName,
    #[error("Please enter an event title")]
    EmptyEventTitle,
    #[error("Please enter a goal name")]
    EmptyGoalName,
    #[error("Goal target must be greater than zero")]
    InvalidGoalTarget,
    #[error("Please enter a task")]
    EmptyTodo,
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Please enter your name")]
    MissingName,
    #[error("project {0} not found")]
    UnknownProject(String),
    #[error("project {0} is not running")]
    NotRunning(String),
    #[error("event {0} not found")]
    UnknownEvent(String),
    #[error("goal {0} not found")]
    UnknownGoal(String),
    #[error("todo {0} not found")]
    UnknownTodo(String),
    #[error("no project is waiting for deletion")]
    NoPendingDelete,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        let status = match err {
            TrackerError::UnknownProject(_)
            | TrackerError::UnknownEvent(_)
            | TrackerError::UnknownGoal(_)
            | TrackerError::UnknownTodo(_) => StatusCode::NOT_FOUND,
            TrackerError::NotRunning(_) | TrackerError::NoPendingDelete => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

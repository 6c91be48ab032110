use axum::BoxError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database migration error: {0}")]
    DatabaseMigration(#[from] sqlx::migrate::MigrateError),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] s3::error::S3Error),
    #[error("AWS credentials error: {0}")]
    Credentials(#[from] s3::creds::error::CredentialsError),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("No credentials provided")]
    NoCredentials,
    #[error("Invalid session")]
    InvalidSession,
    #[error("Expired session")]
    ExpiredSession,
    #[error("Role {0} not permitted")]
    Forbidden(&'static str),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Email already registered")]
    UserAlreadyExists,
    #[error("Instagram handle already registered")]
    UsernameTaken,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] s3::error::S3Error),
    #[error("Pipeline error: {0}")]
    Pipeline(String),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Internal server error")]
    Internal,
}

impl Error {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Error::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Error::NoCredentials | Error::InvalidSession | Error::ExpiredSession => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".into())
            }
            Error::Forbidden(role) => (
                StatusCode::UNAUTHORIZED,
                format!("Unauthorized - {} role required", role),
            ),
            Error::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password".into())
            }
            Error::UserAlreadyExists => (StatusCode::CONFLICT, "Email already registered".into()),
            Error::UsernameTaken => (
                StatusCode::CONFLICT,
                "Instagram handle already registered".into(),
            ),
            Error::NotFound(message) => (StatusCode::NOT_FOUND, (*message).into()),
            Error::Sql(_)
            | Error::Storage(_)
            | Error::Pipeline(_)
            | Error::Jwt(_)
            | Error::Bcrypt(_)
            | Error::Serialize(_)
            | Error::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".into(),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!("{:?}", self);
        } else {
            tracing::debug!("{}", self);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub(crate) async fn handle_middleware_errors(err: BoxError) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!("Unhandled error: {:?}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_and_auth_errors_share_status() {
        assert_eq!(
            Error::Forbidden("brand").status_and_message().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::ExpiredSession.status_and_message().0,
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_upstream_errors_hide_detail() {
        let (status, message) = Error::Pipeline("arn:aws:states:secret".into()).status_and_message();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error");
    }

    #[test]
    fn test_validation_message_is_passed_through() {
        let (status, message) = Error::Validation("query is required".into()).status_and_message();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "query is required");
    }
}

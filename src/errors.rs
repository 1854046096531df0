use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("Identity error: {0}")]
    IdentityError(String),

    #[error("Password error: {0}")]
    PasswordError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Not found")]
    NotFound,

    /// Carries the path the caller tried to reach so login can send them back.
    #[error("Unauthorized")]
    Unauthorized { redirect: String },
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::SEE_OTHER,
            AppError::DatabaseError(_)
            | AppError::MigrateError(_)
            | AppError::TemplateError(_)
            | AppError::IdentityError(_)
            | AppError::PasswordError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized { redirect } => HttpResponse::SeeOther()
                .append_header((header::LOCATION, crate::gate::login_url(redirect)))
                .finish(),
            _ => HttpResponse::build(self.status_code()).body(self.to_string()),
        }
    }
}

impl From<AppError> for std::io::Error {
    fn from(err: AppError) -> Self {
        std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
    }
}

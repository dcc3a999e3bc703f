//! Unified application error type.
//! All modules (core, sheets, transport, db, cli) return AppError to keep the
//! error handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Audit database
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Message handling
    // ---------------------------
    #[error("You are not authorized to update the sheet.")]
    Unauthorized,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("No Google Sheet linked. Admin must use /update <link> first.")]
    NotConfigured,

    #[error("Spreadsheet backend unavailable: {0}")]
    BackendUnavailable(String),

    // ---------------------------
    // Chat transport
    // ---------------------------
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat transport error: {0}")]
    Transport(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,
}

impl AppError {
    /// Short operation tag used when the error is written to the audit log.
    pub fn audit_tag(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "refused",
            AppError::InvalidArgument(_) => "invalid",
            AppError::NotConfigured => "not_configured",
            AppError::BackendUnavailable(_) | AppError::Http(_) => "backend_error",
            _ => "error",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

//! Error types for the study review library.

use thiserror::Error;

/// All error types that can occur outside the scheduler itself.
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("Project not found: {0}")]
    ProjectNotFound(i64),

    #[error("Material not found: {0}")]
    MaterialNotFound(i64),

    #[error("Card {card_index} not found in material {material_id}")]
    CardNotFound { material_id: i64, card_index: usize },

    /// Unknown rating label
    #[error("Invalid rating: {0} (expected hard, medium or easy)")]
    InvalidRating(String),

    #[error("Invalid material status: {0}")]
    InvalidStatus(String),

    #[error("Invalid preference: {0}")]
    InvalidPreference(String),

    /// Interval table that cannot be used for scheduling
    #[error("Invalid intervals: {0}")]
    InvalidIntervals(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, StudyError>;

pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod study;

pub use error::{Result, StudyError};
pub use models::{
    Flashcard, IntervalTable, Material, MaterialStatus, Project, Rating, ReviewSchedule,
    ReviewSession, UserPreferences,
};

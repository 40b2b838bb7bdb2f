//! CLI command definitions using clap.
//!
//! Covers project and material management, the kanban board, the daily
//! review queue and the simulated calendar used to test scheduling.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use study_review::models::preferences::{SessionLength, SummaryLevel};
use study_review::{MaterialStatus, Rating};

/// study-review - spaced repetition for study materials and flashcards
#[derive(Parser, Debug)]
#[command(name = "study-review")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the database file from the config
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Act as this user instead of the configured one
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List projects with their progress
    Projects,

    /// Create a new project
    NewProject {
        title: String,

        #[arg(short, long, default_value = "📚")]
        emoji: String,

        /// Tag to attach (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Change the title of a project
    RenameProject { project_id: i64, title: String },

    /// Delete a project with all of its materials
    DeleteProject { project_id: i64 },

    /// Add a study material to a project
    AddMaterial {
        project_id: i64,

        #[arg(short, long)]
        file_name: Option<String>,

        #[arg(short, long, default_value = "")]
        summary: String,

        #[arg(long)]
        brief: Option<String>,

        #[arg(long)]
        medium: Option<String>,

        #[arg(long)]
        full: Option<String>,
    },

    /// Change the file name shown for a material
    RenameMaterial { material_id: i64, file_name: String },

    /// Delete a material with all of its cards
    DeleteMaterial { material_id: i64 },

    /// Add a flashcard to a material
    AddCard {
        material_id: i64,
        title: String,
        content: String,
    },

    /// Replace a card's text; the card becomes due again
    EditCard {
        material_id: i64,
        card_index: usize,
        title: String,
        content: String,
    },

    /// Delete a card; later cards move up one position
    DeleteCard { material_id: i64, card_index: usize },

    /// Show the kanban board of a project
    Board { project_id: i64 },

    /// Open a material (pending materials move to in progress)
    Show {
        material_id: i64,

        /// Summary level (brief, medium, full); defaults to the preference
        #[arg(short, long)]
        level: Option<SummaryLevel>,
    },

    /// Move a material to another column (pending, in_progress, completed)
    Move {
        material_id: i64,
        status: MaterialStatus,
    },

    /// Mark a completed material as reviewed
    MarkReviewed { material_id: i64 },

    /// List cards and materials due today
    Due,

    /// Rate one card (hard, medium, easy)
    Rate {
        material_id: i64,
        card_index: usize,
        rating: Rating,
    },

    /// Review every due card interactively
    Review,

    /// Print the date used for scheduling
    Today,

    /// Advance the simulated date by one day
    NextDay,

    /// Go back to the real date
    ResetDay,

    /// Export a project to JSON
    Export { project_id: i64, path: PathBuf },

    /// Import a project from JSON
    Import { path: PathBuf },

    /// Show or change study preferences
    Prefs {
        #[arg(long)]
        summary_level: Option<SummaryLevel>,

        #[arg(long)]
        session_length: Option<SessionLength>,

        #[arg(long)]
        focus_mode: Option<bool>,
    },
}

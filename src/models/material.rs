//! Study material (an uploaded PDF or photo) with its generated summaries
//! and flashcards. Materials move through a kanban board and, once
//! completed, are scheduled for review as a whole.
use super::schedule::{self, IntervalTable};
use super::{Flashcard, ReviewSchedule, SummaryLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StudyError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl MaterialStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialStatus::Pending => "pending",
            MaterialStatus::InProgress => "in_progress",
            MaterialStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for MaterialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialStatus {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(MaterialStatus::Pending),
            "in_progress" => Ok(MaterialStatus::InProgress),
            "completed" => Ok(MaterialStatus::Completed),
            other => Err(StudyError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_brief: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_full: Option<String>,
    #[serde(default)]
    pub cards: Vec<Flashcard>,
    #[serde(default)]
    pub status: MaterialStatus,
    #[serde(flatten)]
    pub schedule: ReviewSchedule,
}

impl Material {
    pub fn new(id: i64, file_name: Option<String>, summary: impl Into<String>) -> Self {
        Self {
            id,
            file_name,
            summary: summary.into(),
            summary_brief: None,
            summary_medium: None,
            summary_full: None,
            cards: Vec::new(),
            status: MaterialStatus::Pending,
            schedule: ReviewSchedule::default(),
        }
    }

    /// Materials are only due once they have been scheduled.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        schedule::is_due(self.schedule.next_review_at.as_deref(), today)
    }

    /// Moves the material to another kanban column.
    ///
    /// Completing an unscheduled material schedules its first review at
    /// level 0; leaving the completed column drops the schedule entirely.
    pub fn move_to(&mut self, status: MaterialStatus, table: &IntervalTable, today: NaiveDate) {
        self.status = status;
        match status {
            MaterialStatus::Completed => {
                if !self.schedule.is_scheduled() {
                    self.schedule = ReviewSchedule::at_level(table, 0, today);
                }
            }
            _ => self.schedule.clear(),
        }
    }

    /// Opening a pending material starts it. Returns whether anything changed.
    pub fn start_studying(&mut self) -> bool {
        if self.status == MaterialStatus::Pending {
            self.status = MaterialStatus::InProgress;
            true
        } else {
            false
        }
    }

    pub fn mark_reviewed(&mut self, table: &IntervalTable, today: NaiveDate) {
        self.schedule = self.schedule.advanced(table, today);
    }

    /// Summary text for the preferred level, falling back to the base summary.
    pub fn display_summary(&self, level: SummaryLevel) -> &str {
        let preferred = match level {
            SummaryLevel::Brief => self.summary_brief.as_deref(),
            SummaryLevel::Medium => self.summary_medium.as_deref(),
            SummaryLevel::Full => self.summary_full.as_deref(),
        };
        preferred
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.summary.trim())
    }

    pub fn display_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| format!("material #{}", self.id))
    }
}

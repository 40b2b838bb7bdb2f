//! User study preferences and the pure rules derived from them.
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::StudyError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredFormat {
    Summary,
    #[default]
    Flashcards,
    Quiz,
    Chat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl FromStr for SessionLength {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(SessionLength::Short),
            "medium" => Ok(SessionLength::Medium),
            "long" => Ok(SessionLength::Long),
            other => Err(StudyError::InvalidPreference(format!("session length {other}"))),
        }
    }
}

/// How much of a material's summary to show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLevel {
    Brief,
    #[default]
    Medium,
    Full,
}

impl FromStr for SummaryLevel {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "brief" => Ok(SummaryLevel::Brief),
            "medium" => Ok(SummaryLevel::Medium),
            "full" => Ok(SummaryLevel::Full),
            other => Err(StudyError::InvalidPreference(format!("summary level {other}"))),
        }
    }
}

/// Tab opened first on the study screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudyTab {
    Flashcards,
    Quiz,
    Chat,
    MyQuestions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionDuration {
    pub minutes: u32,
    pub label: &'static str,
}

/// Missing fields fall back to defaults when loading partial documents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub preferred_format: PreferredFormat,
    pub session_length: SessionLength,
    pub summary_level: SummaryLevel,
    pub focus_mode: bool,
    pub time_alerts: bool,
    pub transition_warning: bool,
    pub pomodoro_breaks: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            preferred_format: PreferredFormat::Flashcards,
            session_length: SessionLength::Medium,
            summary_level: SummaryLevel::Medium,
            focus_mode: false,
            time_alerts: true,
            transition_warning: true,
            pomodoro_breaks: false,
        }
    }
}

impl UserPreferences {
    /// Summaries have no tab of their own; they open on flashcards.
    pub fn preferred_study_tab(&self) -> StudyTab {
        match self.preferred_format {
            PreferredFormat::Summary | PreferredFormat::Flashcards => StudyTab::Flashcards,
            PreferredFormat::Quiz => StudyTab::Quiz,
            PreferredFormat::Chat => StudyTab::Chat,
        }
    }

    pub fn session_duration(&self) -> SessionDuration {
        match self.session_length {
            SessionLength::Short => SessionDuration {
                minutes: 18,
                label: "15-20 min",
            },
            SessionLength::Medium => SessionDuration {
                minutes: 28,
                label: "25-30 min",
            },
            SessionLength::Long => SessionDuration {
                minutes: 45,
                label: "45+ min",
            },
        }
    }
}

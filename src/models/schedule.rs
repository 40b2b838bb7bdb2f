//! Fixed-interval spaced repetition scheduling.
//!
//! Every reviewable item carries an interval level, an index into a table of
//! day counts. Rating a card or reviewing a material picks a new level and
//! the next review date is always `today + table[level]`:
//! - Level 0 means "just started" (review again tomorrow with the default table)
//! - The last level means "well known" (review again in a month)
//! - Out-of-range levels are clamped, never rejected
//!
//! "Today" is always passed in explicitly so a whole batch of due checks can
//! share one snapshot.

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StudyError;

/// Default day counts: 1st review after 1 day, then 3, 7, 14 and 30 days.
pub const DEFAULT_INTERVALS_DAYS: [u32; 5] = [1, 3, 7, 14, 30];

/// Calendar date format used for every persisted review date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ordered day counts indexed by interval level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct IntervalTable {
    days: Vec<u32>,
}

impl IntervalTable {
    /// Builds a table, rejecting layouts that would break rating monotonicity.
    pub fn new(days: Vec<u32>) -> Result<Self, StudyError> {
        if days.len() < Rating::ALL.len() {
            return Err(StudyError::InvalidIntervals(format!(
                "expected at least {} intervals, got {}",
                Rating::ALL.len(),
                days.len()
            )));
        }
        if days.iter().any(|&d| d == 0) {
            return Err(StudyError::InvalidIntervals(
                "intervals must be positive day counts".to_string(),
            ));
        }
        if days.windows(2).any(|w| w[0] > w[1]) {
            return Err(StudyError::InvalidIntervals(
                "intervals must be non-decreasing".to_string(),
            ));
        }
        Ok(Self { days })
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Highest valid level (`N - 1`).
    pub fn max_level(&self) -> u32 {
        (self.days.len() - 1) as u32
    }

    /// Clamps any integer into `[0, N-1]`.
    pub fn clamp_level(&self, level: i64) -> u32 {
        level.clamp(0, self.max_level() as i64) as u32
    }

    /// Day count for a level, after clamping.
    pub fn days_for_level(&self, level: i64) -> u32 {
        self.days[self.clamp_level(level) as usize]
    }

    pub fn days(&self) -> &[u32] {
        &self.days
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self {
            days: DEFAULT_INTERVALS_DAYS.to_vec(),
        }
    }
}

impl TryFrom<Vec<u32>> for IntervalTable {
    type Error = StudyError;

    fn try_from(days: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<IntervalTable> for Vec<u32> {
    fn from(table: IntervalTable) -> Self {
        table.days
    }
}

/// A user's self-assessment after reviewing a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    #[serde(alias = "dificil")]
    Hard,
    #[serde(alias = "medio")]
    Medium,
    #[serde(alias = "facil")]
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Hard, Rating::Medium, Rating::Easy];

    /// Interval level a rating resets the item to.
    pub fn level(self) -> u32 {
        match self {
            Rating::Hard => 0,
            Rating::Medium => 1,
            Rating::Easy => 2,
        }
    }

    /// Days until the next review, as shown next to each rating button.
    pub fn days(self, table: &IntervalTable) -> u32 {
        table.days_for_level(self.level() as i64)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rating::Hard => "hard",
            Rating::Medium => "medium",
            Rating::Easy => "easy",
        };
        f.write_str(name)
    }
}

impl FromStr for Rating {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hard" | "dificil" | "difícil" => Ok(Rating::Hard),
            "medium" | "medio" | "médio" => Ok(Rating::Medium),
            "easy" | "facil" | "fácil" => Ok(Rating::Easy),
            other => Err(StudyError::InvalidRating(other.to_string())),
        }
    }
}

/// Source of the current calendar day.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, using the UTC calendar day.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a single day.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` date, returning `None` for anything malformed.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Next review date for a level, relative to `today`.
pub fn next_review_date_from_level(table: &IntervalTable, level: i64, today: NaiveDate) -> NaiveDate {
    let days = table.days_for_level(level) as u64;
    today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Same as [`next_review_date_from_level`], in persisted form.
pub fn next_review_iso_from_level(table: &IntervalTable, level: i64, today: NaiveDate) -> String {
    format_date(next_review_date_from_level(table, level, today))
}

/// Blank values count as "never scheduled".
fn scheduled_value(next_review_at: Option<&str>) -> Option<&str> {
    next_review_at.filter(|value| !value.trim().is_empty())
}

/// Whether a scheduled item is due. Unscheduled or malformed dates are never due.
pub fn is_due(next_review_at: Option<&str>, today: NaiveDate) -> bool {
    match scheduled_value(next_review_at) {
        Some(value) => parse_date(value).is_some_and(|date| date <= today),
        None => false,
    }
}

/// Whether a flashcard is due. Cards that were never rated are always due.
pub fn is_card_due(next_review_at: Option<&str>, today: NaiveDate) -> bool {
    match scheduled_value(next_review_at) {
        Some(value) => parse_date(value).is_some_and(|date| date <= today),
        None => true,
    }
}

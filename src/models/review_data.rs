//! Review bookkeeping shared by flashcards and materials.
use super::schedule::{self, IntervalTable, Rating, format_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Persisted review state. `interval_level` and `next_review_at` are only
/// ever written together.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<String>,
}

impl ReviewSchedule {
    /// Schedule for an item placed at `level`, starting from `today`.
    pub fn at_level(table: &IntervalTable, level: i64, today: NaiveDate) -> Self {
        let level = table.clamp_level(level);
        Self {
            interval_level: Some(level),
            next_review_at: Some(schedule::next_review_iso_from_level(
                table,
                level as i64,
                today,
            )),
            last_reviewed_at: None,
        }
    }

    /// Schedule after a card rating. The rating sets an absolute level.
    pub fn from_rating(table: &IntervalTable, rating: Rating, today: NaiveDate) -> Self {
        Self {
            last_reviewed_at: Some(format_date(today)),
            ..Self::at_level(table, rating.level() as i64, today)
        }
    }

    /// Moves one level up (capped at the last one) and records the review.
    pub fn advanced(&self, table: &IntervalTable, today: NaiveDate) -> Self {
        let level = self.interval_level.map_or(0, |l| l as i64) + 1;
        Self {
            last_reviewed_at: Some(format_date(today)),
            ..Self::at_level(table, level, today)
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.next_review_at
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

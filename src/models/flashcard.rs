//! Flashcard is a pair <title, content> generated from a study material,
//! plus its review schedule.
use super::ReviewSchedule;
use super::schedule::{self, IntervalTable, Rating};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub title: String,
    pub content: String,
    #[serde(flatten)]
    pub schedule: ReviewSchedule,
}

impl Flashcard {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            schedule: ReviewSchedule::default(),
        }
    }

    /// Cards that were never rated are due right away.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        schedule::is_card_due(self.schedule.next_review_at.as_deref(), today)
    }

    pub fn rate(&mut self, rating: Rating, table: &IntervalTable, today: NaiveDate) {
        self.schedule = ReviewSchedule::from_rating(table, rating, today);
    }

    /// Replaces the text of the card. An edited card starts over as never rated.
    pub fn edit(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.title = title.into();
        self.content = content.into();
        self.schedule.clear();
    }
}

//! Review session over the cards that are due today.
//! Handles multi-round flashcard review where hard cards come back in a
//! follow-up round before the session ends.

use super::DueCard;
use super::ReviewSchedule;
use super::schedule::{IntervalTable, Rating};
use crate::error::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

/// Manages one pass through a snapshot of due cards.
/// Cards rated hard are repeated in subsequent rounds.
pub struct ReviewSession {
    pub cards: Vec<DueCard>,
    ratings: Vec<Option<Rating>>,
    current_round_cards: Vec<usize>,
    current_index: usize,
    pub show_content: bool,
    pub round_number: usize,
}

impl ReviewSession {
    /// Creates a session from cards collected in a single scheduling pass.
    pub fn new(cards: Vec<DueCard>) -> Self {
        let ratings = vec![None; cards.len()];
        let indices: Vec<usize> = (0..cards.len()).collect();

        Self {
            cards,
            ratings,
            current_round_cards: indices,
            current_index: 0,
            show_content: false,
            round_number: 1,
        }
    }

    pub fn current_card(&self) -> Option<&DueCard> {
        self.current_round_cards
            .get(self.current_index)
            .and_then(|&idx| self.cards.get(idx))
    }

    pub fn flip(&mut self) {
        self.show_content = !self.show_content;
    }

    /// Rates the current card, persists its new schedule and moves on.
    pub fn rate_current(
        &mut self,
        rating: Rating,
        table: &IntervalTable,
        today: NaiveDate,
        conn: &Connection,
    ) -> Result<Option<ReviewSchedule>> {
        let Some(card) = self.current_card() else {
            return Ok(None);
        };

        let schedule = ReviewSchedule::from_rating(table, rating, today);
        crate::database::db::update_card_schedule(
            conn,
            card.material_id,
            card.card_index,
            &schedule,
        )?;

        self.record_rating(rating);
        Ok(Some(schedule))
    }

    fn record_rating(&mut self, rating: Rating) {
        if let Some(&idx) = self.current_round_cards.get(self.current_index) {
            self.ratings[idx] = Some(rating);
            self.next_card();
        }
    }

    fn next_card(&mut self) {
        self.show_content = false;
        if self.current_index + 1 < self.current_round_cards.len() {
            self.current_index += 1;
        } else {
            self.start_next_round();
        }
    }

    /// Starts a new round with the cards rated hard in this one.
    /// If there are none, the session is complete.
    fn start_next_round(&mut self) {
        let retry: Vec<usize> = self
            .current_round_cards
            .iter()
            .copied()
            .filter(|&idx| self.ratings[idx] == Some(Rating::Hard))
            .collect();

        if retry.is_empty() {
            self.current_index = self.current_round_cards.len();
            return;
        }

        for &idx in &retry {
            self.ratings[idx] = None;
        }
        self.current_round_cards = retry;
        self.current_index = 0;
        self.round_number += 1;
    }

    pub fn reviewed_count(&self) -> usize {
        self.current_round_cards
            .iter()
            .filter(|&&idx| self.ratings[idx].is_some())
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.current_round_cards.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.reviewed_count()
    }

    pub fn is_completed(&self) -> bool {
        self.current_index >= self.current_round_cards.len()
    }

    pub fn progress_message(&self) -> String {
        if self.round_number == 1 {
            format!(
                "Round {}: {}/{} cards",
                self.round_number,
                self.reviewed_count(),
                self.total_count()
            )
        } else {
            format!(
                "Round {} (Retry): {}/{} hard cards",
                self.round_number,
                self.reviewed_count(),
                self.total_count()
            )
        }
    }
}

//! Study actions that combine the scheduling rules with persistence.
//!
//! Each function takes `today` from the caller so one snapshot is shared by
//! every item touched in the same pass.

use crate::database::db;
use crate::error::{Result, StudyError};
use crate::models::schedule::{IntervalTable, Rating};
use crate::models::{DueCard, Material, MaterialStatus, ReviewSchedule, ReviewSession};
use chrono::NaiveDate;
use log::{debug, info};
use rusqlite::Connection;

/// Every due flashcard across a user's projects.
pub fn due_cards_for_user(conn: &Connection, user_id: &str, today: NaiveDate) -> Result<Vec<DueCard>> {
    let projects = db::get_projects_for_user(conn, user_id)?;
    let due: Vec<DueCard> = projects.iter().flat_map(|p| p.due_cards(today)).collect();
    debug!("{} cards due for {} on {}", due.len(), user_id, today);
    Ok(due)
}

/// Completed materials whose review date has come, as (project ID, material).
pub fn due_materials_for_user(
    conn: &Connection,
    user_id: &str,
    today: NaiveDate,
) -> Result<Vec<(i64, Material)>> {
    let projects = db::get_projects_for_user(conn, user_id)?;
    Ok(projects
        .into_iter()
        .flat_map(|p| {
            let project_id = p.id;
            p.materials
                .into_iter()
                .filter(move |m| m.is_due(today))
                .map(move |m| (project_id, m))
        })
        .collect())
}

pub fn start_review_session(conn: &Connection, user_id: &str, today: NaiveDate) -> Result<ReviewSession> {
    Ok(ReviewSession::new(due_cards_for_user(conn, user_id, today)?))
}

/// Rates a single card outside of a session.
pub fn rate_card(
    conn: &Connection,
    table: &IntervalTable,
    today: NaiveDate,
    material_id: i64,
    card_index: usize,
    rating: Rating,
) -> Result<ReviewSchedule> {
    let schedule = ReviewSchedule::from_rating(table, rating, today);
    db::update_card_schedule(conn, material_id, card_index, &schedule)?;
    info!(
        "Card {}/{} rated {}, next review {}",
        material_id,
        card_index,
        rating,
        schedule.next_review_at.as_deref().unwrap_or("-")
    );
    Ok(schedule)
}

/// Moves a material to another kanban column.
pub fn move_material(
    conn: &Connection,
    table: &IntervalTable,
    today: NaiveDate,
    material_id: i64,
    status: MaterialStatus,
) -> Result<Material> {
    let mut material = db::get_material(conn, material_id)?;
    material.move_to(status, table, today);
    db::update_material_status(conn, &material)?;
    Ok(material)
}

/// Opening a pending material moves it to "in progress".
pub fn open_material(conn: &Connection, material_id: i64) -> Result<Material> {
    let mut material = db::get_material(conn, material_id)?;
    if material.start_studying() {
        db::update_material_status(conn, &material)?;
    }
    Ok(material)
}

/// Records a review of a whole material and pushes it one level further out.
pub fn mark_material_reviewed(
    conn: &Connection,
    table: &IntervalTable,
    today: NaiveDate,
    material_id: i64,
) -> Result<Material> {
    let mut material = db::get_material(conn, material_id)?;
    if material.status != MaterialStatus::Completed {
        return Err(StudyError::InvalidStatus(format!(
            "material {} is {}, only completed materials are reviewed",
            material_id, material.status
        )));
    }
    material.mark_reviewed(table, today);
    db::update_material_schedule(conn, material_id, &material.schedule)?;
    Ok(material)
}

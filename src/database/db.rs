//! Database operations for the study review application
//!
//! Handles SQLite database initialization, CRUD operations for projects,
//! materials and flashcards, and persistence of their review schedules.
//! A schedule's level and next review date are always written by a single
//! statement so they can never drift apart.

use crate::error::{Result, StudyError};
use crate::models::schedule::{Clock, format_date, parse_date};
use crate::models::{Flashcard, Material, MaterialStatus, Project, ReviewSchedule, UserPreferences};
use chrono::{Days, NaiveDate};
use log::{debug, info, warn};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;

const CURRENT_DATE_KEY: &str = "current_date";
const PREFERENCES_KEY: &str = "preferences";

impl ToSql for MaterialStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for MaterialStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: StudyError| FromSqlError::Other(Box::new(e)))
    }
}

/// Opens (or creates) the database file and makes sure all tables exist
pub fn init_database<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(&path)?;
    create_schema(&conn)?;
    info!("Opened database at {}", path.as_ref().display());
    Ok(conn)
}

/// In-memory database with the full schema, used by tests and dry runs
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            emoji TEXT NOT NULL DEFAULT '',
            tags TEXT NOT NULL DEFAULT '[]',
            last_access TEXT
        )",
        (),
    )?;

    // Materials keep their own review schedule once completed
    conn.execute(
        "CREATE TABLE IF NOT EXISTS materials (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL,
            file_name TEXT,
            summary TEXT NOT NULL DEFAULT '',
            summary_brief TEXT,
            summary_medium TEXT,
            summary_full TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            interval_level INTEGER,
            next_review_at TEXT,
            last_reviewed_at TEXT,
            FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
        )",
        (),
    )?;

    // Cards are addressed by their position inside the material
    conn.execute(
        "CREATE TABLE IF NOT EXISTS cards (
            material_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            interval_level INTEGER,
            next_review_at TEXT,
            last_reviewed_at TEXT,
            PRIMARY KEY (material_id, position),
            FOREIGN KEY (material_id) REFERENCES materials(id) ON DELETE CASCADE
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Today's date for a scheduling pass.
///
/// A simulated date stored in `app_state` takes precedence over the clock,
/// which lets the review queue be tested day by day.
pub fn current_date(conn: &Connection, clock: &dyn Clock) -> Result<NaiveDate> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = ?1",
            params![CURRENT_DATE_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match stored {
        Some(value) => match parse_date(&value) {
            Some(date) => Ok(date),
            None => {
                warn!("Ignoring malformed simulated date '{}'", value);
                Ok(clock.today())
            }
        },
        None => Ok(clock.today()),
    }
}

/// Advances the simulated date by one day and returns it
pub fn advance_day(conn: &Connection, clock: &dyn Clock) -> Result<NaiveDate> {
    let current = current_date(conn, clock)?;
    let next_day = current.checked_add_days(Days::new(1)).unwrap_or(current);

    conn.execute(
        "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
        params![CURRENT_DATE_KEY, format_date(next_day)],
    )?;

    info!("Simulated date advanced to {}", next_day);
    Ok(next_day)
}

/// Drops the simulated date so the clock is used again
pub fn reset_current_date(conn: &Connection) -> Result<()> {
    conn.execute(
        "DELETE FROM app_state WHERE key = ?1",
        params![CURRENT_DATE_KEY],
    )?;
    Ok(())
}

/// Creates a new, empty project and returns its ID
pub fn create_project(
    conn: &Connection,
    user_id: &str,
    title: &str,
    emoji: &str,
    tags: &[String],
) -> Result<i64> {
    conn.execute(
        "INSERT INTO projects (user_id, title, emoji, tags) VALUES (?1, ?2, ?3, ?4)",
        params![user_id, title, emoji, serde_json::to_string(tags)?],
    )?;
    let id = conn.last_insert_rowid();
    info!("Project '{}' created with id {}", title, id);
    Ok(id)
}

/// Records the day a project was last opened
pub fn touch_project(conn: &Connection, project_id: i64, today: NaiveDate) -> Result<()> {
    let changed = conn.execute(
        "UPDATE projects SET last_access = ?1 WHERE id = ?2",
        params![format_date(today), project_id],
    )?;
    if changed == 0 {
        return Err(StudyError::ProjectNotFound(project_id));
    }
    Ok(())
}

pub fn rename_project(conn: &Connection, project_id: i64, title: &str) -> Result<()> {
    let changed = conn.execute(
        "UPDATE projects SET title = ?1 WHERE id = ?2",
        params![title, project_id],
    )?;
    if changed == 0 {
        return Err(StudyError::ProjectNotFound(project_id));
    }
    debug!("Project {} renamed to '{}'", project_id, title);
    Ok(())
}

/// Deletes a project together with its materials and cards
pub fn delete_project(conn: &Connection, project_id: i64) -> Result<()> {
    let changed = conn.execute("DELETE FROM projects WHERE id = ?1", params![project_id])?;
    if changed == 0 {
        return Err(StudyError::ProjectNotFound(project_id));
    }
    info!("Project {} deleted", project_id);
    Ok(())
}

/// Loads a project with all of its materials and cards
pub fn get_project(conn: &Connection, project_id: i64) -> Result<Project> {
    let header = conn
        .query_row(
            "SELECT id, user_id, title, emoji, tags, last_access FROM projects WHERE id = ?1",
            params![project_id],
            project_header_from_row,
        )
        .optional()?
        .ok_or(StudyError::ProjectNotFound(project_id))?;

    project_from_header(conn, header)
}

/// Loads every project that belongs to a user, oldest first
pub fn get_projects_for_user(conn: &Connection, user_id: &str) -> Result<Vec<Project>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, title, emoji, tags, last_access
         FROM projects WHERE user_id = ?1 ORDER BY id ASC",
    )?;

    let headers = stmt
        .query_map(params![user_id], project_header_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    headers
        .into_iter()
        .map(|header| project_from_header(conn, header))
        .collect()
}

type ProjectHeader = (i64, String, String, String, String, Option<String>);

fn project_header_from_row(row: &Row<'_>) -> rusqlite::Result<ProjectHeader> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn project_from_header(conn: &Connection, header: ProjectHeader) -> Result<Project> {
    let (id, user_id, title, emoji, tags, last_access) = header;
    Ok(Project {
        id,
        user_id,
        title,
        emoji,
        tags: serde_json::from_str(&tags)?,
        last_access,
        materials: get_materials_for_project(conn, id)?,
    })
}

/// Adds a material (and its cards) to a project and returns the new material ID
///
/// The material's own `id` is ignored; the database assigns one.
pub fn add_material(conn: &Connection, project_id: i64, material: &Material) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    let material_id = insert_material(&tx, project_id, material)?;
    tx.commit()?;
    Ok(material_id)
}

fn insert_material(conn: &Connection, project_id: i64, material: &Material) -> Result<i64> {
    conn.execute(
        "INSERT INTO materials (project_id, file_name, summary, summary_brief, summary_medium,
                                summary_full, status, interval_level, next_review_at, last_reviewed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            project_id,
            material.file_name,
            material.summary,
            material.summary_brief,
            material.summary_medium,
            material.summary_full,
            material.status,
            material.schedule.interval_level,
            material.schedule.next_review_at,
            material.schedule.last_reviewed_at,
        ],
    )?;
    let material_id = conn.last_insert_rowid();

    for card in &material.cards {
        add_card(conn, material_id, card)?;
    }

    debug!(
        "Material {} added to project {} with {} cards",
        material_id,
        project_id,
        material.cards.len()
    );
    Ok(material_id)
}

pub fn get_material(conn: &Connection, material_id: i64) -> Result<Material> {
    let mut material = conn
        .query_row(
            "SELECT id, file_name, summary, summary_brief, summary_medium, summary_full,
                    status, interval_level, next_review_at, last_reviewed_at
             FROM materials WHERE id = ?1",
            params![material_id],
            material_from_row,
        )
        .optional()?
        .ok_or(StudyError::MaterialNotFound(material_id))?;

    material.cards = get_cards_for_material(conn, material_id)?;
    Ok(material)
}

/// Retrieves all materials of a project in insertion order
pub fn get_materials_for_project(conn: &Connection, project_id: i64) -> Result<Vec<Material>> {
    let mut stmt = conn.prepare(
        "SELECT id, file_name, summary, summary_brief, summary_medium, summary_full,
                status, interval_level, next_review_at, last_reviewed_at
         FROM materials WHERE project_id = ?1 ORDER BY id ASC",
    )?;

    let mut materials = stmt
        .query_map(params![project_id], material_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for material in &mut materials {
        material.cards = get_cards_for_material(conn, material.id)?;
    }

    Ok(materials)
}

fn material_from_row(row: &Row<'_>) -> rusqlite::Result<Material> {
    Ok(Material {
        id: row.get(0)?,
        file_name: row.get(1)?,
        summary: row.get(2)?,
        summary_brief: row.get(3)?,
        summary_medium: row.get(4)?,
        summary_full: row.get(5)?,
        cards: Vec::new(),
        status: row.get(6)?,
        schedule: ReviewSchedule {
            interval_level: row.get(7)?,
            next_review_at: row.get(8)?,
            last_reviewed_at: row.get(9)?,
        },
    })
}

/// Writes a material's kanban status together with its review schedule
pub fn update_material_status(conn: &Connection, material: &Material) -> Result<()> {
    let changed = conn.execute(
        "UPDATE materials
         SET status = ?1, interval_level = ?2, next_review_at = ?3, last_reviewed_at = ?4
         WHERE id = ?5",
        params![
            material.status,
            material.schedule.interval_level,
            material.schedule.next_review_at,
            material.schedule.last_reviewed_at,
            material.id,
        ],
    )?;
    if changed == 0 {
        return Err(StudyError::MaterialNotFound(material.id));
    }
    debug!("Material {} moved to {}", material.id, material.status);
    Ok(())
}

/// Writes a material's review schedule after it was reviewed
pub fn update_material_schedule(
    conn: &Connection,
    material_id: i64,
    schedule: &ReviewSchedule,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE materials
         SET interval_level = ?1, next_review_at = ?2, last_reviewed_at = ?3
         WHERE id = ?4",
        params![
            schedule.interval_level,
            schedule.next_review_at,
            schedule.last_reviewed_at,
            material_id,
        ],
    )?;
    if changed == 0 {
        return Err(StudyError::MaterialNotFound(material_id));
    }
    debug!(
        "Material {} scheduled: level {:?}, next review {:?}",
        material_id, schedule.interval_level, schedule.next_review_at
    );
    Ok(())
}

pub fn rename_material(conn: &Connection, material_id: i64, file_name: &str) -> Result<()> {
    let changed = conn.execute(
        "UPDATE materials SET file_name = ?1 WHERE id = ?2",
        params![file_name, material_id],
    )?;
    if changed == 0 {
        return Err(StudyError::MaterialNotFound(material_id));
    }
    debug!("Material {} renamed to '{}'", material_id, file_name);
    Ok(())
}

/// Deletes a material together with its cards
pub fn delete_material(conn: &Connection, material_id: i64) -> Result<()> {
    let changed = conn.execute("DELETE FROM materials WHERE id = ?1", params![material_id])?;
    if changed == 0 {
        return Err(StudyError::MaterialNotFound(material_id));
    }
    Ok(())
}

/// Appends a flashcard to a material and returns its position
pub fn add_card(conn: &Connection, material_id: i64, card: &Flashcard) -> Result<usize> {
    let position: i64 = conn.query_row(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM cards WHERE material_id = ?1",
        params![material_id],
        |row| row.get(0),
    )?;

    conn.execute(
        "INSERT INTO cards (material_id, position, title, content, interval_level, next_review_at, last_reviewed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            material_id,
            position,
            card.title,
            card.content,
            card.schedule.interval_level,
            card.schedule.next_review_at,
            card.schedule.last_reviewed_at,
        ],
    )?;

    Ok(position as usize)
}

/// Retrieves all flashcards of a material, ordered by position
pub fn get_cards_for_material(conn: &Connection, material_id: i64) -> Result<Vec<Flashcard>> {
    let mut stmt = conn.prepare(
        "SELECT title, content, interval_level, next_review_at, last_reviewed_at
         FROM cards WHERE material_id = ?1 ORDER BY position ASC",
    )?;

    let cards = stmt
        .query_map(params![material_id], |row| {
            Ok(Flashcard {
                title: row.get(0)?,
                content: row.get(1)?,
                schedule: ReviewSchedule {
                    interval_level: row.get(2)?,
                    next_review_at: row.get(3)?,
                    last_reviewed_at: row.get(4)?,
                },
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(cards)
}

/// Updates the review schedule of one card after it was rated
pub fn update_card_schedule(
    conn: &Connection,
    material_id: i64,
    card_index: usize,
    schedule: &ReviewSchedule,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE cards
         SET interval_level = ?1, next_review_at = ?2, last_reviewed_at = ?3
         WHERE material_id = ?4 AND position = ?5",
        params![
            schedule.interval_level,
            schedule.next_review_at,
            schedule.last_reviewed_at,
            material_id,
            card_index as i64,
        ],
    )?;
    if changed == 0 {
        return Err(StudyError::CardNotFound {
            material_id,
            card_index,
        });
    }
    debug!(
        "Card {}/{} scheduled: level {:?}, next review {:?}",
        material_id, card_index, schedule.interval_level, schedule.next_review_at
    );
    Ok(())
}

/// Replaces a card's text. The edited card loses its schedule and is due again.
pub fn update_card(
    conn: &Connection,
    material_id: i64,
    card_index: usize,
    title: &str,
    content: &str,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE cards
         SET title = ?1, content = ?2,
             interval_level = NULL, next_review_at = NULL, last_reviewed_at = NULL
         WHERE material_id = ?3 AND position = ?4",
        params![title, content, material_id, card_index as i64],
    )?;
    if changed == 0 {
        return Err(StudyError::CardNotFound {
            material_id,
            card_index,
        });
    }
    debug!("Card {}/{} edited, schedule reset", material_id, card_index);
    Ok(())
}

/// Deletes one card and shifts the following ones down so positions stay contiguous
pub fn delete_card(conn: &Connection, material_id: i64, card_index: usize) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let position = card_index as i64;

    let changed = tx.execute(
        "DELETE FROM cards WHERE material_id = ?1 AND position = ?2",
        params![material_id, position],
    )?;
    if changed == 0 {
        return Err(StudyError::CardNotFound {
            material_id,
            card_index,
        });
    }

    // Two passes through negative positions keep the primary key unique mid-update.
    tx.execute(
        "UPDATE cards SET position = -position WHERE material_id = ?1 AND position > ?2",
        params![material_id, position],
    )?;
    tx.execute(
        "UPDATE cards SET position = -position - 1 WHERE material_id = ?1 AND position < 0",
        params![material_id],
    )?;
    tx.commit()?;

    debug!("Card {}/{} deleted", material_id, card_index);
    Ok(())
}

/// Stores a whole project (e.g. from an import) under a user and returns its new ID
pub fn insert_project(conn: &Connection, user_id: &str, project: &Project) -> Result<i64> {
    let tx = conn.unchecked_transaction()?;
    let project_id = create_project(&tx, user_id, &project.title, &project.emoji, &project.tags)?;
    for material in &project.materials {
        insert_material(&tx, project_id, material)?;
    }
    tx.commit()?;
    Ok(project_id)
}

/// Loads user preferences, falling back to defaults for missing fields
pub fn load_preferences(conn: &Connection) -> Result<UserPreferences> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = ?1",
            params![PREFERENCES_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match stored {
        Some(json) => match serde_json::from_str(&json) {
            Ok(prefs) => Ok(prefs),
            Err(e) => {
                warn!("Stored preferences are unreadable, using defaults: {}", e);
                Ok(UserPreferences::default())
            }
        },
        None => Ok(UserPreferences::default()),
    }
}

pub fn save_preferences(conn: &Connection, prefs: &UserPreferences) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
        params![PREFERENCES_KEY, serde_json::to_string(prefs)?],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::{FixedClock, IntervalTable, Rating};

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn sample_material() -> Material {
        let mut material = Material::new(0, Some("cells.pdf".to_string()), "All about cells");
        material.cards = vec![
            Flashcard::new("nucleus", "holds DNA"),
            Flashcard::new("ribosome", "builds proteins"),
        ];
        material
    }

    #[test]
    fn test_project_roundtrip() {
        let conn = open_in_memory().unwrap();
        let id = create_project(&conn, "u1", "Biology", "🧬", &["exam".to_string()]).unwrap();
        let material_id = add_material(&conn, id, &sample_material()).unwrap();

        let project = get_project(&conn, id).unwrap();
        assert_eq!(project.title, "Biology");
        assert_eq!(project.tags, vec!["exam".to_string()]);
        assert_eq!(project.materials.len(), 1);
        assert_eq!(project.materials[0].id, material_id);
        assert_eq!(project.materials[0].cards[1].title, "ribosome");
        assert_eq!(project.materials[0].status, MaterialStatus::Pending);
        assert_eq!(project.last_access, None);

        touch_project(&conn, id, day("2024-06-10")).unwrap();
        let project = get_project(&conn, id).unwrap();
        assert_eq!(project.last_access.as_deref(), Some("2024-06-10"));
    }

    #[test]
    fn test_projects_for_user() {
        let conn = open_in_memory().unwrap();
        create_project(&conn, "u1", "A", "", &[]).unwrap();
        create_project(&conn, "u2", "B", "", &[]).unwrap();
        create_project(&conn, "u1", "C", "", &[]).unwrap();

        let titles: Vec<_> = get_projects_for_user(&conn, "u1")
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn test_missing_project() {
        let conn = open_in_memory().unwrap();
        assert!(matches!(
            get_project(&conn, 42),
            Err(StudyError::ProjectNotFound(42))
        ));
        assert!(delete_project(&conn, 42).is_err());
    }

    #[test]
    fn test_card_schedule_written_as_pair() {
        let conn = open_in_memory().unwrap();
        let id = create_project(&conn, "u1", "Biology", "", &[]).unwrap();
        let material_id = add_material(&conn, id, &sample_material()).unwrap();

        let schedule =
            ReviewSchedule::from_rating(&IntervalTable::default(), Rating::Easy, day("2024-06-10"));
        update_card_schedule(&conn, material_id, 1, &schedule).unwrap();

        let cards = get_cards_for_material(&conn, material_id).unwrap();
        assert_eq!(cards[0].schedule, ReviewSchedule::default());
        assert_eq!(cards[1].schedule.interval_level, Some(2));
        assert_eq!(cards[1].schedule.next_review_at.as_deref(), Some("2024-06-17"));
    }

    #[test]
    fn test_update_missing_card() {
        let conn = open_in_memory().unwrap();
        let result = update_card_schedule(&conn, 7, 0, &ReviewSchedule::default());
        assert!(matches!(
            result,
            Err(StudyError::CardNotFound {
                material_id: 7,
                card_index: 0
            })
        ));
    }

    #[test]
    fn test_edit_card_resets_schedule() {
        let conn = open_in_memory().unwrap();
        let id = create_project(&conn, "u1", "Biology", "", &[]).unwrap();
        let material_id = add_material(&conn, id, &sample_material()).unwrap();

        let schedule =
            ReviewSchedule::from_rating(&IntervalTable::default(), Rating::Easy, day("2024-06-10"));
        update_card_schedule(&conn, material_id, 0, &schedule).unwrap();
        update_card(&conn, material_id, 0, "nucleolus", "makes ribosomes").unwrap();

        let cards = get_cards_for_material(&conn, material_id).unwrap();
        assert_eq!(cards[0].title, "nucleolus");
        assert_eq!(cards[0].content, "makes ribosomes");
        assert_eq!(cards[0].schedule, ReviewSchedule::default());
        assert!(cards[0].is_due(day("2024-06-10")));

        assert!(matches!(
            update_card(&conn, material_id, 5, "x", "y"),
            Err(StudyError::CardNotFound { card_index: 5, .. })
        ));
    }

    #[test]
    fn test_delete_card_renumbers_positions() {
        let conn = open_in_memory().unwrap();
        let id = create_project(&conn, "u1", "Biology", "", &[]).unwrap();
        let mut material = sample_material();
        material.cards.push(Flashcard::new("lysosome", "digests waste"));
        material.cards.push(Flashcard::new("vacuole", "stores water"));
        let material_id = add_material(&conn, id, &material).unwrap();

        delete_card(&conn, material_id, 1).unwrap();
        let titles: Vec<_> = get_cards_for_material(&conn, material_id)
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["nucleus", "lysosome", "vacuole"]);

        // Positions are contiguous again, so the old last index is gone.
        let schedule =
            ReviewSchedule::from_rating(&IntervalTable::default(), Rating::Hard, day("2024-06-10"));
        update_card_schedule(&conn, material_id, 2, &schedule).unwrap();
        assert!(update_card_schedule(&conn, material_id, 3, &schedule).is_err());
        assert_eq!(
            add_card(&conn, material_id, &Flashcard::new("cilia", "moves cells")).unwrap(),
            3
        );

        assert!(matches!(
            delete_card(&conn, material_id, 9),
            Err(StudyError::CardNotFound { card_index: 9, .. })
        ));
        assert_eq!(get_cards_for_material(&conn, material_id).unwrap().len(), 4);
    }

    #[test]
    fn test_rename_project_and_material() {
        let conn = open_in_memory().unwrap();
        let id = create_project(&conn, "u1", "Biology", "", &[]).unwrap();
        let material_id = add_material(&conn, id, &sample_material()).unwrap();

        rename_project(&conn, id, "Cell biology").unwrap();
        rename_material(&conn, material_id, "cells-v2.pdf").unwrap();

        let project = get_project(&conn, id).unwrap();
        assert_eq!(project.title, "Cell biology");
        assert_eq!(project.materials[0].file_name.as_deref(), Some("cells-v2.pdf"));

        assert!(matches!(
            rename_project(&conn, 99, "x"),
            Err(StudyError::ProjectNotFound(99))
        ));
        assert!(matches!(
            rename_material(&conn, 99, "x"),
            Err(StudyError::MaterialNotFound(99))
        ));
    }

    #[test]
    fn test_material_status_persisted() {
        let conn = open_in_memory().unwrap();
        let id = create_project(&conn, "u1", "Biology", "", &[]).unwrap();
        let material_id = add_material(&conn, id, &sample_material()).unwrap();

        let mut material = get_material(&conn, material_id).unwrap();
        material.move_to(
            MaterialStatus::Completed,
            &IntervalTable::default(),
            day("2024-06-10"),
        );
        update_material_status(&conn, &material).unwrap();

        let loaded = get_material(&conn, material_id).unwrap();
        assert_eq!(loaded.status, MaterialStatus::Completed);
        assert_eq!(loaded.schedule.next_review_at.as_deref(), Some("2024-06-11"));
        assert_eq!(loaded.cards.len(), 2);
    }

    #[test]
    fn test_delete_project_cascades() {
        let conn = open_in_memory().unwrap();
        let id = create_project(&conn, "u1", "Biology", "", &[]).unwrap();
        let material_id = add_material(&conn, id, &sample_material()).unwrap();

        let second = add_material(&conn, id, &sample_material()).unwrap();
        delete_material(&conn, second).unwrap();
        assert_eq!(get_project(&conn, id).unwrap().materials.len(), 1);
        assert!(delete_material(&conn, second).is_err());

        delete_project(&conn, id).unwrap();
        assert!(get_material(&conn, material_id).is_err());
        assert!(get_cards_for_material(&conn, material_id).unwrap().is_empty());
    }

    #[test]
    fn test_simulated_date() {
        let conn = open_in_memory().unwrap();
        let clock = FixedClock(day("2024-06-10"));

        assert_eq!(current_date(&conn, &clock).unwrap(), day("2024-06-10"));
        assert_eq!(advance_day(&conn, &clock).unwrap(), day("2024-06-11"));
        assert_eq!(advance_day(&conn, &clock).unwrap(), day("2024-06-12"));
        assert_eq!(current_date(&conn, &clock).unwrap(), day("2024-06-12"));

        reset_current_date(&conn).unwrap();
        assert_eq!(current_date(&conn, &clock).unwrap(), day("2024-06-10"));
    }

    #[test]
    fn test_preferences_roundtrip() {
        let conn = open_in_memory().unwrap();
        assert_eq!(load_preferences(&conn).unwrap(), UserPreferences::default());

        let prefs = UserPreferences {
            focus_mode: true,
            ..Default::default()
        };
        save_preferences(&conn, &prefs).unwrap();
        assert_eq!(load_preferences(&conn).unwrap(), prefs);
    }

    #[test]
    fn test_insert_project_keeps_schedules() {
        let conn = open_in_memory().unwrap();
        let mut material = sample_material();
        material.cards[0].rate(Rating::Medium, &IntervalTable::default(), day("2024-06-10"));
        let project = Project {
            title: "Imported".to_string(),
            materials: vec![material],
            ..Default::default()
        };

        let id = insert_project(&conn, "u9", &project).unwrap();
        let loaded = get_project(&conn, id).unwrap();
        assert_eq!(loaded.user_id, "u9");
        assert_eq!(
            loaded.materials[0].cards[0].schedule.next_review_at.as_deref(),
            Some("2024-06-13")
        );
    }
}

mod cli;

use clap::Parser;
use eyre::{Context, Result, bail};
use log::{LevelFilter, info, warn};
use rusqlite::Connection;
use std::fs;
use std::io::{self, BufRead, Write};

use cli::{Cli, Commands};
use study_review::config::Config;
use study_review::database::db;
use study_review::export::json::{export_json_to_path, import_json};
use study_review::models::schedule::{Clock, SystemClock};
use study_review::{IntervalTable, Material, Rating, study};

/// Starts logging at `warn` (or `RUST_LOG`) so config loading can already report problems.
/// Returns whether `RUST_LOG` is in charge of the level.
fn setup_logging() -> bool {
    let from_env = std::env::var_os("RUST_LOG").is_some();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace")).init();
    if !from_env {
        log::set_max_level(LevelFilter::Warn);
    }
    from_env
}

fn apply_config_log_level(config: &Config, from_env: bool) {
    if from_env {
        return;
    }
    match (config.log_filter(), config.log_level.as_deref()) {
        (Some(level), _) => log::set_max_level(level),
        (None, Some(unknown)) => warn!("Unknown log_level '{}' in config, keeping warn", unknown),
        (None, None) => {}
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let from_env = setup_logging();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    apply_config_log_level(&config, from_env);

    let table = config.interval_table();

    let db_path = cli
        .database
        .clone()
        .unwrap_or_else(|| config.database_path.clone());
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    let conn = db::init_database(&db_path).context("Failed to open database")?;

    let user = cli.user.clone().unwrap_or_else(|| config.user_id.clone());
    info!("Running as user '{}'", user);

    run_command(&cli.command, &conn, table, &user, &SystemClock)
}

fn run_command(
    command: &Commands,
    conn: &Connection,
    table: &IntervalTable,
    user: &str,
    clock: &dyn Clock,
) -> Result<()> {
    // One snapshot of "today" for the whole command
    let today = db::current_date(conn, clock)?;

    match command {
        Commands::Projects => {
            let projects = db::get_projects_for_user(conn, user)?;
            if projects.is_empty() {
                println!("No projects yet.");
            }
            for project in &projects {
                println!(
                    "[{}] {} {} - {} materials, {}% done, {} cards due",
                    project.id,
                    project.emoji,
                    project.title,
                    project.pdf_count(),
                    project.progress(),
                    project.due_cards(today).len()
                );
            }
        }
        Commands::NewProject { title, emoji, tags } => {
            let id = db::create_project(conn, user, title, emoji, tags)?;
            println!("Project '{}' created with id {}.", title, id);
        }
        Commands::RenameProject { project_id, title } => {
            db::rename_project(conn, *project_id, title)?;
            println!("Project {} renamed to '{}'.", project_id, title);
        }
        Commands::DeleteProject { project_id } => {
            db::delete_project(conn, *project_id)?;
            println!("Project {} deleted.", project_id);
        }
        Commands::AddMaterial {
            project_id,
            file_name,
            summary,
            brief,
            medium,
            full,
        } => {
            let mut material = Material::new(0, file_name.clone(), summary.clone());
            material.summary_brief = brief.clone();
            material.summary_medium = medium.clone();
            material.summary_full = full.clone();
            let id = db::add_material(conn, *project_id, &material)?;
            println!("Material {} added to project {}.", id, project_id);
        }
        Commands::RenameMaterial {
            material_id,
            file_name,
        } => {
            db::rename_material(conn, *material_id, file_name)?;
            println!("Material {} renamed to '{}'.", material_id, file_name);
        }
        Commands::DeleteMaterial { material_id } => {
            db::delete_material(conn, *material_id)?;
            println!("Material {} deleted.", material_id);
        }
        Commands::EditCard {
            material_id,
            card_index,
            title,
            content,
        } => {
            db::update_card(conn, *material_id, *card_index, title, content)?;
            println!(
                "Card {} of material {} updated and due again.",
                card_index, material_id
            );
        }
        Commands::DeleteCard {
            material_id,
            card_index,
        } => {
            db::delete_card(conn, *material_id, *card_index)?;
            println!("Card {} deleted from material {}.", card_index, material_id);
        }
        Commands::AddCard {
            material_id,
            title,
            content,
        } => {
            db::get_material(conn, *material_id)?;
            let position = db::add_card(
                conn,
                *material_id,
                &study_review::Flashcard::new(title.clone(), content.clone()),
            )?;
            println!("Card {} added to material {}.", position, material_id);
        }
        Commands::Board { project_id } => {
            let project = db::get_project(conn, *project_id)?;
            db::touch_project(conn, *project_id, today)?;
            println!("{} {} ({}% done)", project.emoji, project.title, project.progress());

            let headings = ["To study", "In progress", "Completed"];
            for (heading, column) in headings.iter().zip(project.board()) {
                println!("\n{} ({})", heading, column.len());
                for material in column {
                    let due = if material.is_due(today) { " [review due]" } else { "" };
                    println!(
                        "  [{}] {} - {} cards{}",
                        material.id,
                        material.display_name(),
                        material.cards.len(),
                        due
                    );
                }
            }
        }
        Commands::Show { material_id, level } => {
            let material = study::open_material(conn, *material_id)?;
            let level = match level {
                Some(level) => *level,
                None => db::load_preferences(conn)?.summary_level,
            };
            println!("{} ({})", material.display_name(), material.status);
            println!("\n{}\n", material.display_summary(level));
            for (i, card) in material.cards.iter().enumerate() {
                let next = card.schedule.next_review_at.as_deref().unwrap_or("now");
                println!("  {}. {} (next review: {})", i, card.title, next);
            }
        }
        Commands::Move {
            material_id,
            status,
        } => {
            let material = study::move_material(conn, table, today, *material_id, *status)?;
            match &material.schedule.next_review_at {
                Some(next) => println!("Material {} is {}, next review {}.", material_id, status, next),
                None => println!("Material {} is {}.", material_id, status),
            }
        }
        Commands::MarkReviewed { material_id } => {
            let material = study::mark_material_reviewed(conn, table, today, *material_id)?;
            println!(
                "Material {} reviewed, next review {}.",
                material_id,
                material.schedule.next_review_at.as_deref().unwrap_or("-")
            );
        }
        Commands::Due => {
            let cards = study::due_cards_for_user(conn, user, today)?;
            let materials = study::due_materials_for_user(conn, user, today)?;
            println!("{}: {} cards and {} materials due", today, cards.len(), materials.len());
            for card in &cards {
                println!("  card {}/{}: {}", card.material_id, card.card_index, card.title);
            }
            for (project_id, material) in &materials {
                println!(
                    "  material {} (project {}): {}",
                    material.id,
                    project_id,
                    material.display_name()
                );
            }
        }
        Commands::Rate {
            material_id,
            card_index,
            rating,
        } => {
            let schedule = study::rate_card(conn, table, today, *material_id, *card_index, *rating)?;
            println!(
                "Rated {}: next review {}.",
                rating,
                schedule.next_review_at.as_deref().unwrap_or("-")
            );
        }
        Commands::Review => run_review(conn, table, user, today)?,
        Commands::Today => println!("{}", today),
        Commands::NextDay => {
            let day = db::advance_day(conn, clock)?;
            println!("Simulated date is now {}.", day);
        }
        Commands::ResetDay => {
            db::reset_current_date(conn)?;
            println!("Using the real date ({}).", clock.today());
        }
        Commands::Export { project_id, path } => {
            let project = db::get_project(conn, *project_id)?;
            export_json_to_path(&project, path)?;
            println!("Project '{}' exported to {}.", project.title, path.display());
        }
        Commands::Import { path } => {
            let project = import_json(path)?;
            let id = db::insert_project(conn, user, &project)?;
            println!("Project '{}' imported with id {}.", project.title, id);
        }
        Commands::Prefs {
            summary_level,
            session_length,
            focus_mode,
        } => {
            let mut prefs = db::load_preferences(conn)?;
            let changed = summary_level.is_some() || session_length.is_some() || focus_mode.is_some();
            if let Some(level) = summary_level {
                prefs.summary_level = *level;
            }
            if let Some(length) = session_length {
                prefs.session_length = *length;
            }
            if let Some(focus) = focus_mode {
                prefs.focus_mode = *focus;
            }
            if changed {
                db::save_preferences(conn, &prefs)?;
            }
            let duration = prefs.session_duration();
            println!("summary level:  {:?}", prefs.summary_level);
            println!("session length: {} ({} min)", duration.label, duration.minutes);
            println!("study tab:      {:?}", prefs.preferred_study_tab());
            println!("focus mode:     {}", prefs.focus_mode);
        }
    }

    Ok(())
}

/// Walks through every due card, reading ratings from stdin.
fn run_review(
    conn: &Connection,
    table: &IntervalTable,
    user: &str,
    today: chrono::NaiveDate,
) -> Result<()> {
    let mut session = study::start_review_session(conn, user, today)?;
    if session.is_completed() {
        println!("Nothing to review today.");
        return Ok(());
    }

    let buttons: Vec<String> = Rating::ALL
        .iter()
        .map(|r| format!("{} = {} day(s)", r, r.days(table)))
        .collect();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(card) = session.current_card().cloned() {
        println!("\n{}", session.progress_message());
        println!("Q: {}", card.title);
        print!("(press Enter to flip) ");
        io::stdout().flush()?;
        if lines.next().transpose()?.is_none() {
            break;
        }
        session.flip();
        println!("A: {}", card.content);

        let rating = loop {
            print!("Rate [{}]: ", buttons.join(", "));
            io::stdout().flush()?;
            let Some(line) = lines.next().transpose()? else {
                bail!("Review interrupted");
            };
            match line.parse::<Rating>() {
                Ok(rating) => break rating,
                Err(e) => println!("{}", e),
            }
        };
        session.rate_current(rating, table, today, conn)?;
    }

    if session.is_completed() {
        println!("\nReview complete.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_review::models::schedule::{FixedClock, parse_date};

    fn run(conn: &Connection, args: &[&str]) -> Result<()> {
        let cli = Cli::try_parse_from(std::iter::once("study-review").chain(args.iter().copied()))?;
        let clock = FixedClock(parse_date("2024-06-10").unwrap());
        run_command(&cli.command, conn, &IntervalTable::default(), "u1", &clock)
    }

    fn setup() -> (Connection, i64, i64) {
        let conn = db::open_in_memory().unwrap();
        let project_id = db::create_project(&conn, "u1", "Biology", "", &[]).unwrap();
        let mut material = Material::new(0, Some("cells.pdf".to_string()), "cells");
        material.cards = vec![
            study_review::Flashcard::new("nucleus", "holds DNA"),
            study_review::Flashcard::new("ribosome", "builds proteins"),
            study_review::Flashcard::new("lysosome", "digests waste"),
        ];
        let material_id = db::add_material(&conn, project_id, &material).unwrap();
        (conn, project_id, material_id)
    }

    #[test]
    fn test_edit_card_command_puts_card_back_in_queue() {
        let (conn, _, material_id) = setup();
        let m = material_id.to_string();

        run(&conn, &["rate", &m, "0", "easy"]).unwrap();
        let today = parse_date("2024-06-10").unwrap();
        assert_eq!(study::due_cards_for_user(&conn, "u1", today).unwrap().len(), 2);

        run(&conn, &["edit-card", &m, "0", "nucleolus", "makes ribosomes"]).unwrap();
        let cards = db::get_cards_for_material(&conn, material_id).unwrap();
        assert_eq!(cards[0].title, "nucleolus");
        assert_eq!(cards[0].schedule.next_review_at, None);
        assert_eq!(study::due_cards_for_user(&conn, "u1", today).unwrap().len(), 3);
    }

    #[test]
    fn test_delete_card_command() {
        let (conn, _, material_id) = setup();
        let m = material_id.to_string();

        run(&conn, &["delete-card", &m, "0"]).unwrap();
        let titles: Vec<_> = db::get_cards_for_material(&conn, material_id)
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["ribosome", "lysosome"]);

        run(&conn, &["rate", &m, "1", "hard"]).unwrap();
        assert!(run(&conn, &["delete-card", &m, "2"]).is_err());
    }

    #[test]
    fn test_rename_and_delete_commands() {
        let (conn, project_id, material_id) = setup();
        let p = project_id.to_string();
        let m = material_id.to_string();

        run(&conn, &["rename-project", &p, "Cell biology"]).unwrap();
        run(&conn, &["rename-material", &m, "cells-v2.pdf"]).unwrap();
        let project = db::get_project(&conn, project_id).unwrap();
        assert_eq!(project.title, "Cell biology");
        assert_eq!(project.materials[0].display_name(), "cells-v2.pdf");

        run(&conn, &["delete-material", &m]).unwrap();
        assert!(db::get_project(&conn, project_id).unwrap().materials.is_empty());
        assert!(run(&conn, &["delete-material", &m]).is_err());
    }

    #[test]
    fn test_card_commands_require_arguments() {
        let conn = db::open_in_memory().unwrap();
        assert!(run(&conn, &["edit-card", "1", "0", "title only"]).is_err());
        assert!(run(&conn, &["delete-card", "1"]).is_err());
    }
}

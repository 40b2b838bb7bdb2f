//! JSON import/export module for study projects.
//! Provides functionality to save and load a Project, including every
//! material, card and review schedule, to/from JSON files.

use crate::error::Result;
use crate::models::Project;
use log::info;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Exports a project to a JSON file at the specified path.
/// Returns an error if file creation or writing fails.
pub fn export_json_to_path<P: AsRef<Path>>(project: &Project, path: P) -> Result<()> {
    let json_string = serde_json::to_string_pretty(project)?;
    let mut file = File::create(&path)?;
    file.write_all(json_string.as_bytes())?;
    info!(
        "Project '{}' exported to '{}'",
        project.title,
        path.as_ref().display()
    );
    Ok(())
}

/// Imports a project from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_json<P: AsRef<Path>>(path: P) -> Result<Project> {
    let mut file = File::open(&path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let project: Project = serde_json::from_str(&contents)?;

    info!(
        "Project '{}' imported from '{}'",
        project.title,
        path.as_ref().display()
    );
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::{IntervalTable, Rating, parse_date};
    use crate::models::{Flashcard, Material, MaterialStatus};
    use std::fs;
    use tempfile::tempdir;

    fn create_test_project() -> Project {
        let mut material = Material::new(3, Some("cells.pdf".to_string()), "All about cells");
        material.cards = vec![
            Flashcard::new("nucleus", "holds DNA"),
            Flashcard::new("ribosome", "builds proteins"),
        ];
        material.cards[1].rate(
            Rating::Medium,
            &IntervalTable::default(),
            parse_date("2024-06-10").unwrap(),
        );

        Project {
            id: 1,
            user_id: "u1".to_string(),
            title: "Biology".to_string(),
            materials: vec![material],
            ..Default::default()
        }
    }

    #[test]
    fn test_export_json_to_path() {
        let dir = tempdir().unwrap();
        let test_file = dir.path().join("export.json");

        let result = export_json_to_path(&create_test_project(), &test_file);
        assert!(result.is_ok());
        assert!(fs::metadata(&test_file).is_ok(), "File should exist");

        let written = fs::read_to_string(&test_file).unwrap();
        assert!(written.contains("\"nextReviewAt\": \"2024-06-13\""));
    }

    #[test]
    fn test_import_json() {
        let json_content = r#"{
  "id": 7,
  "userId": "u2",
  "title": "History",
  "materials": [
    {
      "id": 1,
      "summary": "The French revolution",
      "status": "completed",
      "nextReviewAt": "2024-06-11",
      "intervalLevel": 0,
      "cards": [
        { "title": "1789", "content": "Storming of the Bastille" }
      ]
    }
  ]
}"#;

        let dir = tempdir().unwrap();
        let test_file = dir.path().join("import.json");
        fs::write(&test_file, json_content).unwrap();

        let project = import_json(&test_file).unwrap();
        assert_eq!(project.title, "History");
        assert_eq!(project.materials.len(), 1);

        let material = &project.materials[0];
        assert_eq!(material.status, MaterialStatus::Completed);
        assert_eq!(material.schedule.interval_level, Some(0));
        assert_eq!(material.cards[0].title, "1789");
        assert_eq!(material.cards[0].schedule.next_review_at, None);
    }

    #[test]
    fn test_export_and_import_keep_schedules() {
        let original = create_test_project();
        let dir = tempdir().unwrap();
        let test_file = dir.path().join("roundtrip.json");

        export_json_to_path(&original, &test_file).unwrap();
        let imported = import_json(&test_file).unwrap();

        assert_eq!(original, imported);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_json("nonexistent_file_xyz123.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_import_invalid_json() {
        let dir = tempdir().unwrap();
        let test_file = dir.path().join("invalid.json");
        fs::write(&test_file, "{ this is not valid json }").unwrap();

        assert!(import_json(&test_file).is_err());
    }
}

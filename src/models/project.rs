//! Project is a set of study materials, each with its own flashcards
use super::{Material, MaterialStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_access: Option<String>,
    #[serde(default)]
    pub materials: Vec<Material>,
}

/// A flashcard that is due, located by its project, material and position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DueCard {
    pub project_id: i64,
    pub material_id: i64,
    pub card_index: usize,
    pub title: String,
    pub content: String,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: 0,
            user_id: String::new(),
            title: "My Project".to_string(),
            emoji: "📚".to_string(),
            tags: Vec::new(),
            last_access: None,
            materials: Vec::new(),
        }
    }
}

impl Project {
    /// Percentage of completed materials, rounded.
    pub fn progress(&self) -> u32 {
        if self.materials.is_empty() {
            return 0;
        }
        let completed = self
            .materials
            .iter()
            .filter(|m| m.status == MaterialStatus::Completed)
            .count();
        ((completed as f64 / self.materials.len() as f64) * 100.0).round() as u32
    }

    pub fn pdf_count(&self) -> usize {
        self.materials.len()
    }

    pub fn due_cards(&self, today: NaiveDate) -> Vec<DueCard> {
        self.materials
            .iter()
            .flat_map(|m| {
                m.cards
                    .iter()
                    .enumerate()
                    .filter(|(_, card)| card.is_due(today))
                    .map(move |(card_index, card)| DueCard {
                        project_id: self.id,
                        material_id: m.id,
                        card_index,
                        title: card.title.clone(),
                        content: card.content.clone(),
                    })
            })
            .collect()
    }

    pub fn due_materials(&self, today: NaiveDate) -> Vec<&Material> {
        self.materials.iter().filter(|m| m.is_due(today)).collect()
    }

    /// Materials grouped into kanban columns: pending, in progress, completed.
    pub fn board(&self) -> [Vec<&Material>; 3] {
        let column = |status: MaterialStatus| {
            self.materials
                .iter()
                .filter(|m| m.status == status)
                .collect::<Vec<_>>()
        };
        [
            column(MaterialStatus::Pending),
            column(MaterialStatus::InProgress),
            column(MaterialStatus::Completed),
        ]
    }

    pub fn material(&self, material_id: i64) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == material_id)
    }

    pub fn material_mut(&mut self, material_id: i64) -> Option<&mut Material> {
        self.materials.iter_mut().find(|m| m.id == material_id)
    }
}

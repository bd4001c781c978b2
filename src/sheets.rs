//! Simple job-sheet store.
//!
//! Job sheets are one of the low-complexity CRUD collections living next
//! to the workflow core: create with an auto-generated code, list, update
//! by id. They do not participate in realtime sync and get real errors
//! (`Error::NotFound`) instead of the sync path's silent no-ops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::entity::{EntityState, Identified};

/// A job sheet record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSheet {
    /// Sheet code, doubling as the id (e.g., "JS-0007")
    pub id: String,

    /// Sheet title
    pub title: String,

    /// Client the sheet is billed to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Identified for JobSheet {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A sparse update to a job sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSheetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// In-memory job-sheet collection with sequential code generation.
#[derive(Debug, Clone)]
pub struct JobSheetStore {
    sheets: EntityState<JobSheet>,
    next_code: u32,
}

impl Default for JobSheetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JobSheetStore {
    /// An empty store. Codes start at `JS-0001`.
    pub fn new() -> Self {
        Self {
            sheets: EntityState::new(),
            next_code: 1,
        }
    }

    /// Create a sheet with the next sequential code.
    ///
    /// If the generated code collides with an existing id (imported data,
    /// reset counters), the current timestamp is suffixed to disambiguate
    /// rather than failing the create.
    pub fn create(&mut self, title: impl Into<String>, client: Option<String>) -> JobSheet {
        let mut code = format!("JS-{:04}", self.next_code);
        self.next_code += 1;
        if self.sheets.contains(&code) {
            code = format!("{}-{}", code, Utc::now().timestamp_millis());
        }

        let now = Utc::now();
        let sheet = JobSheet {
            id: code,
            title: title.into(),
            client,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        self.sheets.insert_front(sheet.clone());
        sheet
    }

    /// Sheets newest-first.
    pub fn list(&self) -> Vec<&JobSheet> {
        self.sheets.iter().collect()
    }

    /// Look up one sheet.
    pub fn get(&self, id: &str) -> Option<&JobSheet> {
        self.sheets.get(id)
    }

    /// Apply a sparse update to one sheet.
    pub fn update(&mut self, id: &str, patch: JobSheetPatch) -> crate::Result<JobSheet> {
        let Some(existing) = self.sheets.get(id) else {
            return Err(crate::Error::NotFound(id.to_string()));
        };

        let mut updated = existing.clone();
        if let Some(title) = patch.title {
            updated.title = title;
        }
        if let Some(client) = patch.client {
            updated.client = Some(client);
        }
        if let Some(notes) = patch.notes {
            updated.notes = Some(notes);
        }
        updated.updated_at = Utc::now();

        self.sheets.replace(updated.clone());
        Ok(updated)
    }

    /// Number of sheets.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_codes() {
        let mut store = JobSheetStore::new();
        let a = store.create("Repaint lobby", Some("Acme".to_string()));
        let b = store.create("Fit-out floor 3", None);
        assert_eq!(a.id, "JS-0001");
        assert_eq!(b.id, "JS-0002");
    }

    #[test]
    fn test_list_newest_first() {
        let mut store = JobSheetStore::new();
        store.create("first", None);
        store.create("second", None);
        let titles: Vec<&str> = store.list().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["second", "first"]);
    }

    #[test]
    fn test_collision_falls_back_to_timestamp_suffix() {
        let mut store = JobSheetStore::new();
        store.create("taken", None);
        // Reset the counter so the next generated code collides
        store.next_code = 1;
        let sheet = store.create("collider", None);
        assert!(sheet.id.starts_with("JS-0001-"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut store = JobSheetStore::new();
        let sheet = store.create("Repaint lobby", Some("Acme".to_string()));
        let updated = store
            .update(
                &sheet.id,
                JobSheetPatch {
                    notes: Some("Second coat booked".to_string()),
                    ..JobSheetPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Repaint lobby");
        assert_eq!(updated.client.as_deref(), Some("Acme"));
        assert_eq!(updated.notes.as_deref(), Some("Second coat booked"));
        assert!(updated.updated_at >= updated.created_at);
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        let mut store = JobSheetStore::new();
        let err = store.update("JS-9999", JobSheetPatch::default()).unwrap_err();
        assert!(matches!(err, crate::Error::NotFound(_)));
    }
}

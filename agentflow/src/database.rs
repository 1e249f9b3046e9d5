//! SQLite persistence for in-progress flow drafts.
//!
//! A draft is the accumulated step list of a flow definition that has not
//! been submitted yet. Persisting it means a dropped connection during
//! submission no longer discards the user's work: the draft stays on disk,
//! keyed by its session id, until the backend confirms creation.
//!
//! # Schema
//!
//! 1. **drafts** - session id, optional working name, steps as JSON,
//!    created/updated timestamps
//! 2. **schema_version** - database schema version for migrations

use anyhow::Result;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use uuid::Uuid;

use agentflow_sdk::AgentStep;

/// Database wrapper for draft persistence
pub struct DraftStore {
    conn: Connection,
}

/// Serializable draft data for database storage
#[derive(Debug, Clone)]
pub struct PersistedDraft {
    pub id: Uuid,
    pub name: Option<String>,
    pub steps: Vec<AgentStep>,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl PersistedDraft {
    /// A fresh, empty draft with a generated session id.
    pub fn new_session() -> Self {
        let now = Local::now();
        Self {
            id: Uuid::new_v4(),
            name: None,
            steps: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl DraftStore {
    /// Open (creating if necessary) the draft database at the given path.
    pub fn new(path: PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent access
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Initialize database schema
    pub fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS drafts (
                -- Session id
                id TEXT PRIMARY KEY,

                -- Working name, set at submit time at the latest
                name TEXT,

                -- Accumulated steps, JSON-encoded
                steps TEXT NOT NULL,

                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_drafts_updated_at ON drafts(updated_at DESC);

            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            INSERT OR IGNORE INTO schema_version (version) VALUES (1);
            "#,
        )?;

        Ok(())
    }

    /// Insert a new draft record
    pub fn insert_draft(&self, draft: &PersistedDraft) -> Result<()> {
        let steps_json = serde_json::to_string(&draft.steps)?;

        self.conn.execute(
            r#"
            INSERT INTO drafts (id, name, steps, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                draft.id.to_string(),
                draft.name,
                steps_json,
                draft.created_at.to_rfc3339(),
                draft.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Update a draft's name and steps
    pub fn update_draft(&self, id: &Uuid, name: Option<&str>, steps: &[AgentStep]) -> Result<()> {
        let steps_json = serde_json::to_string(steps)?;
        let updated_at = Local::now().to_rfc3339();

        self.conn.execute(
            r#"
            UPDATE drafts
            SET name = ?1, steps = ?2, updated_at = ?3
            WHERE id = ?4
            "#,
            params![name, steps_json, updated_at, id.to_string()],
        )?;

        Ok(())
    }

    /// Get a single draft by session id
    pub fn get_draft(&self, id: &Uuid) -> Result<Option<PersistedDraft>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT id, name, steps, created_at, updated_at
                FROM drafts
                WHERE id = ?1
                "#,
                params![id.to_string()],
                map_draft_row,
            )
            .optional()?;

        Ok(result)
    }

    /// The most recently touched draft, if any
    pub fn latest_draft(&self) -> Result<Option<PersistedDraft>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT id, name, steps, created_at, updated_at
                FROM drafts
                ORDER BY updated_at DESC
                LIMIT 1
                "#,
                [],
                map_draft_row,
            )
            .optional()?;

        Ok(result)
    }

    /// List all drafts, most recently touched first
    pub fn list_drafts(&self) -> Result<Vec<PersistedDraft>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, steps, created_at, updated_at
            FROM drafts
            ORDER BY updated_at DESC
            "#,
        )?;

        let drafts = stmt
            .query_map([], map_draft_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(drafts)
    }

    /// Delete a draft, returning whether a record existed
    pub fn delete_draft(&self, id: &Uuid) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM drafts WHERE id = ?1",
            params![id.to_string()],
        )?;

        Ok(deleted > 0)
    }
}

/// Map a database row to PersistedDraft
fn map_draft_row(row: &Row) -> rusqlite::Result<PersistedDraft> {
    let id_str: String = row.get(0)?;
    let name: Option<String> = row.get(1)?;
    let steps_json: String = row.get(2)?;
    let created_at_str: String = row.get(3)?;
    let updated_at_str: String = row.get(4)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let steps: Vec<AgentStep> = serde_json::from_str(&steps_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Local);

    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Local);

    Ok(PersistedDraft {
        id,
        name,
        steps,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentflow_sdk::PromptPolicy;

    fn sample_steps() -> Vec<AgentStep> {
        vec![
            AgentStep {
                agent_ref: 1,
                policy: PromptPolicy::Direct,
                prompt_text: Some("Hello".to_string()),
                order: 1,
                upstream_refs: vec![],
            },
            AgentStep {
                agent_ref: 2,
                policy: PromptPolicy::PriorStepOutput,
                prompt_text: None,
                order: 2,
                upstream_refs: vec![1],
            },
        ]
    }

    fn open_store() -> DraftStore {
        let store = DraftStore::new_in_memory().unwrap();
        store.initialize_schema().unwrap();
        store
    }

    #[test]
    fn insert_and_get_round_trips_steps() {
        let store = open_store();
        let mut draft = PersistedDraft::new_session();
        draft.steps = sample_steps();
        store.insert_draft(&draft).unwrap();

        let loaded = store.get_draft(&draft.id).unwrap().unwrap();
        assert_eq!(loaded.id, draft.id);
        assert_eq!(loaded.name, None);
        assert_eq!(loaded.steps, draft.steps);
    }

    #[test]
    fn update_replaces_name_and_steps() {
        let store = open_store();
        let draft = PersistedDraft::new_session();
        store.insert_draft(&draft).unwrap();

        let steps = sample_steps();
        store
            .update_draft(&draft.id, Some("MyFlow"), &steps)
            .unwrap();

        let loaded = store.get_draft(&draft.id).unwrap().unwrap();
        assert_eq!(loaded.name.as_deref(), Some("MyFlow"));
        assert_eq!(loaded.steps.len(), 2);
    }

    #[test]
    fn latest_draft_follows_updates() {
        let store = open_store();
        let first = PersistedDraft::new_session();
        let second = PersistedDraft::new_session();
        store.insert_draft(&first).unwrap();
        store.insert_draft(&second).unwrap();

        // Touching the first draft makes it the most recent again.
        store.update_draft(&first.id, None, &sample_steps()).unwrap();

        let latest = store.latest_draft().unwrap().unwrap();
        assert_eq!(latest.id, first.id);
        assert_eq!(store.list_drafts().unwrap().len(), 2);
    }

    #[test]
    fn delete_reports_whether_a_draft_existed() {
        let store = open_store();
        let draft = PersistedDraft::new_session();
        store.insert_draft(&draft).unwrap();

        assert!(store.delete_draft(&draft.id).unwrap());
        assert!(!store.delete_draft(&draft.id).unwrap());
        assert!(store.get_draft(&draft.id).unwrap().is_none());
    }

    #[test]
    fn drafts_survive_reopening_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.db");

        let mut draft = PersistedDraft::new_session();
        draft.steps = sample_steps();

        {
            let store = DraftStore::new(path.clone()).unwrap();
            store.initialize_schema().unwrap();
            store.insert_draft(&draft).unwrap();
        }

        let reopened = DraftStore::new(path).unwrap();
        reopened.initialize_schema().unwrap();
        let loaded = reopened.get_draft(&draft.id).unwrap().unwrap();
        assert_eq!(loaded.steps, draft.steps);
    }
}

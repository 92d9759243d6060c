/// Per-user checklist progress
///
/// Tracks which items of a user's assigned path have been completed. One row
/// per (user, path, item index); rows are created lazily the first time an
/// item is toggled, so an absent row means "not completed".
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_checklists (
///     id TEXT PRIMARY KEY NOT NULL,
///     user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     path_id TEXT NOT NULL REFERENCES onboarding_paths(id),
///     item_index INTEGER NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT 0,
///     completed_at TEXT,
///     created_at TEXT NOT NULL,
///     UNIQUE (user_id, path_id, item_index)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::generate_id;
use super::onboarding_path::ChecklistItem;
use crate::db::DbPool;

/// Completion state of one checklist item
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChecklistProgress {
    pub id: String,
    pub user_id: String,
    pub path_id: String,
    pub item_index: i64,
    pub completed: bool,

    /// Set when the item was first completed, cleared when un-completed
    pub completed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

/// Checklist item merged with the user's progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistEntry {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ChecklistProgress {
    /// Marks an item completed or not completed
    ///
    /// Re-completing an already completed item keeps its original
    /// `completed_at`.
    pub async fn set_completed(
        pool: &DbPool,
        user_id: &str,
        path_id: &str,
        item_index: i64,
        completed: bool,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, ChecklistProgress>(
            r#"
            INSERT INTO user_checklists (id, user_id, path_id, item_index, completed, completed_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, path_id, item_index) DO UPDATE SET
                completed = excluded.completed,
                completed_at = CASE
                    WHEN excluded.completed THEN COALESCE(user_checklists.completed_at, excluded.completed_at)
                    ELSE NULL
                END
            RETURNING id, user_id, path_id, item_index, completed, completed_at, created_at
            "#,
        )
        .bind(generate_id())
        .bind(user_id)
        .bind(path_id)
        .bind(item_index)
        .bind(completed)
        .bind(completed.then_some(now))
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Lists the stored progress rows of a user on one path, by item index
    pub async fn list_for_path(
        pool: &DbPool,
        user_id: &str,
        path_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ChecklistProgress>(
            r#"
            SELECT id, user_id, path_id, item_index, completed, completed_at, created_at
            FROM user_checklists
            WHERE user_id = ? AND path_id = ?
            ORDER BY item_index
            "#,
        )
        .bind(user_id)
        .bind(path_id)
        .fetch_all(pool)
        .await
    }
}

/// Merges checklist items with progress rows
///
/// Items without a row are not completed; rows whose index is beyond the
/// checklist are ignored.
pub fn merge_progress(items: &[ChecklistItem], progress: &[ChecklistProgress]) -> Vec<ChecklistEntry> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let row = progress.iter().find(|p| p.item_index == index as i64);
            ChecklistEntry {
                index,
                title: item.title.clone(),
                description: item.description.clone(),
                completed: row.map(|r| r.completed).unwrap_or(false),
                completed_at: row.and_then(|r| r.completed_at),
            }
        })
        .collect()
}

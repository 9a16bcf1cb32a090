use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{DocumentKind, DocumentRow};

/// JSON persistence for documents, keyed by id. Callers validate before
/// writing; the store keeps the JSON exactly as given.
///
/// Carried in `AppState` as `Arc<dyn DocumentStore>`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create(&self, kind: DocumentKind, data: Value) -> Result<DocumentRow, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<DocumentRow>, AppError>;

    /// Replaces kind and data; `None` when the id is unknown.
    async fn replace(
        &self,
        id: Uuid,
        kind: DocumentKind,
        data: Value,
    ) -> Result<Option<DocumentRow>, AppError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres
// ────────────────────────────────────────────────────────────────────────────

pub struct PgDocumentStore {
    db: PgPool,
}

impl PgDocumentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create(&self, kind: DocumentKind, data: Value) -> Result<DocumentRow, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (id, kind, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, kind, data, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(kind.as_str())
        .bind(data)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<DocumentRow>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, kind, data, created_at, updated_at FROM documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn replace(
        &self,
        id: Uuid,
        kind: DocumentKind,
        data: Value,
    ) -> Result<Option<DocumentRow>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            UPDATE documents
            SET kind = $2, data = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, kind, data, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(kind.as_str())
        .bind(data)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryDocumentStore {
    rows: RwLock<HashMap<Uuid, DocumentRow>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create(&self, kind: DocumentKind, data: Value) -> Result<DocumentRow, AppError> {
        let now = Utc::now();
        let row = DocumentRow {
            id: Uuid::new_v4(),
            kind: kind.as_str().to_string(),
            data,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<DocumentRow>, AppError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn replace(
        &self,
        id: Uuid,
        kind: DocumentKind,
        data: Value,
    ) -> Result<Option<DocumentRow>, AppError> {
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(&id).map(|row| {
            row.kind = kind.as_str().to_string();
            row.data = data;
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}

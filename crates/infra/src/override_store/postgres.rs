//! Postgres-backed override store.
//!
//! One row per customizable role, permission map as JSONB. Every write is a
//! single statement, so a role's map is replaced atomically: concurrent
//! administrator edits resolve last-writer-wins with no partial map ever
//! visible.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use dealerdesk_auth::{OverrideStore, Role, RoleOverrides, ensure_customizable};
use dealerdesk_core::{DomainError, DomainResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS permission_overrides (
    role_name   TEXT PRIMARY KEY,
    permissions JSONB NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

/// Postgres implementation of [`OverrideStore`].
#[derive(Debug, Clone)]
pub struct PgOverrideStore {
    pool: Arc<PgPool>,
}

impl PgOverrideStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the backing table when it does not exist yet.
    ///
    /// The override store owns this one table; there is no migration
    /// tooling behind it.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> DomainResult<()> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl OverrideStore for PgOverrideStore {
    #[instrument(skip(self), fields(role = %role), err)]
    async fn get(&self, role: Role) -> DomainResult<Option<RoleOverrides>> {
        let row: Option<serde_json::Value> = sqlx::query_scalar(
            r#"
            SELECT permissions
            FROM permission_overrides
            WHERE role_name = $1
            "#,
        )
        .bind(role.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e))?;

        row.map(|value| {
            serde_json::from_value(value)
                .map_err(|e| DomainError::storage(format!("corrupt override record: {e}")))
        })
        .transpose()
    }

    #[instrument(skip(self, overrides), fields(role = %role, entries = overrides.len()), err)]
    async fn save(&self, role: Role, overrides: RoleOverrides) -> DomainResult<()> {
        ensure_customizable(role)?;

        let permissions = serde_json::to_value(&overrides)
            .map_err(|e| DomainError::storage(format!("failed to encode overrides: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO permission_overrides (role_name, permissions, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (role_name)
            DO UPDATE SET permissions = EXCLUDED.permissions, updated_at = now()
            "#,
        )
        .bind(role.as_str())
        .bind(permissions)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(role = %role), err)]
    async fn reset(&self, role: Role) -> DomainResult<()> {
        ensure_customizable(role)?;

        // Deleting an absent record is the idempotent no-op the contract
        // asks for; affected-row count is deliberately ignored.
        sqlx::query(
            r#"
            DELETE FROM permission_overrides
            WHERE role_name = $1
            "#,
        )
        .bind(role.as_str())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("reset", e))?;

        Ok(())
    }
}

fn map_sqlx_error(operation: &str, error: sqlx::Error) -> DomainError {
    DomainError::storage(format!("{operation}: {error}"))
}

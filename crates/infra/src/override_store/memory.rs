//! In-memory override store for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use dealerdesk_auth::{OverrideStore, Role, RoleOverrides, ensure_customizable};
use dealerdesk_core::{DomainError, DomainResult};

/// RwLock-backed store with the same write guarantees as the Postgres one:
/// a save replaces the whole map for a role in one step.
#[derive(Debug, Default)]
pub struct InMemoryOverrideStore {
    records: RwLock<HashMap<Role, RoleOverrides>>,
}

impl InMemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OverrideStore for InMemoryOverrideStore {
    async fn get(&self, role: Role) -> DomainResult<Option<RoleOverrides>> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainError::storage("override store lock poisoned"))?;
        Ok(records.get(&role).cloned())
    }

    async fn save(&self, role: Role, overrides: RoleOverrides) -> DomainResult<()> {
        ensure_customizable(role)?;

        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::storage("override store lock poisoned"))?;
        records.insert(role, overrides);
        Ok(())
    }

    async fn reset(&self, role: Role) -> DomainResult<()> {
        ensure_customizable(role)?;

        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::storage("override store lock poisoned"))?;
        records.remove(&role);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use dealerdesk_auth::RuleId;

    use super::*;

    fn overrides(entries: &[(&'static str, bool)]) -> RoleOverrides {
        entries
            .iter()
            .map(|(id, allowed)| (RuleId::new(*id), *allowed))
            .collect()
    }

    #[tokio::test]
    async fn absent_until_first_save() {
        let store = InMemoryOverrideStore::new();
        assert_eq!(store.get(Role::Registrar).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_replaces_the_whole_map() {
        let store = InMemoryOverrideStore::new();

        store
            .save(Role::User, overrides(&[("brands_list", false), ("models_list", false)]))
            .await
            .unwrap();

        // A later save with one entry must not leave the old entries behind.
        store
            .save(Role::User, overrides(&[("brands_list", true)]))
            .await
            .unwrap();

        let stored = store.get(Role::User).await.unwrap().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get(&RuleId::new("brands_list")), Some(true));
        assert_eq!(stored.get(&RuleId::new("models_list")), None);
    }

    #[tokio::test]
    async fn reset_deletes_and_is_idempotent() {
        let store = InMemoryOverrideStore::new();
        store
            .save(Role::Registrar, overrides(&[("configurator", false)]))
            .await
            .unwrap();

        store.reset(Role::Registrar).await.unwrap();
        assert_eq!(store.get(Role::Registrar).await.unwrap(), None);

        // Second reset of an absent record is a no-op, not an error.
        store.reset(Role::Registrar).await.unwrap();
        assert_eq!(store.get(Role::Registrar).await.unwrap(), None);
    }

    #[tokio::test]
    async fn administrator_writes_are_rejected() {
        let store = InMemoryOverrideStore::new();

        assert_eq!(
            store
                .save(Role::Administrator, overrides(&[("users", false)]))
                .await,
            Err(DomainError::Unauthorized)
        );
        assert_eq!(
            store.reset(Role::Administrator).await,
            Err(DomainError::Unauthorized)
        );
        assert_eq!(store.get(Role::Administrator).await.unwrap(), None);
    }
}

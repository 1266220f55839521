use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use mastercom_domain::DomainResult;
use mastercom_domain::error::DomainError;

/// In-memory mapping from identifier to entity behind a single
/// reader/writer lock. Reads hand out clones; the critical section covers
/// the map access only. Iteration order is undefined.
#[derive(Clone)]
pub struct KeyedStore<T> {
    entries: Arc<RwLock<HashMap<String, T>>>,
}

impl<T> Default for KeyedStore<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Clone> KeyedStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts under `id`, failing with `Conflict` when the identifier is
    /// already present. Identifier assignment belongs to the caller.
    pub async fn create(&self, id: &str, value: T) -> DomainResult<T> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(id) {
            return Err(DomainError::Conflict);
        }
        entries.insert(id.to_string(), value.clone());
        Ok(value)
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.entries.read().await.get(id).cloned()
    }

    pub async fn list<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.entries
            .read()
            .await
            .values()
            .filter(|value| predicate(value))
            .cloned()
            .collect()
    }

    /// Replaces the stored value wholesale, failing with `NotFound` when
    /// the identifier is absent.
    pub async fn update(&self, id: &str, value: T) -> DomainResult<T> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(id) {
            Some(slot) => {
                *slot = value.clone();
                Ok(value)
            }
            None => Err(DomainError::NotFound),
        }
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut entries = self.entries.write().await;
        match entries.remove(id) {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound),
        }
    }
}

//! The identifier-to-schema registry.

use std::collections::HashMap;
use std::sync::Arc;

use dataforge_schema::{Identifier, Schema};

use crate::RegistryError;

/// Maps identifiers to shared schemas.
///
/// Lookups by identifier are O(1). Iteration order is unspecified; use
/// [`identifiers`](Self::identifiers) and sort if a stable order matters.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<Identifier, Arc<Schema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema under a new identifier and returns the shared handle.
    ///
    /// # Errors
    /// `Duplicate` if `id` is already registered. The existing entry is
    /// left untouched.
    pub fn register(
        &mut self,
        id: Identifier,
        schema: impl Into<Arc<Schema>>,
    ) -> Result<Arc<Schema>, RegistryError> {
        if self.schemas.contains_key(&id) {
            return Err(RegistryError::Duplicate(id));
        }
        let schema = schema.into();
        tracing::info!(%id, fields = schema.len(), "schema registered");
        self.schemas.insert(id, Arc::clone(&schema));
        Ok(schema)
    }

    /// Inserts or replaces the schema for `id`, returning the previous one.
    ///
    /// Holders of the previous `Arc` keep it; only later lookups see the
    /// replacement.
    pub fn update(
        &mut self,
        id: Identifier,
        schema: impl Into<Arc<Schema>>,
    ) -> Option<Arc<Schema>> {
        let schema = schema.into();
        tracing::info!(%id, fields = schema.len(), "schema updated");
        self.schemas.insert(id, schema)
    }

    /// Looks up a schema.
    ///
    /// # Errors
    /// `NotFound` if nothing is registered under `id`.
    pub fn get(&self, id: &Identifier) -> Result<Arc<Schema>, RegistryError> {
        match self.schemas.get(id) {
            Some(schema) => Ok(Arc::clone(schema)),
            None => {
                tracing::debug!(%id, "schema lookup missed");
                Err(RegistryError::NotFound(id.clone()))
            }
        }
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.schemas.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &Identifier> {
        self.schemas.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &Arc<Schema>)> {
        self.schemas.iter()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        let removed = self.schemas.len();
        self.schemas.clear();
        tracing::info!(removed, "registry cleared");
    }
}

impl<'a> IntoIterator for &'a SchemaRegistry {
    type Item = (&'a Identifier, &'a Arc<Schema>);
    type IntoIter = std::collections::hash_map::Iter<'a, Identifier, Arc<Schema>>;

    fn into_iter(self) -> Self::IntoIter {
        self.schemas.iter()
    }
}

//! Entity registry: maps a selected entity to its model and data references

use crate::config::EntityEntry;
use crate::error::{PipelineError, Result};
use std::fmt;

/// References needed to serve one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRefs {
    /// Model repository reference
    pub model: String,
    /// Historical data reference
    pub data: String,
}

/// A validated selection from the closed entity set.
///
/// Only [`EntityRegistry::select`] creates one, so holding a selection proves
/// the name exists in the registry that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntitySelection {
    name: String,
    position: usize,
}

impl EntitySelection {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for EntitySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Static table of selectable entities
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    entries: Vec<EntityEntry>,
}

impl EntityRegistry {
    /// Build a registry, rejecting empty tables and duplicate names
    pub fn new(entries: Vec<EntityEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(PipelineError::Config(
                "entity table must not be empty".to_string(),
            ));
        }

        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(PipelineError::Config(format!(
                    "duplicate entity name: {}",
                    entry.name
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Entity names in selector order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Select an entity by exact name
    pub fn select(&self, name: &str) -> Result<EntitySelection> {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .map(|position| EntitySelection {
                name: name.to_string(),
                position,
            })
            .ok_or_else(|| PipelineError::UnknownEntity(name.to_string()))
    }

    /// First entity in the table, the selector's initial value
    pub fn default_selection(&self) -> EntitySelection {
        EntitySelection {
            name: self.entries[0].name.clone(),
            position: 0,
        }
    }

    /// Resolve a selection into its model and data references
    pub fn resolve(&self, selection: &EntitySelection) -> Result<EntityRefs> {
        match self.entries.get(selection.position) {
            Some(entry) if entry.name == selection.name => Ok(EntityRefs {
                model: entry.model.clone(),
                data: entry.data.clone(),
            }),
            _ => Err(PipelineError::UnknownEntity(selection.name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    fn registry() -> EntityRegistry {
        EntityRegistry::new(PipelineConfig::default().entities).unwrap()
    }

    #[test]
    fn test_every_entity_resolves() {
        let registry = registry();
        for name in registry.names() {
            let selection = registry.select(name).unwrap();
            let refs = registry.resolve(&selection).unwrap();
            assert!(refs.model.ends_with(name));
            assert!(refs.data.contains(name));
        }
    }

    #[test]
    fn test_unknown_entity_rejected() {
        let err = registry().select("Unknown Entity").unwrap_err();
        assert_eq!(err, PipelineError::UnknownEntity("Unknown Entity".to_string()));
    }

    #[test]
    fn test_no_partial_matches() {
        assert!(registry().select("Diners").is_err());
        assert!(registry().select("todo").is_err());
    }

    #[test]
    fn test_selection_from_other_registry_is_rejected() {
        let other = EntityRegistry::new(vec![EntityEntry::new("X", "m", "d")]).unwrap();
        let foreign = other.select("X").unwrap();
        assert!(registry().resolve(&foreign).is_err());
    }

    #[test]
    fn test_default_selection_is_first() {
        assert_eq!(registry().default_selection().name(), "Todo");
    }
}

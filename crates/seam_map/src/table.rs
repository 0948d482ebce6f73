//! Deduplicating source and name tables used while merging mappings.

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};

use crate::error::MapError;
use crate::mapping::SourceEntry;

/// Insertion-ordered, deduplicated source table under construction.
///
/// Entries are keyed by identity. All anonymous (`None`) sources share a
/// single slot, which never merges with a named one.
#[derive(Debug, Default, Clone)]
pub struct SourceTable {
    entries: IndexMap<Option<String>, Option<String>>,
}

impl SourceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source and returns its index in the table.
    ///
    /// If the identity is already present the existing slot is reused and
    /// its content kept, so content that was unknown stays unknown. Two
    /// different known contents for one identity are a conflict.
    pub fn register(
        &mut self,
        identity: Option<&str>,
        content: Option<&str>,
    ) -> Result<u32, MapError> {
        // Anonymous sources never carry content.
        let content = if identity.is_some() { content } else { None };
        let key = identity.map(str::to_owned);
        let index = match self.entries.entry(key) {
            Entry::Occupied(slot) => {
                if let (Some(existing), Some(incoming)) = (slot.get(), content) {
                    if existing != incoming {
                        return Err(MapError::IdentityConflict {
                            identity: identity.unwrap_or_default().to_string(),
                        });
                    }
                }
                slot.index()
            }
            Entry::Vacant(slot) => {
                let index = slot.index();
                slot.insert(content.map(str::to_owned));
                index
            }
        };
        Ok(index as u32)
    }

    /// Registers an existing [`SourceEntry`].
    pub fn register_entry(&mut self, entry: &SourceEntry) -> Result<u32, MapError> {
        self.register(entry.identity.as_deref(), entry.content.as_deref())
    }

    /// Returns the number of distinct sources registered so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no source has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the table and returns its entries in index order.
    pub fn into_entries(self) -> Vec<SourceEntry> {
        self.entries
            .into_iter()
            .map(|(identity, content)| SourceEntry { identity, content })
            .collect()
    }
}

/// Insertion-ordered, deduplicated name table under construction.
#[derive(Debug, Default, Clone)]
pub struct NameTable {
    names: IndexSet<String>,
}

impl NameTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a name and returns its index in the table.
    pub fn register(&mut self, name: &str) -> u32 {
        if let Some(index) = self.names.get_index_of(name) {
            return index as u32;
        }
        self.names.insert_full(name.to_owned()).0 as u32
    }

    /// Returns the number of distinct names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no name has been registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Consumes the table and returns the names in index order.
    pub fn into_names(self) -> Vec<String> {
        self.names.into_iter().collect()
    }
}

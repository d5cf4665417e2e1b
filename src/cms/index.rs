use std::collections::HashMap;

use super::model::{index_key, Attributes, Resource, ResourceRef};

/// Lookup table over a document's included resources, keyed by `type:id`.
#[derive(Debug, Default)]
pub struct ResourceIndex<'a> {
    entries: HashMap<String, &'a Attributes>,
}

impl<'a> ResourceIndex<'a> {
    /// Duplicate `(type, id)` pairs keep the last occurrence.
    pub fn build(included: &'a [Resource]) -> Self {
        let mut entries = HashMap::with_capacity(included.len());
        for item in included {
            entries.insert(index_key(&item.typ, &item.id), &item.attributes);
        }
        Self { entries }
    }

    pub fn get(&self, reference: &ResourceRef) -> Option<&'a Attributes> {
        self.entries.get(&reference.key()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

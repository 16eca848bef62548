//! Name → widget-handle registry built during materialization.

use std::collections::BTreeMap;

use crate::element::ElementKind;
use crate::toolkit::WidgetId;

use super::error::BuildError;

/// What the registry remembers about one realized element.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub id: WidgetId,
    pub kind: ElementKind,
    /// The element's `parameter_name` property, for keyed value
    /// read-out. Only value-bearing kinds carry one.
    pub parameter_name: Option<String>,
}

/// Lookup table from element name to realized widget.
///
/// Names are globally unique per build; the materializer fails with
/// [`BuildError::DuplicateName`] on a collision so lookups stay
/// unambiguous.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: &str,
        kind: ElementKind,
        id: WidgetId,
        parameter_name: Option<String>,
    ) -> Result<(), BuildError> {
        if self.entries.contains_key(name) {
            return Err(BuildError::DuplicateName { name: name.to_string(), kind });
        }
        self.entries.insert(
            name.to_string(),
            RegistryEntry { id, kind, parameter_name },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Read-only index over parameters and their options.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::id::{OptionId, ParameterId};
use crate::records::{ParamOption, Parameter, ParameterWithOptions};

/// Parameters keyed by id in load order, with a reverse index from option to
/// owning parameter.
#[derive(Debug, Clone, Default)]
pub struct ParameterCatalog {
    entries: IndexMap<ParameterId, ParameterWithOptions>,
    option_owner: HashMap<OptionId, ParameterId>,
}

impl ParameterCatalog {
    /// Builds the catalog. Options of each parameter are sorted by their
    /// display position; ties keep load order.
    pub fn from_entries(entries: Vec<ParameterWithOptions>) -> Self {
        let mut catalog = ParameterCatalog::default();
        for mut entry in entries {
            entry.options.sort_by_key(|o| o.position);
            for option in &entry.options {
                catalog.option_owner.insert(option.id, entry.parameter.id);
            }
            catalog.entries.insert(entry.parameter.id, entry);
        }
        catalog
    }

    pub fn get(&self, id: ParameterId) -> Option<&ParameterWithOptions> {
        self.entries.get(&id)
    }

    pub fn parameter(&self, id: ParameterId) -> Option<&Parameter> {
        self.entries.get(&id).map(|e| &e.parameter)
    }

    pub fn options(&self, id: ParameterId) -> &[ParamOption] {
        self.entries
            .get(&id)
            .map(|e| e.options.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, id: ParameterId) -> bool {
        self.entries.contains_key(&id)
    }

    /// The parameter that owns `option`, if the option is known.
    pub fn owner_of(&self, option: OptionId) -> Option<ParameterId> {
        self.option_owner.get(&option).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterWithOptions> {
        self.entries.values()
    }

    /// The first `n` option ids of `parameter` in display order.
    pub fn first_option_ids(&self, parameter: ParameterId, n: usize) -> Vec<OptionId> {
        self.options(parameter).iter().take(n).map(|o| o.id).collect()
    }

    /// Restricts `selection` to options owned by `parameter`, deduplicated and
    /// in the parameter's display order.
    pub fn restrict_to_parameter(
        &self,
        parameter: ParameterId,
        selection: &[OptionId],
    ) -> Vec<OptionId> {
        let wanted: HashSet<OptionId> = selection.iter().copied().collect();
        self.options(parameter)
            .iter()
            .map(|o| o.id)
            .filter(|id| wanted.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(labels: &[&str]) -> ParameterWithOptions {
        let id = ParameterId::generate();
        ParameterWithOptions {
            parameter: Parameter {
                id,
                slug: "param".into(),
                label: "Param".into(),
            },
            // Reverse insertion order so sorting by position is observable.
            options: labels
                .iter()
                .enumerate()
                .rev()
                .map(|(i, label)| ParamOption {
                    id: OptionId::generate(),
                    parameter_id: id,
                    label: label.to_string(),
                    position: i as u32,
                })
                .collect(),
        }
    }

    #[test]
    fn options_are_sorted_by_position() {
        let e = entry(&["a", "b", "c"]);
        let id = e.parameter.id;
        let catalog = ParameterCatalog::from_entries(vec![e]);
        let labels: Vec<&str> = catalog.options(id).iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn first_option_ids_caps_at_option_count() {
        let e = entry(&["a", "b"]);
        let id = e.parameter.id;
        let catalog = ParameterCatalog::from_entries(vec![e]);
        assert_eq!(catalog.first_option_ids(id, 5).len(), 2);
        assert_eq!(catalog.first_option_ids(id, 1).len(), 1);
        assert!(catalog.first_option_ids(ParameterId::generate(), 3).is_empty());
    }

    #[test]
    fn restrict_drops_foreign_and_duplicate_ids() {
        let a = entry(&["x", "y", "z"]);
        let b = entry(&["q"]);
        let a_id = a.parameter.id;
        let catalog = ParameterCatalog::from_entries(vec![a, b.clone()]);
        let opts: Vec<OptionId> = catalog.options(a_id).iter().map(|o| o.id).collect();

        let selection = vec![opts[2], b.options[0].id, opts[0], opts[2]];
        let restricted = catalog.restrict_to_parameter(a_id, &selection);
        assert_eq!(restricted, vec![opts[0], opts[2]]);
    }

    #[test]
    fn owner_lookup() {
        let a = entry(&["x"]);
        let a_id = a.parameter.id;
        let opt = a.options[0].id;
        let catalog = ParameterCatalog::from_entries(vec![a]);
        assert_eq!(catalog.owner_of(opt), Some(a_id));
        assert_eq!(catalog.owner_of(OptionId::generate()), None);
    }
}

//! Seeding parameters and options from a JSON file.
//!
//! The file lists parameters with their option labels in display order:
//!
//! ```json
//! { "parameters": [ { "slug": "roof-type", "label": "Roof Type",
//!                     "options": ["Flat", "Pitched", "Mixed"] } ] }
//! ```
//!
//! The whole file is checked before the first write, so a malformed entry
//! leaves the store untouched. Writes themselves are one row at a time; a
//! store failure partway through keeps the rows already inserted.

use std::collections::HashSet;

use serde::Deserialize;

use paramgraph_core::{OptionId, ParamOption, Parameter, ParameterId, ParameterWithOptions};
use paramgraph_storage::{GraphStore, StorageError};

#[derive(Debug, Deserialize)]
pub struct ImportFile {
    pub parameters: Vec<ImportParameter>,
}

#[derive(Debug, Deserialize)]
pub struct ImportParameter {
    pub slug: String,
    pub label: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Entry `index` (zero-based) of the file cannot be imported.
    #[error("parameter #{index} ('{slug}'): {reason}")]
    Invalid {
        index: usize,
        slug: String,
        reason: String,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Rejects blank slugs or labels, blank option labels, and slugs that repeat
/// within the file or already exist in the store.
fn validate(store: &impl GraphStore, file: &ImportFile) -> Result<(), ImportError> {
    let mut seen: HashSet<String> = store
        .list_parameters()?
        .into_iter()
        .map(|p| p.parameter.slug)
        .collect();
    for (index, entry) in file.parameters.iter().enumerate() {
        let invalid = |reason: &str| ImportError::Invalid {
            index,
            slug: entry.slug.clone(),
            reason: reason.to_string(),
        };
        if entry.slug.trim().is_empty() {
            return Err(invalid("slug is empty"));
        }
        if entry.label.trim().is_empty() {
            return Err(invalid("label is empty"));
        }
        if entry.options.iter().any(|label| label.trim().is_empty()) {
            return Err(invalid("option label is empty"));
        }
        if !seen.insert(entry.slug.clone()) {
            return Err(invalid("slug already exists"));
        }
    }
    Ok(())
}

/// Inserts every parameter of `file` with fresh ids and returns what was
/// created.
pub fn import(
    store: &mut impl GraphStore,
    file: ImportFile,
) -> Result<Vec<ParameterWithOptions>, ImportError> {
    validate(store, &file)?;
    let mut created = Vec::with_capacity(file.parameters.len());
    for entry in file.parameters {
        let parameter = Parameter {
            id: ParameterId::generate(),
            slug: entry.slug,
            label: entry.label,
        };
        store.insert_parameter(&parameter)?;

        let mut options = Vec::with_capacity(entry.options.len());
        for (position, label) in (0u32..).zip(entry.options) {
            let option = ParamOption {
                id: OptionId::generate(),
                parameter_id: parameter.id,
                label,
                position,
            };
            store.insert_option(&option)?;
            options.push(option);
        }
        tracing::info!(slug = %parameter.slug, options = options.len(), "parameter imported");
        created.push(ParameterWithOptions { parameter, options });
    }
    Ok(created)
}

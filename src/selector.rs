//! Repository selection: reduce the catalog to the user's working set.

use crate::catalog::RepositoryRef;
use crate::error::Result;
use crate::form::Form;
use std::collections::HashSet;

/// Outcome of presenting the catalog for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The catalog had nothing to choose from.
    EmptyCatalog,
    /// The user chose no repositories.
    NothingSelected,
    /// Chosen repositories, in catalog order.
    Selected(Vec<RepositoryRef>),
}

/// Catalog entries whose names appear in `chosen`, in catalog order, each at
/// most once. Names absent from the catalog are ignored.
pub fn select_by_name<S: AsRef<str>>(
    catalog: &[RepositoryRef],
    chosen: &[S],
) -> Vec<RepositoryRef> {
    let wanted: HashSet<&str> = chosen.iter().map(|s| s.as_ref()).collect();
    let mut seen = HashSet::new();

    catalog
        .iter()
        .filter(|r| wanted.contains(r.name.as_str()) && seen.insert(r.name.as_str()))
        .cloned()
        .collect()
}

/// Present `catalog` through `form` and return the chosen subset.
pub fn choose(catalog: &[RepositoryRef], form: &mut dyn Form) -> Result<Selection> {
    if catalog.is_empty() {
        return Ok(Selection::EmptyCatalog);
    }

    let names: Vec<String> = catalog.iter().map(|r| r.name.clone()).collect();
    let picked = form.multi_select("Select Repositories to Process", &names)?;
    let chosen: Vec<&str> = picked
        .iter()
        .filter_map(|&i| names.get(i).map(String::as_str))
        .collect();

    let selected = select_by_name(catalog, &chosen);
    if selected.is_empty() {
        Ok(Selection::NothingSelected)
    } else {
        Ok(Selection::Selected(selected))
    }
}

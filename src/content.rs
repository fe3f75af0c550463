//! Built-in descriptor content, compiled into the library.

use crate::core::catalog::DescriptorCatalog;
use crate::core::repository::RepositoryError;

// ---------------------------------------------------------------------------
// Embedded catalog documents
// ---------------------------------------------------------------------------
mod data {
    pub const MODIFIERS: &str = include_str!("../content/modifiers.ron");
    pub const TEMPLATES: &str = include_str!("../content/templates.ron");
    pub const FUNCTIONS: &str = include_str!("../content/functions.ron");
    pub const FRAGMENTS: &str = include_str!("../content/fragments.ron");
}

/// Parse and merge the embedded documents. The result is not validated;
/// the repository builder does that.
pub fn builtin_catalog() -> Result<DescriptorCatalog, RepositoryError> {
    let mut catalog = DescriptorCatalog::default();
    for source in [data::MODIFIERS, data::TEMPLATES, data::FUNCTIONS, data::FRAGMENTS] {
        catalog.merge(DescriptorCatalog::parse_ron(source)?);
    }
    Ok(catalog)
}

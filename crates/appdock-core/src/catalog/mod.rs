//! Application catalog seam.
//!
//! The catalog itself is an external collaborator — the engine only
//! needs read access to descriptors. [`AppCatalog`] is the narrow
//! contract; [`MemoryCatalog`] is the in-memory implementation used by
//! the CLI and tests.

pub mod errors;
pub mod types;

pub use errors::CatalogError;
pub use types::{ApplicationDescriptor, ApplicationKind};

use std::collections::HashMap;

/// Read-only lookup of application descriptors.
pub trait AppCatalog: Send + Sync {
    /// Fetch a descriptor by application id.
    fn get(&self, id: &str) -> Option<ApplicationDescriptor>;

    /// All descriptors, in no particular order.
    fn all(&self) -> Vec<ApplicationDescriptor>;
}

/// In-memory catalog built from a list of descriptors.
///
/// Rejects duplicate ids and invalid descriptors at construction, so
/// everything handed out later is known-good.
pub struct MemoryCatalog {
    entries: HashMap<String, ApplicationDescriptor>,
}

impl MemoryCatalog {
    pub fn new(descriptors: Vec<ApplicationDescriptor>) -> Result<Self, CatalogError> {
        let mut entries = HashMap::new();
        for descriptor in descriptors {
            descriptor.validate()?;
            if entries.contains_key(&descriptor.id) {
                return Err(CatalogError::InvalidDescriptor {
                    id: descriptor.id.clone(),
                    message: "duplicate application id".to_string(),
                });
            }
            entries.insert(descriptor.id.clone(), descriptor);
        }
        Ok(Self { entries })
    }
}

impl AppCatalog for MemoryCatalog {
    fn get(&self, id: &str) -> Option<ApplicationDescriptor> {
        self.entries.get(id).cloned()
    }

    fn all(&self) -> Vec<ApplicationDescriptor> {
        self.entries.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str) -> ApplicationDescriptor {
        ApplicationDescriptor {
            id: id.to_string(),
            kind: ApplicationKind::NativeProcess,
            target: "/usr/bin/true".to_string(),
            args: vec![],
            display_name: id.to_string(),
            working_dir: None,
        }
    }

    #[test]
    fn test_memory_catalog_get() {
        let catalog = MemoryCatalog::new(vec![descriptor("a"), descriptor("b")]).unwrap();
        assert!(catalog.get("a").is_some());
        assert!(catalog.get("missing").is_none());
        assert_eq!(catalog.all().len(), 2);
    }

    #[test]
    fn test_memory_catalog_rejects_duplicates() {
        let result = MemoryCatalog::new(vec![descriptor("a"), descriptor("a")]);
        assert!(matches!(
            result,
            Err(CatalogError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn test_memory_catalog_rejects_invalid() {
        let mut bad = descriptor("a");
        bad.target = "".to_string();
        assert!(MemoryCatalog::new(vec![bad]).is_err());
    }
}

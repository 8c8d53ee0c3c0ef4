use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use papaya::HashMap as PapayaMap;
use parking_lot::RwLock;

use crate::registry::{ModelClass, ModelModule};

/// Loads the module at the given path and returns the classes it defines.
pub type ModuleLoader = fn(&'static str) -> ModelModule;

/// Where a type's class is defined and how to load it.
#[derive(Clone, Copy)]
pub struct ModelLocator {
    pub module: &'static str,
    pub load: ModuleLoader,
}

impl ModelLocator {
    pub const fn new(module: &'static str, load: ModuleLoader) -> Self {
        Self { module, load }
    }
}

impl fmt::Debug for ModelLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelLocator")
            .field("module", &self.module)
            .finish_non_exhaustive()
    }
}

/// One catalog row: a type name, its locator, and the class once resolved.
pub struct CatalogEntry {
    name: &'static str,
    locator: ModelLocator,
    pub(crate) resolved: RwLock<Option<Arc<ModelClass>>>,
}

impl CatalogEntry {
    fn new(name: &'static str, locator: ModelLocator) -> Self {
        Self {
            name,
            locator,
            resolved: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn locator(&self) -> ModelLocator {
        self.locator
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.read().is_some()
    }

    /// The resolved class, without triggering resolution.
    pub fn resolved(&self) -> Option<Arc<ModelClass>> {
        self.resolved.read().clone()
    }
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("name", &self.name)
            .field("module", &self.locator.module)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub known_types: usize,
    pub resolved_types: usize,
    pub loaded_modules: usize,
    pub class_loads: usize,
}

/// Closed table of known type names with per-entry lazy resolution.
pub struct ModelCatalog {
    pub(crate) entries: HashMap<&'static str, CatalogEntry>,
    pub(crate) modules: PapayaMap<&'static str, Arc<ModelModule>>,
    pub(crate) class_loads: AtomicUsize,
}

impl ModelCatalog {
    /// Build a catalog from `(name, locator)` rows. Later rows with a
    /// duplicate name are ignored.
    pub fn new<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, ModelLocator)>,
    {
        let mut entries = HashMap::new();
        for (name, locator) in rows {
            entries
                .entry(name)
                .or_insert_with(|| CatalogEntry::new(name, locator));
        }
        Self {
            entries,
            modules: PapayaMap::new(),
            class_loads: AtomicUsize::new(0),
        }
    }

    /// Build a catalog from `(name, module)` pairs, picking each module's
    /// loader with `loader_for`.
    pub fn from_table(
        table: &[(&'static str, &'static str)],
        loader_for: impl Fn(&'static str) -> ModuleLoader,
    ) -> Self {
        Self::new(
            table
                .iter()
                .map(|&(name, module)| (name, ModelLocator::new(module, loader_for(module)))),
        )
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, type_name: &str) -> Option<&CatalogEntry> {
        self.entries.get(type_name)
    }

    /// All known type names, sorted.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            known_types: self.entries.len(),
            resolved_types: self
                .entries
                .values()
                .filter(|entry| entry.is_resolved())
                .count(),
            loaded_modules: self.modules.pin().len(),
            class_loads: self.class_loads.load(Ordering::Acquire),
        }
    }
}

impl fmt::Debug for ModelCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelCatalog")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

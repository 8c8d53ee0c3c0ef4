use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use crate::error::{FhirResourceError, Result};
use crate::registry::{CatalogEntry, ModelCatalog};
use crate::types::{DynamicModel, FieldDescriptor, GenericValue, Model, TypedInstance};
use crate::validation::ValidatorStep;

/// Builds an instance of one class from a decoded mapping.
pub type Constructor = Arc<dyn Fn(GenericValue) -> Result<TypedInstance> + Send + Sync>;

/// Resolved class handle: name, constructor, declared fields and the
/// ordered validator chain for one record type.
#[derive(Clone)]
pub struct ModelClass {
    name: &'static str,
    constructor: Constructor,
    fields: &'static [FieldDescriptor],
    validators: Vec<ValidatorStep>,
}

impl ModelClass {
    pub fn new<F>(name: &'static str, constructor: F) -> Self
    where
        F: Fn(GenericValue) -> Result<TypedInstance> + Send + Sync + 'static,
    {
        Self {
            name,
            constructor: Arc::new(constructor),
            fields: &[],
            validators: Vec::new(),
        }
    }

    /// Class backed by a hand-written model struct.
    pub fn typed<M: Model>() -> Self {
        Self {
            name: M::TYPE_NAME,
            constructor: Arc::new(|value| M::from_generic(value).map(TypedInstance::new)),
            fields: M::fields(),
            validators: Vec::new(),
        }
    }

    /// Class backed by [`DynamicModel`].
    pub fn dynamic(name: &'static str) -> Self {
        Self::new(name, move |value| {
            DynamicModel::from_generic(name, value).map(TypedInstance::new)
        })
    }

    pub fn with_validator(mut self, step: ValidatorStep) -> Self {
        self.validators.push(step);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    pub fn validators(&self) -> &[ValidatorStep] {
        &self.validators
    }

    pub fn construct(&self, value: GenericValue) -> Result<TypedInstance> {
        (self.constructor)(value)
    }
}

impl fmt::Debug for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClass")
            .field("name", &self.name)
            .field("fields", &self.fields.len())
            .field(
                "validators",
                &self.validators.iter().map(|v| v.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The classes defined by one loaded module.
#[derive(Debug, Default)]
pub struct ModelModule {
    path: &'static str,
    classes: HashMap<&'static str, Arc<ModelClass>>,
}

impl ModelModule {
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            classes: HashMap::new(),
        }
    }

    pub fn with_class(mut self, class: ModelClass) -> Self {
        self.classes.insert(class.name(), Arc::new(class));
        self
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn class(&self, name: &str) -> Option<Arc<ModelClass>> {
        self.classes.get(name).cloned()
    }

    pub fn class_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.classes.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl ModelCatalog {
    /// Resolve a type name to its class, loading its module on first use.
    ///
    /// Concurrent first calls for the same name are serialized on the
    /// entry; the class is extracted once and every caller gets the same
    /// handle.
    pub fn resolve(&self, type_name: &str) -> Result<Arc<ModelClass>> {
        let entry = self
            .entries
            .get(type_name)
            .ok_or_else(|| FhirResourceError::unknown_type(type_name))?;

        if let Some(class) = entry.resolved.read().as_ref() {
            return Ok(Arc::clone(class));
        }

        let mut slot = entry.resolved.write();
        if let Some(class) = slot.as_ref() {
            return Ok(Arc::clone(class));
        }

        let class = self.load_class(entry)?;
        *slot = Some(Arc::clone(&class));
        self.class_loads.fetch_add(1, Ordering::AcqRel);
        Ok(class)
    }

    /// Forget every resolved class and loaded module.
    ///
    /// Handles returned earlier stay valid; the next `resolve` loads again.
    pub fn reset(&self) {
        for entry in self.entries.values() {
            *entry.resolved.write() = None;
        }
        self.modules.pin().clear();
        tracing::debug!("Reset model catalog ({} types)", self.entries.len());
    }

    fn load_class(&self, entry: &CatalogEntry) -> Result<Arc<ModelClass>> {
        let locator = entry.locator();
        let module = {
            let modules = self.modules.pin();
            Arc::clone(modules.get_or_insert_with(locator.module, || {
                tracing::debug!("Loading model module {}", locator.module);
                Arc::new((locator.load)(locator.module))
            }))
        };

        let class = module.class(entry.name()).ok_or_else(|| {
            FhirResourceError::resolution(
                entry.name(),
                locator.module,
                "module does not define this class",
            )
        })?;

        tracing::debug!(
            "Resolved model class {} from module {}",
            entry.name(),
            locator.module
        );
        Ok(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ModelLocator;
    use serde_json::json;

    fn basic_module(path: &'static str) -> ModelModule {
        ModelModule::new(path).with_class(ModelClass::dynamic("Basic"))
    }

    fn catalog() -> ModelCatalog {
        ModelCatalog::new([
            ("Basic", ModelLocator::new(".basic", basic_module)),
            ("Ghost", ModelLocator::new(".basic", basic_module)),
        ])
    }

    #[test]
    fn test_resolve_returns_same_handle() {
        let catalog = catalog();
        let first = catalog.resolve("Basic").unwrap();
        let second = catalog.resolve("Basic").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.stats().class_loads, 1);
        assert_eq!(catalog.stats().loaded_modules, 1);
    }

    #[test]
    fn test_unknown_name_fails_without_mutation() {
        let catalog = catalog();
        let err = catalog.resolve("Patient").unwrap_err();
        assert!(matches!(err, FhirResourceError::UnknownType { .. }));
        assert_eq!(catalog.stats().resolved_types, 0);
        assert_eq!(catalog.stats().loaded_modules, 0);
    }

    #[test]
    fn test_missing_class_is_a_resolution_error() {
        let catalog = catalog();
        let err = catalog.resolve("Ghost").unwrap_err();
        match err {
            FhirResourceError::Resolution {
                type_name, module, ..
            } => {
                assert_eq!(type_name, "Ghost");
                assert_eq!(module, ".basic");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!catalog.entry("Ghost").unwrap().is_resolved());
    }

    #[test]
    fn test_reset_forces_reload() {
        let catalog = catalog();
        let before = catalog.resolve("Basic").unwrap();
        catalog.reset();
        assert_eq!(catalog.stats().resolved_types, 0);

        let after = catalog.resolve("Basic").unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(catalog.stats().class_loads, 2);

        // old handle keeps working
        let instance = before.construct(json!({"resourceType": "Basic"})).unwrap();
        assert_eq!(instance.resource_type(), "Basic");
    }
}

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Map;

use crate::core::ValidationConfig;
use crate::error::{FhirResourceError, Result, StepError};
use crate::types::{FieldDescriptor, GenericValue, TypedInstance};

/// Value threaded through a validator chain.
#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    /// Decoded value that has not been turned into an instance.
    Raw(GenericValue),
    Instance(TypedInstance),
}

impl StepValue {
    pub fn as_raw(&self) -> Option<&GenericValue> {
        match self {
            StepValue::Raw(value) => Some(value),
            StepValue::Instance(_) => None,
        }
    }

    pub fn as_instance(&self) -> Option<&TypedInstance> {
        match self {
            StepValue::Instance(instance) => Some(instance),
            StepValue::Raw(_) => None,
        }
    }

    /// Generic form of the value, encoding instances if needed.
    pub fn to_generic(&self) -> Result<GenericValue> {
        match self {
            StepValue::Raw(value) => Ok(value.clone()),
            StepValue::Instance(instance) => instance.to_value(),
        }
    }
}

/// Sibling values already validated when a field is processed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldContext {
    values: Map<String, GenericValue>,
}

impl FieldContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&GenericValue> {
        self.values.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: GenericValue) {
        self.values.insert(field.into(), value);
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Record a validated instance under `field`.
    pub fn record(&mut self, field: &FieldDescriptor, instance: &TypedInstance) -> Result<()> {
        self.values.insert(field.name.to_string(), instance.to_value()?);
        Ok(())
    }
}

pub type StepFn = dyn Fn(
        StepValue,
        &mut FieldContext,
        &ValidationConfig,
        &FieldDescriptor,
    ) -> std::result::Result<StepValue, StepError>
    + Send
    + Sync;

/// One named transformation in a type's validator chain.
#[derive(Clone)]
pub struct ValidatorStep {
    name: Cow<'static, str>,
    func: Arc<StepFn>,
}

impl ValidatorStep {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(
                StepValue,
                &mut FieldContext,
                &ValidationConfig,
                &FieldDescriptor,
            ) -> std::result::Result<StepValue, StepError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(
        &self,
        value: StepValue,
        context: &mut FieldContext,
        config: &ValidationConfig,
        field: &FieldDescriptor,
    ) -> std::result::Result<StepValue, StepError> {
        (self.func)(value, context, config, field)
    }
}

impl fmt::Debug for ValidatorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorStep")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Run `steps` in order, each one receiving the previous step's output.
pub(crate) fn run_chain(
    type_name: &str,
    steps: &[ValidatorStep],
    seed: StepValue,
    context: &mut FieldContext,
    config: &ValidationConfig,
    field: &FieldDescriptor,
) -> Result<StepValue> {
    let mut value = seed;
    for step in steps {
        tracing::trace!(
            "Running validator step {} for {}.{}",
            step.name(),
            type_name,
            field.name
        );
        value = step.apply(value, context, config, field).map_err(|source| {
            FhirResourceError::validator_step(type_name, step.name(), field.name, source)
        })?;
    }
    Ok(value)
}

use std::path::Path;

use crate::core::ValidationConfig;
use crate::error::{FhirResourceError, Result};
use crate::registry::{ModelCatalog, ModelClass};
use crate::types::model::check_document_tag;
use crate::types::{FieldDescriptor, GenericValue, Model, TypedInstance};
use crate::validation::chain::{FieldContext, StepValue, run_chain};
use crate::validation::normalizer::{Decoded, ModelInput, construct, decode_input};

/// The instance must carry `expected` as its tag and must have been built by
/// `class`.
fn check_instance(class: &ModelClass, expected: &str, instance: &TypedInstance) -> Result<()> {
    if instance.resource_type() != expected {
        return Err(FhirResourceError::type_tag_mismatch(
            expected,
            instance.resource_type(),
        ));
    }
    if instance.type_name() != class.name() {
        return Err(FhirResourceError::type_tag_mismatch(
            expected,
            instance.type_name(),
        ));
    }
    Ok(())
}

/// Turn the chain's final value back into an instance of `class`.
fn finish(class: &ModelClass, type_name: &str, value: StepValue) -> Result<TypedInstance> {
    let instance = match value {
        StepValue::Instance(instance) => instance,
        StepValue::Raw(raw) => class.construct(raw)?,
    };
    check_instance(class, type_name, &instance)?;
    Ok(instance)
}

impl ModelCatalog {
    /// Validate `input` as a record of `type_name`.
    pub fn validate_as(
        &self,
        type_name: &str,
        input: impl Into<ModelInput>,
    ) -> Result<TypedInstance> {
        self.validate_as_with(type_name, input, &ValidationConfig::default())
    }

    pub fn validate_as_with(
        &self,
        type_name: &str,
        input: impl Into<ModelInput>,
        config: &ValidationConfig,
    ) -> Result<TypedInstance> {
        let class = self.resolve(type_name)?;
        let field = FieldDescriptor::root(class.name());
        self.dispatch(&class, type_name, input.into(), &mut FieldContext::new(), config, &field)
    }

    /// Validate the value of one field of a parent record.
    ///
    /// `context` holds the sibling values the parent has already validated
    /// and is passed mutably to every step of the chain.
    pub fn validate_field(
        &self,
        type_name: &str,
        input: impl Into<ModelInput>,
        context: &mut FieldContext,
        config: &ValidationConfig,
        field: &FieldDescriptor,
    ) -> Result<TypedInstance> {
        let class = self.resolve(type_name)?;
        self.dispatch(&class, type_name, input.into(), context, config, field)
    }

    /// Validate a record whose type is taken from its own `resourceType`.
    pub fn validate_any(&self, input: impl Into<ModelInput>) -> Result<TypedInstance> {
        self.validate_any_with(input, &ValidationConfig::default())
    }

    pub fn validate_any_with(
        &self,
        input: impl Into<ModelInput>,
        config: &ValidationConfig,
    ) -> Result<TypedInstance> {
        let decoded = decode_input("Resource", input.into(), config)?;
        let tag = match &decoded {
            Decoded::Instance(instance) => instance.resource_type().to_string(),
            Decoded::Mapping(value) => value
                .get("resourceType")
                .and_then(|tag| tag.as_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    FhirResourceError::invalid_shape("Resource", "value has no resourceType")
                })?,
        };
        let input = match decoded {
            Decoded::Instance(instance) => ModelInput::Instance(instance),
            Decoded::Mapping(value) => ModelInput::Value(value),
        };
        self.validate_as_with(&tag, input, config)
    }

    /// Validate as `M` and return the concrete struct.
    pub fn validate_typed<M: Model>(&self, input: impl Into<ModelInput>) -> Result<M> {
        let instance = self.validate_as(M::TYPE_NAME, input)?;
        let built_by = instance.type_name();
        instance.downcast::<M>().ok_or_else(|| {
            FhirResourceError::resolution(
                M::TYPE_NAME,
                built_by,
                "catalog class does not build the requested model type",
            )
        })
    }

    /// Read `path` asynchronously, then validate its contents as `type_name`.
    pub async fn validate_file_async(
        &self,
        type_name: &str,
        path: &Path,
        config: &ValidationConfig,
    ) -> Result<TypedInstance> {
        // unknown names fail before any I/O
        self.resolve(type_name)?;
        let bytes = crate::format::read_file_async(path).await?;
        let config = ValidationConfig {
            content_type: config.content_type_for(path),
            ..config.clone()
        };
        self.validate_as_with(type_name, bytes, &config)
    }

    fn dispatch(
        &self,
        class: &ModelClass,
        type_name: &str,
        input: ModelInput,
        context: &mut FieldContext,
        config: &ValidationConfig,
        field: &FieldDescriptor,
    ) -> Result<TypedInstance> {
        let decoded = decode_input(type_name, input, config)?;
        match &decoded {
            Decoded::Mapping(GenericValue::Object(object)) => {
                check_document_tag(type_name, object)?;
            }
            Decoded::Mapping(_) => {}
            Decoded::Instance(instance) => check_instance(class, type_name, instance)?,
        }
        let keep_raw = !class.validators().is_empty();
        let normalized = construct(class, decoded, keep_raw)?;
        check_instance(class, type_name, &normalized.instance)?;

        if class.validators().is_empty() {
            return Ok(normalized.instance);
        }

        let seed = match normalized.raw {
            Some(raw) => StepValue::Raw(raw),
            None => StepValue::Instance(normalized.instance),
        };
        let value = run_chain(type_name, class.validators(), seed, context, config, field)?;
        finish(class, type_name, value)
    }
}

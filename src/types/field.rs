//! Field descriptors and the declared-field walk run before a typed model
//! is deserialized.
//!
//! A descriptor names a field, its declared FHIR type and whether it is
//! required or repeated. Descriptors are handed to validator steps and are
//! also how a typed record enforces nested tag precedence: a nested value
//! under a concretely typed field must either carry no `resourceType` or
//! carry exactly the declared type, while a [`FieldShape::Resource`] slot
//! takes its type from the value's own tag.

use serde_json::Map;

use crate::error::{FhirResourceError, Result};
use crate::models::dstu2;
use crate::types::GenericValue;

#[derive(Debug, Clone, Copy)]
pub enum FieldShape {
    /// Scalar value kinds (string, boolean, decimal, dateTime, ...).
    Primitive,
    /// A nested record of the declared type.
    Complex(fn() -> &'static [FieldDescriptor]),
    /// A polymorphic resource slot; the nested value's own tag decides its type.
    Resource,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub type_name: &'static str,
    pub required: bool,
    pub repeated: bool,
    pub shape: FieldShape,
}

impl FieldDescriptor {
    pub const fn primitive(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            type_name,
            required: false,
            repeated: false,
            shape: FieldShape::Primitive,
        }
    }

    pub const fn complex(
        name: &'static str,
        type_name: &'static str,
        fields: fn() -> &'static [FieldDescriptor],
    ) -> Self {
        Self {
            name,
            type_name,
            required: false,
            repeated: false,
            shape: FieldShape::Complex(fields),
        }
    }

    pub const fn resource(name: &'static str) -> Self {
        Self {
            name,
            type_name: "Resource",
            required: false,
            repeated: false,
            shape: FieldShape::Resource,
        }
    }

    /// Descriptor for a whole value validated as `type_name`.
    pub const fn root(type_name: &'static str) -> Self {
        Self {
            name: type_name,
            type_name,
            required: true,
            repeated: false,
            shape: FieldShape::Primitive,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }
}

/// Walk `object` against the declared `fields` of `type_name`.
///
/// Fails with `InvalidShape` when a required field is absent or a resource
/// slot holds an untagged value, with `UnknownType` when a resource slot
/// names a type the DSTU2 catalog does not know, and with `TypeTagMismatch`
/// when a nested record claims a different type than its field declares.
/// Value kinds are left to the deserializer.
pub fn check_fields(
    type_name: &str,
    fields: &[FieldDescriptor],
    object: &Map<String, GenericValue>,
    path: &str,
) -> Result<()> {
    for field in fields {
        let value = match object.get(field.name) {
            None | Some(GenericValue::Null) => {
                if field.required {
                    return Err(FhirResourceError::InvalidShape {
                        type_name: type_name.to_string(),
                        message: format!("missing required field {path}.{}", field.name),
                    });
                }
                continue;
            }
            Some(value) => value,
        };

        let items: Vec<&GenericValue> = match (field.repeated, value) {
            (true, GenericValue::Array(items)) => items.iter().collect(),
            _ => vec![value],
        };

        for (index, item) in items.into_iter().enumerate() {
            let child_path = if field.repeated {
                format!("{path}.{}[{index}]", field.name)
            } else {
                format!("{path}.{}", field.name)
            };
            check_nested(type_name, field, item, &child_path)?;
        }
    }
    Ok(())
}

fn check_nested(
    type_name: &str,
    field: &FieldDescriptor,
    item: &GenericValue,
    path: &str,
) -> Result<()> {
    let GenericValue::Object(nested) = item else {
        return Ok(());
    };

    match field.shape {
        FieldShape::Primitive => Ok(()),
        FieldShape::Complex(nested_fields) => {
            if let Some(tag) = nested.get("resourceType") {
                let tag = tag.as_str().ok_or_else(|| FhirResourceError::InvalidShape {
                    type_name: type_name.to_string(),
                    message: format!("resourceType at {path} is not a string"),
                })?;
                if tag != field.type_name {
                    return Err(FhirResourceError::type_tag_mismatch(field.type_name, tag));
                }
            }
            check_fields(field.type_name, nested_fields(), nested, path)
        }
        FieldShape::Resource => match nested.get("resourceType") {
            Some(GenericValue::String(tag)) if !dstu2::catalog().contains(tag) => {
                Err(FhirResourceError::unknown_type(tag.as_str()))
            }
            Some(GenericValue::String(_)) => Ok(()),
            _ => Err(FhirResourceError::InvalidShape {
                type_name: type_name.to_string(),
                message: format!("resource at {path} has no resourceType"),
            }),
        },
    }
}

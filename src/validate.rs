use tracing::debug;

use crate::construct::DataObject;
use crate::datatype::{Mapping, Value};
use crate::descriptor::TypeDescriptor;
use crate::error::{BoxError, DatashapeError, FieldFailure, Result};

/// Checks a single resolved field value.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &Value) -> std::result::Result<(), String>;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> std::result::Result<(), String> + Send + Sync,
{
    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        self(value)
    }
}

/// Checks a whole object once every field validated.
pub trait Hook: Send + Sync {
    fn check(&self, object: &DataObject) -> std::result::Result<(), BoxError>;
}

impl<F> Hook for F
where
    F: Fn(&DataObject) -> std::result::Result<(), BoxError> + Send + Sync,
{
    fn check(&self, object: &DataObject) -> std::result::Result<(), BoxError> {
        self(object)
    }
}

/// Validates resolved fields, collecting every failure before giving up.
pub(crate) fn validate_fields(descriptor: &TypeDescriptor, fields: &Mapping) -> Result<()> {
    let mut failures = Vec::new();
    for field in descriptor.fields() {
        match fields.get(field.name()) {
            None => failures.push(FieldFailure::new(field.name(), "missing value")),
            Some(Value::Null) if !field.is_nullable() => {
                failures.push(FieldFailure::new(field.name(), "must not be null"))
            }
            Some(Value::Null) => (),
            Some(value) => {
                for validator in field.validators() {
                    if let Err(message) = validator.validate(value) {
                        failures.push(FieldFailure::new(field.name(), message));
                    }
                }
            }
        }
    }
    if failures.is_empty() {
        Ok(())
    } else {
        debug!(type_name = descriptor.name(), failed = failures.len(), "validation failed");
        Err(DatashapeError::Validation { type_name: descriptor.name().to_owned(), failures })
    }
}

/// Runs the type hooks in order; the first failure is returned as is.
pub(crate) fn run_hooks(object: &DataObject) -> Result<()> {
    for hook in object.descriptor().hooks() {
        hook.check(object).map_err(DatashapeError::Hook)?;
    }
    Ok(())
}

//! Field resolution: turns raw input into one value per declared field.
//!
//! Fields are resolved strictly in declaration order. For each field the
//! input is searched under the field name, then under its source alias, and
//! finally the declared default is used. Whatever is found goes through the
//! field's casters. Consumed keys are removed from the working input so that
//! only keys nobody claimed are left over as residual keys.

use tracing::{debug, trace};

use crate::caster::cast_field;
use crate::datatype::{Arguments, Mapping, Value};
use crate::descriptor::{FieldDescriptor, TypeDescriptor};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Resolved values keyed by field name, in declaration order.
    pub fields: Mapping,
    /// Input keys not consumed by any field, in input order.
    pub residual: Vec<String>,
}

pub struct FieldResolver<'a> {
    descriptor: &'a TypeDescriptor,
}

impl<'a> FieldResolver<'a> {
    pub fn new(descriptor: &'a TypeDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn resolve(&self, input: impl Into<Arguments>) -> Result<Resolution> {
        let mut remaining = input.into().into_mapping();
        let mut fields = Mapping::with_capacity(self.descriptor.fields().len());
        for field in self.descriptor.fields() {
            match take(&mut remaining, field).or_else(|| field.default().cloned()) {
                Some(value) => {
                    let value = cast_field(field, value)?;
                    trace!(type_name = self.descriptor.name(), field = field.name(), kind = value.kind(), "resolved");
                    fields.insert(field.name().to_owned(), value);
                }
                None if field.is_nullable() => {
                    fields.insert(field.name().to_owned(), Value::Null);
                }
                None => trace!(type_name = self.descriptor.name(), field = field.name(), "unresolved"),
            }
        }
        let residual: Vec<String> = remaining.into_keys().collect();
        debug!(
            type_name = self.descriptor.name(),
            resolved = fields.len(),
            residual = residual.len(),
            "fields resolved"
        );
        Ok(Resolution { fields, residual })
    }
}

/// Takes the value for `field` out of `input`. The source alias is only
/// looked up, and only consumed, when the field name is absent; an unused
/// alias key stays in the input for later fields or as residual.
fn take(input: &mut Mapping, field: &FieldDescriptor) -> Option<Value> {
    match input.shift_remove(field.name()) {
        Some(value) => Some(value),
        None => field.source_name().and_then(|alias| take_path(input, alias)),
    }
}

/// Removes `key` from `input`. A key that is not present literally but
/// contains dots is followed through nested maps; maps emptied on the way
/// are removed as well.
fn take_path(input: &mut Mapping, key: &str) -> Option<Value> {
    if let Some(value) = input.shift_remove(key) {
        return Some(value);
    }
    let (head, rest) = key.split_once('.')?;
    let Some(Value::Map(nested)) = input.get_mut(head) else {
        return None;
    };
    let value = take_path(nested, rest);
    if value.is_some() && nested.is_empty() {
        input.shift_remove(head);
    }
    value
}

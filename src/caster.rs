//! Casters coerce a raw input value into the shape a field declares.
//!
//! A field may carry any number of casters. They are tried in declaration
//! order and the first one that succeeds wins; a field without casters keeps
//! its raw value. Explicit nulls never reach a caster.
//!
//! Three casters are provided:
//! * [`EnumCaster`] – resolves a scalar to a variant of a backed enumeration.
//! * [`ObjectCaster`] – constructs a nested [`DataObject`] from a map.
//! * [`ListCaster`] – applies another caster to every element of a list or map.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::construct::DataObject;
use crate::datatype::{EnumDef, Mapping, Value};
use crate::descriptor::{FieldDescriptor, Shape, TypeDescriptor};
use crate::error::{DatashapeError, Result};

pub trait Caster: fmt::Debug + Send + Sync {
    /// Identity used in error reports.
    fn name(&self) -> String;
    /// Coerces `value`, or fails with a `Cast` rejection. Returning
    /// `InvalidCasterConfiguration` aborts the field instead of falling
    /// through to the next caster.
    fn cast(&self, value: Value) -> Result<Value>;
}

/// Runs `value` through the casters of `field`.
pub(crate) fn cast_field(field: &FieldDescriptor, value: Value) -> Result<Value> {
    let casters = field.casters();
    if casters.is_empty() || value.is_null() {
        return Ok(value);
    }
    let mut reasons = Vec::with_capacity(casters.len());
    for caster in casters {
        match caster.cast(value.clone()) {
            Ok(cast) => {
                trace!(field = field.name(), caster = %caster.name(), "cast accepted");
                return Ok(cast);
            }
            Err(e @ DatashapeError::InvalidCasterConfiguration { .. }) => return Err(e),
            Err(DatashapeError::Cast { reasons: rejected, .. }) => reasons.extend(rejected),
            Err(other) => reasons.push(other.to_string()),
        }
    }
    Err(DatashapeError::Cast {
        field: field.name().to_owned(),
        casters: casters.iter().map(|c| c.name()).collect(),
        value,
        reasons,
    })
}

// ------------- Enum -------------
/// Casts scalars to variants of a backed enumeration.
#[derive(Debug, Clone)]
pub struct EnumCaster {
    target: Arc<EnumDef>,
}

impl EnumCaster {
    pub fn new(target: &Arc<EnumDef>) -> Self {
        Self { target: Arc::clone(target) }
    }
}

impl Caster for EnumCaster {
    fn name(&self) -> String {
        format!("EnumCaster<{}>", self.target.name())
    }
    fn cast(&self, value: Value) -> Result<Value> {
        if !self.target.is_backed() {
            return Err(DatashapeError::misconfigured(
                self.name(),
                format!("may only be used to cast backed enums, received [{}]", self.target.name()),
            ));
        }
        if let Value::Enum(variant) = &value {
            if variant.belongs_to(&self.target) {
                return Ok(value);
            }
            let reason = format!("variant {} does not belong to enum [{}]", variant, self.target.name());
            return Err(DatashapeError::rejected(self.name(), value, reason));
        }
        match EnumDef::try_from_value(&self.target, &value) {
            Some(variant) => Ok(Value::Enum(variant)),
            None => {
                let reason = format!("couldn't cast enum [{}] with value [{}]", self.target.name(), value);
                Err(DatashapeError::rejected(self.name(), value, reason))
            }
        }
    }
}

// ------------- Object -------------
/// Constructs a nested object of a given type from a map.
#[derive(Debug, Clone)]
pub struct ObjectCaster {
    target: Arc<TypeDescriptor>,
}

impl ObjectCaster {
    pub fn new(target: Arc<TypeDescriptor>) -> Self {
        Self { target }
    }
    pub fn of<T: Shape>() -> Self {
        Self::new(T::descriptor())
    }
}

impl Caster for ObjectCaster {
    fn name(&self) -> String {
        format!("ObjectCaster<{}>", self.target.name())
    }
    fn cast(&self, value: Value) -> Result<Value> {
        match value {
            Value::Object(object) if object.type_name() == self.target.name() => Ok(Value::Object(object)),
            Value::Map(map) => match DataObject::construct(Arc::clone(&self.target), map.clone()) {
                Ok(object) => Ok(Value::Object(object)),
                Err(e @ DatashapeError::InvalidCasterConfiguration { .. }) => Err(e),
                Err(e) => Err(DatashapeError::rejected(self.name(), Value::Map(map), e.to_string())),
            },
            other => {
                let reason = format!("expected a map or a {} object, got {}", self.target.name(), other.kind());
                Err(DatashapeError::rejected(self.name(), other, reason))
            }
        }
    }
}

// ------------- List -------------
/// Applies an inner caster to every element of a list, or to every value of a map.
#[derive(Debug, Clone)]
pub struct ListCaster {
    inner: Arc<dyn Caster>,
}

impl ListCaster {
    pub fn of(inner: impl Caster + 'static) -> Self {
        Self { inner: Arc::new(inner) }
    }
    /// List of nested objects of type `T`.
    pub fn objects<T: Shape>() -> Self {
        Self::of(ObjectCaster::of::<T>())
    }

    fn element(&self, position: &str, item: Value) -> Result<Value> {
        self.inner.cast(item).map_err(|e| match e {
            DatashapeError::Cast { value, reasons, .. } => {
                let reason = format!("element {}: {}", position, reasons.join("; "));
                DatashapeError::rejected(self.name(), value, reason)
            }
            other => other,
        })
    }
}

impl Caster for ListCaster {
    fn name(&self) -> String {
        format!("ListCaster<{}>", self.inner.name())
    }
    fn cast(&self, value: Value) -> Result<Value> {
        match value {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| self.element(&i.to_string(), item))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            Value::Map(map) => map
                .into_iter()
                .map(|(k, item)| self.element(&k, item).map(|v| (k, v)))
                .collect::<Result<Mapping>>()
                .map(Value::Map),
            other => {
                let reason = format!("expected a list or a map, got {}", other.kind());
                Err(DatashapeError::rejected(self.name(), other, reason))
            }
        }
    }
}

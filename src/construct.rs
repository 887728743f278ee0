use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::ser::{Serialize, Serializer};
use tracing::debug;

use crate::datatype::{Arguments, Mapping, Value, serialize_mapping};
use crate::descriptor::TypeDescriptor;
use crate::error::{DatashapeError, Result};
use crate::resolve::FieldResolver;
use crate::validate::{run_hooks, validate_fields};

// ------------- DataObject -------------
/// A constructed value object: one resolved value per declared field plus a
/// view filter applied when flattening to plain data.
///
/// Views (`only`, `except`) share the resolved fields with the object they
/// were derived from and carry their own copy of the filter lists, so deriving
/// a view never changes the original.
#[derive(Clone)]
pub struct DataObject {
    descriptor: Arc<TypeDescriptor>,
    fields: Arc<Mapping>,
    only_keys: Vec<String>,
    except_keys: Vec<String>,
}

impl DataObject {
    /// Resolves, casts and validates `input` against `descriptor`.
    /// Nothing is returned unless every step succeeds.
    pub fn construct(descriptor: Arc<TypeDescriptor>, input: impl Into<Arguments>) -> Result<Self> {
        let resolution = FieldResolver::new(&descriptor).resolve(input)?;
        if !resolution.residual.is_empty() && descriptor.is_strict() {
            debug!(type_name = descriptor.name(), keys = ?resolution.residual, "unknown fields rejected");
            return Err(DatashapeError::UnknownFields {
                type_name: descriptor.name().to_owned(),
                keys: resolution.residual,
            });
        }
        validate_fields(&descriptor, &resolution.fields)?;
        let object = Self {
            descriptor,
            fields: Arc::new(resolution.fields),
            only_keys: Vec::new(),
            except_keys: Vec::new(),
        };
        run_hooks(&object)?;
        Ok(object)
    }

    /// Constructs one object per input, stopping at the first failure.
    pub fn array_of<I>(descriptor: &Arc<TypeDescriptor>, inputs: I) -> Result<Vec<Self>>
    where
        I: IntoIterator,
        I::Item: Into<Arguments>,
    {
        inputs
            .into_iter()
            .map(|input| Self::construct(Arc::clone(descriptor), input))
            .collect()
    }

    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }
    pub fn type_name(&self) -> &str {
        self.descriptor.name()
    }
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
    pub fn fields(&self) -> &Mapping {
        &self.fields
    }
    pub fn only_keys(&self) -> &[String] {
        &self.only_keys
    }
    pub fn except_keys(&self) -> &[String] {
        &self.except_keys
    }

    /// Every field under its emitted name, without filters or flattening.
    pub fn all(&self, keep_original_names: bool) -> Mapping {
        self.descriptor
            .fields()
            .iter()
            .filter_map(|field| {
                self.fields
                    .get(field.name())
                    .map(|value| (field.emitted_name(keep_original_names).to_owned(), value.clone()))
            })
            .collect()
    }

    /// Plain data for this object: renamed, filtered by the view and with
    /// nested objects, enumerations and containers flattened recursively.
    pub fn to_plain_data(&self, keep_original_names: bool) -> Mapping {
        let mut data = self.all(keep_original_names);
        if !self.only_keys.is_empty() {
            data.retain(|key, _| self.only_keys.iter().any(|k| k == key));
        } else {
            data.retain(|key, _| !self.except_keys.iter().any(|k| k == key));
        }
        data.into_iter().map(|(key, value)| (key, value.to_plain())).collect()
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decodes the plain data into any deserializable type.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_json()?)?)
    }

    /// View restricted to `keys`, added to the keys already kept.
    pub fn only<I, S>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut view = self.clone();
        view.only_keys.extend(keys.into_iter().map(Into::into));
        view
    }

    /// View without `keys`, added to the keys already dropped.
    pub fn except<I, S>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut view = self.clone();
        view.except_keys.extend(keys.into_iter().map(Into::into));
        view
    }

    /// New object of the same type built from this object's fields with
    /// `overrides` on top, run through the full construction again. An
    /// override may be keyed by a field's source alias.
    pub fn clone_with(&self, overrides: impl Into<Arguments>) -> Result<Self> {
        let overrides = overrides.into().into_mapping();
        let mut seed = self.all(true);
        for field in self.descriptor.fields() {
            let by_alias = field.source_name().is_some_and(|alias| overrides.contains_key(alias));
            if by_alias && !overrides.contains_key(field.name()) {
                seed.shift_remove(field.name());
            }
        }
        seed.extend(overrides);
        Self::construct(Arc::clone(&self.descriptor), seed)
    }
}

impl PartialEq for DataObject {
    fn eq(&self, other: &Self) -> bool {
        self.type_name() == other.type_name()
            && self.fields == other.fields
            && self.only_keys == other.only_keys
            && self.except_keys == other.except_keys
    }
}

impl fmt::Debug for DataObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut out = f.debug_struct(self.type_name());
        for (name, value) in self.fields.iter() {
            out.field(name, value);
        }
        out.finish()
    }
}

impl Serialize for DataObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_mapping(&self.to_plain_data(false), serializer)
    }
}

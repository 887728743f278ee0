use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::caster::Caster;
use crate::construct::DataObject;
use crate::datatype::{Arguments, Value};
use crate::error::Result;
use crate::registry;
use crate::settings;
use crate::validate::{Hook, Validator};

// ------------- Field -------------
/// Everything the construction pipeline needs to know about one declared field.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    source_alias: Option<String>,
    output_alias: Option<String>,
    nullable: bool,
    default: Option<Value>,
    casters: Vec<Arc<dyn Caster>>,
    validators: Vec<Arc<dyn Validator>>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_alias: None,
            output_alias: None,
            nullable: false,
            default: None,
            casters: Vec::new(),
            validators: Vec::new(),
        }
    }
    /// Alternate input key, consulted when the field name is absent.
    /// Dotted aliases (`"address.city"`) reach into nested maps.
    pub fn source_alias(mut self, alias: impl Into<String>) -> Self {
        self.source_alias = Some(alias.into());
        self
    }
    /// Key emitted by `to_plain_data` instead of the field name.
    pub fn output_alias(mut self, alias: impl Into<String>) -> Self {
        self.output_alias = Some(alias.into());
        self
    }
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
    /// Attaches a caster. Casters are tried in the order they were attached.
    pub fn cast_with(mut self, caster: impl Caster + 'static) -> Self {
        self.casters.push(Arc::new(caster));
        self
    }
    pub fn validate_with(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn source_name(&self) -> Option<&str> {
        self.source_alias.as_deref()
    }
    pub fn output_name(&self) -> Option<&str> {
        self.output_alias.as_deref()
    }
    /// Key this field is emitted under.
    pub fn emitted_name(&self, keep_original_names: bool) -> &str {
        match (&self.output_alias, keep_original_names) {
            (Some(alias), false) => alias,
            _ => &self.name,
        }
    }
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
    pub fn casters(&self) -> &[Arc<dyn Caster>] {
        &self.casters
    }
    pub fn validators(&self) -> &[Arc<dyn Validator>] {
        &self.validators
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("source_alias", &self.source_alias)
            .field("output_alias", &self.output_alias)
            .field("nullable", &self.nullable)
            .field("default", &self.default)
            .field("casters", &self.casters)
            .field("validators", &self.validators.len())
            .finish()
    }
}

// ------------- Type -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    Strict,
    Lenient,
    /// Follow `Settings::default_strict`.
    #[default]
    Inherit,
}

/// The ordered field table of one type plus its construction policy.
#[derive(Clone)]
pub struct TypeDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
    strictness: Strictness,
    hooks: Vec<Arc<dyn Hook>>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            strictness: Strictness::Inherit,
            hooks: Vec::new(),
        }
    }
    /// Declares a field. Redeclaring a name replaces the earlier declaration
    /// in place.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        match self.fields.iter().position(|f| f.name == field.name) {
            Some(index) => {
                warn!(type_name = %self.name, field = %field.name, "field declared twice, keeping the last declaration");
                self.fields[index] = field;
            }
            None => self.fields.push(field),
        }
        self
    }
    pub fn strict(mut self) -> Self {
        self.strictness = Strictness::Strict;
        self
    }
    pub fn lenient(mut self) -> Self {
        self.strictness = Strictness::Lenient;
        self
    }
    /// Adds a hook run against every successfully resolved object.
    pub fn hook(mut self, hook: impl Hook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
    pub fn field_named(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }
    pub fn is_strict(&self) -> bool {
        match self.strictness {
            Strictness::Strict => true,
            Strictness::Lenient => false,
            Strictness::Inherit => settings::current().default_strict,
        }
    }
    pub fn hooks(&self) -> &[Arc<dyn Hook>] {
        &self.hooks
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("strictness", &self.strictness)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

// ------------- Shape -------------
/// Implemented by types that declare a descriptor table.
///
/// ```
/// use datashape::descriptor::{FieldDescriptor, Shape, TypeDescriptor};
///
/// struct Point;
/// impl Shape for Point {
///     fn describe() -> TypeDescriptor {
///         TypeDescriptor::new("Point")
///             .field(FieldDescriptor::new("x").default_value(0))
///             .field(FieldDescriptor::new("y").default_value(0))
///             .strict()
///     }
/// }
///
/// let point = Point::construct(serde_json::json!({ "x": 3 })).unwrap();
/// assert_eq!(point.get("y").and_then(|v| v.as_i64()), Some(0));
/// ```
pub trait Shape: 'static {
    fn describe() -> TypeDescriptor;

    fn descriptor() -> Arc<TypeDescriptor> {
        registry::descriptor_of::<Self>()
    }
    fn construct(input: impl Into<Arguments>) -> Result<DataObject> {
        DataObject::construct(Self::descriptor(), input)
    }
    fn array_of<I>(inputs: I) -> Result<Vec<DataObject>>
    where
        I: IntoIterator,
        I::Item: Into<Arguments>,
    {
        DataObject::array_of(&Self::descriptor(), inputs)
    }
}

// used to keep plain data in declaration order
use indexmap::IndexMap;
// used when handing plain data to any serde encoder
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
// used to print out readable forms of a value
use std::fmt;
// enumeration tables are shared between casters and values
use std::sync::Arc;

use crate::construct::DataObject;

/// Insertion-ordered mapping used for raw input and plain output alike.
pub type Mapping = IndexMap<String, Value>;

// ------------- Value -------------
/// The loosely-typed data that objects are built from and flattened into.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(Mapping),
    Enum(EnumValue),
    Object(DataObject),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Enum(_) => "enum",
            Value::Object(_) => "object",
        }
    }
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(e) => Some(e),
            _ => None,
        }
    }
    pub fn as_object(&self) -> Option<&DataObject> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Flattens nested objects and enumerations into plain data.
    ///
    /// Objects become their own `to_plain_data(false)`, enumerations their
    /// backing scalar (or variant name when unbacked), and lists and maps are
    /// walked element-wise. The result never contains `Enum` or `Object`.
    pub fn to_plain(&self) -> Value {
        match self {
            Value::Object(object) => Value::Map(object.to_plain_data(false)),
            Value::Enum(variant) => variant.to_plain(),
            Value::List(items) => Value::List(items.iter().map(Value::to_plain).collect()),
            Value::Map(map) => Value::Map(
                map.iter().map(|(k, v)| (k.clone(), v.to_plain())).collect(),
            ),
            scalar => scalar.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Enum(variant) => write!(f, "{}", variant),
            Value::Object(object) => write!(f, "{}{}", object.type_name(), Value::Map(object.to_plain_data(false))),
            other => match serde_json::to_string(other) {
                Ok(s) => write!(f, "{}", s),
                Err(_) => write!(f, "<{}>", other.kind()),
            },
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => serialize_mapping(map, serializer),
            Value::Enum(variant) => variant.to_plain().serialize(serializer),
            Value::Object(object) => serialize_mapping(&object.to_plain_data(false), serializer),
        }
    }
}

pub(crate) fn serialize_mapping<S: Serializer>(map: &Mapping, serializer: S) -> Result<S::Ok, S::Error> {
    let mut out = serializer.serialize_map(Some(map.len()))?;
    for (k, v) in map {
        out.serialize_entry(k, v)?;
    }
    out.end()
}

// ------------- Conversions -------------
impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Int(i) }
}
impl From<i32> for Value {
    fn from(i: i32) -> Self { Value::Int(i64::from(i)) }
}
impl From<f64> for Value {
    fn from(x: f64) -> Self { Value::Float(x) }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Str(s.to_owned()) }
}
impl From<String> for Value {
    fn from(s: String) -> Self { Value::Str(s) }
}
impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self { Value::List(items) }
}
impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self { Value::Map(map) }
}
impl From<EnumValue> for Value {
    fn from(variant: EnumValue) -> Self { Value::Enum(variant) }
}
impl From<DataObject> for Value {
    fn from(object: DataObject) -> Self { Value::Object(object) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            // numbers outside the i64 range, such as u64 above i64::MAX, become lossy floats
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}

// ------------- Arguments -------------
/// The shapes a construction call accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Arguments {
    /// Named fields.
    Named(Mapping),
    /// Positional arguments; a lone map is unwrapped into named fields.
    Positional(Vec<Value>),
}

impl Arguments {
    pub fn into_mapping(self) -> Mapping {
        match self {
            Arguments::Named(map) => map,
            Arguments::Positional(mut args) => {
                if args.len() == 1 && matches!(args[0], Value::Map(_)) {
                    if let Some(Value::Map(map)) = args.pop() {
                        return map;
                    }
                }
                args.into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), v))
                    .collect()
            }
        }
    }
}

impl From<Mapping> for Arguments {
    fn from(map: Mapping) -> Self { Arguments::Named(map) }
}
impl From<Vec<Value>> for Arguments {
    fn from(args: Vec<Value>) -> Self { Arguments::Positional(args) }
}
impl From<Value> for Arguments {
    fn from(value: Value) -> Self {
        match value {
            Value::Map(map) => Arguments::Named(map),
            other => Arguments::Positional(vec![other]),
        }
    }
}
impl From<serde_json::Value> for Arguments {
    fn from(json: serde_json::Value) -> Self { Arguments::from(Value::from(json)) }
}

// ------------- Enumerations -------------
/// Underlying scalar of a backed enumeration variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    Int(i64),
    Str(String),
}

impl Scalar {
    fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Scalar::Int(a), Value::Int(b)) => a == b,
            (Scalar::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}
impl From<i64> for Scalar {
    fn from(i: i64) -> Self { Scalar::Int(i) }
}
impl From<i32> for Scalar {
    fn from(i: i32) -> Self { Scalar::Int(i64::from(i)) }
}
impl From<&str> for Scalar {
    fn from(s: &str) -> Self { Scalar::Str(s.to_owned()) }
}
impl From<&Scalar> for Value {
    fn from(s: &Scalar) -> Self {
        match s {
            Scalar::Int(i) => Value::Int(*i),
            Scalar::Str(s) => Value::Str(s.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    name: String,
    backing: Option<Scalar>,
}

impl Variant {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn backing(&self) -> Option<&Scalar> {
        self.backing.as_ref()
    }
}

/// Explicit table describing an enumeration and its variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    name: String,
    variants: Vec<Variant>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), variants: Vec::new() }
    }
    /// Adds a variant backed by `value`.
    pub fn backed(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.variants.push(Variant { name: name.into(), backing: Some(value.into()) });
        self
    }
    /// Adds a variant without a backing scalar.
    pub fn unit(mut self, name: impl Into<String>) -> Self {
        self.variants.push(Variant { name: name.into(), backing: None });
        self
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }
    /// An enumeration is backed when it has variants and every one of them
    /// carries a scalar.
    pub fn is_backed(&self) -> bool {
        !self.variants.is_empty() && self.variants.iter().all(|v| v.backing.is_some())
    }
    /// Variant whose backing scalar equals `value`.
    pub fn try_from_value(def: &Arc<EnumDef>, value: &Value) -> Option<EnumValue> {
        def.variants
            .iter()
            .position(|v| v.backing.as_ref().is_some_and(|b| b.matches(value)))
            .map(|index| EnumValue { def: Arc::clone(def), index })
    }
    /// Variant by name.
    pub fn variant(def: &Arc<EnumDef>, name: &str) -> Option<EnumValue> {
        def.variants
            .iter()
            .position(|v| v.name == name)
            .map(|index| EnumValue { def: Arc::clone(def), index })
    }
}

/// One variant of an enumeration, as held by a field.
#[derive(Debug, Clone)]
pub struct EnumValue {
    def: Arc<EnumDef>,
    index: usize,
}

impl EnumValue {
    pub fn def(&self) -> &Arc<EnumDef> {
        &self.def
    }
    pub fn enum_name(&self) -> &str {
        self.def.name()
    }
    pub fn name(&self) -> &str {
        self.def.variants[self.index].name()
    }
    pub fn backing(&self) -> Option<&Scalar> {
        self.def.variants[self.index].backing()
    }
    pub fn belongs_to(&self, def: &EnumDef) -> bool {
        *self.def == *def
    }
    pub fn to_plain(&self) -> Value {
        match self.backing() {
            Some(scalar) => Value::from(scalar),
            None => Value::Str(self.name().to_owned()),
        }
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && (Arc::ptr_eq(&self.def, &other.def) || self.def == other.def)
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::{}", self.enum_name(), self.name())
    }
}

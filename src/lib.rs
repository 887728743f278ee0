//! Datashape – declarative construction of validated value objects from loosely-typed data.
//!
//! Datashape takes an associative structure of key/value pairs (an API payload,
//! a config blob) and builds a [`construct::DataObject`] out of it:
//! * Each type declares an explicit, ordered table of [`descriptor::FieldDescriptor`]s
//!   through the [`descriptor::Shape`] trait (no runtime reflection).
//! * Every field may be read from an alternate source key, fall back to a default,
//!   be nullable, and carry [`caster::Caster`]s that coerce the raw value.
//! * Strict types reject input keys no field consumed.
//! * Objects flatten back to plain data with output renaming, `only`/`except`
//!   views and recursive flattening of nested objects.
//!
//! ## Modules
//! * [`datatype`] – The [`datatype::Value`] tagged union, ordered [`datatype::Mapping`]s
//!   and explicit enumeration tables.
//! * [`descriptor`] – Field and type descriptors plus the [`descriptor::Shape`] trait.
//! * [`caster`] – The caster contract, dispatch, and the enum, object and list casters.
//! * [`resolve`] – The [`resolve::FieldResolver`] turning raw input into field values.
//! * [`validate`] – Per-field validators and per-type hooks.
//! * [`construct`] – The constructed [`construct::DataObject`] and its reverse path.
//! * [`registry`] – Per-type descriptor cache.
//! * [`settings`] – Configuration loading and logging setup.
//!
//! ## Construction
//! Construction is all-or-nothing. Fields resolve in declaration order, the
//! first failing caster aborts, unknown keys are rejected for strict types,
//! and validation collects every failing field before reporting.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use datashape::caster::EnumCaster;
//! use datashape::datatype::{EnumDef, Value};
//! use datashape::descriptor::{FieldDescriptor, TypeDescriptor};
//! use datashape::construct::DataObject;
//! use serde_json::json;
//!
//! let status = Arc::new(EnumDef::new("Status").backed("Inactive", 0).backed("Active", 1));
//! let person = Arc::new(
//!     TypeDescriptor::new("Person")
//!         .field(FieldDescriptor::new("name"))
//!         .field(FieldDescriptor::new("age").default_value(0))
//!         .field(FieldDescriptor::new("status").cast_with(EnumCaster::new(&status)))
//!         .strict(),
//! );
//! let ada = DataObject::construct(person, json!({"name": "Ada", "status": 1})).unwrap();
//! assert_eq!(ada.get("status").and_then(Value::as_enum).map(|s| s.name()), Some("Active"));
//! assert_eq!(ada.to_json().unwrap(), json!({"name": "Ada", "age": 0, "status": 1}));
//! ```
//!
//! ## Configuration
//! [`settings::Settings`] are read with the `config` crate from an optional file
//! and `DATASHAPE_*` environment variables. They decide the strictness of types
//! that do not choose one, whether descriptors are cached, and the log filter.
//!
//! ## License
//! Dual licensed under Apache-2.0 and MIT.

pub mod caster;
pub mod construct;
pub mod datatype;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod resolve;
pub mod settings;
pub mod validate;

pub use construct::DataObject;
pub use datatype::{Arguments, Mapping, Value};
pub use descriptor::{FieldDescriptor, Shape, TypeDescriptor};
pub use error::{DatashapeError, Result};

// descriptor tables are kept per type
use std::any::TypeId;
use std::collections::HashMap;
use core::hash::BuildHasherDefault;
use std::sync::{Arc, RwLock};
use seahash::SeaHasher;

use lazy_static::lazy_static;
use tracing::debug;

use crate::descriptor::{Shape, TypeDescriptor};
use crate::settings;

pub type TypeHasher = BuildHasherDefault<SeaHasher>;

lazy_static! {
    static ref DESCRIPTORS: RwLock<HashMap<TypeId, Arc<TypeDescriptor>, TypeHasher>> =
        RwLock::new(HashMap::default());
}

/// Shared descriptor table of `T`.
///
/// Tables are described once and cached when `cache_descriptors` is set.
/// Two threads racing on a cold cache may both describe the type; the first
/// table inserted is the one everybody gets afterwards. A poisoned lock only
/// costs a fresh description.
pub fn descriptor_of<T: Shape + ?Sized>() -> Arc<TypeDescriptor> {
    if !settings::current().cache_descriptors {
        return Arc::new(T::describe());
    }
    let key = TypeId::of::<T>();
    if let Ok(kept) = DESCRIPTORS.read() {
        if let Some(descriptor) = kept.get(&key) {
            return Arc::clone(descriptor);
        }
    }
    let described = Arc::new(T::describe());
    debug!(type_name = described.name(), "descriptor cached");
    match DESCRIPTORS.write() {
        Ok(mut kept) => Arc::clone(kept.entry(key).or_insert(described)),
        Err(_) => described,
    }
}

pub fn is_cached<T: Shape + ?Sized>() -> bool {
    DESCRIPTORS
        .read()
        .map(|kept| kept.contains_key(&TypeId::of::<T>()))
        .unwrap_or(false)
}

pub fn len() -> usize {
    DESCRIPTORS.read().map(|kept| kept.len()).unwrap_or(0)
}

pub fn clear() {
    if let Ok(mut kept) = DESCRIPTORS.write() {
        kept.clear();
    }
}

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::method::RpcMethod;

/// The method registry: name→descriptor, insertion-ordered for listing.
#[derive(Default)]
pub struct Methods {
    entries: IndexMap<String, RpcMethod>,
}

impl Methods {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method. Refuses duplicates: the existing descriptor is
    /// never overwritten.
    pub fn add(&mut self, method: RpcMethod) -> bool {
        let name = method.name().to_string();
        if self.entries.contains_key(&name) {
            warn!(method = %name, "cannot add method: duplicate entry");
            false
        } else {
            debug!(method = %name, "added method");
            self.entries.insert(name, method);
            true
        }
    }

    pub fn delete(&mut self, name: &str) -> bool {
        // shift_remove keeps the listing order of the survivors
        if self.entries.shift_remove(name).is_some() {
            debug!(method = %name, "deleted method");
            true
        } else {
            warn!(method = %name, "cannot delete method: entry not found");
            false
        }
    }

    pub fn get(&self, name: &str) -> Option<&RpcMethod> {
        self.entries.get(name)
    }

    /// All registered descriptors, in registration order.
    pub fn all(&self) -> impl Iterator<Item = &RpcMethod> {
        self.entries.values()
    }

    /// Registered method names, in registration order.
    pub fn list(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

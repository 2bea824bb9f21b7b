use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A protocol extension the server advertises for client negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    #[serde(rename = "specUrl")]
    pub spec_url: String,
    #[serde(rename = "specVersion")]
    pub spec_version: i64,
}

/// The capability catalog: name→spec reference, insertion-ordered.
#[derive(Debug, Default)]
pub struct Capabilities {
    entries: IndexMap<String, Capability>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, spec_url: &str, spec_version: i64) -> bool {
        if self.entries.contains_key(name) {
            warn!(capability = %name, "cannot add capability: duplicate entry");
            false
        } else {
            debug!(capability = %name, "added capability");
            self.entries.insert(
                name.to_string(),
                Capability {
                    spec_url: spec_url.to_string(),
                    spec_version,
                },
            );
            true
        }
    }

    pub fn delete(&mut self, name: &str) -> bool {
        if self.entries.shift_remove(name).is_some() {
            debug!(capability = %name, "deleted capability");
            true
        } else {
            warn!(capability = %name, "cannot delete capability: entry not found");
            false
        }
    }

    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.entries.get(name)
    }

    /// The full catalog, in registration order.
    pub fn all(&self) -> &IndexMap<String, Capability> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup() {
        let mut capabilities = Capabilities::new();
        assert!(capabilities.add("json-rpc", "http://www.jsonrpc.org/specification", 2));
        let capability = capabilities.get("json-rpc").unwrap();
        assert_eq!(capability.spec_version, 2);
        assert!(capabilities.get("soap").is_none());
    }

    #[test]
    fn test_duplicate_and_missing_refused() {
        let mut capabilities = Capabilities::new();
        assert!(capabilities.add("nil", "http://www.ontosys.com/xml-rpc/extensions.php", 1));
        assert!(!capabilities.add("nil", "elsewhere", 9));
        assert_eq!(capabilities.get("nil").unwrap().spec_version, 1);
        assert!(!capabilities.delete("introspection"));
        assert!(capabilities.delete("nil"));
    }

    #[test]
    fn test_wire_member_names() {
        let capability = Capability {
            spec_url: "http://www.xmlrpc.com/spec".to_string(),
            spec_version: 1,
        };
        let encoded = serde_json::to_value(&capability).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({"specUrl": "http://www.xmlrpc.com/spec", "specVersion": 1})
        );
    }
}

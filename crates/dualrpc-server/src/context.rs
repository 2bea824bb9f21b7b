//! The per-call request context: the one value every callback receives.

use indexmap::IndexMap;
use serde_json::Value;

use dualrpc_protocol::RpcProtocol;

use crate::components::{Capabilities, Errors, Methods};

/// Read access to the resolved call parameters and the server's registries,
/// scoped to a single invocation.
///
/// A context is built empty before signature resolution, receives its final
/// parameter map exactly once, and is then handed immutably to the callback.
pub struct RequestContext<'a> {
    parameters: IndexMap<String, Value>,
    capabilities: &'a Capabilities,
    methods: &'a Methods,
    errors: &'a Errors,
    protocol: RpcProtocol,
}

impl<'a> RequestContext<'a> {
    pub fn new(
        capabilities: &'a Capabilities,
        methods: &'a Methods,
        errors: &'a Errors,
        protocol: RpcProtocol,
    ) -> Self {
        Self {
            parameters: IndexMap::new(),
            capabilities,
            methods,
            errors,
            protocol,
        }
    }

    /// Install the resolved name→value parameter map.
    pub(crate) fn set_parameters(&mut self, parameters: IndexMap<String, Value>) {
        self.parameters = parameters;
    }

    /// Get one resolved parameter by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// The full resolved parameter map, in signature declaration order.
    pub fn params(&self) -> &IndexMap<String, Value> {
        &self.parameters
    }

    pub fn methods(&self) -> &Methods {
        self.methods
    }

    pub fn capabilities(&self) -> &Capabilities {
        self.capabilities
    }

    pub fn errors(&self) -> &Errors {
        self.errors
    }

    pub fn protocol(&self) -> RpcProtocol {
        self.protocol
    }
}

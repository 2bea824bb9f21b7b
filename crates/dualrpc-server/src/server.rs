//! The server facade: owns the three registries, wires in the built-in
//! methods, capabilities and error codes, and routes decoded payloads to
//! the matching protocol processor.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use dualrpc_protocol::{JsonResponseBody, RpcProtocol, XmlResponseBody};

use crate::components::{Capabilities, Errors, Methods};
use crate::method::RpcMethod;
use crate::processor::{json, xml};
use crate::{introspection, multicall};

/// A packed response under one of the two protocols, ready for the
/// external codec to encode onto the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RpcResponse {
    Json(JsonResponseBody),
    Xml(XmlResponseBody),
}

/// The RPC server core.
///
/// Construction populates the registries with the five built-in methods
/// (four introspection methods plus `system.multicall`), the built-in
/// capability table and the built-in error table; embedding code then
/// registers its own methods through [`RpcServer::methods_mut`] and hands
/// decoded payloads to [`RpcServer::dispatch`].
pub struct RpcServer {
    capabilities: Capabilities,
    methods: Methods,
    errors: Errors,
    protocol: RpcProtocol,
}

impl RpcServer {
    pub fn new(protocol: RpcProtocol) -> Self {
        let mut server = Self {
            capabilities: Capabilities::new(),
            methods: Methods::new(),
            errors: Errors::new(),
            protocol,
        };
        server.register_builtin_methods();
        server.register_builtin_capabilities();
        server.register_builtin_errors();
        debug!(%protocol, "RPC server init complete");
        server
    }

    pub fn protocol(&self) -> RpcProtocol {
        self.protocol
    }

    pub fn set_protocol(&mut self, protocol: RpcProtocol) {
        self.protocol = protocol;
    }

    pub fn methods(&self) -> &Methods {
        &self.methods
    }

    pub fn methods_mut(&mut self) -> &mut Methods {
        &mut self.methods
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn capabilities_mut(&mut self) -> &mut Capabilities {
        &mut self.capabilities
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut Errors {
        &mut self.errors
    }

    /// Serve one decoded payload under the active protocol.
    ///
    /// JSON yields `None` when the payload consisted only of notifications;
    /// XML always yields a body, packing a pipeline fault as
    /// `{faultCode, faultString}`.
    pub fn dispatch(&self, payload: &Value) -> Option<RpcResponse> {
        debug!(protocol = %self.protocol, "start serving request");
        match self.protocol {
            RpcProtocol::Json => {
                json::process(payload, &self.methods, &self.capabilities, &self.errors)
                    .map(RpcResponse::Json)
            }
            RpcProtocol::Xml => {
                let body = match xml::process(
                    payload,
                    &self.methods,
                    &self.capabilities,
                    &self.errors,
                ) {
                    Ok(result) => XmlResponseBody::Success(result),
                    Err(fault) => XmlResponseBody::Fault((&fault).into()),
                };
                Some(RpcResponse::Xml(body))
            }
        }
    }

    fn register_builtin_methods(&mut self) {
        let builtins = [
            RpcMethod::builder("system.getCapabilities", introspection::get_capabilities)
                .describe(
                    "This method lists all the capabilities that the RPC server has: \
                     the (more or less standard) extensions to the RPC spec that it adheres to",
                )
                .returns("struct"),
            RpcMethod::builder("system.listMethods", introspection::list_methods)
                .describe("This method lists all the methods that the RPC server knows how to dispatch")
                .returns("array"),
            RpcMethod::builder("system.methodHelp", introspection::method_help)
                .describe(
                    "Returns help text if defined for the method passed, \
                     otherwise returns an empty string",
                )
                .returns("string")
                .param("string", "method"),
            RpcMethod::builder("system.methodSignature", introspection::method_signature)
                .describe(
                    "Returns an array of known signatures (an array of arrays) for the method \
                     name passed. If no signatures are known, returns a none-array \
                     (test for type != array to detect missing signature)",
                )
                .returns("array")
                .param("string", "method"),
            RpcMethod::builder(multicall::METHOD_NAME, multicall::execute)
                .describe(
                    "Boxcar multiple RPC calls in one request. \
                     See http://www.xmlrpc.com/discuss/msgReader$1208 for details",
                )
                .returns("array")
                .param("array", "requests"),
        ];
        for builder in builtins {
            match builder.build() {
                Ok(method) => {
                    self.methods.add(method);
                }
                Err(declaration_error) => {
                    warn!(error = %declaration_error, "refusing malformed built-in method");
                }
            }
        }
    }

    fn register_builtin_capabilities(&mut self) {
        let supported = [
            ("xmlrpc", "http://www.xmlrpc.com/spec", 1),
            (
                "system.multicall",
                "http://www.xmlrpc.com/discuss/msgReader$1208",
                1,
            ),
            (
                "introspection",
                "http://phpxmlrpc.sourceforge.net/doc-2/ch10.html",
                2,
            ),
            ("nil", "http://www.ontosys.com/xml-rpc/extensions.php", 1),
            (
                "faults_interop",
                "http://xmlrpc-epi.sourceforge.net/specs/rfc.fault_codes.php",
                20010516,
            ),
            ("json-rpc", "http://www.jsonrpc.org/specification", 2),
        ];
        for (name, spec_url, spec_version) in supported {
            self.capabilities.add(name, spec_url, spec_version);
        }
    }

    fn register_builtin_errors(&mut self) {
        let std_rpc_errors = [
            (-32700, "Parse error"),
            (-32701, "Parse error - Unsupported encoding"),
            (-32702, "Parse error - Invalid character for encoding"),
            (-32600, "Invalid Request"),
            (-32601, "Method not found"),
            (-32602, "Invalid params"),
            (-32603, "Internal error"),
            (-32500, "Application error"),
            (-32400, "System error"),
            (-32300, "Transport error"),
            // Reserved multicall protocol violations
            (-31000, "Multicall is available only in XMLRPC"),
            (-31001, "Recursive system.multicall forbidden"),
        ];
        for (code, message) in std_rpc_errors {
            self.errors.add(code, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_populated() {
        let server = RpcServer::new(RpcProtocol::Xml);
        // every built-in must survive registration, in declaration order
        assert_eq!(
            server.methods().list(),
            vec![
                "system.getCapabilities",
                "system.listMethods",
                "system.methodHelp",
                "system.methodSignature",
                "system.multicall",
            ]
        );
        assert_eq!(server.capabilities().len(), 6);
        assert_eq!(server.errors().len(), 12);
        assert_eq!(server.errors().get(-31001), "Recursive system.multicall forbidden");
    }

    #[test]
    fn test_protocol_switch() {
        let mut server = RpcServer::new(RpcProtocol::Json);
        assert_eq!(server.protocol(), RpcProtocol::Json);
        server.set_protocol(RpcProtocol::Xml);
        assert_eq!(server.protocol(), RpcProtocol::Xml);
    }
}

//! # dualrpc protocol types
//!
//! Wire-level value model shared by the JSON-RPC 2.0 and XML-RPC dispatch
//! pipelines. This crate carries no dispatch logic: it defines the request
//! and response envelopes, the request-id and version types, the closed
//! declared-type vocabulary with value validation, and the protocol fault
//! type with the built-in error-code constants.
//!
//! Decoding raw wire bytes into a [`serde_json::Value`] tree (and encoding
//! the packed response back out) is the business of an external codec; this
//! crate starts where the decoded payload ends.

pub mod fault;
pub mod request;
pub mod response;
pub mod types;
pub mod value_type;

// Re-export main types
pub use fault::{ProtocolError, RpcFault};
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{
    JsonResponseBody, JsonRpcError, JsonRpcErrorObject, JsonRpcMessage, JsonRpcResponse, XmlFault,
    XmlResponseBody,
};
pub use types::{JsonRpcVersion, RequestId, RpcProtocol};
pub use value_type::RpcType;

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Built-in RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const UNSUPPORTED_ENCODING: i64 = -32701;
    pub const INVALID_CHARACTER: i64 = -32702;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const APPLICATION_ERROR: i64 = -32500;
    pub const SYSTEM_ERROR: i64 = -32400;
    pub const TRANSPORT_ERROR: i64 = -32300;

    // Reserved multicall protocol violations
    pub const MULTICALL_WRONG_PROTOCOL: i64 = -31000;
    pub const MULTICALL_RECURSION: i64 = -31001;

    // Implementation-defined server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}

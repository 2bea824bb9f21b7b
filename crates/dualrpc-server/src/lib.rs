//! # dualrpc server core
//!
//! A transport-agnostic RPC dispatch core serving two wire protocols:
//! JSON-RPC 2.0 (including batch requests and notifications) and XML-RPC
//! (including `system.multicall` boxcarring). The server owns a method
//! registry with per-method overloaded signatures, a capability catalog and
//! an error catalog; an external codec turns wire bytes into decoded
//! [`serde_json::Value`] payloads and packed responses back into bytes.
//!
//! ```rust
//! use dualrpc_server::{RpcMethod, RpcServer};
//! use dualrpc_protocol::RpcProtocol;
//! use serde_json::json;
//!
//! let mut server = RpcServer::new(RpcProtocol::Json);
//! let sum = RpcMethod::builder("test.sum", |ctx, _| {
//!     let a = ctx.get("a").and_then(|v| v.as_i64()).unwrap_or(0);
//!     let b = ctx.get("b").and_then(|v| v.as_i64()).unwrap_or(0);
//!     Ok(json!(a + b))
//! })
//! .describe("Sum two integers")
//! .returns("int")
//! .param("int", "a")
//! .param("int", "b")
//! .build()
//! .unwrap();
//! assert!(server.methods_mut().add(sum));
//!
//! let payload = json!({"jsonrpc": "2.0", "method": "test.sum", "params": [2, 2], "id": 1});
//! let response = server.dispatch(&payload).unwrap();
//! let body = serde_json::to_value(&response).unwrap();
//! assert_eq!(body["result"], json!(4));
//! ```

pub mod components;
pub mod context;
pub mod introspection;
pub mod method;
pub mod multicall;
pub mod processor;
pub mod server;

pub use components::{Capabilities, Capability, Errors, Methods};
pub use context::RequestContext;
pub use method::{MethodBuilder, MethodError, RpcCallback, RpcMethod, Signature};
pub use server::{RpcResponse, RpcServer};

// Re-export the protocol surface callers interact with.
pub use dualrpc_protocol::{error_codes, RequestParams, RpcFault, RpcProtocol, RpcType};

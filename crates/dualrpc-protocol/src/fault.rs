use std::fmt;

use thiserror::Error;

use crate::error_codes;

/// A protocol fault: an error code plus a caller-visible message.
///
/// This is what callbacks return to signal a deliberate, protocol-shaped
/// failure; the dispatch pipeline passes it through unchanged. Anything the
/// pipeline intercepts itself (unknown method, unmatched signature, panic
/// during invocation) is also expressed as one of these before it reaches
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcFault {
    pub code: i64,
    pub message: String,
}

impl RpcFault {
    pub fn custom(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse_error() -> Self {
        Self::custom(error_codes::PARSE_ERROR, "Parse error")
    }

    pub fn invalid_request() -> Self {
        Self::custom(error_codes::INVALID_REQUEST, "Invalid Request")
    }

    pub fn method_not_found() -> Self {
        Self::custom(error_codes::METHOD_NOT_FOUND, "Method not found")
    }

    pub fn invalid_params() -> Self {
        Self::custom(error_codes::INVALID_PARAMS, "Invalid params")
    }

    pub fn internal_error() -> Self {
        Self::custom(error_codes::INTERNAL_ERROR, "Internal error")
    }

    pub fn application_error(message: impl Into<String>) -> Self {
        Self::custom(error_codes::APPLICATION_ERROR, message)
    }
}

impl fmt::Display for RpcFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcFault {}

/// Errors raised by the protocol surface itself, outside any dispatch.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid or unsupported RPC protocol: {0}")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_constructors() {
        assert_eq!(RpcFault::parse_error().code, -32700);
        assert_eq!(RpcFault::invalid_request().code, -32600);
        assert_eq!(RpcFault::method_not_found().code, -32601);
        assert_eq!(RpcFault::invalid_params().code, -32602);
        assert_eq!(RpcFault::internal_error().code, -32603);
        assert_eq!(RpcFault::application_error("boom").code, -32500);
    }

    #[test]
    fn test_display() {
        let fault = RpcFault::method_not_found();
        assert_eq!(fault.to_string(), "-32601: Method not found");
    }
}

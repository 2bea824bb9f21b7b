use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fault::ProtocolError;

/// The two wire protocols the dispatch core understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcProtocol {
    /// JSON-RPC 2.0
    Json,
    /// XML-RPC
    Xml,
}

impl RpcProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcProtocol::Json => "json",
            RpcProtocol::Xml => "xml",
        }
    }
}

impl fmt::Display for RpcProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RpcProtocol {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(RpcProtocol::Json),
            "xml" => Ok(RpcProtocol::Xml),
            other => Err(ProtocolError::Unsupported(other.to_string())),
        }
    }
}

/// JSON-RPC protocol version. Deserialization accepts the literal `"2.0"`
/// and nothing else, so a wrong version fails envelope validation upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JsonRpcVersion {
    #[serde(rename = "2.0")]
    V2_0,
}

impl Default for JsonRpcVersion {
    fn default() -> Self {
        JsonRpcVersion::V2_0
    }
}

impl fmt::Display for JsonRpcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("2.0")
    }
}

/// A JSON-RPC request id. A request carrying no id is a notification and
/// produces no response entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fault::RpcFault;
use crate::types::{JsonRpcVersion, RequestId};

/// A successful JSON-RPC response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub result: Value,
    pub id: RequestId,
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            result,
            id,
        }
    }
}

/// The `error` member of a JSON-RPC error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// A JSON-RPC error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub error: JsonRpcErrorObject,
    pub id: RequestId,
}

impl JsonRpcError {
    pub fn new(id: RequestId, fault: &RpcFault) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            error: JsonRpcErrorObject {
                code: fault.code,
                message: fault.message.clone(),
            },
            id,
        }
    }
}

/// One packed JSON-RPC response entry, success or fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Response(JsonRpcResponse),
    Error(JsonRpcError),
}

impl JsonRpcMessage {
    pub fn success(id: RequestId, result: Value) -> Self {
        JsonRpcMessage::Response(JsonRpcResponse::new(id, result))
    }

    pub fn fault(id: RequestId, fault: &RpcFault) -> Self {
        JsonRpcMessage::Error(JsonRpcError::new(id, fault))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcMessage::Error(_))
    }

    pub fn id(&self) -> &RequestId {
        match self {
            JsonRpcMessage::Response(response) => &response.id,
            JsonRpcMessage::Error(error) => &error.id,
        }
    }
}

/// The body of a JSON-RPC reply: one entry for a single request, a list for
/// a batch. A request producing no entries at all (only notifications) has
/// no body, which callers express as `Option<JsonResponseBody>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonResponseBody {
    Single(JsonRpcMessage),
    Batch(Vec<JsonRpcMessage>),
}

/// An XML-RPC fault, packed with the wire's exact member names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XmlFault {
    #[serde(rename = "faultCode")]
    pub fault_code: i64,
    #[serde(rename = "faultString")]
    pub fault_string: String,
}

impl From<&RpcFault> for XmlFault {
    fn from(fault: &RpcFault) -> Self {
        Self {
            fault_code: fault.code,
            fault_string: fault.message.clone(),
        }
    }
}

/// The body of an XML-RPC reply: the bare result value on success, a
/// `{faultCode, faultString}` struct on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XmlResponseBody {
    Fault(XmlFault),
    Success(Value),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let message = JsonRpcMessage::success(RequestId::Number(1), json!(4));
        let encoded = serde_json::to_value(&message).unwrap();
        assert_eq!(encoded, json!({"jsonrpc": "2.0", "result": 4, "id": 1}));
    }

    #[test]
    fn test_fault_shape() {
        let fault = RpcFault::method_not_found();
        let message = JsonRpcMessage::fault(RequestId::String("a".into()), &fault);
        let encoded = serde_json::to_value(&message).unwrap();
        assert_eq!(
            encoded,
            json!({
                "jsonrpc": "2.0",
                "error": {"code": -32601, "message": "Method not found"},
                "id": "a"
            })
        );
    }

    #[test]
    fn test_xml_fault_member_names() {
        let fault = RpcFault::custom(-31001, "Recursive system.multicall forbidden");
        let encoded = serde_json::to_value(XmlFault::from(&fault)).unwrap();
        assert_eq!(
            encoded,
            json!({"faultCode": -31001, "faultString": "Recursive system.multicall forbidden"})
        );
    }

    #[test]
    fn test_batch_body_serializes_as_list() {
        let body = JsonResponseBody::Batch(vec![
            JsonRpcMessage::success(RequestId::Number(1), json!(1)),
            JsonRpcMessage::success(RequestId::Number(2), json!(2)),
        ]);
        let encoded = serde_json::to_value(&body).unwrap();
        assert!(encoded.is_array());
        assert_eq!(encoded.as_array().unwrap().len(), 2);
    }
}

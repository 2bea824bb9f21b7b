//! The JSON-RPC 2.0 processor: batch/single normalization, envelope
//! validation with id salvage, dispatch and response assembly.

use serde_json::Value;
use tracing::{debug, warn};

use dualrpc_protocol::{
    JsonResponseBody, JsonRpcMessage, JsonRpcRequest, RequestId, RequestParams, RpcFault,
    RpcProtocol,
};

use crate::components::{Capabilities, Errors, Methods};
use crate::processor::dispatch_call;

/// One normalized entry of a JSON-RPC payload.
enum CallRecord {
    Call {
        method: String,
        params: RequestParams,
        id: Option<RequestId>,
    },
    /// Envelope violation; carries whatever id could be salvaged.
    Invalid { id: Option<RequestId> },
}

/// Run one decoded JSON-RPC payload to completion.
///
/// A top-level list is a batch; every record is served in order and sibling
/// records are unaffected by each other's faults. Records without an id are
/// notifications and produce no output entry; a payload producing no
/// entries at all yields `None` (no response body).
pub fn process(
    payload: &Value,
    methods: &Methods,
    capabilities: &Capabilities,
    errors: &Errors,
) -> Option<JsonResponseBody> {
    debug!("starting JSON processor");

    let (is_batch, records) = normalize_payload(payload);

    let mut results = Vec::new();
    for record in records {
        match record {
            CallRecord::Invalid { id } => {
                warn!(id = ?id, "invalid request");
                if let Some(id) = id {
                    results.push(JsonRpcMessage::fault(id, &RpcFault::invalid_request()));
                }
            }
            CallRecord::Call { method, params, id } => {
                debug!(method = %method, id = ?id, "serving request");
                let outcome = dispatch_call(
                    methods,
                    capabilities,
                    errors,
                    RpcProtocol::Json,
                    &method,
                    &params,
                );
                if let Some(id) = id {
                    results.push(match outcome {
                        Ok(result) => JsonRpcMessage::success(id, result),
                        Err(fault) => {
                            warn!(method = %method, %fault, "error handling request");
                            JsonRpcMessage::fault(id, &fault)
                        }
                    });
                } else if let Err(fault) = outcome {
                    // notification faults are swallowed by contract
                    debug!(method = %method, %fault, "notification failed");
                }
            }
        }
    }

    if results.is_empty() {
        None
    } else if is_batch {
        Some(JsonResponseBody::Batch(results))
    } else {
        Some(JsonResponseBody::Single(results.remove(0)))
    }
}

fn normalize_payload(payload: &Value) -> (bool, Vec<CallRecord>) {
    match payload {
        Value::Array(entries) => (true, entries.iter().map(normalize_record).collect()),
        single => (false, vec![normalize_record(single)]),
    }
}

fn normalize_record(raw: &Value) -> CallRecord {
    match serde_json::from_value::<JsonRpcRequest>(raw.clone()) {
        Ok(request) if !request.method.is_empty() => CallRecord::Call {
            method: request.method,
            params: request.params.unwrap_or_else(RequestParams::empty),
            id: request.id,
        },
        Ok(request) => CallRecord::Invalid { id: request.id },
        Err(_) => CallRecord::Invalid {
            id: salvage_id(raw),
        },
    }
}

// Pull a usable id out of a record that failed envelope validation, so the
// fault can still be correlated by the caller.
fn salvage_id(raw: &Value) -> Option<RequestId> {
    raw.get("id")
        .and_then(|id| serde_json::from_value(id.clone()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::method::RpcMethod;

    fn registry() -> (Methods, Capabilities, Errors) {
        let mut methods = Methods::new();
        methods.add(
            RpcMethod::builder("test.echo", |ctx, _| {
                Ok(ctx.get("value").cloned().unwrap_or(Value::Null))
            })
            .returns("string")
            .param("string", "value")
            .build()
            .unwrap(),
        );
        (methods, Capabilities::new(), Errors::new())
    }

    fn run(payload: Value) -> Option<Value> {
        let (methods, capabilities, errors) = registry();
        process(&payload, &methods, &capabilities, &errors)
            .map(|body| serde_json::to_value(body).unwrap())
    }

    #[test]
    fn test_single_request() {
        let response = run(json!({
            "jsonrpc": "2.0", "method": "test.echo", "params": ["hello"], "id": 1
        }))
        .unwrap();
        assert_eq!(response, json!({"jsonrpc": "2.0", "result": "hello", "id": 1}));
    }

    #[test]
    fn test_notification_produces_no_body() {
        let response = run(json!({
            "jsonrpc": "2.0", "method": "test.echo", "params": ["quiet"]
        }));
        assert!(response.is_none());
    }

    #[test]
    fn test_missing_envelope_salvages_id() {
        let response = run(json!({"method": "test.echo", "id": 9})).unwrap();
        assert_eq!(response["error"]["code"], json!(-32600));
        assert_eq!(response["id"], json!(9));
    }

    #[test]
    fn test_wrong_version_is_invalid_request() {
        let response = run(json!({
            "jsonrpc": "1.0", "method": "test.echo", "id": "v1"
        }))
        .unwrap();
        assert_eq!(response["error"]["code"], json!(-32600));
        assert_eq!(response["id"], json!("v1"));
    }

    #[test]
    fn test_invalid_record_without_id_is_silent() {
        let response = run(json!({"method": "test.echo"}));
        assert!(response.is_none());
    }

    #[test]
    fn test_batch_preserves_order_and_skips_notifications() {
        let response = run(json!([
            {"jsonrpc": "2.0", "method": "test.echo", "params": ["one"], "id": 1},
            {"jsonrpc": "2.0", "method": "test.echo", "params": ["dropped"]},
            {"jsonrpc": "2.0", "method": "test.ghost", "id": 2},
            {"jsonrpc": "2.0", "method": "test.echo", "params": ["three"], "id": 3}
        ]))
        .unwrap();

        let entries = response.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["result"], json!("one"));
        assert_eq!(entries[1]["error"]["code"], json!(-32601));
        assert_eq!(entries[1]["id"], json!(2));
        assert_eq!(entries[2]["result"], json!("three"));
    }

    #[test]
    fn test_batch_of_notifications_yields_no_body() {
        let response = run(json!([
            {"jsonrpc": "2.0", "method": "test.echo", "params": ["a"]},
            {"jsonrpc": "2.0", "method": "test.echo", "params": ["b"]}
        ]));
        assert!(response.is_none());
    }

    #[test]
    fn test_single_entry_batch_stays_a_list() {
        let response = run(json!([
            {"jsonrpc": "2.0", "method": "test.echo", "params": ["only"], "id": 1}
        ]))
        .unwrap();
        assert!(response.is_array());
        assert_eq!(response.as_array().unwrap().len(), 1);
    }
}

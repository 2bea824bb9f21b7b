//! The XML-RPC processor: exactly one call per payload, with the
//! boxcarred-list shorthand rewritten into a `system.multicall` invocation.

use serde_json::Value;
use tracing::{debug, warn};

use dualrpc_protocol::{RequestParams, RpcFault, RpcProtocol};

use crate::components::{Capabilities, Errors, Methods};
use crate::multicall;
use crate::processor::dispatch_call;

/// Run one decoded XML-RPC payload (`[methodName, positionalParams]`) to
/// completion. The caller packs an `Err` as `{faultCode, faultString}`.
pub fn process(
    payload: &Value,
    methods: &Methods,
    capabilities: &Capabilities,
    errors: &Errors,
) -> Result<Value, RpcFault> {
    debug!("starting XML processor");

    let (method, params) = preprocess(payload)?;
    debug!(method = %method, "serving request");

    dispatch_call(
        methods,
        capabilities,
        errors,
        RpcProtocol::Xml,
        &method,
        &RequestParams::Array(params),
    )
    .inspect_err(|fault| warn!(method = %method, %fault, "error handling request"))
}

// A payload whose first element is itself a list is the boxcarred
// shorthand: the whole payload becomes the single `requests` argument of a
// system.multicall invocation.
fn preprocess(payload: &Value) -> Result<(String, Vec<Value>), RpcFault> {
    let entries = payload.as_array().ok_or_else(RpcFault::invalid_request)?;
    let first = entries.first().ok_or_else(RpcFault::invalid_request)?;

    if first.is_array() {
        return Ok((
            multicall::METHOD_NAME.to_string(),
            vec![Value::Array(entries.clone())],
        ));
    }

    let method = match first.as_str() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(RpcFault::invalid_request()),
    };
    let params = entries
        .get(1)
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(RpcFault::invalid_request)?;

    Ok((method, params))
}

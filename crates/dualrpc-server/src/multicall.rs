//! The reserved `system.multicall` method: boxcarred XML-RPC calls with
//! per-slot fault isolation.
//!
//! Available only under the XML protocol; JSON-RPC 2.0 callers are expected
//! to use batch requests instead.

use serde_json::{json, Value};

use dualrpc_protocol::{error_codes, RequestParams, RpcFault, RpcProtocol};

use crate::context::RequestContext;
use crate::processor::dispatch_call;

/// The reserved method name entries must not call back into.
pub const METHOD_NAME: &str = "system.multicall";

/// Callback for `system.multicall(array requests) -> array`.
///
/// Each entry of `requests` is a `[methodName, positionalParams]` pair.
/// Every entry gets a fresh context over the same registries and yields
/// either its result or a packed `{faultCode, faultString}` slot; a failing
/// entry never aborts its siblings, and output order equals input order.
pub(crate) fn execute(ctx: &RequestContext<'_>, _args: &[Value]) -> Result<Value, RpcFault> {
    if ctx.protocol() != RpcProtocol::Xml {
        return Err(RpcFault::custom(
            error_codes::MULTICALL_WRONG_PROTOCOL,
            ctx.errors().get(error_codes::MULTICALL_WRONG_PROTOCOL),
        ));
    }

    let boxcarred = ctx
        .get("requests")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let results = boxcarred
        .iter()
        .map(|request| single_call(request, ctx))
        .collect();

    Ok(Value::Array(results))
}

fn single_call(request: &Value, ctx: &RequestContext<'_>) -> Value {
    let pair = request.as_array();
    let (name, params) = match pair.map(|p| (p.first(), p.get(1))) {
        Some((Some(name), Some(params))) => (name, params),
        _ => return packed_fault(ctx, error_codes::INVALID_REQUEST),
    };

    let name = match name.as_str() {
        Some(name) => name,
        None => return packed_fault(ctx, error_codes::INVALID_REQUEST),
    };
    if name == METHOD_NAME {
        return packed_fault(ctx, error_codes::MULTICALL_RECURSION);
    }

    let params = match params.as_array() {
        Some(list) => RequestParams::Array(list.clone()),
        None => return packed_fault(ctx, error_codes::INVALID_REQUEST),
    };

    match dispatch_call(
        ctx.methods(),
        ctx.capabilities(),
        ctx.errors(),
        RpcProtocol::Xml,
        name,
        &params,
    ) {
        Ok(result) => result,
        Err(fault) => json!({"faultCode": fault.code, "faultString": fault.message}),
    }
}

// Pack a fault slot with the catalog's message for the code.
fn packed_fault(ctx: &RequestContext<'_>, code: i64) -> Value {
    json!({"faultCode": code, "faultString": ctx.errors().get(code)})
}

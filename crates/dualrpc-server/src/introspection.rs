//! The built-in introspection methods, registered at server construction
//! like any other method.

use serde_json::{json, Value};

use dualrpc_protocol::RpcFault;

use crate::context::RequestContext;
use crate::method::RpcMethod;

/// `system.listMethods() -> array`: every registered method name, in
/// registration order.
pub(crate) fn list_methods(ctx: &RequestContext<'_>, _args: &[Value]) -> Result<Value, RpcFault> {
    Ok(json!(ctx.methods().list()))
}

/// `system.methodHelp(string method) -> string`: the method's description,
/// or an empty string if none was set.
pub(crate) fn method_help(ctx: &RequestContext<'_>, _args: &[Value]) -> Result<Value, RpcFault> {
    let method = asked_method(ctx)?;
    Ok(json!(method.description().unwrap_or("")))
}

/// `system.methodSignature(string method) -> array`: the compact signature
/// list; a method with exactly one signature returns it flat.
pub(crate) fn method_signature(
    ctx: &RequestContext<'_>,
    _args: &[Value],
) -> Result<Value, RpcFault> {
    let method = asked_method(ctx)?;
    let signatures = method.signatures_compact();
    if signatures.len() == 1 {
        Ok(json!(signatures[0]))
    } else {
        Ok(json!(signatures))
    }
}

/// `system.getCapabilities() -> struct`: the full capability catalog.
pub(crate) fn get_capabilities(
    ctx: &RequestContext<'_>,
    _args: &[Value],
) -> Result<Value, RpcFault> {
    Ok(json!(ctx.capabilities().all()))
}

fn asked_method<'a>(ctx: &'a RequestContext<'_>) -> Result<&'a RpcMethod, RpcFault> {
    ctx.get("method")
        .and_then(Value::as_str)
        .and_then(|name| ctx.methods().get(name))
        .ok_or_else(RpcFault::method_not_found)
}

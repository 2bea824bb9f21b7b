//! The dispatch pipeline shared by both protocol processors: method lookup,
//! overload resolution, positional-to-named remapping and the guarded
//! callback invocation.

pub mod json;
pub mod xml;

use std::panic::{self, AssertUnwindSafe};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::error;

use dualrpc_protocol::{RequestParams, RpcFault, RpcProtocol};

use crate::components::{Capabilities, Errors, Methods};
use crate::context::RequestContext;
use crate::method::{RpcMethod, Signature};

/// Resolve and run one call against the registries: lookup, signature
/// selection, parameter remapping, guarded invocation.
pub(crate) fn dispatch_call(
    methods: &Methods,
    capabilities: &Capabilities,
    errors: &Errors,
    protocol: RpcProtocol,
    method_name: &str,
    params: &RequestParams,
) -> Result<Value, RpcFault> {
    let method = methods
        .get(method_name)
        .ok_or_else(RpcFault::method_not_found)?;

    let signature = select_signature(method, params).ok_or_else(RpcFault::invalid_params)?;
    let resolved = resolve_parameters(signature, params);

    let mut context = RequestContext::new(capabilities, methods, errors, protocol);
    context.set_parameters(resolved);

    invoke(method, &context)
}

/// Pick the first signature, in declaration order, the provided parameters
/// satisfy.
///
/// Named parameters match when every provided key is declared and its value
/// validates against the declared type; positional parameters match when
/// the counts are equal and every value validates positionally. Both
/// protocols share this policy.
fn select_signature<'a>(method: &'a RpcMethod, params: &RequestParams) -> Option<&'a Signature> {
    method
        .signatures()
        .map(|(_, signature)| signature)
        .find(|signature| signature_matches(signature, params))
}

fn signature_matches(signature: &Signature, params: &RequestParams) -> bool {
    let declared = signature.parameters();
    match params {
        RequestParams::Object(provided) => provided.iter().all(|(name, value)| {
            declared
                .get(name)
                .is_some_and(|declared_type| declared_type.validates(value))
        }),
        RequestParams::Array(provided) => {
            provided.len() == declared.len()
                && provided
                    .iter()
                    .zip(declared.values())
                    .all(|(value, declared_type)| declared_type.validates(value))
        }
    }
}

/// Produce the name→value map installed into the context: positional values
/// are mapped onto the winning signature's names in declared order, named
/// maps are taken as provided.
fn resolve_parameters(signature: &Signature, params: &RequestParams) -> IndexMap<String, Value> {
    match params {
        RequestParams::Object(provided) => provided.clone(),
        RequestParams::Array(provided) => signature
            .parameters()
            .keys()
            .cloned()
            .zip(provided.iter().cloned())
            .collect(),
    }
}

/// Invoke the callback behind a panic boundary. A fault returned by the
/// callback propagates unchanged; a panic is logged with its origin and
/// collapsed to a generic internal error so no detail reaches the caller.
fn invoke(method: &RpcMethod, context: &RequestContext<'_>) -> Result<Value, RpcFault> {
    let callback = method.callback();
    match panic::catch_unwind(AssertUnwindSafe(|| callback(context, method.arguments()))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            error!(
                method = method.name(),
                panic = %panic_origin(payload.as_ref()),
                "callback panicked during invocation"
            );
            Err(RpcFault::internal_error())
        }
    }
}

fn panic_origin(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "opaque panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::method::RpcMethod;

    struct Fixture {
        methods: Methods,
        capabilities: Capabilities,
        errors: Errors,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                methods: Methods::new(),
                capabilities: Capabilities::new(),
                errors: Errors::new(),
            }
        }

        fn dispatch(&self, name: &str, params: RequestParams) -> Result<Value, RpcFault> {
            dispatch_call(
                &self.methods,
                &self.capabilities,
                &self.errors,
                RpcProtocol::Json,
                name,
                &params,
            )
        }
    }

    fn sum() -> RpcMethod {
        RpcMethod::builder("test.sum", |ctx, _| {
            let a = ctx.get("a").and_then(Value::as_i64).unwrap_or(0);
            let b = ctx.get("b").and_then(Value::as_i64).unwrap_or(0);
            Ok(json!(a + b))
        })
        .returns("int")
        .param("int", "a")
        .param("int", "b")
        .build()
        .unwrap()
    }

    #[test]
    fn test_unknown_method_faults() {
        let fixture = Fixture::new();
        let fault = fixture
            .dispatch("test.ghost", RequestParams::empty())
            .unwrap_err();
        assert_eq!(fault.code, -32601);
    }

    #[test]
    fn test_positional_dispatch() {
        let mut fixture = Fixture::new();
        fixture.methods.add(sum());
        let result = fixture
            .dispatch("test.sum", RequestParams::Array(vec![json!(2), json!(2)]))
            .unwrap();
        assert_eq!(result, json!(4));
    }

    #[test]
    fn test_arity_mismatch_faults() {
        let mut fixture = Fixture::new();
        fixture.methods.add(sum());
        let fault = fixture
            .dispatch("test.sum", RequestParams::Array(vec![json!(2)]))
            .unwrap_err();
        assert_eq!(fault.code, -32602);
    }

    #[test]
    fn test_type_mismatch_faults() {
        let mut fixture = Fixture::new();
        fixture.methods.add(sum());
        let fault = fixture
            .dispatch(
                "test.sum",
                RequestParams::Array(vec![json!("two"), json!(2)]),
            )
            .unwrap_err();
        assert_eq!(fault.code, -32602);
    }

    #[test]
    fn test_named_params_installed_as_provided() {
        let mut fixture = Fixture::new();
        fixture.methods.add(sum());
        let mut named = IndexMap::new();
        named.insert("b".to_string(), json!(5));
        let result = fixture
            .dispatch("test.sum", RequestParams::Object(named))
            .unwrap();
        // subset of declared names is a valid named call
        assert_eq!(result, json!(5));
    }

    #[test]
    fn test_first_matching_signature_wins() {
        let mut fixture = Fixture::new();
        let method = RpcMethod::builder("test.echo", |ctx, _| {
            Ok(json!(ctx.params().keys().cloned().collect::<Vec<_>>()))
        })
        .param("int", "first")
        .signature()
        .param("int", "second")
        .build()
        .unwrap();
        fixture.methods.add(method);

        let result = fixture
            .dispatch("test.echo", RequestParams::Array(vec![json!(1)]))
            .unwrap();
        assert_eq!(result, json!(["first"]));
    }

    #[test]
    fn test_bound_arguments_forwarded() {
        let mut fixture = Fixture::new();
        let method = RpcMethod::builder("test.bound", |_, args| Ok(json!(args)))
            .bind(vec![json!("salt"), json!(7)])
            .build()
            .unwrap();
        fixture.methods.add(method);

        let result = fixture
            .dispatch("test.bound", RequestParams::empty())
            .unwrap();
        assert_eq!(result, json!(["salt", 7]));
    }

    #[test]
    fn test_callback_fault_passes_through() {
        let mut fixture = Fixture::new();
        let method = RpcMethod::new("test.fail", |_, _| {
            Err(RpcFault::application_error("deliberate"))
        })
        .unwrap();
        fixture.methods.add(method);

        let fault = fixture
            .dispatch("test.fail", RequestParams::empty())
            .unwrap_err();
        assert_eq!(fault.code, -32500);
        assert_eq!(fault.message, "deliberate");
    }

    #[test]
    fn test_panic_collapses_to_internal_error() {
        let mut fixture = Fixture::new();
        let method =
            RpcMethod::new("test.panic", |_, _| panic!("boom: secret detail")).unwrap();
        fixture.methods.add(method);

        let fault = fixture
            .dispatch("test.panic", RequestParams::empty())
            .unwrap_err();
        assert_eq!(fault.code, -32603);
        assert_eq!(fault.message, "Internal error");
    }
}

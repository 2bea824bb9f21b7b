//! Method descriptors: a named callback plus one or more declared
//! signatures, the unit the registry stores and the dispatch pipeline
//! resolves against.

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use dualrpc_protocol::{RpcFault, RpcType};

use crate::context::RequestContext;

/// The callable bound to a method: invoked with the per-call context and
/// the extra arguments bound at registration time.
pub type RpcCallback =
    Arc<dyn Fn(&RequestContext<'_>, &[Value]) -> Result<Value, RpcFault> + Send + Sync>;

/// Errors raised while declaring a method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MethodError {
    #[error("invalid or undefined method name")]
    EmptyName,
    #[error("invalid declared type `{0}`")]
    UnknownType(String),
    #[error("missing parameter name")]
    EmptyParameterName,
    #[error("invalid signature reference {0}")]
    InvalidSignature(usize),
    #[error("cannot find parameter `{0}`")]
    UnknownParameter(String),
}

/// One alternative a method accepts: an ordered parameter-name→type mapping
/// plus a return type.
#[derive(Debug, Clone)]
pub struct Signature {
    parameters: IndexMap<String, RpcType>,
    return_type: RpcType,
}

impl Signature {
    fn new() -> Self {
        Self {
            parameters: IndexMap::new(),
            return_type: RpcType::Undefined,
        }
    }

    /// Parameter name→type mapping in declaration order.
    pub fn parameters(&self) -> &IndexMap<String, RpcType> {
        &self.parameters
    }

    /// Ordered parameter type list, for positional matching.
    pub fn parameter_types(&self) -> Vec<RpcType> {
        self.parameters.values().copied().collect()
    }

    pub fn return_type(&self) -> RpcType {
        self.return_type
    }

    /// The `[returnType, p1Type, p2Type, ...]` shape required by
    /// `system.methodSignature`.
    pub fn compact(&self) -> Vec<String> {
        let mut compact = Vec::with_capacity(self.parameters.len() + 1);
        compact.push(self.return_type.as_str().to_string());
        compact.extend(self.parameters.values().map(|t| t.as_str().to_string()));
        compact
    }
}

/// A registered RPC method.
///
/// Signatures live in an index-addressed table; ids ascend in declaration
/// order and are never renumbered, so deleting a signature leaves the
/// others addressable under their original ids. Mutating calls take an
/// optional signature id defaulting to the most recently added signature.
pub struct RpcMethod {
    name: String,
    callback: RpcCallback,
    description: Option<String>,
    signatures: BTreeMap<usize, Signature>,
    next_signature: usize,
    last_added: usize,
    arguments: Vec<Value>,
}

impl RpcMethod {
    /// Create a method with one empty signature (no parameters, return type
    /// undefined).
    pub fn new<F>(name: impl Into<String>, callback: F) -> Result<Self, MethodError>
    where
        F: Fn(&RequestContext<'_>, &[Value]) -> Result<Value, RpcFault> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(MethodError::EmptyName);
        }
        let mut method = Self {
            name,
            callback: Arc::new(callback),
            description: None,
            signatures: BTreeMap::new(),
            next_signature: 0,
            last_added: 0,
            arguments: Vec::new(),
        };
        method.add_signature();
        Ok(method)
    }

    /// Start a fluent declaration; see [`MethodBuilder`].
    pub fn builder<F>(name: impl Into<String>, callback: F) -> MethodBuilder
    where
        F: Fn(&RequestContext<'_>, &[Value]) -> Result<Value, RpcFault> + Send + Sync + 'static,
    {
        MethodBuilder {
            method: Self::new(name, callback),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn callback(&self) -> &RpcCallback {
        &self.callback
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description.filter(|d| !d.is_empty());
    }

    /// Extra arguments bound at registration, forwarded to every invocation.
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn set_arguments(&mut self, arguments: Vec<Value>) {
        self.arguments = arguments;
    }

    /// Append a new empty signature and return its id.
    pub fn add_signature(&mut self) -> usize {
        let id = self.next_signature;
        self.next_signature += 1;
        self.signatures.insert(id, Signature::new());
        self.last_added = id;
        id
    }

    /// Remove a signature slot. Remaining ids are not renumbered.
    pub fn delete_signature(&mut self, id: usize) -> Result<(), MethodError> {
        self.signatures
            .remove(&id)
            .map(|_| ())
            .ok_or(MethodError::InvalidSignature(id))
    }

    /// Set the return type of a signature (default: last added), rejecting
    /// aliases outside the closed vocabulary.
    pub fn set_return_type(
        &mut self,
        alias: &str,
        signature: Option<usize>,
    ) -> Result<(), MethodError> {
        let declared = RpcType::parse(alias).ok_or_else(|| MethodError::UnknownType(alias.into()))?;
        self.signature_mut(signature)?.return_type = declared;
        Ok(())
    }

    /// Append a named, typed parameter to a signature (default: last added).
    pub fn add_parameter(
        &mut self,
        alias: &str,
        name: &str,
        signature: Option<usize>,
    ) -> Result<(), MethodError> {
        let declared = RpcType::parse(alias).ok_or_else(|| MethodError::UnknownType(alias.into()))?;
        if name.is_empty() {
            return Err(MethodError::EmptyParameterName);
        }
        self.signature_mut(signature)?
            .parameters
            .insert(name.to_string(), declared);
        Ok(())
    }

    /// Remove a parameter from a signature (default: last added).
    pub fn delete_parameter(
        &mut self,
        name: &str,
        signature: Option<usize>,
    ) -> Result<(), MethodError> {
        let slot = self.signature_mut(signature)?;
        // shift_remove keeps the declaration order of the survivors
        slot.parameters
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| MethodError::UnknownParameter(name.into()))
    }

    /// Signature ids in declaration order.
    pub fn signature_ids(&self) -> Vec<usize> {
        self.signatures.keys().copied().collect()
    }

    /// Signatures in declaration order, with their ids.
    pub fn signatures(&self) -> impl Iterator<Item = (usize, &Signature)> {
        self.signatures.iter().map(|(id, sig)| (*id, sig))
    }

    pub fn signature(&self, id: usize) -> Result<&Signature, MethodError> {
        self.signatures.get(&id).ok_or(MethodError::InvalidSignature(id))
    }

    /// All signatures in the compact `[returnType, p1Type, ...]` form.
    pub fn signatures_compact(&self) -> Vec<Vec<String>> {
        self.signatures.values().map(Signature::compact).collect()
    }

    fn signature_mut(&mut self, id: Option<usize>) -> Result<&mut Signature, MethodError> {
        let id = self.resolve(id)?;
        self.signatures
            .get_mut(&id)
            .ok_or(MethodError::InvalidSignature(id))
    }

    fn resolve(&self, id: Option<usize>) -> Result<usize, MethodError> {
        match id {
            Some(id) => {
                if self.signatures.contains_key(&id) {
                    Ok(id)
                } else {
                    Err(MethodError::InvalidSignature(id))
                }
            }
            None => {
                // last added, falling back to the highest surviving slot
                if self.signatures.contains_key(&self.last_added) {
                    Ok(self.last_added)
                } else {
                    self.signatures
                        .keys()
                        .next_back()
                        .copied()
                        .ok_or(MethodError::InvalidSignature(self.last_added))
                }
            }
        }
    }
}

impl std::fmt::Debug for RpcMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcMethod")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("signatures", &self.signatures)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Thin fluent wrapper over [`RpcMethod`]'s explicit, index-addressed
/// mutators. The first declaration error wins and surfaces at `build()`.
pub struct MethodBuilder {
    method: Result<RpcMethod, MethodError>,
}

impl MethodBuilder {
    pub fn describe(self, description: impl Into<String>) -> Self {
        self.apply(|method| {
            method.set_description(Some(description.into()));
            Ok(())
        })
    }

    /// Set the return type of the signature under declaration.
    pub fn returns(self, alias: &str) -> Self {
        self.apply(|method| method.set_return_type(alias, None))
    }

    /// Append a parameter to the signature under declaration.
    pub fn param(self, alias: &str, name: &str) -> Self {
        self.apply(|method| method.add_parameter(alias, name, None))
    }

    /// Close the signature under declaration and start a new one.
    pub fn signature(self) -> Self {
        self.apply(|method| {
            method.add_signature();
            Ok(())
        })
    }

    /// Bind extra arguments appended after the context on every invocation.
    pub fn bind(self, arguments: Vec<Value>) -> Self {
        self.apply(|method| {
            method.set_arguments(arguments);
            Ok(())
        })
    }

    pub fn build(self) -> Result<RpcMethod, MethodError> {
        self.method
    }

    fn apply(mut self, op: impl FnOnce(&mut RpcMethod) -> Result<(), MethodError>) -> Self {
        if let Ok(method) = self.method.as_mut() {
            if let Err(declaration_error) = op(method) {
                self.method = Err(declaration_error);
            }
        }
        self
    }
}

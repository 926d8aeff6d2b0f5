use std::fmt;
use std::sync::Arc;

use fxhash::FxHashMap;
use tracing::debug;

use crate::network::gate::Gate;
use crate::network::gate_type::{BasicGateType, CompositeGateType, GateType};
use crate::GateError;

/// Predicate deciding which names are legal for gates, plugs and nested gates
pub type IdentifierRule = fn(&str) -> bool;

/// Default identifier rule
///
/// A legal identifier is non-empty, contains no whitespace and none of the characters
/// used by the network description syntax (`.`, `;`, `-`, `>`, `#`), does not start
/// with the `end` keyword and is not one of the constant names `0` and `1`.
pub fn is_legal_identifier(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with("end")
        && s != "0"
        && s != "1"
        && !s
            .chars()
            .any(|c| c.is_whitespace() || ['.', ';', '-', '>', '#'].contains(&c))
}

/// Set of gate types of a network, by name
///
/// Composite types can only nest types already registered, so the type hierarchy
/// is acyclic by construction.
#[derive(Clone)]
pub struct TypeRegistry {
    rule: IdentifierRule,
    types: FxHashMap<String, Arc<GateType>>,
    order: Vec<String>,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.order.iter()).finish()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_rule(is_legal_identifier)
    }
}

impl TypeRegistry {
    /// Create an empty registry using the default identifier rule
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with a custom identifier rule
    pub fn with_rule(rule: IdentifierRule) -> Self {
        TypeRegistry {
            rule,
            types: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no type is registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Get a type by name
    pub fn get(&self, name: &str) -> Option<Arc<GateType>> {
        self.types.get(name).cloned()
    }

    /// Iterate over the types in registration order
    pub fn types(&self) -> impl Iterator<Item = &Arc<GateType>> + '_ {
        self.order.iter().map(|n| &self.types[n])
    }

    /// Register a type built elsewhere
    pub fn add(&mut self, t: GateType) -> Result<Arc<GateType>, GateError> {
        if self.types.contains_key(t.name()) {
            return Err(GateError::DuplicateGateType(t.name().to_string()));
        }
        debug!(
            "Registered {} gate type {} ({} inputs, {} outputs)",
            if t.is_basic() { "basic" } else { "composite" },
            t.name(),
            t.nb_inputs(),
            t.nb_outputs()
        );
        let name = t.name().to_string();
        let t = Arc::new(t);
        self.types.insert(name.clone(), t.clone());
        self.order.push(name);
        Ok(t)
    }

    /// Build and register a basic gate type
    pub fn add_basic<S: AsRef<str>, R: AsRef<str>>(
        &mut self,
        name: &str,
        inputs: &[S],
        outputs: &[S],
        rows: &[R],
    ) -> Result<Arc<GateType>, GateError> {
        let t = BasicGateType::build(self.rule, name, inputs, outputs, rows)?;
        self.add(t)
    }

    /// Build and register a composite gate type
    ///
    /// See [`CompositeGateType::build`] for the format of nested gates and wiring.
    pub fn add_composite<S: AsRef<str>>(
        &mut self,
        name: &str,
        inputs: &[S],
        outputs: &[S],
        nested: &[(S, S)],
        wiring: &[(S, S)],
    ) -> Result<Arc<GateType>, GateError> {
        let t = CompositeGateType::build(self.rule, self, name, inputs, outputs, nested, wiring)?;
        self.add(t)
    }

    /// Create a gate instance of a registered type
    pub fn instantiate(&self, name: &str, type_name: &str) -> Result<Gate, GateError> {
        if !(self.rule)(name) {
            return Err(GateError::IllegalName(name.to_string()));
        }
        let t = self
            .get(type_name)
            .ok_or_else(|| GateError::UnknownGateType(type_name.to_string()))?;
        Ok(t.instantiate(name))
    }
}

use std::fmt;
use std::sync::Arc;

use fxhash::{FxHashMap, FxHashSet};

use crate::network::gate::Gate;
use crate::network::plug::{Connection, PlugId};
use crate::network::registry::{IdentifierRule, TypeRegistry};
use crate::network::transition::TransitionFunction;
use crate::GateError;

/// Names of the two constant input plugs of every composite gate, bound to 0 and 1
pub const CONSTANT_PLUG_NAMES: [&str; 2] = ["0", "1"];

/// Blueprint of a gate: its name, its plugs, and either a truth table or a sub-network
///
/// Gate types are immutable once built and are shared through [`Arc`] between the
/// registry, the composite types nesting them and the gate instances.
#[derive(Debug)]
pub struct GateType {
    name: String,
    input_plug_names: Vec<String>,
    output_plug_names: Vec<String>,
    kind: GateKind,
}

/// Variant-specific content of a gate type
#[derive(Debug)]
pub enum GateKind {
    /// Gate defined by a truth table
    Basic(BasicGateType),
    /// Gate defined by wiring other gates together
    Composite(CompositeGateType),
}

/// Content of a basic gate type
#[derive(Debug)]
pub struct BasicGateType {
    transition: TransitionFunction,
}

/// Content of a composite gate type
#[derive(Debug)]
pub struct CompositeGateType {
    nested: Vec<(String, Arc<GateType>)>,
    nested_index: FxHashMap<String, usize>,
    wiring: Vec<Connection>,
}

/// Textual reference to a plug in a wiring entry
///
/// A bare name is a boundary plug of the composite, `gate.plug` is a plug of a nested gate.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum PlugRef {
    /// Boundary plug of the composite
    Boundary(String),
    /// Plug of a nested gate
    Nested {
        /// Name of the nested gate
        gate: String,
        /// Name of the plug on the nested gate
        plug: String,
    },
}

impl PlugRef {
    /// Parse `plug` or `gate.plug`
    pub fn parse(s: &str) -> PlugRef {
        match s.split_once('.') {
            Some((gate, plug)) => PlugRef::Nested {
                gate: gate.to_string(),
                plug: plug.to_string(),
            },
            None => PlugRef::Boundary(s.to_string()),
        }
    }
}

impl fmt::Display for PlugRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlugRef::Boundary(plug) => write!(f, "{}", plug),
            PlugRef::Nested { gate, plug } => write!(f, "{}.{}", gate, plug),
        }
    }
}

/// Validate the gate name and its plug names
fn check_names<S: AsRef<str>>(
    rule: IdentifierRule,
    name: &str,
    inputs: &[S],
    outputs: &[S],
) -> Result<(), GateError> {
    if !rule(name) {
        return Err(GateError::IllegalName(name.to_string()));
    }
    for names in [inputs, outputs] {
        let mut seen = FxHashSet::default();
        for n in names {
            let n = n.as_ref();
            if !rule(n) {
                return Err(GateError::IllegalName(n.to_string()));
            }
            if !seen.insert(n) {
                return Err(GateError::DuplicatePlugName(n.to_string()));
            }
        }
    }
    Ok(())
}

fn to_strings<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names.iter().map(|n| n.as_ref().to_string()).collect()
}

impl GateType {
    /// Name of the gate type
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the declared input plugs, excluding the constant plugs of composite gates
    pub fn input_plug_names(&self) -> &[String] {
        &self.input_plug_names
    }

    /// Names of the output plugs
    pub fn output_plug_names(&self) -> &[String] {
        &self.output_plug_names
    }

    /// Number of declared inputs, i.e. the length of the vectors given to evaluation
    pub fn nb_inputs(&self) -> usize {
        self.input_plug_names.len()
    }

    /// Number of outputs
    pub fn nb_outputs(&self) -> usize {
        self.output_plug_names.len()
    }

    /// Number of input plugs of an instance, including the constant plugs of composite gates
    pub fn nb_input_plugs(&self) -> usize {
        match self.kind {
            GateKind::Basic(_) => self.nb_inputs(),
            GateKind::Composite(_) => self.nb_inputs() + CONSTANT_PLUG_NAMES.len(),
        }
    }

    /// Index of an input plug by name; the constant plugs come after the declared inputs
    pub fn input_plug_index(&self, name: &str) -> Option<usize> {
        if let Some(i) = self.declared_input_index(name) {
            return Some(i);
        }
        if self.is_composite() {
            CONSTANT_PLUG_NAMES
                .iter()
                .position(|c| *c == name)
                .map(|i| self.nb_inputs() + i)
        } else {
            None
        }
    }

    /// Index of a declared input plug by name
    fn declared_input_index(&self, name: &str) -> Option<usize> {
        self.input_plug_names.iter().position(|n| n == name)
    }

    /// Index of an output plug by name
    pub fn output_plug_index(&self, name: &str) -> Option<usize> {
        self.output_plug_names.iter().position(|n| n == name)
    }

    /// Variant-specific content
    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    /// Returns true for a gate defined by a truth table
    pub fn is_basic(&self) -> bool {
        matches!(self.kind, GateKind::Basic(_))
    }

    /// Returns true for a gate defined by a sub-network
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, GateKind::Composite(_))
    }

    /// Truth table of a basic gate
    pub fn transition(&self) -> Option<&TransitionFunction> {
        match &self.kind {
            GateKind::Basic(b) => Some(&b.transition),
            GateKind::Composite(_) => None,
        }
    }

    /// Content of a composite gate
    pub fn composite(&self) -> Option<&CompositeGateType> {
        match &self.kind {
            GateKind::Basic(_) => None,
            GateKind::Composite(c) => Some(c),
        }
    }

    /// Create a new gate instance of this type, recursively instantiating nested gates
    pub fn instantiate(self: &Arc<Self>, name: &str) -> Gate {
        Gate::new(name, self.clone())
    }
}

impl BasicGateType {
    /// Build a basic gate type from its truth table
    ///
    /// Each row holds one symbol per input followed by one symbol per output.
    pub fn build<S: AsRef<str>, R: AsRef<str>>(
        rule: IdentifierRule,
        name: &str,
        inputs: &[S],
        outputs: &[S],
        rows: &[R],
    ) -> Result<GateType, GateError> {
        check_names(rule, name, inputs, outputs)?;
        let transition = TransitionFunction::build(inputs.len(), outputs.len(), rows)?;
        Ok(GateType {
            name: name.to_string(),
            input_plug_names: to_strings(inputs),
            output_plug_names: to_strings(outputs),
            kind: GateKind::Basic(BasicGateType { transition }),
        })
    }

    /// Truth table of the gate
    pub fn transition(&self) -> &TransitionFunction {
        &self.transition
    }
}

impl CompositeGateType {
    /// Build a composite gate type from nested gate declarations and wiring entries
    ///
    /// Nested declarations are (instance name, type name) pairs, resolved in `registry`.
    /// Wiring entries are (receiving plug, driving plug) pairs. A receiving plug is an
    /// input of a nested gate or an output of the composite; a driving plug is an output
    /// of a nested gate, an input of the composite, or one of the constants `0` and `1`.
    /// Every receiving plug must be driven exactly once.
    pub fn build<S: AsRef<str>>(
        rule: IdentifierRule,
        registry: &TypeRegistry,
        name: &str,
        inputs: &[S],
        outputs: &[S],
        nested: &[(S, S)],
        wiring: &[(S, S)],
    ) -> Result<GateType, GateError> {
        check_names(rule, name, inputs, outputs)?;
        for n in inputs {
            if CONSTANT_PLUG_NAMES.contains(&n.as_ref()) {
                return Err(GateError::IllegalName(n.as_ref().to_string()));
            }
        }
        if outputs.is_empty() {
            return Err(GateError::InvalidArity {
                inputs: inputs.len(),
                outputs: 0,
            });
        }

        let mut content = CompositeGateType {
            nested: Vec::new(),
            nested_index: FxHashMap::default(),
            wiring: Vec::new(),
        };
        for (gate, type_name) in nested {
            let (gate, type_name) = (gate.as_ref(), type_name.as_ref());
            if !rule(gate) {
                return Err(GateError::IllegalName(gate.to_string()));
            }
            let t = registry
                .get(type_name)
                .ok_or_else(|| GateError::UnknownGateType(type_name.to_string()))?;
            if content
                .nested_index
                .insert(gate.to_string(), content.nested.len())
                .is_some()
            {
                return Err(GateError::DuplicateInstanceName(gate.to_string()));
            }
            content.nested.push((gate.to_string(), t));
        }

        let input_plug_names = to_strings(inputs);
        let output_plug_names = to_strings(outputs);
        let mut driven = FxHashSet::default();
        for (target, source) in wiring {
            let (target, source) = (target.as_ref(), source.as_ref());
            let target_id = content
                .resolve_receiver(&output_plug_names, &PlugRef::parse(target))
                .ok_or_else(|| GateError::UnknownPlugReference(target.to_string()))?;
            let source_id = content
                .resolve_driver(&input_plug_names, &PlugRef::parse(source))
                .ok_or_else(|| GateError::UnknownPlugReference(source.to_string()))?;
            debug_assert!(source_id.is_driver() && target_id.is_receiver());
            if !driven.insert(target_id) {
                return Err(GateError::MultipleDrivers(target.to_string()));
            }
            content.wiring.push(Connection {
                source: source_id,
                target: target_id,
            });
        }

        let mut receivers = (0..outputs.len()).map(PlugId::Output).chain(
            content
                .nested
                .iter()
                .enumerate()
                .flat_map(|(g, (_, t))| (0..t.nb_inputs()).map(move |i| PlugId::NestedInput(g, i))),
        );
        if let Some(id) = receivers.find(|id| !driven.contains(id)) {
            let plug = content.plug_name(&input_plug_names, &output_plug_names, id);
            return Err(GateError::MissingDriver(plug));
        }

        Ok(GateType {
            name: name.to_string(),
            input_plug_names,
            output_plug_names,
            kind: GateKind::Composite(content),
        })
    }

    /// Name of a plug as written in wiring entries
    fn plug_name(&self, inputs: &[String], outputs: &[String], id: PlugId) -> String {
        match id {
            PlugId::Input(i) => match inputs.get(i) {
                Some(n) => n.clone(),
                None => CONSTANT_PLUG_NAMES[i - inputs.len()].to_string(),
            },
            PlugId::Output(i) => outputs[i].clone(),
            PlugId::NestedInput(g, i) => {
                let (gate, t) = &self.nested[g];
                format!("{}.{}", gate, t.input_plug_names[i])
            }
            PlugId::NestedOutput(g, i) => {
                let (gate, t) = &self.nested[g];
                format!("{}.{}", gate, t.output_plug_names[i])
            }
        }
    }

    /// Resolve a plug that can be driven inside the composite
    fn resolve_receiver(&self, outputs: &[String], r: &PlugRef) -> Option<PlugId> {
        match r {
            PlugRef::Boundary(plug) => outputs.iter().position(|n| n == plug).map(PlugId::Output),
            PlugRef::Nested { gate, plug } => {
                let g = *self.nested_index.get(gate)?;
                let i = self.nested[g].1.declared_input_index(plug)?;
                Some(PlugId::NestedInput(g, i))
            }
        }
    }

    /// Resolve a plug that can drive a connection inside the composite
    fn resolve_driver(&self, inputs: &[String], r: &PlugRef) -> Option<PlugId> {
        match r {
            PlugRef::Boundary(plug) => {
                let i = inputs.iter().position(|n| n == plug).or_else(|| {
                    CONSTANT_PLUG_NAMES
                        .iter()
                        .position(|c| c == plug)
                        .map(|c| inputs.len() + c)
                })?;
                Some(PlugId::Input(i))
            }
            PlugRef::Nested { gate, plug } => {
                let g = *self.nested_index.get(gate)?;
                let i = self.nested[g].1.output_plug_index(plug)?;
                Some(PlugId::NestedOutput(g, i))
            }
        }
    }

    /// Nested gate declarations, as (instance name, type) in declaration order
    pub fn nested(&self) -> &[(String, Arc<GateType>)] {
        &self.nested
    }

    /// Index of a nested gate by name
    pub fn nested_index(&self, name: &str) -> Option<usize> {
        self.nested_index.get(name).copied()
    }

    /// Resolved wiring, in declaration order
    pub fn wiring(&self) -> &[Connection] {
        &self.wiring
    }
}

#[cfg(test)]
mod tests {
    use super::{BasicGateType, CompositeGateType, PlugRef};
    use crate::network::plug::PlugId;
    use crate::network::registry::{is_legal_identifier, TypeRegistry};
    use crate::GateError;

    fn registry() -> TypeRegistry {
        let mut reg = TypeRegistry::new();
        reg.add_basic("and", &["a", "b"], &["o"], &["1 1 1"]).unwrap();
        reg.add_basic("not", &["i"], &["o"], &["0 1", "1 0"]).unwrap();
        reg
    }

    fn composite(
        reg: &TypeRegistry,
        nested: &[(&str, &str)],
        wiring: &[(&str, &str)],
    ) -> Result<super::GateType, GateError> {
        CompositeGateType::build(
            is_legal_identifier,
            reg,
            "nand",
            &["x", "y"],
            &["z"],
            nested,
            wiring,
        )
    }

    #[test]
    fn test_plug_ref() {
        assert_eq!(PlugRef::parse("a"), PlugRef::Boundary("a".to_string()));
        let r = PlugRef::parse("g.o");
        assert_eq!(
            r,
            PlugRef::Nested {
                gate: "g".to_string(),
                plug: "o".to_string()
            }
        );
        assert_eq!(r.to_string(), "g.o");
    }

    #[test]
    fn test_basic() {
        let t = BasicGateType::build(is_legal_identifier, "or", &["a", "b"], &["o"], &["1 0 1"])
            .unwrap();
        assert_eq!(t.name(), "or");
        assert!(t.is_basic());
        assert_eq!(t.nb_inputs(), 2);
        assert_eq!(t.nb_input_plugs(), 2);
        assert_eq!(t.input_plug_index("b"), Some(1));
        assert_eq!(t.input_plug_index("0"), None);
        assert_eq!(t.transition().unwrap().nb_rows(), 1);
    }

    #[test]
    fn test_basic_errors() {
        let rows: &[&str] = &[];
        assert_eq!(
            BasicGateType::build(is_legal_identifier, "a.b", &["a"], &["o"], rows).unwrap_err(),
            GateError::IllegalName("a.b".to_string())
        );
        assert_eq!(
            BasicGateType::build(is_legal_identifier, "g", &["a", "a"], &["o"], rows)
                .unwrap_err(),
            GateError::DuplicatePlugName("a".to_string())
        );
        assert_eq!(
            BasicGateType::build(is_legal_identifier, "g", &["a"], &["a b"], rows).unwrap_err(),
            GateError::IllegalName("a b".to_string())
        );
        assert_eq!(
            BasicGateType::build(is_legal_identifier, "g", &["a"], &[], rows).unwrap_err(),
            GateError::InvalidArity {
                inputs: 1,
                outputs: 0
            }
        );
        assert_eq!(
            BasicGateType::build(is_legal_identifier, "g", &["a"], &["o"], &["1"]).unwrap_err(),
            GateError::MalformedTransition("1".to_string())
        );
    }

    #[test]
    fn test_composite() {
        let reg = registry();
        let t = composite(
            &reg,
            &[("g", "and"), ("n", "not")],
            &[("g.a", "x"), ("g.b", "y"), ("n.i", "g.o"), ("z", "n.o")],
        )
        .unwrap();
        assert!(t.is_composite());
        assert_eq!(t.nb_inputs(), 2);
        assert_eq!(t.nb_input_plugs(), 4);
        assert_eq!(t.input_plug_index("0"), Some(2));
        assert_eq!(t.input_plug_index("1"), Some(3));
        let c = t.composite().unwrap();
        assert_eq!(c.nested().len(), 2);
        assert_eq!(c.nested_index("n"), Some(1));
        assert_eq!(c.wiring().len(), 4);
        assert_eq!(c.wiring()[2].source, PlugId::NestedOutput(0, 0));
        assert_eq!(c.wiring()[2].target, PlugId::NestedInput(1, 0));
        let (inputs, outputs) = (t.input_plug_names(), t.output_plug_names());
        assert_eq!(c.plug_name(inputs, outputs, PlugId::NestedInput(1, 0)), "n.i");
        assert_eq!(c.plug_name(inputs, outputs, PlugId::NestedOutput(0, 0)), "g.o");
        assert_eq!(c.plug_name(inputs, outputs, PlugId::Input(3)), "1");
        assert_eq!(c.plug_name(inputs, outputs, PlugId::Output(0)), "z");
        assert!(c.wiring().iter().all(|w| w.source.is_driver()));
        assert!(c.wiring().iter().all(|w| w.target.is_receiver()));
    }

    #[test]
    fn test_composite_constants() {
        let reg = registry();
        let t = composite(
            &reg,
            &[("g", "and")],
            &[("g.a", "x"), ("g.b", "1"), ("z", "g.o")],
        )
        .unwrap();
        assert_eq!(t.composite().unwrap().wiring()[1].source, PlugId::Input(3));
    }

    #[test]
    fn test_composite_errors() {
        let reg = registry();
        assert_eq!(
            composite(&reg, &[("g", "or")], &[]).unwrap_err(),
            GateError::UnknownGateType("or".to_string())
        );
        assert_eq!(
            composite(&reg, &[("g", "not"), ("g", "not")], &[]).unwrap_err(),
            GateError::DuplicateInstanceName("g".to_string())
        );
        assert_eq!(
            composite(&reg, &[("g", "not")], &[("g.j", "x")]).unwrap_err(),
            GateError::UnknownPlugReference("g.j".to_string())
        );
        // Outputs of nested gates cannot be driven
        assert_eq!(
            composite(&reg, &[("g", "not")], &[("g.o", "x")]).unwrap_err(),
            GateError::UnknownPlugReference("g.o".to_string())
        );
        // Outputs of the composite cannot drive
        assert_eq!(
            composite(&reg, &[("g", "not")], &[("g.i", "z")]).unwrap_err(),
            GateError::UnknownPlugReference("z".to_string())
        );
        assert_eq!(
            composite(&reg, &[("g", "not")], &[("g.i", "x"), ("g.i", "y")]).unwrap_err(),
            GateError::MultipleDrivers("g.i".to_string())
        );
        assert_eq!(
            composite(&reg, &[("g", "not")], &[("g.i", "x")]).unwrap_err(),
            GateError::MissingDriver("z".to_string())
        );
        assert_eq!(
            composite(&reg, &[("g", "and")], &[("g.a", "x"), ("z", "g.o")]).unwrap_err(),
            GateError::MissingDriver("g.b".to_string())
        );
    }

    #[test]
    fn test_composite_arity() {
        let reg = registry();
        let none: &[(&str, &str)] = &[];
        assert_eq!(
            CompositeGateType::build(is_legal_identifier, &reg, "c", &["x", "y"], &[], none, none)
                .unwrap_err(),
            GateError::InvalidArity {
                inputs: 2,
                outputs: 0
            }
        );
        assert_eq!(
            CompositeGateType::build(
                is_legal_identifier,
                &reg,
                "c",
                &["x"],
                &["z", "z"],
                none,
                &[("z", "x")]
            )
            .unwrap_err(),
            GateError::DuplicatePlugName("z".to_string())
        );
    }

    #[test]
    fn test_constant_names() {
        let reg = registry();
        let permissive = |s: &str| !s.is_empty();
        let wiring: &[(&str, &str)] = &[("z", "0")];
        assert_eq!(
            CompositeGateType::build(permissive, &reg, "c", &["1"], &["z"], &[], wiring)
                .unwrap_err(),
            GateError::IllegalName("1".to_string())
        );
    }
}

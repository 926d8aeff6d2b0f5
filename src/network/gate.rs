use std::sync::Arc;

use crate::network::gate_type::GateType;
use crate::network::plug::{Connection, Plug, PlugId};
use crate::network::symbol::Symbol;
use crate::sim::{run_to_fixed_point, Evaluation};
use crate::GateError;

/// Runtime instance of a gate type, holding the current value of every plug
///
/// A composite gate exclusively owns its nested gates, so the whole instance tree is
/// dropped together. Evaluation alternates two passes over the tree until nothing changes:
/// [`Gate::update_input_plug_values`] copies values along the connections into the
/// receiving plugs, and [`Gate::update_output_plug_values`] recomputes the outputs.
#[derive(Debug, Clone)]
pub enum Gate {
    /// Instance of a truth-table gate
    Basic(BasicGate),
    /// Instance of a gate built from nested gates
    Composite(CompositeGate),
}

/// Instance of a basic gate type
#[derive(Debug, Clone)]
pub struct BasicGate {
    name: String,
    gate_type: Arc<GateType>,
    inputs: Vec<Plug>,
    outputs: Vec<Plug>,
}

/// Instance of a composite gate type
#[derive(Debug, Clone)]
pub struct CompositeGate {
    name: String,
    gate_type: Arc<GateType>,
    /// Declared inputs, then the constant 0 and 1 plugs
    inputs: Vec<Plug>,
    outputs: Vec<Plug>,
    nested: Vec<Gate>,
    connections: Vec<Connection>,
}

impl Gate {
    /// Instantiate a gate type; nested gates are instantiated recursively
    pub fn new(name: &str, gate_type: Arc<GateType>) -> Gate {
        if gate_type.is_basic() {
            Gate::Basic(BasicGate {
                name: name.to_string(),
                inputs: vec![Plug::new(); gate_type.nb_inputs()],
                outputs: vec![Plug::new(); gate_type.nb_outputs()],
                gate_type,
            })
        } else {
            Gate::Composite(CompositeGate::new(name, gate_type))
        }
    }

    /// Name of the instance
    pub fn name(&self) -> &str {
        match self {
            Gate::Basic(g) => &g.name,
            Gate::Composite(g) => &g.name,
        }
    }

    /// Type of the instance
    pub fn gate_type(&self) -> &Arc<GateType> {
        match self {
            Gate::Basic(g) => &g.gate_type,
            Gate::Composite(g) => &g.gate_type,
        }
    }

    /// All input plugs, including the constant plugs of a composite gate
    pub fn input_plugs(&self) -> &[Plug] {
        match self {
            Gate::Basic(g) => &g.inputs,
            Gate::Composite(g) => &g.inputs,
        }
    }

    /// All output plugs
    pub fn output_plugs(&self) -> &[Plug] {
        match self {
            Gate::Basic(g) => &g.outputs,
            Gate::Composite(g) => &g.outputs,
        }
    }

    fn input_plugs_mut(&mut self) -> &mut [Plug] {
        match self {
            Gate::Basic(g) => &mut g.inputs,
            Gate::Composite(g) => &mut g.inputs,
        }
    }

    fn output_plugs_mut(&mut self) -> &mut [Plug] {
        match self {
            Gate::Basic(g) => &mut g.outputs,
            Gate::Composite(g) => &mut g.outputs,
        }
    }

    /// Get an input plug by name; `0` and `1` are the constant plugs of a composite gate
    pub fn input_plug_by_name(&self, name: &str) -> Option<&Plug> {
        let i = self.gate_type().input_plug_index(name)?;
        self.input_plugs().get(i)
    }

    /// Get an output plug by name
    pub fn output_plug_by_name(&self, name: &str) -> Option<&Plug> {
        let i = self.gate_type().output_plug_index(name)?;
        self.output_plugs().get(i)
    }

    /// Get a nested gate by name
    pub fn nested_gate(&self, name: &str) -> Option<&Gate> {
        match self {
            Gate::Basic(_) => None,
            Gate::Composite(g) => {
                let i = g.gate_type.composite()?.nested_index(name)?;
                g.nested.get(i)
            }
        }
    }

    /// Nested gates, in declaration order
    pub fn nested_gates(&self) -> &[Gate] {
        match self {
            Gate::Basic(_) => &[],
            Gate::Composite(g) => &g.nested,
        }
    }

    /// Connections wiring the nested gates, in declaration order
    pub fn connections(&self) -> &[Connection] {
        match self {
            Gate::Basic(_) => &[],
            Gate::Composite(g) => &g.connections,
        }
    }

    /// Values of the declared input plugs
    pub fn get_input_plug_values(&self) -> Vec<Symbol> {
        self.input_plugs()[..self.gate_type().nb_inputs()]
            .iter()
            .map(Plug::value)
            .collect()
    }

    /// Values of the output plugs
    pub fn get_output_plug_values(&self) -> Vec<Symbol> {
        self.output_plugs().iter().map(Plug::value).collect()
    }

    fn check_input_arity(&self, values: &[Symbol]) -> Result<(), GateError> {
        let expected = self.gate_type().nb_inputs();
        if values.len() != expected {
            return Err(GateError::ArityMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(())
    }

    /// Write the declared input plugs; the constant plugs are not part of the vector
    pub fn set_input_plug_values(&mut self, values: &[Symbol]) -> Result<(), GateError> {
        self.check_input_arity(values)?;
        for (p, v) in self.input_plugs_mut().iter_mut().zip(values) {
            p.set(*v);
        }
        Ok(())
    }

    /// Reset the state of the instance tree, keeping the values of this gate's inputs
    ///
    /// Every nested plug becomes unknown, except the constant plugs, and every basic gate
    /// computes its outputs once from its inputs. Gates without inputs and truth table rows
    /// over unknown inputs take effect here, before any update pass.
    pub fn initialize(&mut self) {
        match self {
            Gate::Basic(g) => g.update_output_plug_values(),
            Gate::Composite(g) => {
                for p in &mut g.outputs {
                    p.set(Symbol::Unknown);
                }
                for n in &mut g.nested {
                    n.reset_input_plug_values();
                    n.initialize();
                }
            }
        }
    }

    fn reset_input_plug_values(&mut self) {
        let nb_inputs = self.gate_type().nb_inputs();
        for p in &mut self.input_plugs_mut()[..nb_inputs] {
            p.set(Symbol::Unknown);
        }
    }

    /// Propagate values into the receiving plugs of the tree; returns true if any changed
    ///
    /// A basic gate changes nothing here, since its inputs are written by the enclosing
    /// composite, and always returns false. A composite gate copies every connection into
    /// the inputs of its nested gates, then recurses. It also reports an update when one
    /// of its outputs differs from the plug driving it.
    pub fn update_input_plug_values(&mut self) -> bool {
        match self {
            Gate::Basic(_) => false,
            Gate::Composite(g) => g.update_input_plug_values(),
        }
    }

    /// Recompute the outputs of the tree from the current inputs, nested gates first
    pub fn update_output_plug_values(&mut self) {
        match self {
            Gate::Basic(g) => g.update_output_plug_values(),
            Gate::Composite(g) => g.update_output_plug_values(),
        }
    }

    /// Evaluate the gate from a fresh state
    ///
    /// The inputs are written, the tree is initialized, and update passes run until
    /// a fixed point or [`crate::sim::MAX_CYCLES`] is reached. Reaching the cap is not
    /// an error: the returned cycle count is the only indication.
    pub fn evaluate(&mut self, values: &[Symbol]) -> Result<Evaluation, GateError> {
        self.set_input_plug_values(values)?;
        self.initialize();
        Ok(run_to_fixed_point(self))
    }

    /// Evaluate the gate, keeping the values left by the previous evaluation
    ///
    /// Feedback loops hold their state between calls, which makes latches usable.
    pub fn settle(&mut self, values: &[Symbol]) -> Result<Evaluation, GateError> {
        self.set_input_plug_values(values)?;
        Ok(run_to_fixed_point(self))
    }
}

impl BasicGate {
    fn update_output_plug_values(&mut self) {
        let Some(transition) = self.gate_type.transition() else {
            unreachable!("basic gate {} has no transition function", self.name);
        };
        let inputs: Vec<Symbol> = self.inputs.iter().map(Plug::value).collect();
        let outputs = transition.evaluate(&inputs);
        for (p, v) in self.outputs.iter_mut().zip(outputs) {
            p.set(v);
        }
    }
}

impl CompositeGate {
    fn new(name: &str, gate_type: Arc<GateType>) -> CompositeGate {
        let (nested, connections) = match gate_type.composite() {
            Some(c) => (
                c.nested()
                    .iter()
                    .map(|(n, t)| t.instantiate(n))
                    .collect::<Vec<_>>(),
                c.wiring().to_vec(),
            ),
            None => (Vec::new(), Vec::new()),
        };
        let mut inputs = vec![Plug::new(); gate_type.nb_inputs()];
        inputs.push(Plug::constant(Symbol::Zero));
        inputs.push(Plug::constant(Symbol::One));
        let mut ret = CompositeGate {
            name: name.to_string(),
            inputs,
            outputs: vec![Plug::new(); gate_type.nb_outputs()],
            nested,
            connections,
            gate_type,
        };
        for i in 0..ret.connections.len() {
            let Connection { source, target } = ret.connections[i];
            ret.plug_mut(source).add_fanout(i);
            ret.plug_mut(target).set_driver(i);
        }
        ret
    }

    fn plug(&self, id: PlugId) -> &Plug {
        match id {
            PlugId::Input(i) => &self.inputs[i],
            PlugId::Output(i) => &self.outputs[i],
            PlugId::NestedInput(g, i) => &self.nested[g].input_plugs()[i],
            PlugId::NestedOutput(g, i) => &self.nested[g].output_plugs()[i],
        }
    }

    fn plug_mut(&mut self, id: PlugId) -> &mut Plug {
        match id {
            PlugId::Input(i) => &mut self.inputs[i],
            PlugId::Output(i) => &mut self.outputs[i],
            PlugId::NestedInput(g, i) => &mut self.nested[g].input_plugs_mut()[i],
            PlugId::NestedOutput(g, i) => &mut self.nested[g].output_plugs_mut()[i],
        }
    }

    fn update_input_plug_values(&mut self) -> bool {
        let mut updated = false;
        for i in 0..self.connections.len() {
            let Connection { source, target } = self.connections[i];
            let value = self.plug(source).value();
            if let PlugId::Output(o) = target {
                // Outputs are copied after the nested gates are updated
                updated |= self.outputs[o].value() != value;
            } else {
                updated |= self.plug_mut(target).set(value);
            }
        }
        for g in &mut self.nested {
            updated |= g.update_input_plug_values();
        }
        updated
    }

    fn update_output_plug_values(&mut self) {
        for g in &mut self.nested {
            g.update_output_plug_values();
        }
        for i in 0..self.connections.len() {
            let Connection { source, target } = self.connections[i];
            if let PlugId::Output(o) = target {
                let value = self.plug(source).value();
                self.outputs[o].set(value);
            }
        }
    }
}

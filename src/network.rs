//! Representation of gate types and gate instances

mod gate;
mod gate_type;
pub mod generators;
mod plug;
mod registry;
pub mod stats;
mod symbol;
mod transition;

pub use gate::{BasicGate, CompositeGate, Gate};
pub use gate_type::{
    BasicGateType, CompositeGateType, GateKind, GateType, PlugRef, CONSTANT_PLUG_NAMES,
};
pub use plug::{Connection, Plug, PlugId};
pub use registry::{is_legal_identifier, IdentifierRule, TypeRegistry};
pub use symbol::{parse_symbols, render_symbols, Symbol};
pub use transition::TransitionFunction;

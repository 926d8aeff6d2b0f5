//! Compute gate statistics
//!
//! ```
//! use gatenet::network::generators::testcases;
//! use gatenet::network::stats::stats;
//! let reg = testcases::and_chain(3);
//! let stats = stats(&reg.get("and_chain").unwrap());
//!
//! // Three and gates, wired by seven connections
//! assert_eq!(stats.nb_basic_gates, 3);
//! assert_eq!(stats.nb_connections, 7);
//!
//! // Show the statistics
//! println!("{}", stats);
//! ```

use std::fmt;

use fxhash::FxHashSet;

use crate::network::GateKind;
use crate::GateType;

/// Size of a gate type once fully instantiated
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkStats {
    /// Number of declared inputs
    pub nb_inputs: usize,
    /// Number of outputs
    pub nb_outputs: usize,
    /// Number of distinct basic types used
    pub nb_basic_types: usize,
    /// Number of distinct composite types used, including the gate itself
    pub nb_composite_types: usize,
    /// Number of basic gate instances in the tree
    pub nb_basic_gates: usize,
    /// Number of composite gate instances in the tree, including the gate itself
    pub nb_composite_gates: usize,
    /// Number of connections in the tree
    pub nb_connections: usize,
    /// Nesting depth; 1 for a basic gate
    pub depth: usize,
}

impl NetworkStats {
    /// Total number of gate instances
    pub fn nb_gates(&self) -> usize {
        self.nb_basic_gates + self.nb_composite_gates
    }
}

impl fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        writeln!(f, "  Inputs: {}", self.nb_inputs)?;
        writeln!(f, "  Outputs: {}", self.nb_outputs)?;
        writeln!(f, "  Gates: {}", self.nb_gates())?;
        writeln!(f, "      basic: {}", self.nb_basic_gates)?;
        if self.nb_composite_gates != 0 {
            writeln!(f, "      composite: {}", self.nb_composite_gates)?;
        }
        writeln!(
            f,
            "  Types: {} basic, {} composite",
            self.nb_basic_types, self.nb_composite_types
        )?;
        writeln!(f, "  Connections: {}", self.nb_connections)?;
        writeln!(f, "  Depth: {}", self.depth)?;
        fmt::Result::Ok(())
    }
}

fn count(
    t: &GateType,
    ret: &mut NetworkStats,
    seen: &mut FxHashSet<*const GateType>,
    depth: usize,
) {
    ret.depth = ret.depth.max(depth);
    let first_use = seen.insert(t as *const GateType);
    match t.kind() {
        GateKind::Basic(_) => {
            ret.nb_basic_gates += 1;
            if first_use {
                ret.nb_basic_types += 1;
            }
        }
        GateKind::Composite(c) => {
            ret.nb_composite_gates += 1;
            if first_use {
                ret.nb_composite_types += 1;
            }
            ret.nb_connections += c.wiring().len();
            for (_, nested) in c.nested() {
                count(nested, ret, seen, depth + 1);
            }
        }
    }
}

/// Compute the statistics of a gate type
pub fn stats(t: &GateType) -> NetworkStats {
    let mut ret = NetworkStats {
        nb_inputs: t.nb_inputs(),
        nb_outputs: t.nb_outputs(),
        nb_basic_types: 0,
        nb_composite_types: 0,
        nb_basic_gates: 0,
        nb_composite_gates: 0,
        nb_connections: 0,
        depth: 0,
    };
    let mut seen = FxHashSet::default();
    count(t, &mut ret, &mut seen, 1);
    ret
}

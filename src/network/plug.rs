use crate::network::symbol::Symbol;

/// Position of a plug relative to a composite gate
///
/// Wiring is resolved to these positions once, when the composite type is built,
/// and never re-parsed during evaluation.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum PlugId {
    /// Input plug of the composite itself, including the two constant plugs
    Input(usize),
    /// Output plug of the composite itself
    Output(usize),
    /// Input plug of a nested gate: (nested gate, plug)
    NestedInput(usize, usize),
    /// Output plug of a nested gate: (nested gate, plug)
    NestedOutput(usize, usize),
}

impl PlugId {
    /// Returns true if the plug can drive a connection inside the composite
    pub fn is_driver(&self) -> bool {
        matches!(self, PlugId::Input(_) | PlugId::NestedOutput(_, _))
    }

    /// Returns true if the plug is driven by a connection inside the composite
    pub fn is_receiver(&self) -> bool {
        !self.is_driver()
    }
}

/// Directed wire from a driving plug to a receiving plug of the same composite
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Connection {
    /// Driving plug
    pub source: PlugId,
    /// Receiving plug
    pub target: PlugId,
}

/// Terminal of a gate instance, holding its current value
///
/// Connection indices refer to the connection table of the composite gate where the
/// plug is wired: for a nested gate's plug this is its parent, for a composite's own
/// boundary plug seen from the inside it is the composite itself.
#[derive(Debug, Clone, Default)]
pub struct Plug {
    value: Symbol,
    driver: Option<usize>,
    fanout: Vec<usize>,
}

impl Plug {
    /// Create an unknown, unconnected plug
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a plug holding a constant value
    pub(crate) fn constant(value: Symbol) -> Self {
        Plug {
            value,
            ..Self::default()
        }
    }

    /// Current value
    pub fn value(&self) -> Symbol {
        self.value
    }

    /// Set the value; returns true if it changed
    pub(crate) fn set(&mut self, value: Symbol) -> bool {
        let changed = self.value != value;
        self.value = value;
        changed
    }

    /// Connection driving this plug, if any
    pub fn driver(&self) -> Option<usize> {
        self.driver
    }

    /// Connections driven by this plug
    pub fn fanout(&self) -> &[usize] {
        &self.fanout
    }

    pub(crate) fn set_driver(&mut self, connection: usize) {
        assert!(self.driver.is_none(), "Plug is driven twice");
        self.driver = Some(connection);
    }

    pub(crate) fn add_fanout(&mut self, connection: usize) {
        self.fanout.push(connection);
    }
}

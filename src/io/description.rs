//! IO for network description files

use std::io::{BufRead, BufReader, Read};
use std::sync::Arc;

use tracing::debug;

use crate::network::{is_legal_identifier, IdentifierRule, TypeRegistry};
use crate::{Gate, GateError, GateType};

/// Name of the top-level composite type of a network description
pub const NETWORK_NAME: &str = "network";

/// Gate types of a network description, and the top-level network type
#[derive(Debug, Clone)]
pub struct NetworkDescription {
    /// All gate types, including the network itself
    pub registry: TypeRegistry,
    /// The top-level network type
    pub network: Arc<GateType>,
}

impl NetworkDescription {
    /// Create an instance of the network
    pub fn instantiate(&self) -> Gate {
        self.network.instantiate(NETWORK_NAME)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum BlockKind {
    Basic,
    Composite,
    Network,
}

/// A definition being read, from its header to its `end` line
struct Block {
    kind: BlockKind,
    name: String,
    line: usize,
    inputs: Option<Vec<String>>,
    outputs: Option<Vec<String>>,
    rows: Vec<String>,
    nested: Vec<(String, String)>,
    wiring: Vec<(String, String)>,
}

fn syntax(line: usize, message: impl Into<String>) -> GateError {
    GateError::Syntax {
        line,
        message: message.into(),
    }
}

impl Block {
    fn from_header(line: usize, parts: &[&str]) -> Result<Block, GateError> {
        let (kind, name) = match parts {
            ["gate", name] => (BlockKind::Basic, name.to_string()),
            ["composite", name] => (BlockKind::Composite, name.to_string()),
            ["network"] => (BlockKind::Network, NETWORK_NAME.to_string()),
            _ => {
                return Err(syntax(
                    line,
                    format!("expected gate, composite or network, got `{}`", parts.join(" ")),
                ))
            }
        };
        Ok(Block {
            kind,
            name,
            line,
            inputs: None,
            outputs: None,
            rows: Vec::new(),
            nested: Vec::new(),
            wiring: Vec::new(),
        })
    }

    /// Add a line of the block body
    fn add_line(&mut self, line: usize, text: &str, parts: &[&str]) -> Result<(), GateError> {
        match parts.first() {
            Some(&"inputs") => {
                if self.inputs.is_some() {
                    return Err(syntax(line, "inputs are declared twice"));
                }
                self.inputs = Some(parts[1..].iter().map(|s| s.to_string()).collect());
            }
            Some(&"outputs") => {
                if self.inputs.is_none() {
                    return Err(syntax(line, "inputs must be declared before outputs"));
                }
                if self.outputs.is_some() {
                    return Err(syntax(line, "outputs are declared twice"));
                }
                self.outputs = Some(parts[1..].iter().map(|s| s.to_string()).collect());
            }
            _ => {
                if self.outputs.is_none() {
                    return Err(syntax(line, "inputs and outputs must be declared first"));
                }
                if self.kind == BlockKind::Basic {
                    self.rows.push(text.to_string());
                } else if parts.first() == Some(&"gate") {
                    if parts.len() != 3 {
                        return Err(syntax(line, "expected `gate <name> <type>`"));
                    }
                    self.nested
                        .push((parts[1].to_string(), parts[2].to_string()));
                } else if let Some((source, target)) = text.split_once("->") {
                    self.wiring
                        .push((target.trim().to_string(), source.trim().to_string()));
                } else {
                    return Err(syntax(
                        line,
                        format!("expected a nested gate or a connection, got `{}`", text),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Build the gate type and register it
    fn finish(self, registry: &mut TypeRegistry) -> Result<Arc<GateType>, GateError> {
        let inputs = self
            .inputs
            .ok_or_else(|| syntax(self.line, format!("{} declares no inputs", self.name)))?;
        let outputs = self
            .outputs
            .ok_or_else(|| syntax(self.line, format!("{} declares no outputs", self.name)))?;
        match self.kind {
            BlockKind::Basic => registry.add_basic(&self.name, &inputs, &outputs, &self.rows),
            BlockKind::Composite | BlockKind::Network => registry.add_composite(
                &self.name,
                &inputs,
                &outputs,
                &self.nested,
                &self.wiring,
            ),
        }
    }
}

/// Read a network description, using the default identifier rule
///
/// These files define basic gates by their truth table, composite gates by their
/// nested gates and connections, and end with the network itself:
/// ```text
///     # This is a comment
///     gate and
///     inputs a b
///     outputs o
///     1 1 1
///     end
///
///     composite and3
///     inputs a b c
///     outputs o
///     gate g0 and
///     gate g1 and
///     a->g0.a
///     b->g0.b
///     g0.o->g1.a
///     c->g1.b
///     g1.o->o
///     end
///
///     network
///     inputs x y z
///     outputs o
///     gate top and3
///     x->top.a
///     y->top.b
///     z->top.c
///     top.o->o
///     end
/// ```
/// Transition rows list the inputs then the outputs; missing rows evaluate to 0,
/// or to unknown if an input is unknown. Connections are written `source->target`,
/// and `0` and `1` are constant sources in composite gates.
pub fn read_network<R: Read>(r: R) -> Result<NetworkDescription, GateError> {
    read_network_with_rule(r, is_legal_identifier)
}

/// Read a network description, validating names with a custom identifier rule
pub fn read_network_with_rule<R: Read>(
    r: R,
    rule: IdentifierRule,
) -> Result<NetworkDescription, GateError> {
    let mut registry = TypeRegistry::with_rule(rule);
    let mut network = None;
    let mut current: Option<Block> = None;
    let mut nb_lines = 0;
    for (i, l) in BufReader::new(r).lines().enumerate() {
        let line = i + 1;
        nb_lines = line;
        let s = l?;
        let t = s.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        let parts: Vec<_> = t.split_whitespace().collect();
        match current.take() {
            None => {
                if network.is_some() {
                    return Err(syntax(line, "the network must be the last definition"));
                }
                current = Some(Block::from_header(line, &parts)?);
            }
            Some(block) => {
                if parts == ["end"] {
                    let kind = block.kind;
                    let t = block.finish(&mut registry)?;
                    if kind == BlockKind::Network {
                        network = Some(t);
                    }
                } else {
                    let mut block = block;
                    block.add_line(line, t, &parts)?;
                    current = Some(block);
                }
            }
        }
    }
    if let Some(block) = current {
        return Err(syntax(nb_lines, format!("{} is missing its end", block.name)));
    }
    let network = network.ok_or_else(|| syntax(nb_lines, "no network is defined"))?;
    debug!(
        "Read network with {} gate types, {} inputs and {} outputs",
        registry.len(),
        network.nb_inputs(),
        network.nb_outputs()
    );
    Ok(NetworkDescription { registry, network })
}

#[cfg(test)]
mod test {
    use super::read_network;
    use crate::network::parse_symbols;
    use crate::GateError;

    const EXAMPLE: &str = "# Example network
gate and
inputs a b
outputs o
0 0 0
0 1 0
1 0 0
1 1 1
end

gate not
inputs i
outputs o
0 1
1 0
end

composite nand
inputs a b
outputs o
gate g and
gate n not
a->g.a
b -> g.b
g.o->n.i
n.o->o
end

network
inputs x y
outputs o p one
gate top nand
x->top.a
y->top.b
top.o->o
top.o->p
1->one
end
";

    #[test]
    fn test_read() {
        let desc = read_network(EXAMPLE.as_bytes()).unwrap();
        assert_eq!(desc.registry.len(), 4);
        assert_eq!(desc.network.name(), "network");
        assert_eq!(desc.network.nb_inputs(), 2);
        assert_eq!(desc.network.nb_outputs(), 3);
        let mut g = desc.instantiate();
        assert_eq!(g.name(), "network");
        let res = g.evaluate(&parse_symbols("1 1").unwrap()).unwrap();
        assert_eq!(res.outputs, parse_symbols("0 0 1").unwrap());
        let res = g.evaluate(&parse_symbols("0 1").unwrap()).unwrap();
        assert_eq!(res.outputs, parse_symbols("1 1 1").unwrap());
        let res = g.evaluate(&parse_symbols("? 1").unwrap()).unwrap();
        assert_eq!(res.outputs, parse_symbols("? ? 1").unwrap());
    }

    #[test]
    fn test_no_inputs() {
        let text = "gate one\ninputs\noutputs o\n1\nend\nnetwork\ninputs\noutputs o\ngate g one\ng.o->o\nend\n";
        let desc = read_network(text.as_bytes()).unwrap();
        let mut g = desc.instantiate();
        let res = g.evaluate(&[]).unwrap();
        assert_eq!(res.cycles, 1);
        assert_eq!(res.outputs, parse_symbols("1").unwrap());
    }

    fn syntax_line(text: &str) -> usize {
        match read_network(text.as_bytes()) {
            Err(GateError::Syntax { line, .. }) => line,
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(syntax_line("gates and\n"), 1);
        assert_eq!(syntax_line("gate and\ninputs a\ninputs b\n"), 3);
        assert_eq!(syntax_line("gate and\noutputs o\n"), 2);
        assert_eq!(syntax_line("gate and\ninputs a\n1 1\n"), 3);
        assert_eq!(syntax_line("composite c\ninputs a\noutputs o\nwhat\nend\n"), 4);
        assert_eq!(syntax_line("composite c\ninputs a\noutputs o\ngate g\nend\n"), 4);
        assert_eq!(syntax_line("gate and\ninputs a\noutputs o\n"), 3);
        assert_eq!(syntax_line("gate and\nend\n"), 1);
        assert_eq!(syntax_line("gate not\ninputs i\noutputs o\n0 1\nend\n"), 5);
        let after = "network\ninputs\noutputs o\n1->o\nend\ngate g\n";
        assert_eq!(syntax_line(after), 6);
    }

    #[test]
    fn test_construction_errors() {
        let text = "gate and\ninputs a b\noutputs o\n1 1\nend\n";
        assert_eq!(
            read_network(text.as_bytes()).unwrap_err(),
            GateError::MalformedTransition("1 1".to_string())
        );
        let text = "network\ninputs a\noutputs o\ngate g and\nend\n";
        assert_eq!(
            read_network(text.as_bytes()).unwrap_err(),
            GateError::UnknownGateType("and".to_string())
        );
        let text = "network\ninputs a\noutputs o\nb->o\nend\n";
        assert_eq!(
            read_network(text.as_bytes()).unwrap_err(),
            GateError::UnknownPlugReference("b".to_string())
        );
        let text = "network\ninputs a\noutputs o\nend\n";
        assert_eq!(
            read_network(text.as_bytes()).unwrap_err(),
            GateError::MissingDriver("o".to_string())
        );
    }
}

//! Read network descriptions and pattern files

mod description;
mod patterns;

use std::fs::File;
use std::path::PathBuf;

pub use description::{read_network, read_network_with_rule, NetworkDescription, NETWORK_NAME};
pub use patterns::{read_patterns, write_evaluations, write_patterns};

use crate::sim::Evaluation;
use crate::{GateError, Symbol};

/// Read a network description from a file
pub fn read_network_file(path: &PathBuf) -> Result<NetworkDescription, GateError> {
    let f = File::open(path)
        .map_err(|e| GateError::Io(format!("cannot open {}: {}", path.display(), e)))?;
    read_network(f)
}

/// Read input vectors from a file
pub fn read_pattern_file(path: &PathBuf) -> Result<Vec<Vec<Symbol>>, GateError> {
    let f = File::open(path)
        .map_err(|e| GateError::Io(format!("cannot open {}: {}", path.display(), e)))?;
    read_patterns(f)
}

/// Write input vectors to a file
pub fn write_pattern_file(path: &PathBuf, patterns: &[Vec<Symbol>]) -> Result<(), GateError> {
    let mut f = File::create(path)
        .map_err(|e| GateError::Io(format!("cannot create {}: {}", path.display(), e)))?;
    write_patterns(&mut f, patterns)
}

/// Write simulation results to a file
pub fn write_evaluation_file(path: &PathBuf, results: &[Evaluation]) -> Result<(), GateError> {
    let mut f = File::create(path)
        .map_err(|e| GateError::Io(format!("cannot create {}: {}", path.display(), e)))?;
    write_evaluations(&mut f, results)
}

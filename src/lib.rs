//! Hierarchical simulation of logic gate networks
//!
//! This crate simulates networks of logic gates over three values: 0, 1 and unknown (`?`).
//! Gates are either basic, defined by a truth table, or composite, built from nested gates
//! and a wiring table. Composite gates nest arbitrarily deep.
//!
//! # Usage
//!
//! Networks are written in a simple text format, and simulated from the command line:
//!
//! ```bash
//! # Show available commands
//! gatenet help
//! # Show statistics about a network
//! gatenet show adder.net
//! # Simulate input vectors, one per line
//! gatenet simulate adder.net -i vectors.txt -o results.txt
//! # Simulate random input vectors, including unknown values
//! gatenet random adder.net -n 100 --unknown
//! ```
//!
//! Each result line gives the number of update cycles before the network settled,
//! followed by the output values.
//!
//! # Simulation model
//!
//! Every plug holds a value, initially unknown. A simulation cycle first copies each
//! connection's source value into its target, through the whole hierarchy, then recomputes
//! the outputs of every gate. Cycles repeat until nothing changes, or until
//! [`sim::MAX_CYCLES`] is reached for networks that never settle, such as ring oscillators.
//!
//! Basic gates look up their current inputs in their transition table. Missing entries give 0,
//! or unknown if any input is unknown.
//!
//! ```
//! use gatenet::network::generators::adder;
//! use gatenet::network::parse_symbols;
//!
//! let reg = adder::half_adder();
//! let mut gate = reg.instantiate("h", "half_adder").unwrap();
//! let res = gate.evaluate(&parse_symbols("1 1").unwrap()).unwrap();
//! assert_eq!(res.outputs, parse_symbols("0 1").unwrap());
//! ```
//!
//! ## Datastructures
//!
//! Gate types are immutable once built, and shared between instances with [`std::sync::Arc`].
//! A [`TypeRegistry`] holds the types of a network, and only lets composite types use types
//! that are already registered, so that type hierarchies are always finite.
//!
//! A [`Gate`] instance owns its plugs and its nested gates. Wiring is resolved to plug positions
//! when the type is built, so that simulation never looks up names.

#![warn(missing_docs)]

pub mod cmd;
pub mod error;
pub mod io;
pub mod network;
pub mod sim;

pub use error::GateError;
pub use network::{stats, Gate, GateType, Symbol, TransitionFunction, TypeRegistry};

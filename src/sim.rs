//! Simulation of gate networks: settle a gate instance to a fixed point, over one or many input vectors

use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{trace, warn};

use crate::network::render_symbols;
use crate::{Gate, GateError, Symbol};

/// Maximum number of update cycles of a single evaluation
///
/// Networks with a non-convergent feedback loop stop here; this is reported through
/// the cycle count only, never as an error.
pub const MAX_CYCLES: usize = 1_000_000;

/// Result of evaluating a gate on one input vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Number of update cycles until the fixed point, or [`MAX_CYCLES`]
    pub cycles: usize,
    /// Values of the output plugs, in declaration order
    pub outputs: Vec<Symbol>,
}

impl Evaluation {
    /// Returns true if the evaluation stopped at the cycle cap, and may not have converged
    pub fn hit_cycle_cap(&self) -> bool {
        self.cycles >= MAX_CYCLES
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.cycles, render_symbols(&self.outputs))
    }
}

/// Run update cycles until no plug changes or the cycle cap is reached
///
/// Each cycle propagates values into the receiving plugs of the whole tree, then recomputes
/// every output. The loop stops before recomputing when the propagation reports no change.
pub(crate) fn run_to_fixed_point(gate: &mut Gate) -> Evaluation {
    let mut cycles = 0;
    while cycles < MAX_CYCLES {
        if !gate.update_input_plug_values() {
            break;
        }
        gate.update_output_plug_values();
        cycles += 1;
    }
    let ret = Evaluation {
        cycles,
        outputs: gate.get_output_plug_values(),
    };
    if ret.hit_cycle_cap() {
        warn!(
            "Gate {} did not settle after {} cycles; outputs may not have converged",
            gate.name(),
            MAX_CYCLES
        );
    } else {
        trace!("Gate {} settled after {} cycles", gate.name(), cycles);
    }
    ret
}

/// Evaluate a gate on each input vector, from a fresh state every time
pub fn simulate(
    gate: &mut Gate,
    patterns: &[Vec<Symbol>],
) -> Result<Vec<Evaluation>, GateError> {
    patterns.iter().map(|p| gate.evaluate(p)).collect()
}

/// Evaluate a gate on a sequence of input vectors, keeping the state between vectors
///
/// The gate is initialized once before the first vector.
pub fn simulate_seq(
    gate: &mut Gate,
    patterns: &[Vec<Symbol>],
) -> Result<Vec<Evaluation>, GateError> {
    gate.initialize();
    patterns.iter().map(|p| gate.settle(p)).collect()
}

/// Generate random input vectors
///
/// Values are 0 or 1, or uniformly 0, 1 or unknown if `with_unknown` is set.
pub fn random_patterns(
    nb_inputs: usize,
    nb_patterns: usize,
    with_unknown: bool,
    seed: u64,
) -> Vec<Vec<Symbol>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut ret = Vec::new();
    for _ in 0..nb_patterns {
        let mut pattern = Vec::new();
        for _ in 0..nb_inputs {
            let s = if with_unknown {
                match rng.gen_range(0..3) {
                    0 => Symbol::Zero,
                    1 => Symbol::One,
                    _ => Symbol::Unknown,
                }
            } else {
                Symbol::from(rng.gen::<bool>())
            };
            pattern.push(s);
        }
        ret.push(pattern);
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::{random_patterns, simulate, simulate_seq, Evaluation, MAX_CYCLES};
    use crate::network::generators::{adder, testcases};
    use crate::network::parse_symbols;
    use crate::Symbol;

    #[test]
    fn test_display() {
        let e = Evaluation {
            cycles: 3,
            outputs: parse_symbols("1 ? 0").unwrap(),
        };
        assert_eq!(e.to_string(), "3 1 ? 0");
        assert!(!e.hit_cycle_cap());
        let e = Evaluation {
            cycles: MAX_CYCLES,
            outputs: vec![Symbol::One],
        };
        assert!(e.hit_cycle_cap());
    }

    #[test]
    fn test_random_patterns() {
        let p = random_patterns(5, 20, false, 1);
        assert_eq!(p.len(), 20);
        assert!(p.iter().all(|v| v.len() == 5));
        assert!(p.iter().flatten().all(|s| s.is_known()));
        assert_eq!(p, random_patterns(5, 20, false, 1));

        let p = random_patterns(8, 50, true, 2);
        assert!(p.iter().flatten().any(|s| s.is_unknown()));
    }

    #[test]
    fn test_simulate() {
        let reg = adder::half_adder();
        let mut g = reg.instantiate("h", "half_adder").unwrap();
        let patterns = random_patterns(2, 32, true, 3);
        let first = simulate(&mut g, &patterns).unwrap();
        let second = simulate(&mut g, &patterns).unwrap();
        assert_eq!(first, second);
        for (p, e) in patterns.iter().zip(&first) {
            if p.iter().all(|s| s.is_known()) {
                assert!(e.outputs.iter().all(|s| s.is_known()));
            }
        }
        assert!(simulate(&mut g, &[vec![Symbol::One]]).is_err());
    }

    #[test]
    fn test_idempotent_random() {
        let reg = testcases::and_chain(4);
        let mut g = reg.instantiate("c", "and_chain").unwrap();
        for p in random_patterns(5, 64, true, 4) {
            let first = g.evaluate(&p).unwrap();
            let second = g.evaluate(&p).unwrap();
            assert_eq!(first, second);
            g.set_input_plug_values(&p).unwrap();
            assert_eq!(g.get_input_plug_values(), p);
        }
    }

    #[test]
    fn test_simulate_seq() {
        let reg = testcases::sr_latch();
        let mut g = reg.instantiate("l", "sr_latch").unwrap();
        let patterns: Vec<_> = ["1 0", "0 0", "0 1", "0 0"]
            .iter()
            .map(|p| parse_symbols(p).unwrap())
            .collect();
        let outputs: Vec<_> = simulate_seq(&mut g, &patterns)
            .unwrap()
            .into_iter()
            .map(|e| e.outputs)
            .collect();
        let expected: Vec<_> = ["1 0", "1 0", "0 1", "0 1"]
            .iter()
            .map(|p| parse_symbols(p).unwrap())
            .collect();
        assert_eq!(outputs, expected);
    }
}

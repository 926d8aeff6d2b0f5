use fxhash::FxHashMap;

use crate::network::symbol::Symbol;
use crate::GateError;

/// Truth table of a basic gate, with an implicit default for missing rows
///
/// Rows map a vector of input symbols to a vector of output symbols.
/// An input vector without a row evaluates to all `?` if it contains an unknown
/// input, and to all `0` otherwise. Truth tables only need to list the rows
/// that produce a 1 or that resolve unknown inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionFunction {
    nb_inputs: usize,
    nb_outputs: usize,
    rows: FxHashMap<Box<[Symbol]>, Box<[Symbol]>>,
}

impl TransitionFunction {
    /// Build the truth table from rows of `nb_inputs + nb_outputs` whitespace-separated symbols
    ///
    /// A later row with the same inputs replaces an earlier one.
    pub fn build<S: AsRef<str>>(
        nb_inputs: usize,
        nb_outputs: usize,
        rows: &[S],
    ) -> Result<TransitionFunction, GateError> {
        if nb_outputs == 0 {
            return Err(GateError::InvalidArity {
                inputs: nb_inputs,
                outputs: nb_outputs,
            });
        }
        let mut ret = TransitionFunction {
            nb_inputs,
            nb_outputs,
            rows: FxHashMap::default(),
        };
        for row in rows {
            let row = row.as_ref();
            let symbols = row
                .split_whitespace()
                .map(str::parse::<Symbol>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| GateError::MalformedTransition(row.to_string()))?;
            if symbols.len() != ret.row_len() {
                return Err(GateError::MalformedTransition(row.to_string()));
            }
            let (inputs, outputs) = symbols.split_at(nb_inputs);
            ret.rows.insert(inputs.into(), outputs.into());
        }
        Ok(ret)
    }

    /// Number of inputs
    pub fn nb_inputs(&self) -> usize {
        self.nb_inputs
    }

    /// Number of outputs
    pub fn nb_outputs(&self) -> usize {
        self.nb_outputs
    }

    /// Number of symbols in a row
    pub fn row_len(&self) -> usize {
        self.nb_inputs + self.nb_outputs
    }

    /// Number of distinct rows
    pub fn nb_rows(&self) -> usize {
        self.rows.len()
    }

    /// Compute the outputs for a vector of input symbols
    pub fn evaluate(&self, inputs: &[Symbol]) -> Vec<Symbol> {
        debug_assert_eq!(inputs.len(), self.nb_inputs);
        match self.rows.get(inputs) {
            Some(outputs) => outputs.to_vec(),
            None => {
                let default = if inputs.iter().any(Symbol::is_unknown) {
                    Symbol::Unknown
                } else {
                    Symbol::Zero
                };
                vec![default; self.nb_outputs]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TransitionFunction;
    use crate::network::symbol::parse_symbols;
    use crate::{GateError, Symbol};

    fn and2() -> TransitionFunction {
        TransitionFunction::build(2, 1, &["0 0 0", "0 1 0", "1 0 0", "1 1 1"]).unwrap()
    }

    fn eval(f: &TransitionFunction, inputs: &str) -> Vec<Symbol> {
        f.evaluate(&parse_symbols(inputs).unwrap())
    }

    #[test]
    fn test_explicit_rows() {
        let f = and2();
        assert_eq!(f.nb_rows(), 4);
        assert_eq!(f.row_len(), 3);
        assert_eq!(eval(&f, "1 1"), vec![Symbol::One]);
        assert_eq!(eval(&f, "0 1"), vec![Symbol::Zero]);
        assert_eq!(eval(&f, "0 0"), vec![Symbol::Zero]);
    }

    #[test]
    fn test_implicit_rows() {
        let f = TransitionFunction::build(2, 2, &["1 1 1 0"]).unwrap();
        assert_eq!(eval(&f, "1 1"), vec![Symbol::One, Symbol::Zero]);
        assert_eq!(eval(&f, "0 1"), vec![Symbol::Zero, Symbol::Zero]);
        assert_eq!(eval(&f, "1 ?"), vec![Symbol::Unknown, Symbol::Unknown]);
        assert_eq!(eval(&f, "? ?"), vec![Symbol::Unknown, Symbol::Unknown]);

        let f = and2();
        assert_eq!(eval(&f, "1 ?"), vec![Symbol::Unknown]);
        assert_eq!(eval(&f, "? ?"), vec![Symbol::Unknown]);
    }

    #[test]
    fn test_unknown_rows() {
        // Rows may resolve unknown inputs explicitly
        let f = TransitionFunction::build(2, 1, &["1 1 1", "0 ? 0", "? 0 0"]).unwrap();
        assert_eq!(eval(&f, "0 ?"), vec![Symbol::Zero]);
        assert_eq!(eval(&f, "1 ?"), vec![Symbol::Unknown]);
    }

    #[test]
    fn test_duplicate_rows() {
        let f = TransitionFunction::build(1, 1, &["0 1", "1 0", "0 0"]).unwrap();
        assert_eq!(f.nb_rows(), 2);
        assert_eq!(eval(&f, "0"), vec![Symbol::Zero]);
    }

    #[test]
    fn test_no_inputs() {
        let f = TransitionFunction::build(0, 1, &["1"]).unwrap();
        assert_eq!(f.evaluate(&[]), vec![Symbol::One]);
        let f = TransitionFunction::build(0, 2, &[] as &[&str]).unwrap();
        assert_eq!(f.evaluate(&[]), vec![Symbol::Zero, Symbol::Zero]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            TransitionFunction::build(2, 0, &[] as &[&str]),
            Err(GateError::InvalidArity {
                inputs: 2,
                outputs: 0
            })
        );
        assert_eq!(
            TransitionFunction::build(2, 1, &["0 0 0", "1 1"]),
            Err(GateError::MalformedTransition("1 1".to_string()))
        );
        assert_eq!(
            TransitionFunction::build(2, 1, &["0 0 0 1"]),
            Err(GateError::MalformedTransition("0 0 0 1".to_string()))
        );
        assert_eq!(
            TransitionFunction::build(2, 1, &["0 x 0"]),
            Err(GateError::MalformedTransition("0 x 0".to_string()))
        );
    }
}

//! Errors raised while building gate types, instantiating gates or reading network files

use thiserror::Error;

/// Construction, parsing and evaluation boundary errors
///
/// Every construction error is terminal for the gate type or network being built.
/// Once a gate is instantiated, evaluation can only fail on the arity of the input vector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// A gate, plug or instance name is rejected by the identifier rule
    #[error("illegal name `{0}`")]
    IllegalName(String),

    /// An input or output plug list contains the same name twice
    #[error("duplicate plug name `{0}`")]
    DuplicatePlugName(String),

    /// A gate must have at least one output
    #[error("invalid arity: {inputs} inputs and {outputs} outputs")]
    InvalidArity {
        /// Number of declared inputs
        inputs: usize,
        /// Number of declared outputs
        outputs: usize,
    },

    /// A transition row does not have one symbol per input and output
    #[error("malformed transition `{0}`")]
    MalformedTransition(String),

    /// A composite gate references a gate type that is not registered
    #[error("unknown gate type `{0}`")]
    UnknownGateType(String),

    /// A wiring entry references a plug that does not exist, or has the wrong direction
    #[error("unknown plug reference `{0}`")]
    UnknownPlugReference(String),

    /// The input vector does not match the number of declared inputs
    #[error("expected {expected} input values, got {actual}")]
    ArityMismatch {
        /// Number of declared inputs
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },

    /// A token is not one of `0`, `1` or `?`
    #[error("invalid symbol `{0}`")]
    InvalidSymbol(String),

    /// A gate type with this name is already registered
    #[error("gate type `{0}` is defined twice")]
    DuplicateGateType(String),

    /// A composite gate declares the same nested instance twice
    #[error("nested gate `{0}` is declared twice")]
    DuplicateInstanceName(String),

    /// A receiving plug of a composite gate has no wiring entry
    #[error("plug `{0}` is not driven")]
    MissingDriver(String),

    /// A receiving plug of a composite gate has more than one wiring entry
    #[error("plug `{0}` is driven more than once")]
    MultipleDrivers(String),

    /// The network description is not well-formed
    #[error("line {line}: {message}")]
    Syntax {
        /// Line number, starting at 1
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Reading or writing a file failed
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for GateError {
    fn from(e: std::io::Error) -> Self {
        GateError::Io(e.to_string())
    }
}

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::GateError;

/// Value carried by a plug: 0, 1, or unknown (written `?`)
///
/// Plugs start as unknown; constants and transition functions are the only
/// source of known values.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
pub enum Symbol {
    /// Logical 0
    Zero,
    /// Logical 1
    One,
    /// Unknown value
    #[default]
    Unknown,
}

impl Symbol {
    /// Returns true for the unknown value
    pub fn is_unknown(&self) -> bool {
        *self == Symbol::Unknown
    }

    /// Returns true for 0 and 1
    pub fn is_known(&self) -> bool {
        !self.is_unknown()
    }

    /// Character used in transition tables and pattern files
    pub fn to_char(self) -> char {
        match self {
            Symbol::Zero => '0',
            Symbol::One => '1',
            Symbol::Unknown => '?',
        }
    }

    /// Parse a single character
    pub fn from_char(c: char) -> Option<Symbol> {
        match c {
            '0' => Some(Symbol::Zero),
            '1' => Some(Symbol::One),
            '?' => Some(Symbol::Unknown),
            _ => None,
        }
    }
}

impl From<bool> for Symbol {
    fn from(b: bool) -> Symbol {
        if b {
            Symbol::One
        } else {
            Symbol::Zero
        }
    }
}

impl FromStr for Symbol {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Symbol::from_char(c).ok_or_else(|| GateError::InvalidSymbol(s.to_string()))
            }
            _ => Err(GateError::InvalidSymbol(s.to_string())),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Parse a whitespace-separated vector of symbols, such as `0 1 ?`
pub fn parse_symbols(s: &str) -> Result<Vec<Symbol>, GateError> {
    s.split_whitespace().map(str::parse).collect()
}

/// Render a vector of symbols separated by spaces; [`parse_symbols`] reads it back
pub fn render_symbols(values: &[Symbol]) -> String {
    values.iter().join(" ")
}

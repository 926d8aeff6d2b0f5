//! IO for input vectors and simulation results

use std::io::{BufRead, BufReader, Read, Write};

use crate::network::{parse_symbols, render_symbols};
use crate::sim::Evaluation;
use crate::{GateError, Symbol};

/// Read input vectors, one per line
///
/// Values are `0`, `1` or `?`, separated by whitespace. Empty lines and lines starting
/// with `#` are ignored:
/// ```text
///     # a b cin
///     0 1 1
///     1 ? 0
/// ```
pub fn read_patterns<R: Read>(r: R) -> Result<Vec<Vec<Symbol>>, GateError> {
    let mut ret = Vec::new();
    for (i, l) in BufReader::new(r).lines().enumerate() {
        let s = l?;
        let t = s.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        let pattern = parse_symbols(t).map_err(|e| GateError::Syntax {
            line: i + 1,
            message: e.to_string(),
        })?;
        ret.push(pattern);
    }
    Ok(ret)
}

/// Write input vectors, one per line
pub fn write_patterns<W: Write>(w: &mut W, patterns: &[Vec<Symbol>]) -> Result<(), GateError> {
    for p in patterns {
        writeln!(w, "{}", render_symbols(p))?;
    }
    Ok(())
}

/// Write simulation results, one per line: the number of cycles followed by the outputs
pub fn write_evaluations<W: Write>(w: &mut W, results: &[Evaluation]) -> Result<(), GateError> {
    for e in results {
        writeln!(w, "{}", e)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{read_patterns, write_evaluations, write_patterns};
    use crate::network::parse_symbols;
    use crate::sim::Evaluation;
    use crate::GateError;

    #[test]
    fn test_read() {
        let text = "# header\n0 1 ?\n\n  1 1 0  \n";
        let p = read_patterns(text.as_bytes()).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p[0], parse_symbols("0 1 ?").unwrap());
        assert_eq!(p[1], parse_symbols("1 1 0").unwrap());
    }

    #[test]
    fn test_read_error() {
        let text = "0 1\n0 2\n";
        match read_patterns(text.as_bytes()) {
            Err(GateError::Syntax { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_write() {
        let patterns = vec![parse_symbols("0 ?").unwrap(), parse_symbols("1 1").unwrap()];
        let mut buf = Vec::new();
        write_patterns(&mut buf, &patterns).unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), "0 ?\n1 1\n");
        assert_eq!(read_patterns(buf.as_slice()).unwrap(), patterns);

        let results = vec![
            Evaluation {
                cycles: 2,
                outputs: parse_symbols("1 0").unwrap(),
            },
            Evaluation {
                cycles: 0,
                outputs: parse_symbols("? ?").unwrap(),
            },
        ];
        let mut buf = Vec::new();
        write_evaluations(&mut buf, &results).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "2 1 0\n0 ? ?\n");
    }
}

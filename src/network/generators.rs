//! Gate libraries and network generators

use crate::network::registry::TypeRegistry;

/// Register a composite type from owned names; generators only build valid types
fn add_composite(
    reg: &mut TypeRegistry,
    name: &str,
    inputs: &[String],
    outputs: &[String],
    nested: &[(String, String)],
    wiring: &[(String, String)],
) {
    reg.add_composite(name, inputs, outputs, nested, wiring)
        .unwrap();
}

fn names(prefix: &str, len: usize) -> Vec<String> {
    (0..len).map(|i| format!("{}{}", prefix, i)).collect()
}

fn wire(target: impl Into<String>, source: impl Into<String>) -> (String, String) {
    (target.into(), source.into())
}

/// Registry with the usual basic gates: `not`, `and`, `or`, `nand`, `nor`, `xor`
///
/// The truth tables resolve unknown inputs when a known input decides the output,
/// so that `and(0, ?)` is 0 and `or(1, ?)` is 1.
pub fn library() -> TypeRegistry {
    let mut reg = TypeRegistry::new();
    let ab = ["a", "b"];
    reg.add_basic("not", &["i"], &["o"], &["0 1", "1 0"]).unwrap();
    reg.add_basic(
        "and",
        &ab,
        &["o"],
        &["0 0 0", "0 1 0", "1 0 0", "1 1 1", "0 ? 0", "? 0 0"],
    )
    .unwrap();
    reg.add_basic(
        "or",
        &ab,
        &["o"],
        &["0 0 0", "0 1 1", "1 0 1", "1 1 1", "1 ? 1", "? 1 1"],
    )
    .unwrap();
    reg.add_basic(
        "nand",
        &ab,
        &["o"],
        &["0 0 1", "0 1 1", "1 0 1", "1 1 0", "0 ? 1", "? 0 1"],
    )
    .unwrap();
    reg.add_basic(
        "nor",
        &ab,
        &["o"],
        &["0 0 1", "0 1 0", "1 0 0", "1 1 0", "1 ? 0", "? 1 0"],
    )
    .unwrap();
    reg.add_basic("xor", &ab, &["o"], &["0 1 1", "1 0 1"]).unwrap();
    reg
}

/// Adder generators
pub mod adder {
    use super::{add_composite, library, names, wire};
    use crate::network::registry::TypeRegistry;

    fn add_half_adder(reg: &mut TypeRegistry) {
        // Xor from four nand gates
        add_composite(
            reg,
            "xor_nand",
            &names("i", 2),
            &["o".to_string()],
            &[
                wire("n0", "nand"),
                wire("n1", "nand"),
                wire("n2", "nand"),
                wire("n3", "nand"),
            ],
            &[
                wire("n0.a", "i0"),
                wire("n0.b", "i1"),
                wire("n1.a", "i0"),
                wire("n1.b", "n0.o"),
                wire("n2.a", "i1"),
                wire("n2.b", "n0.o"),
                wire("n3.a", "n1.o"),
                wire("n3.b", "n2.o"),
                wire("o", "n3.o"),
            ],
        );
        add_composite(
            reg,
            "half_adder",
            &["a".to_string(), "b".to_string()],
            &["s".to_string(), "c".to_string()],
            &[wire("x", "xor_nand"), wire("y", "and")],
            &[
                wire("x.i0", "a"),
                wire("x.i1", "b"),
                wire("y.a", "a"),
                wire("y.b", "b"),
                wire("s", "x.o"),
                wire("c", "y.o"),
            ],
        );
    }

    /// Half adder built from a nand-based xor and an and gate; type `half_adder`
    pub fn half_adder() -> TypeRegistry {
        let mut reg = library();
        add_half_adder(&mut reg);
        reg
    }

    /// A simple and slow ripple-carry adder of full adders; type `ripple_carry`
    ///
    /// Inputs are `a0 b0 a1 b1 ...`, outputs are `s0 s1 ... co`.
    pub fn ripple_carry(len: usize) -> TypeRegistry {
        assert!(len > 0);
        let mut reg = half_adder();
        add_composite(
            &mut reg,
            "full_adder",
            &["a".to_string(), "b".to_string(), "c".to_string()],
            &["s".to_string(), "co".to_string()],
            &[
                wire("h0", "half_adder"),
                wire("h1", "half_adder"),
                wire("o", "or"),
            ],
            &[
                wire("h0.a", "a"),
                wire("h0.b", "b"),
                wire("h1.a", "h0.s"),
                wire("h1.b", "c"),
                wire("o.a", "h0.c"),
                wire("o.b", "h1.c"),
                wire("s", "h1.s"),
                wire("co", "o.o"),
            ],
        );

        let mut inputs = Vec::new();
        let mut nested = Vec::new();
        let mut wiring = Vec::new();
        for i in 0..len {
            let fa = format!("fa{}", i);
            inputs.push(format!("a{}", i));
            inputs.push(format!("b{}", i));
            nested.push(wire(fa.clone(), "full_adder"));
            wiring.push(wire(format!("{}.a", fa), format!("a{}", i)));
            wiring.push(wire(format!("{}.b", fa), format!("b{}", i)));
            let carry = if i == 0 {
                "0".to_string()
            } else {
                format!("fa{}.co", i - 1)
            };
            wiring.push(wire(format!("{}.c", fa), carry));
            wiring.push(wire(format!("s{}", i), format!("{}.s", fa)));
        }
        wiring.push(wire("co", format!("fa{}.co", len - 1)));
        let mut outputs = names("s", len);
        outputs.push("co".to_string());
        add_composite(
            &mut reg,
            "ripple_carry",
            &inputs,
            &outputs,
            &nested,
            &wiring,
        );
        reg
    }
}

/// Simple generators to test functionality
pub mod testcases {
    use super::{add_composite, library, names, wire};
    use crate::network::registry::TypeRegistry;

    /// A chain of and gates, each adding one input; type `and_chain`
    ///
    /// Inputs are `i0 ... i{len}`, the output is `o`. The chain is purely feed-forward,
    /// with `len` levels of logic.
    pub fn and_chain(len: usize) -> TypeRegistry {
        assert!(len > 0);
        let mut reg = library();
        let nested: Vec<_> = names("g", len)
            .into_iter()
            .map(|g| wire(g, "and"))
            .collect();
        let mut wiring = vec![wire("g0.a", "i0")];
        for i in 0..len {
            if i != 0 {
                wiring.push(wire(format!("g{}.a", i), format!("g{}.o", i - 1)));
            }
            wiring.push(wire(format!("g{}.b", i), format!("i{}", i + 1)));
        }
        wiring.push(wire("o", format!("g{}.o", len - 1)));
        add_composite(
            &mut reg,
            "and_chain",
            &names("i", len + 1),
            &["o".to_string()],
            &nested,
            &wiring,
        );
        reg
    }

    /// Composite without nested gates, exposing the constants and its input; type `constant_outputs`
    pub fn constant_outputs() -> TypeRegistry {
        let mut reg = TypeRegistry::new();
        add_composite(
            &mut reg,
            "constant_outputs",
            &["i".to_string()],
            &["z".to_string(), "u".to_string(), "n".to_string()],
            &[],
            &[wire("z", "0"), wire("u", "1"), wire("n", "i")],
        );
        reg
    }

    /// An inverter looping on itself, enabled by the input; type `ring_oscillator`
    ///
    /// The inverter treats an unknown feedback as 1, so that the loop starts oscillating
    /// from a fresh state and never settles while enabled. Disabled, the output is 1.
    pub fn ring_oscillator() -> TypeRegistry {
        let mut reg = TypeRegistry::new();
        reg.add_basic(
            "enabled_inverter",
            &["en", "i"],
            &["o"],
            &["1 0 1", "1 1 0", "1 ? 0", "0 0 1", "0 1 1", "0 ? 1"],
        )
        .unwrap();
        add_composite(
            &mut reg,
            "ring_oscillator",
            &["en".to_string()],
            &["o".to_string()],
            &[wire("inv", "enabled_inverter")],
            &[wire("inv.en", "en"), wire("inv.i", "inv.o"), wire("o", "inv.o")],
        );
        reg
    }

    /// Set-reset latch from two cross-coupled nor gates; type `sr_latch`
    ///
    /// Inputs are `s r`, outputs are `q qn`.
    pub fn sr_latch() -> TypeRegistry {
        let mut reg = library();
        add_composite(
            &mut reg,
            "sr_latch",
            &["s".to_string(), "r".to_string()],
            &["q".to_string(), "qn".to_string()],
            &[wire("n0", "nor"), wire("n1", "nor")],
            &[
                wire("n0.a", "r"),
                wire("n0.b", "n1.o"),
                wire("n1.a", "s"),
                wire("n1.b", "n0.o"),
                wire("q", "n0.o"),
                wire("qn", "n1.o"),
            ],
        );
        reg
    }
}

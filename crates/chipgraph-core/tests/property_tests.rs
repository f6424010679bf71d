//! # Property-Based Tests
//!
//! Invariants of wiring and evaluation checked with proptest.

use chipgraph_core::{ChipError, ChipGraph, ChipId, ChipKind, ConnectionReport, Evaluator};
use proptest::collection::vec;
use proptest::prelude::*;

fn id(s: &str) -> ChipId {
    ChipId::new(s)
}

/// Two inputs wired into a single binary chip of `kind`.
fn binary_circuit(kind: ChipKind) -> (ChipGraph, ChipId) {
    let target = ChipId::new(format!("{}1", kind.prefix()));
    let mut graph = ChipGraph::new();
    graph.register(id("I1")).expect("register");
    graph.register(id("I2")).expect("register");
    graph.register(target.clone()).expect("register");
    graph.connect(&id("I1"), &target).expect("connect");
    graph.connect(&id("I2"), &target).expect("connect");
    (graph, target)
}

fn binary_kind() -> impl Strategy<Value = ChipKind> {
    prop_oneof![
        Just(ChipKind::Add),
        Just(ChipKind::Subtract),
        Just(ChipKind::Multiply),
        Just(ChipKind::Divide),
    ]
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Inputs always evaluate to the value set last.
    #[test]
    fn input_returns_last_value(values in vec(-1.0e9f64..1.0e9, 1..20)) {
        let mut graph = ChipGraph::new();
        graph.register(id("I1")).expect("register");

        for value in &values {
            graph.set_input_value(&id("I1"), *value).expect("set");
        }

        let last = values[values.len() - 1];
        prop_assert_eq!(graph.evaluate(&id("I1")).expect("eval").value, last);
        prop_assert_eq!(graph.evaluate(&id("I1")).expect("eval").value, last);
    }

    /// Binary chips compute standard arithmetic on the current inputs.
    #[test]
    fn binary_arithmetic(kind in binary_kind(), a in -1.0e6f64..1.0e6, b in -1.0e6f64..1.0e6) {
        let (mut graph, target) = binary_circuit(kind);
        graph.set_input_value(&id("I1"), a).expect("set");
        graph.set_input_value(&id("I2"), b).expect("set");

        let evaluation = graph.evaluate(&target).expect("eval");
        let expected = match kind {
            ChipKind::Add => a + b,
            ChipKind::Subtract => a - b,
            ChipKind::Multiply => a * b,
            _ if b == 0.0 => 0.0,
            _ => a / b,
        };
        prop_assert_eq!(evaluation.value, expected);
        prop_assert_eq!(evaluation.is_clean(), !(kind == ChipKind::Divide && b == 0.0));
    }

    /// Dividing anything by zero yields 0.0 and exactly one diagnostic.
    #[test]
    fn divide_by_zero_always_recovers(a in -1.0e9f64..1.0e9) {
        let (mut graph, target) = binary_circuit(ChipKind::Divide);
        graph.set_input_value(&id("I1"), a).expect("set");

        let evaluation = graph.evaluate(&target).expect("eval");
        prop_assert_eq!(evaluation.value, 0.0);
        prop_assert_eq!(evaluation.diagnostics.len(), 1);
    }

    /// An output chip always agrees with the chip it is wired to.
    #[test]
    fn output_matches_dependency(kind in binary_kind(), a in -1.0e3f64..1.0e3, b in -1.0e3f64..1.0e3) {
        let (mut graph, target) = binary_circuit(kind);
        graph.register(id("O1")).expect("register");
        graph.connect(&target, &id("O1")).expect("connect");
        graph.set_input_value(&id("I1"), a).expect("set");
        graph.set_input_value(&id("I2"), b).expect("set");

        let output = graph.evaluate(&id("O1")).expect("eval").value;
        let direct = graph.evaluate(&target).expect("eval").value;
        prop_assert_eq!(output, direct);
    }

    /// A chain of negations flips the sign once per link.
    #[test]
    fn negation_chain_parity(length in 1usize..40, value in -1.0e6f64..1.0e6) {
        let mut graph = ChipGraph::new();
        graph.register(id("I1")).expect("register");
        let mut previous = id("I1");
        for i in 0..length {
            let next = ChipId::new(format!("N{}", i));
            graph.register(next.clone()).expect("register");
            graph.connect(&previous, &next).expect("connect");
            previous = next;
        }
        graph.set_input_value(&id("I1"), value).expect("set");

        let result = graph.evaluate(&previous).expect("eval").value;
        let expected = if length % 2 == 0 { value } else { 0.0 - value };
        prop_assert_eq!(result, expected);
    }

    /// Chains deeper than the limit fail, chains within it succeed.
    #[test]
    fn depth_limit_is_exact(length in 1usize..30, limit in 0usize..30) {
        let mut graph = ChipGraph::new();
        graph.register(id("I1")).expect("register");
        let mut previous = id("I1");
        for i in 0..length {
            let next = ChipId::new(format!("O{}", i));
            graph.register(next.clone()).expect("register");
            graph.connect(&previous, &next).expect("connect");
            previous = next;
        }

        let result = Evaluator::new(&mut graph).with_max_depth(limit).evaluate(&previous);
        if length <= limit {
            prop_assert!(result.is_ok());
        } else {
            let is_depth_error = matches!(result, Err(ChipError::DepthLimitExceeded { .. }));
            prop_assert!(is_depth_error);
        }
    }

    /// Binary chips accept exactly two connections regardless of source order.
    #[test]
    fn binary_accepts_exactly_two(attempts in 0usize..6) {
        let mut graph = ChipGraph::new();
        graph.register(id("A1")).expect("register");
        let mut accepted = 0usize;
        for i in 0..attempts {
            let source = ChipId::new(format!("I{}", i));
            graph.register(source.clone()).expect("register");
            match graph.connect(&source, &id("A1")) {
                Ok(()) => accepted += 1,
                Err(e) => prop_assert_eq!(e, ChipError::SlotsFull(id("A1"))),
            }
        }
        prop_assert_eq!(accepted, attempts.min(2));
    }

    /// The report lists every chip exactly once.
    #[test]
    fn report_lists_every_chip_once(prefixes in vec(prop_oneof![
        Just('I'), Just('O'), Just('A'), Just('S'), Just('M'), Just('D'), Just('N')
    ], 0..40)) {
        let mut graph = ChipGraph::new();
        for (i, prefix) in prefixes.iter().enumerate() {
            graph.register(ChipId::new(format!("{}{}", prefix, i))).expect("register");
        }

        let report = ConnectionReport::from_graph(&graph);
        prop_assert_eq!(report.len(), graph.len());
        for chip in graph.chips() {
            prop_assert!(report.line(chip.id()).is_some());
        }
    }
}

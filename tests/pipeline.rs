// End-to-end checks over the whole translate-then-simulate pipeline.

use vulcan::sim::{evaluate, LogicValue, Resolution};
use vulcan::verify::{assignment_for, verify};
use vulcan::{compile, Assignment, CompileError, Junction};

#[test]
fn single_variable_is_a_one_transistor_buffer() {
    let netlist = compile("A").unwrap();

    assert_eq!(netlist.inputs, vec!["A"]);
    assert_eq!(netlist.pull_up.transistors.len(), 1);
    assert_eq!(netlist.pull_down.transistors.len(), 1);
    assert_eq!(netlist.pull_up.transistors[0].source, Junction::Vdd);
    assert_eq!(netlist.pull_up.transistors[0].drain, Junction::Output);
    assert_eq!(netlist.pull_down.transistors[0].source, Junction::Gnd);
    assert_eq!(netlist.pull_down.transistors[0].drain, Junction::Output);

    let high = evaluate(&netlist, &Assignment::from_pairs([("A", true)])).unwrap();
    assert_eq!(high.pull_up, LogicValue::High);
    assert_eq!(high.pull_down, LogicValue::Z);

    let low = evaluate(&netlist, &Assignment::from_pairs([("A", false)])).unwrap();
    assert_eq!(low.pull_up, LogicValue::Z);
    assert_eq!(low.pull_down, LogicValue::Low);
}

#[test]
fn unbalanced_parenthesis_fails_at_translation() {
    let err = compile("(A+B").unwrap_err();
    assert!(matches!(err, CompileError::MalformedExpression(_)));
}

#[test]
fn empty_expression_fails_at_translation() {
    assert!(matches!(
        compile(""),
        Err(CompileError::MalformedExpression(_))
    ));
    assert!(matches!(
        compile("   "),
        Err(CompileError::MalformedExpression(_))
    ));
}

#[test]
fn manual_example_expression_verifies() {
    let netlist = compile("~(~(A+B).C+~D)").unwrap();
    assert_eq!(netlist.inputs, vec!["A", "B", "C", "D"]);
    let report = verify(&netlist).unwrap();
    assert_eq!(report.combinations, 16);
    assert!(report.passed());
}

#[test]
fn multi_character_signal_names_flow_through() {
    let netlist = compile("~(SUM1 + SUM2)").unwrap();
    assert_eq!(netlist.inputs, vec!["SUM1", "SUM2"]);

    let outcome = evaluate(
        &netlist,
        &Assignment::from_pairs([("SUM1", false), ("SUM2", false)]),
    )
    .unwrap();
    assert_eq!(outcome.resolve(), Resolution::High);
}

#[test]
fn complementarity_holds_for_a_three_input_function() {
    let netlist = compile("A.B+~C").unwrap();
    for bits in 0..8u64 {
        let assignment = assignment_for(&netlist, bits);
        let outcome = evaluate(&netlist, &assignment).unwrap();
        let up = outcome.pull_up == LogicValue::High;
        let down = outcome.pull_down == LogicValue::Low;
        assert!(up != down, "bits={:03b}: up={} down={}", bits, up, down);
    }
}

#[test]
fn netlist_survives_a_failed_simulation_call() {
    let netlist = compile("A.B").unwrap();

    // Bad call: missing B.
    let err = evaluate(&netlist, &Assignment::from_pairs([("A", true)])).unwrap_err();
    assert!(matches!(err, CompileError::UnboundVariable(_)));

    // Corrected call against the same netlist still works.
    let outcome = evaluate(
        &netlist,
        &Assignment::from_pairs([("A", true), ("B", true)]),
    )
    .unwrap();
    assert_eq!(outcome.resolve(), Resolution::High);
}

//sim/mod.rs
use std::collections::HashSet;
use std::fmt;

use log::debug;

use crate::{Assignment, CompileError, Junction, Netlist, Network};

/// Value observed at the output node of one pull network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicValue {
    High,
    Low,
    /// No conducting path from the rail to OUTPUT: floating, not an error.
    Z,
}

impl fmt::Display for LogicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicValue::High => write!(f, "1"),
            LogicValue::Low => write!(f, "0"),
            LogicValue::Z => write!(f, "Z"),
        }
    }
}

/// Per-run verdict: what each network drives the output node to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimOutcome {
    pub pull_up: LogicValue,
    pub pull_down: LogicValue,
}

/// The two rail outcomes folded into one observable output state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    High,
    Low,
    /// Neither network conducts.
    Floating,
    /// Both networks conduct, which a correctly synthesized netlist never
    /// produces.
    Contention,
}

impl SimOutcome {
    pub fn resolve(&self) -> Resolution {
        match (self.pull_up, self.pull_down) {
            (LogicValue::High, LogicValue::Z) => Resolution::High,
            (LogicValue::Z, LogicValue::Low) => Resolution::Low,
            (LogicValue::Z, LogicValue::Z) => Resolution::Floating,
            _ => Resolution::Contention,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::High => write!(f, "1"),
            Resolution::Low => write!(f, "0"),
            Resolution::Floating => write!(f, "Z (floating)"),
            Resolution::Contention => write!(f, "X (contention)"),
        }
    }
}

/// Simulate both networks under one input assignment. The assignment is
/// validated up front so a bad call fails before any reachability work and
/// leaves the netlist reusable.
pub fn evaluate(netlist: &Netlist, assignment: &Assignment) -> Result<SimOutcome, CompileError> {
    validate_assignment(netlist, assignment)?;

    let pull_up = if conducts(&netlist.pull_up, assignment)? {
        LogicValue::High
    } else {
        LogicValue::Z
    };
    let pull_down = if conducts(&netlist.pull_down, assignment)? {
        LogicValue::Low
    } else {
        LogicValue::Z
    };

    Ok(SimOutcome { pull_up, pull_down })
}

fn validate_assignment(netlist: &Netlist, assignment: &Assignment) -> Result<(), CompileError> {
    for name in &netlist.inputs {
        if assignment.get(name).is_none() {
            return Err(CompileError::UnboundVariable(name.clone()));
        }
    }
    Ok(())
}

/// Whether a network presents a short circuit from its supply rail to the
/// OUTPUT node under the given assignment: collect the (source, drain) edges
/// of every conducting device, then expand a frontier from the rail until
/// OUTPUT appears or no junction is newly reachable.
pub fn conducts(network: &Network, assignment: &Assignment) -> Result<bool, CompileError> {
    let mut edges: Vec<(Junction, Junction)> = Vec::new();
    for transistor in &network.transistors {
        let gate_value = assignment.value_of(&transistor.gate)?;
        if network.polarity.conducts(gate_value) {
            edges.push((transistor.source, transistor.drain));
        }
    }
    debug!(
        "{} network: {}/{} device(s) conducting",
        network.polarity.device_prefix(),
        edges.len(),
        network.transistors.len()
    );

    let rail = network.polarity.rail();
    let mut visited: HashSet<Junction> = HashSet::new();
    visited.insert(rail);
    let mut frontier = vec![rail];

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for &(source, drain) in &edges {
            if frontier.contains(&source) && visited.insert(drain) {
                next.push(drain);
            }
        }
        if next.contains(&Junction::Output) {
            return Ok(true);
        }
        frontier = next;
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile, Literal, Polarity, Transistor};

    fn run(expr: &str, pairs: &[(&str, bool)]) -> SimOutcome {
        let netlist = compile(expr).unwrap();
        let assignment = Assignment::from_pairs(pairs.iter().map(|&(n, v)| (n, v)));
        evaluate(&netlist, &assignment).unwrap()
    }

    #[test]
    fn and_gate_rails() {
        // A.B drives 1 only for A=1,B=1 and 0 otherwise.
        for (a, b) in [(false, false), (false, true), (true, false)] {
            let outcome = run("A.B", &[("A", a), ("B", b)]);
            assert_eq!(outcome.resolve(), Resolution::Low);
        }
        let outcome = run("A.B", &[("A", true), ("B", true)]);
        assert_eq!(outcome.pull_up, LogicValue::High);
        assert_eq!(outcome.pull_down, LogicValue::Z);
        assert_eq!(outcome.resolve(), Resolution::High);
    }

    #[test]
    fn or_gate_rails() {
        let outcome = run("A+B", &[("A", false), ("B", false)]);
        assert_eq!(outcome.resolve(), Resolution::Low);
        for (a, b) in [(false, true), (true, false), (true, true)] {
            let outcome = run("A+B", &[("A", a), ("B", b)]);
            assert_eq!(outcome.resolve(), Resolution::High);
        }
    }

    #[test]
    fn nand_truth_table() {
        let expected = [
            ((false, false), Resolution::High),
            ((false, true), Resolution::High),
            ((true, false), Resolution::High),
            ((true, true), Resolution::Low),
        ];
        for ((a, b), want) in expected {
            let outcome = run("~(A.B)", &[("A", a), ("B", b)]);
            assert_eq!(outcome.resolve(), want, "A={} B={}", a, b);
        }
    }

    #[test]
    fn exactly_one_network_conducts() {
        let netlist = compile("~(~(A+B).C+~D)").unwrap();
        for bits in 0..16u32 {
            let assignment = Assignment::from_pairs(
                netlist
                    .inputs
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.clone(), bits & (1 << i) != 0)),
            );
            let outcome = evaluate(&netlist, &assignment).unwrap();
            assert!(
                matches!(outcome.resolve(), Resolution::High | Resolution::Low),
                "bits={:04b} gave {:?}",
                bits,
                outcome
            );
        }
    }

    #[test]
    fn missing_signal_is_rejected_before_simulation() {
        let netlist = compile("A.B").unwrap();
        let mut assignment = Assignment::new();
        assignment.set("A", true);
        let err = evaluate(&netlist, &assignment).unwrap_err();
        assert!(matches!(err, CompileError::UnboundVariable(name) if name == "B"));
    }

    #[test]
    fn repeated_simulation_does_not_disturb_the_netlist() {
        let netlist = compile("A+B").unwrap();
        let before = netlist.pull_down.transistors.clone();
        for bits in 0..4u32 {
            let assignment = Assignment::from_pairs([
                ("A", bits & 1 != 0),
                ("B", bits & 2 != 0),
            ]);
            evaluate(&netlist, &assignment).unwrap();
        }
        assert_eq!(netlist.pull_down.transistors, before);
    }

    #[test]
    fn broken_network_reports_floating() {
        // A hand-built network whose only device never reaches OUTPUT.
        let network = Network {
            polarity: Polarity::Nmos,
            transistors: vec![Transistor {
                name: "NMOS0".to_string(),
                source: Junction::Gnd,
                drain: Junction::Internal(7),
                gate: Literal::new("A"),
            }],
        };
        let assignment = Assignment::from_pairs([("A", true)]);
        assert!(!conducts(&network, &assignment).unwrap());
    }
}

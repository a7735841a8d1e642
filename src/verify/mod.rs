//verify/mod.rs
use log::info;
use rayon::prelude::*;

use crate::parser::eval_postfix;
use crate::sim::{evaluate, Resolution};
use crate::{Assignment, CompileError, Netlist};

/// One input combination whose netlist behavior disagreed with the
/// expression's truth table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub bits: u64,
    pub expected: bool,
    pub observed: Resolution,
}

/// Outcome of an exhaustive sweep over every input combination.
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub combinations: u64,
    pub mismatches: Vec<Mismatch>,
    /// Combinations where both networks conducted at once.
    pub contention: u64,
    /// Combinations where neither network conducted.
    pub floating: u64,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty() && self.contention == 0 && self.floating == 0
    }
}

/// Bit `i` of `bits` drives input `i` in the netlist's sorted input order.
pub fn assignment_for(netlist: &Netlist, bits: u64) -> Assignment {
    Assignment::from_pairs(
        netlist
            .inputs
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), bits & (1 << i) != 0)),
    )
}

/// Simulate the netlist for all 2^n input combinations and compare against
/// direct evaluation of the original postfix expression. Also counts the two
/// conditions a correct synthesis never produces: simultaneous conduction and
/// a floating output. The sweep is embarrassingly parallel, so it runs on the
/// rayon pool.
pub fn verify(netlist: &Netlist) -> Result<VerifyReport, CompileError> {
    let n = netlist.inputs.len();
    let combinations = 1u64 << n;
    info!(
        "verifying {} input(s), {} combination(s)",
        n, combinations
    );

    let results: Result<Vec<(Option<Mismatch>, bool, bool)>, CompileError> = (0..combinations)
        .into_par_iter()
        .map(|bits| {
            let assignment = assignment_for(netlist, bits);
            let expected = eval_postfix(&netlist.postfix, &assignment)?;
            let observed = evaluate(netlist, &assignment)?.resolve();

            let matches = matches!(
                (expected, observed),
                (true, Resolution::High) | (false, Resolution::Low)
            );
            let mismatch = if matches {
                None
            } else {
                Some(Mismatch {
                    bits,
                    expected,
                    observed,
                })
            };
            Ok((
                mismatch,
                observed == Resolution::Contention,
                observed == Resolution::Floating,
            ))
        })
        .collect();

    let mut report = VerifyReport {
        combinations,
        ..Default::default()
    };
    for (mismatch, contention, floating) in results? {
        if let Some(m) = mismatch {
            report.mismatches.push(m);
        }
        if contention {
            report.contention += 1;
        }
        if floating {
            report.floating += 1;
        }
    }

    Ok(report)
}

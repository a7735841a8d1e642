//generator/mod.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::sim::evaluate;
use crate::verify::assignment_for;
use crate::{Netlist, Network};

/// Render one pull network as the classic four-column
/// NAME / SOURCE / DRAIN / GATE table. Negated gate signals carry a '-'
/// prefix in this view only.
pub fn render_network(network: &Network) -> String {
    network
        .transistors
        .iter()
        .map(|t| format!("{}\t{}\t{}\t{}", t.name, t.source, t.drain, t.gate))
        .join("\n")
}

pub fn render_netlist(netlist: &Netlist) -> String {
    let mut out = String::new();
    out.push_str(&format!("Inputs: {}\n", netlist.inputs.join(", ")));
    out.push_str(&format!(
        "No. of Transistors - PMOS : {} , NMOS : {}\n\n",
        netlist.pull_up.transistors.len(),
        netlist.pull_down.transistors.len()
    ));
    out.push_str("Transistor Netlist (NAME, SOURCE, DRAIN, GATE)\n\n");
    out.push_str("PULL UP NETWORK (PMOS)\n\n");
    out.push_str(&render_network(&netlist.pull_up));
    out.push_str("\n\nPULL DOWN NETWORK (NMOS)\n\n");
    out.push_str(&render_network(&netlist.pull_down));
    out.push('\n');
    out
}

pub fn write_netlist_report<P: AsRef<Path>>(netlist: &Netlist, path: P) -> Result<()> {
    let mut file = File::create(path.as_ref())
        .context(format!("Failed to create netlist report: {:?}", path.as_ref()))?;
    file.write_all(render_netlist(netlist).as_bytes())
        .context("Failed to write netlist report")?;
    Ok(())
}

/// Exhaustive truth table of the netlist: one row per input combination with
/// the raw rail outcomes and the resolved output.
pub fn render_truth_table(netlist: &Netlist) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!(
        "{} | PULL-UP PULL-DOWN | OUT\n",
        netlist.inputs.join(" ")
    ));

    let combinations = 1u64 << netlist.inputs.len();
    for bits in 0..combinations {
        let assignment = assignment_for(netlist, bits);
        let outcome = evaluate(netlist, &assignment)?;
        let values = netlist
            .inputs
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let v = if bits & (1 << i) != 0 { 1 } else { 0 };
                // Pad to the column width of the signal name.
                format!("{:>width$}", v, width = name.len())
            })
            .join(" ");
        out.push_str(&format!(
            "{} | {:>7} {:>9} | {}\n",
            values,
            outcome.pull_up.to_string(),
            outcome.pull_down.to_string(),
            outcome.resolve()
        ));
    }

    Ok(out)
}

pub fn write_truth_table<P: AsRef<Path>>(netlist: &Netlist, path: P) -> Result<()> {
    let table = render_truth_table(netlist)?;
    let mut file = File::create(path.as_ref())
        .context(format!("Failed to create truth table file: {:?}", path.as_ref()))?;
    file.write_all(table.as_bytes())
        .context("Failed to write truth table")?;
    Ok(())
}

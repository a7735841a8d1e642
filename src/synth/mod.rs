//synth/mod.rs
use log::debug;

use crate::{CompileError, Junction, Network, Polarity, PostfixTok, Transistor};

/// Fold a NOT-free postfix sequence into one pull network. The sequence is
/// evaluated like any postfix expression, except the "values" are partially
/// built sub-networks: a literal becomes a fresh single-transistor network,
/// AND composes in series, OR in parallel. `next_junction` is shared across
/// both network builds so their numbering spaces never collide.
pub fn build_network(
    postfix: &[PostfixTok],
    polarity: Polarity,
    next_junction: &mut u32,
) -> Result<Network, CompileError> {
    let mut stack: Vec<Vec<Transistor>> = Vec::new();
    let mut device_index = 0usize;

    for tok in postfix {
        match tok {
            PostfixTok::Lit(lit) => {
                let source = Junction::Internal(*next_junction);
                let drain = Junction::Internal(*next_junction + 1);
                *next_junction += 2;

                // A PMOS device conducts on logical 0, so its gate literal is
                // the complement of the sign computed for the pull-down form.
                let gate = match polarity {
                    Polarity::Pmos => lit.complement(),
                    Polarity::Nmos => lit.clone(),
                };

                stack.push(vec![Transistor {
                    name: format!("{}{}", polarity.device_prefix(), device_index),
                    source,
                    drain,
                    gate,
                }]);
                device_index += 1;
            }
            PostfixTok::And => {
                let mut right = pop(&mut stack, "AND")?;
                let mut left = pop(&mut stack, "AND")?;

                // Series: thread current out of the left sub-network into the
                // right one at a single shared junction.
                let old_source = right[0].source;
                let new_source = last(&left).drain;
                for transistor in &mut right {
                    if transistor.source == old_source {
                        transistor.source = new_source;
                    }
                }

                left.extend(right);
                stack.push(left);
            }
            PostfixTok::Or => {
                let mut right = pop(&mut stack, "OR")?;
                let mut left = pop(&mut stack, "OR")?;

                // Parallel: unify both entry junctions and both exit
                // junctions.
                let old_source = right[0].source;
                let new_source = left[0].source;
                let old_drain = last(&right).drain;
                let new_drain = last(&left).drain;
                for transistor in &mut right {
                    if transistor.source == old_source {
                        transistor.source = new_source;
                    }
                    if transistor.drain == old_drain {
                        transistor.drain = new_drain;
                    }
                }

                left.extend(right);
                stack.push(left);
            }
            PostfixTok::Not => {
                return Err(CompileError::MalformedExpression(
                    "NOT token reached the synthesizer".to_string(),
                ))
            }
        }
    }

    let mut transistors = match (stack.pop(), stack.is_empty()) {
        (Some(network), true) => network,
        (Some(_), false) => {
            return Err(CompileError::MalformedExpression(
                "expression left more than one network on the stack".to_string(),
            ))
        }
        (None, _) => {
            return Err(CompileError::MalformedExpression(
                "expression produced no network".to_string(),
            ))
        }
    };

    // Boundary renaming: the overall entry junction becomes the supply rail,
    // the overall exit junction becomes OUTPUT.
    let entry = transistors[0].source;
    let exit = last(&transistors).drain;
    for transistor in &mut transistors {
        if transistor.source == entry {
            transistor.source = polarity.rail();
        }
        if transistor.drain == exit {
            transistor.drain = Junction::Output;
        }
    }

    debug!(
        "built {} network with {} transistor(s)",
        polarity.device_prefix(),
        transistors.len()
    );

    Ok(Network {
        polarity,
        transistors,
    })
}

fn pop(stack: &mut Vec<Vec<Transistor>>, op: &str) -> Result<Vec<Transistor>, CompileError> {
    stack.pop().ok_or_else(|| {
        CompileError::MalformedExpression(format!("operator '{}' is missing an operand", op))
    })
}

// Sub-networks always hold at least one transistor.
fn last(network: &[Transistor]) -> &Transistor {
    network.last().expect("sub-network cannot be empty")
}

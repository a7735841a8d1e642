//inverter/mod.rs
use log::debug;

use crate::{CompileError, PostfixTok};

/// Remove every NOT token from a postfix sequence by pushing its effect into
/// the sub-expression it negates: literals toggle their sign, AND and OR swap
/// with both operands recursively negated (De Morgan). The synthesizer has no
/// inverter device, so inversion has to be absorbed here.
///
/// Inversion preserves the length of the span it rewrites, so the driving
/// loop splices the inverted span back over the original and then deletes
/// the NOT token itself.
pub fn eliminate_not(mut postfix: Vec<PostfixTok>) -> Result<Vec<PostfixTok>, CompileError> {
    let mut index = 0;

    while index < postfix.len() {
        if postfix[index] != PostfixTok::Not {
            index += 1;
            continue;
        }
        if index == 0 {
            return Err(CompileError::MalformedExpression(
                "NOT operator with no operand".to_string(),
            ));
        }

        let (inverted, consumed) = invert_span(&postfix, index - 1)?;
        debug!(
            "inverting span of {} token(s) ending at {}",
            consumed,
            index - 1
        );
        postfix.splice(index - consumed..index, inverted);
        postfix.remove(index);
        // The token that followed the NOT now sits at `index`; rescan from
        // the same position.
    }

    Ok(postfix)
}

/// Invert the sub-expression whose postfix form ends at `end`. Returns the
/// inverted sub-sequence together with the number of tokens it spans, leaving
/// the input untouched (no in-place index aliasing).
fn invert_span(postfix: &[PostfixTok], end: usize) -> Result<(Vec<PostfixTok>, usize), CompileError> {
    match postfix.get(end) {
        Some(PostfixTok::Lit(lit)) => Ok((vec![PostfixTok::Lit(lit.complement())], 1)),
        Some(op @ (PostfixTok::And | PostfixTok::Or)) => {
            let swapped = if *op == PostfixTok::And {
                PostfixTok::Or
            } else {
                PostfixTok::And
            };

            // Right operand ends just before the operator, the left operand
            // just before the right one. NOT distributes over both.
            let right_end = end
                .checked_sub(1)
                .ok_or_else(|| missing_operand(op))?;
            let (right, right_len) = invert_span(postfix, right_end)?;

            let left_end = right_end
                .checked_sub(right_len)
                .ok_or_else(|| missing_operand(op))?;
            let (left, left_len) = invert_span(postfix, left_end)?;

            let mut inverted = left;
            inverted.extend(right);
            inverted.push(swapped);
            Ok((inverted, left_len + right_len + 1))
        }
        Some(PostfixTok::Not) => Err(CompileError::MalformedExpression(
            "unexpected NOT inside an inversion span".to_string(),
        )),
        None => Err(CompileError::MalformedExpression(
            "inversion ran past the start of the expression".to_string(),
        )),
    }
}

fn missing_operand(op: &PostfixTok) -> CompileError {
    CompileError::MalformedExpression(format!("operator '{}' is missing an operand", op))
}

//parser/mod.rs
use itertools::Itertools;

use crate::{Assignment, CompileError, Literal, PostfixTok, Token};

// NOT binds tightest, then AND, then OR. Parens only steer the stack.
fn precedence(token: &Token) -> u8 {
    match token {
        Token::Not => 3,
        Token::And => 2,
        Token::Or => 1,
        _ => 0,
    }
}

/// Operator-precedence (shunting-yard) conversion of a token stream to
/// postfix. Operators are left-associative, so an equal-precedence stack top
/// is popped before pushing. Unbalanced parentheses surface here as
/// `MalformedExpression`, never later in the pipeline.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<PostfixTok>, CompileError> {
    let mut operator_stack: Vec<Token> = Vec::new();
    let mut postfix: Vec<PostfixTok> = Vec::new();

    for token in tokens {
        match token {
            Token::Var(name) => postfix.push(PostfixTok::Lit(Literal::new(name.clone()))),
            Token::Open => operator_stack.push(Token::Open),
            Token::Close => loop {
                match operator_stack.pop() {
                    Some(Token::Open) => break,
                    Some(op) => postfix.push(emit(&op)),
                    None => {
                        return Err(CompileError::MalformedExpression(
                            "unbalanced parentheses: ')' without matching '('".to_string(),
                        ))
                    }
                }
            },
            op => {
                while let Some(top) = operator_stack.last() {
                    if *top == Token::Open || precedence(top) < precedence(op) {
                        break;
                    }
                    let popped = operator_stack.pop().unwrap();
                    postfix.push(emit(&popped));
                }
                operator_stack.push(op.clone());
            }
        }
    }

    while let Some(op) = operator_stack.pop() {
        if op == Token::Open {
            return Err(CompileError::MalformedExpression(
                "unbalanced parentheses: '(' without matching ')'".to_string(),
            ));
        }
        postfix.push(emit(&op));
    }

    Ok(postfix)
}

fn emit(op: &Token) -> PostfixTok {
    match op {
        Token::And => PostfixTok::And,
        Token::Or => PostfixTok::Or,
        Token::Not => PostfixTok::Not,
        // Parens are filtered out by the caller.
        _ => unreachable!("parenthesis leaked onto the operator output"),
    }
}

/// Input signal names of an expression: every distinct variable in the
/// postfix form, sorted for stable reporting.
pub fn discover_inputs(postfix: &[PostfixTok]) -> Vec<String> {
    postfix
        .iter()
        .filter_map(|tok| match tok {
            PostfixTok::Lit(lit) => Some(lit.name.clone()),
            _ => None,
        })
        .unique()
        .sorted()
        .collect()
}

/// Evaluate a postfix sequence (NOT tokens allowed) under an assignment.
/// This is the truth oracle the verifier compares netlist behavior against.
pub fn eval_postfix(postfix: &[PostfixTok], assignment: &Assignment) -> Result<bool, CompileError> {
    let mut stack: Vec<bool> = Vec::new();

    for tok in postfix {
        match tok {
            PostfixTok::Lit(lit) => stack.push(assignment.value_of(lit)?),
            PostfixTok::Not => {
                let value = stack.pop().ok_or_else(underflow)?;
                stack.push(!value);
            }
            PostfixTok::And => {
                let rhs = stack.pop().ok_or_else(underflow)?;
                let lhs = stack.pop().ok_or_else(underflow)?;
                stack.push(lhs && rhs);
            }
            PostfixTok::Or => {
                let rhs = stack.pop().ok_or_else(underflow)?;
                let lhs = stack.pop().ok_or_else(underflow)?;
                stack.push(lhs || rhs);
            }
        }
    }

    if stack.len() != 1 {
        return Err(CompileError::MalformedExpression(format!(
            "postfix sequence did not reduce to one value ({} left)",
            stack.len()
        )));
    }
    Ok(stack[0])
}

fn underflow() -> CompileError {
    CompileError::MalformedExpression("operand stack underflow".to_string())
}

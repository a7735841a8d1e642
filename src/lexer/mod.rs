//lexer/mod.rs
use crate::Token;

const SYMBOLS: [char; 6] = ['(', ')', '+', '.', '~', ' '];

/// Split a raw expression string into tokens. Every maximal run of
/// non-symbol characters becomes one variable name; every non-space symbol
/// becomes its own token; spaces are dropped. Variable name content is not
/// validated here.
pub fn tokenize(expr: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut name = String::new();

    for ch in expr.chars() {
        if SYMBOLS.contains(&ch) {
            if !name.is_empty() {
                tokens.push(Token::Var(std::mem::take(&mut name)));
            }
            match ch {
                '(' => tokens.push(Token::Open),
                ')' => tokens.push(Token::Close),
                '+' => tokens.push(Token::Or),
                '.' => tokens.push(Token::And),
                '~' => tokens.push(Token::Not),
                _ => {} // space
            }
        } else {
            name.push(ch);
        }
    }

    if !name.is_empty() {
        tokens.push(Token::Var(name));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Token {
        Token::Var(name.to_string())
    }

    #[test]
    fn single_variable() {
        assert_eq!(tokenize("A"), vec![var("A")]);
    }

    #[test]
    fn operators_and_parens() {
        assert_eq!(
            tokenize("~(A+B).C"),
            vec![
                Token::Not,
                Token::Open,
                var("A"),
                Token::Or,
                var("B"),
                Token::Close,
                Token::And,
                var("C"),
            ]
        );
    }

    #[test]
    fn spaces_are_dropped() {
        assert_eq!(
            tokenize("  A +  B "),
            vec![var("A"), Token::Or, var("B")]
        );
    }

    #[test]
    fn multi_character_names() {
        assert_eq!(
            tokenize("~(SUM1 + SUM2)"),
            vec![
                Token::Not,
                Token::Open,
                var("SUM1"),
                Token::Or,
                var("SUM2"),
                Token::Close,
            ]
        );
    }

    #[test]
    fn nested_expression_from_the_manual() {
        let tokens = tokenize("~(~(A+B).C+~D)");
        assert_eq!(tokens.len(), 14);
        assert_eq!(tokens[0], Token::Not);
        assert_eq!(tokens[13], Token::Close);
    }

    #[test]
    fn empty_string_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}

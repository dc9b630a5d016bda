use super::{HeadRule, Rule};
use crate::error::{Result, SyntaxError};
use crate::surface::SignedSurface;

/// Tokens of the rule grammar: signed integers, parentheses, and the OR
/// colon. AND is juxtaposition and never appears as a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    Colon,
    Ref(SignedSurface),
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        match c {
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            ':' => {
                tokens.push(Token::Colon);
                chars.next();
            }
            '+' | '-' | '0'..='9' => {
                chars.next();
                let mut end = start + c.len_utf8();
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let lexeme = &text[start..end];
                let raw: i64 = lexeme
                    .parse()
                    .map_err(|_| SyntaxError::UnexpectedToken(lexeme.to_owned()))?;
                let reference = SignedSurface::from_i64(raw)
                    .ok_or_else(|| SyntaxError::ZeroReference(text.to_owned()))?;
                tokens.push(Token::Ref(reference));
            }
            _ => {
                let end = text[start..]
                    .find(char::is_whitespace)
                    .map_or(text.len(), |off| start + off);
                return Err(SyntaxError::UnexpectedToken(text[start..end].to_owned()).into());
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    // expr := term { ':' term }
    fn expr(&mut self) -> Result<Rule> {
        let mut node = self.term()?;
        while self.peek() == Some(Token::Colon) {
            self.pos += 1;
            let rhs = self.term()?;
            node = Rule::Or(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    // term := factor { factor }  (adjacency is AND, binds tighter than ':')
    fn term(&mut self) -> Result<Rule> {
        let mut node = self.factor()?;
        while matches!(self.peek(), Some(Token::Ref(_) | Token::LParen)) {
            let rhs = self.factor()?;
            node = Rule::And(Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn factor(&mut self) -> Result<Rule> {
        match self.bump() {
            Some(Token::Ref(reference)) => Ok(Rule::Leaf(reference)),
            Some(Token::LParen) => {
                self.depth += 1;
                let inner = self.expr()?;
                if self.bump() != Some(Token::RParen) {
                    return Err(SyntaxError::UnbalancedParentheses(self.text.to_owned()).into());
                }
                self.depth -= 1;
                Ok(inner)
            }
            Some(Token::RParen | Token::Colon) => {
                Err(SyntaxError::EmptyOperand(self.text.to_owned()).into())
            }
            None => {
                if self.depth > 0 {
                    Err(SyntaxError::UnbalancedParentheses(self.text.to_owned()).into())
                } else {
                    Err(SyntaxError::EmptyOperand(self.text.to_owned()).into())
                }
            }
        }
    }
}

impl HeadRule {
    /// Parses rule text into a tree.
    ///
    /// Blank input parses to the empty ("always true") rule, which is what
    /// makes concatenation of serialized fragments a valid AND-composition
    /// even when one fragment is absent.
    ///
    /// # Errors
    ///
    /// Returns a syntax error carrying the offending fragment on unbalanced
    /// parentheses, unknown tokens, zero references, or missing operands.
    pub fn parse(text: &str) -> Result<Self> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Ok(Self::default());
        }
        let mut parser = Parser {
            text,
            tokens,
            pos: 0,
            depth: 0,
        };
        let root = parser.expr()?;
        match parser.bump() {
            None => Ok(Self::new(root)),
            Some(Token::RParen) => {
                Err(SyntaxError::UnbalancedParentheses(text.to_owned()).into())
            }
            Some(_) => Err(SyntaxError::UnexpectedToken(text.to_owned()).into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CsgError;

    fn parse(text: &str) -> HeadRule {
        HeadRule::parse(text).unwrap()
    }

    #[test]
    fn blank_input_is_the_empty_rule() {
        assert!(parse("").is_true());
        assert!(parse("   \t ").is_true());
    }

    #[test]
    fn adjacency_is_and() {
        let r = parse("1 -2 3");
        assert_eq!(r.to_string(), "1 -2 3");
    }

    #[test]
    fn colon_is_or_with_lower_precedence() {
        // AND binds tighter: "1 2 : 3" is (1 AND 2) OR 3
        let r = parse("1 2 : 3");
        assert_eq!(r.to_string(), "(1 2 : 3)");
        let Rule::Or(lhs, _) = r.root() else {
            panic!("expected OR root");
        };
        assert!(matches!(**lhs, Rule::And(_, _)));
    }

    #[test]
    fn parentheses_group_subexpressions() {
        let r = parse("(1 : 2) -3");
        let Rule::And(lhs, rhs) = r.root() else {
            panic!("expected AND root");
        };
        assert!(matches!(**lhs, Rule::Or(_, _)));
        assert!(matches!(**rhs, Rule::Leaf(_)));
    }

    #[test]
    fn whitespace_around_tokens_is_optional() {
        assert_eq!(parse("(1:2)-3"), parse("( 1 : 2 ) -3"));
    }

    #[test]
    fn explicit_plus_signs_are_accepted() {
        assert_eq!(parse("+1 -2"), parse("1 -2"));
    }

    #[test]
    fn unbalanced_parentheses_carry_the_text() {
        let err = HeadRule::parse("1 (2 3").unwrap_err();
        let CsgError::Syntax(SyntaxError::UnbalancedParentheses(fragment)) = err else {
            panic!("expected unbalanced parentheses, got {err}");
        };
        assert_eq!(fragment, "1 (2 3");
        assert!(HeadRule::parse("1 2) 3").is_err());
    }

    #[test]
    fn zero_reference_is_rejected() {
        let err = HeadRule::parse("1 0 2").unwrap_err();
        assert!(matches!(
            err,
            CsgError::Syntax(SyntaxError::ZeroReference(_))
        ));
    }

    #[test]
    fn unknown_token_carries_the_fragment() {
        let err = HeadRule::parse("1 & 2").unwrap_err();
        let CsgError::Syntax(SyntaxError::UnexpectedToken(fragment)) = err else {
            panic!("expected unexpected token, got {err}");
        };
        assert_eq!(fragment, "&");
    }

    #[test]
    fn missing_operands_are_rejected() {
        assert!(HeadRule::parse("()").is_err());
        assert!(HeadRule::parse("1 :").is_err());
        assert!(HeadRule::parse(": 2").is_err());
        assert!(HeadRule::parse("1 : : 2").is_err());
        assert!(HeadRule::parse("-").is_err());
    }

    #[test]
    fn display_reparses_to_the_same_tree() {
        let r = parse("(1 : 2 -3) 4 (-5 : 6)");
        assert_eq!(HeadRule::parse(&r.to_string()).unwrap(), r);
    }

    #[test]
    fn concatenated_fragments_parse_to_the_intersection() {
        let a = parse("(1 : 2)");
        let b = parse("-3");
        let joined = parse(&format!("{a} {b}"));
        assert_eq!(joined, a.intersect(&b));

        // an absent fragment concatenates away
        let joined = parse(&format!("{} {b}", HeadRule::default()));
        assert_eq!(joined, b);
    }
}

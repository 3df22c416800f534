//! Restricted repeat-count expression evaluator.
//!
//! Deliberately small: integer literals, field-name identifiers, the four
//! arithmetic operators, `min`/`max` and parentheses. The expression text
//! is static registry data, so syntax errors are fatal spec defects; the
//! operand values come from the input stream, so data-dependent conditions
//! (absent identifier, division by zero) evaluate to 0 instead of raising.

use super::error::SpecError;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(i64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
}

fn err(expr: &str, reason: impl Into<String>) -> SpecError {
    SpecError::Expr {
        expr: expr.to_string(),
        reason: reason.into(),
    }
}

fn tokenize(expr: &str) -> Result<Vec<Token>, SpecError> {
    let mut tokens = Vec::new();
    let bytes = expr.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '0'..='9' => {
                let start = i;
                while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                    i += 1;
                }
                let value = expr[start..i]
                    .parse::<i64>()
                    .map_err(|_| err(expr, "integer literal out of range"))?;
                tokens.push(Token::Num(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < bytes.len() {
                    let c = bytes[i] as char;
                    if c.is_ascii_alphanumeric() || c == '_' {
                        i += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(expr[start..i].to_string()));
            }
            other => return Err(err(expr, format!("unexpected character `{other}`"))),
        }
    }
    Ok(tokens)
}

struct Parser<'a, 'f> {
    expr: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    lookup: &'f dyn Fn(&str) -> Option<i64>,
}

impl Parser<'_, '_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, token: &Token) -> Result<(), SpecError> {
        if self.peek() == Some(token) {
            self.pos += 1;
            Ok(())
        } else {
            Err(err(self.expr, format!("expected {token:?}")))
        }
    }

    fn expr(&mut self) -> Result<i64, SpecError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value = value.wrapping_add(self.term()?);
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value = value.wrapping_sub(self.term()?);
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<i64, SpecError> {
        let mut value = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value = value.wrapping_mul(self.factor()?);
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.factor()?;
                    // Divisors are data-dependent; a zero must not raise.
                    value = if divisor == 0 { 0 } else { value / divisor };
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<i64, SpecError> {
        match self.next() {
            Some(Token::Num(value)) => Ok(value),
            Some(Token::Minus) => Ok(-self.factor()?),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(value)
            }
            Some(Token::Ident(name)) if name == "min" || name == "max" => {
                self.expect(&Token::LParen)?;
                let a = self.expr()?;
                self.expect(&Token::Comma)?;
                let b = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(if name == "min" { a.min(b) } else { a.max(b) })
            }
            Some(Token::Ident(name)) => Ok((self.lookup)(&name).unwrap_or(0)),
            _ => Err(err(self.expr, "unexpected end of expression")),
        }
    }
}

/// Evaluate a repeat-count expression against a field lookup.
pub(crate) fn eval(expr: &str, lookup: &dyn Fn(&str) -> Option<i64>) -> Result<i64, SpecError> {
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return Err(err(expr, "empty expression"));
    }
    let mut parser = Parser {
        expr,
        tokens,
        pos: 0,
        lookup,
    };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(err(expr, "trailing tokens"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::eval;

    fn no_fields(_: &str) -> Option<i64> {
        None
    }

    #[test]
    fn literal_arithmetic_and_precedence() {
        assert_eq!(eval("1 + 2 * 3", &no_fields).unwrap(), 7);
        assert_eq!(eval("(1 + 2) * 3", &no_fields).unwrap(), 9);
        assert_eq!(eval("10 / 2 - 3", &no_fields).unwrap(), 2);
        assert_eq!(eval("-4 + 6", &no_fields).unwrap(), 2);
    }

    #[test]
    fn min_max_and_identifiers() {
        let lookup = |name: &str| match name {
            "numSV" => Some(10),
            "msgNum" => Some(2),
            _ => None,
        };
        assert_eq!(eval("min(4, numSV - (msgNum - 1) * 4)", &lookup).unwrap(), 4);
        assert_eq!(eval("max(0, numSV - 12)", &lookup).unwrap(), 0);
    }

    #[test]
    fn absent_identifier_and_zero_divisor_are_zero() {
        assert_eq!(eval("missing + 1", &no_fields).unwrap(), 1);
        assert_eq!(eval("5 / missing", &no_fields).unwrap(), 0);
    }

    #[test]
    fn syntax_errors_are_fatal() {
        assert!(eval("", &no_fields).is_err());
        assert!(eval("1 +", &no_fields).is_err());
        assert!(eval("min(1)", &no_fields).is_err());
        assert!(eval("a ^ b", &no_fields).is_err());
        assert!(eval("(1 + 2", &no_fields).is_err());
        assert!(eval("1 2", &no_fields).is_err());
    }
}

//! Tokenizer for formula code.

use super::FormulaError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Text(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Assign,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    /// Statement separator: newline or `;`.
    End,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

pub fn tokenize(code: &str) -> Result<Vec<Spanned>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = code.chars().peekable();
    let mut line = 1;

    while let Some(&c) = chars.peek() {
        let token = match c {
            '\n' | ';' => {
                chars.next();
                let token = Token::End;
                tokens.push(Spanned { token, line });
                if c == '\n' {
                    line += 1;
                }
                continue;
            }
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '#' => {
                while chars.peek().is_some_and(|c| *c != '\n') {
                    chars.next();
                }
                continue;
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' || d == '_' {
                        if d != '_' {
                            literal.push(d);
                        }
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| FormulaError::syntax(line, format!("bad number '{literal}'")))?;
                Token::Number(value)
            }
            '"' => {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => text.push('\n'),
                            Some(other) => text.push(other),
                            None => return Err(FormulaError::syntax(line, "unterminated string")),
                        },
                        Some('\n') | None => {
                            return Err(FormulaError::syntax(line, "unterminated string"));
                        }
                        Some(other) => text.push(other),
                    }
                }
                Token::Text(text)
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' {
                        ident.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Ident(ident)
            }
            _ => {
                chars.next();
                let next_is_eq = chars.peek() == Some(&'=');
                let (token, two_chars) = match (c, next_is_eq) {
                    ('+', _) => (Token::Plus, false),
                    ('-', _) => (Token::Minus, false),
                    ('*', _) => (Token::Star, false),
                    ('/', _) => (Token::Slash, false),
                    ('%', _) => (Token::Percent, false),
                    ('(', _) => (Token::LParen, false),
                    (')', _) => (Token::RParen, false),
                    ('[', _) => (Token::LBracket, false),
                    (']', _) => (Token::RBracket, false),
                    (',', _) => (Token::Comma, false),
                    ('=', true) => (Token::EqEq, true),
                    ('=', false) => (Token::Assign, false),
                    ('!', true) => (Token::NotEq, true),
                    ('<', true) => (Token::Le, true),
                    ('<', false) => (Token::Lt, false),
                    ('>', true) => (Token::Ge, true),
                    ('>', false) => (Token::Gt, false),
                    (other, _) => {
                        return Err(FormulaError::syntax(line, format!("unexpected character '{other}'")));
                    }
                };
                if two_chars {
                    chars.next();
                }
                token
            }
        };
        tokens.push(Spanned { token, line });
    }

    tokens.push(Spanned {
        token: Token::Eof,
        line,
    });
    Ok(tokens)
}

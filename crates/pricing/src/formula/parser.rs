//! Recursive-descent parser producing a statement list.
//!
//! Precedence, lowest first: `or`, `and`, `not`, comparisons, `+ -`,
//! `* / %`, unary `-`, primaries.

use super::FormulaError;
use super::lexer::{Spanned, Token, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Text(String),
    List(Vec<Expr>),
    Var(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub target: String,
    pub value: Expr,
    pub line: usize,
}

/// A parsed formula, ready to run any number of times.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// Deepest expression tree (and parser recursion) a formula may produce.
pub const MAX_NESTING: usize = 64;

const TOO_DEEP: &str = "expression nested too deeply";

pub fn parse(code: &str) -> Result<Program, FormulaError> {
    let tokens = tokenize(code)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let mut statements = Vec::new();

    loop {
        parser.skip_separators();
        if parser.peek() == &Token::Eof {
            break;
        }
        statements.push(parser.statement()?);
        match parser.peek() {
            Token::End | Token::Eof => {}
            other => {
                return Err(FormulaError::syntax(
                    parser.line(),
                    format!("expected end of statement, found {}", describe(other)),
                ));
            }
        }
    }

    Ok(Program { statements })
}

/// An expression with the height of its tree.
struct Parsed {
    expr: Expr,
    height: usize,
}

impl Parsed {
    fn leaf(expr: Expr) -> Self {
        Self { expr, height: 1 }
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // `tokenize` always ends with `Eof`, and `advance` never moves past it.
        &self.tokens[self.pos].token
    }

    fn line(&self) -> usize {
        self.tokens[self.pos].line
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].token.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), FormulaError> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(FormulaError::syntax(
                self.line(),
                format!("expected {}, found {}", describe(&expected), describe(self.peek())),
            ))
        }
    }

    fn skip_separators(&mut self) {
        while self.eat(&Token::End) {}
    }

    /// Run `parse` one recursion level deeper.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, FormulaError>,
    ) -> Result<T, FormulaError> {
        if self.depth >= MAX_NESTING {
            return Err(FormulaError::syntax(self.line(), TOO_DEEP));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Wrap `expr` over children of at most `child_height`.
    fn node(&self, expr: Expr, child_height: usize) -> Result<Parsed, FormulaError> {
        let height = child_height + 1;
        if height > MAX_NESTING {
            return Err(FormulaError::syntax(self.line(), TOO_DEEP));
        }
        Ok(Parsed { expr, height })
    }

    fn binary(&self, op: BinaryOp, lhs: Parsed, rhs: Parsed) -> Result<Parsed, FormulaError> {
        let height = lhs.height.max(rhs.height);
        self.node(Expr::Binary(op, Box::new(lhs.expr), Box::new(rhs.expr)), height)
    }

    fn unary_node(&self, op: UnaryOp, operand: Parsed) -> Result<Parsed, FormulaError> {
        let height = operand.height;
        self.node(Expr::Unary(op, Box::new(operand.expr)), height)
    }

    fn statement(&mut self) -> Result<Statement, FormulaError> {
        let line = self.line();
        let target = match self.advance() {
            Token::Ident(name) if !is_keyword(&name) => name,
            other => {
                return Err(FormulaError::syntax(
                    line,
                    format!("expected a name to assign, found {}", describe(&other)),
                ));
            }
        };
        self.expect(Token::Assign)?;
        let value = self.or_expr()?.expr;
        Ok(Statement {
            target,
            value,
            line,
        })
    }

    fn or_expr(&mut self) -> Result<Parsed, FormulaError> {
        let mut lhs = self.and_expr()?;
        while self.eat_keyword("or") {
            let rhs = self.and_expr()?;
            lhs = self.binary(BinaryOp::Or, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Parsed, FormulaError> {
        let mut lhs = self.not_expr()?;
        while self.eat_keyword("and") {
            let rhs = self.not_expr()?;
            lhs = self.binary(BinaryOp::And, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Parsed, FormulaError> {
        if self.eat_keyword("not") {
            let operand = self.nested(Self::not_expr)?;
            return self.unary_node(UnaryOp::Not, operand);
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Parsed, FormulaError> {
        let lhs = self.additive()?;
        let op = match self.peek() {
            Token::EqEq => BinaryOp::Eq,
            Token::NotEq => BinaryOp::NotEq,
            Token::Lt => BinaryOp::Lt,
            Token::Le => BinaryOp::Le,
            Token::Gt => BinaryOp::Gt,
            Token::Ge => BinaryOp::Ge,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.additive()?;
        self.binary(op, lhs, rhs)
    }

    fn additive(&mut self) -> Result<Parsed, FormulaError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.multiplicative()?;
            lhs = self.binary(op, lhs, rhs)?;
        }
    }

    fn multiplicative(&mut self) -> Result<Parsed, FormulaError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = self.binary(op, lhs, rhs)?;
        }
    }

    fn unary(&mut self) -> Result<Parsed, FormulaError> {
        if self.eat(&Token::Minus) {
            let operand = self.nested(Self::unary)?;
            return self.unary_node(UnaryOp::Neg, operand);
        }
        if self.eat(&Token::Plus) {
            return self.nested(Self::unary);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Parsed, FormulaError> {
        let line = self.line();
        match self.advance() {
            Token::Number(n) => Ok(Parsed::leaf(Expr::Number(n))),
            Token::Text(s) => Ok(Parsed::leaf(Expr::Text(s))),
            Token::LParen => self.nested(|parser| {
                let inner = parser.or_expr()?;
                parser.expect(Token::RParen)?;
                Ok(inner)
            }),
            Token::LBracket => {
                let (items, height) = self.nested(|parser| parser.arguments(Token::RBracket))?;
                self.node(Expr::List(items), height)
            }
            Token::Ident(name) if !is_keyword(&name) => {
                if self.eat(&Token::LParen) {
                    let (args, height) = self.nested(|parser| parser.arguments(Token::RParen))?;
                    self.node(Expr::Call(name, args), height)
                } else {
                    Ok(Parsed::leaf(Expr::Var(name)))
                }
            }
            other => Err(FormulaError::syntax(
                line,
                format!("expected a value, found {}", describe(&other)),
            )),
        }
    }

    /// Comma-separated expressions up to `close` (already past the opener),
    /// with the tallest of their heights.
    fn arguments(&mut self, close: Token) -> Result<(Vec<Expr>, usize), FormulaError> {
        let mut items = Vec::new();
        let mut height = 0;
        if self.eat(&close) {
            return Ok((items, height));
        }
        loop {
            let item = self.or_expr()?;
            height = height.max(item.height);
            items.push(item.expr);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(close)?;
            return Ok((items, height));
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Token::Ident(name) if name == keyword) {
            self.advance();
            true
        } else {
            false
        }
    }
}

fn is_keyword(name: &str) -> bool {
    matches!(name, "and" | "or" | "not")
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(n) => format!("number {n}"),
        Token::Text(_) => "string".into(),
        Token::Ident(name) => format!("'{name}'"),
        Token::End => "end of statement".into(),
        Token::Eof => "end of code".into(),
        Token::Plus => "'+'".into(),
        Token::Minus => "'-'".into(),
        Token::Star => "'*'".into(),
        Token::Slash => "'/'".into(),
        Token::Percent => "'%'".into(),
        Token::LParen => "'('".into(),
        Token::RParen => "')'".into(),
        Token::LBracket => "'['".into(),
        Token::RBracket => "']'".into(),
        Token::Comma => "','".into(),
        Token::Assign => "'='".into(),
        Token::EqEq => "'=='".into(),
        Token::NotEq => "'!='".into(),
        Token::Lt => "'<'".into(),
        Token::Le => "'<='".into(),
        Token::Gt => "'>'".into(),
        Token::Ge => "'>='".into(),
    }
}

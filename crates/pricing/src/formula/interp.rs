//! Tree-walking interpreter with a per-run scope and a step budget.

use std::collections::HashMap;
use std::fmt;

use super::parser::{BinaryOp, Expr, Program, UnaryOp};
use super::{FormulaContext, FormulaError, FormulaOutcome};

/// Longest text value a formula may build.
pub const MAX_TEXT_LEN: usize = 4096;

/// Most values a list may hold, counting the contents of nested lists.
pub const MAX_LIST_LEN: usize = 1024;

const TOTAL_SLOT: &str = "total";
const LINES_SLOT: &str = "breakdown_lines";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    List(Vec<Value>),
}

impl Value {
    fn truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::Text(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::List(items) => !items.is_empty(),
        }
    }

    /// Values held by a list, nested lists included; zero for scalars.
    fn elements(&self) -> usize {
        match self {
            Value::List(items) => items.iter().map(|item| 1 + item.elements()).sum(),
            _ => 0,
        }
    }

    /// Display form, refused once it passes [`MAX_TEXT_LEN`] bytes.
    fn render(&self) -> Option<String> {
        let mut out = Capped(String::new());
        fmt::Write::write_fmt(&mut out, format_args!("{}", self)).ok()?;
        Some(out.0)
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Text sink that fails instead of growing past [`MAX_TEXT_LEN`].
struct Capped(String);

impl fmt::Write for Capped {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.0.len() + s.len() > MAX_TEXT_LEN {
            return Err(fmt::Error);
        }
        self.0.push_str(s);
        Ok(())
    }
}

/// State of one formula run. Built fresh for every invocation.
pub struct Interpreter<'a> {
    context: &'a FormulaContext,
    locals: HashMap<String, Value>,
    steps: usize,
    step_limit: usize,
    line: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(context: &'a FormulaContext, step_limit: usize) -> Self {
        Self {
            context,
            locals: HashMap::new(),
            steps: 0,
            step_limit,
            line: 0,
        }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn run(&mut self, program: &Program) -> Result<FormulaOutcome, FormulaError> {
        for statement in &program.statements {
            self.line = statement.line;
            if self.input(&statement.target).is_some() {
                return Err(self.fail(format!("'{}' is read-only", statement.target)));
            }
            let value = self.eval(&statement.value)?;
            self.locals.insert(statement.target.clone(), value);
        }
        self.outcome()
    }

    fn outcome(&self) -> Result<FormulaOutcome, FormulaError> {
        let total = match self.locals.get(TOTAL_SLOT) {
            None => self.context.base_total,
            Some(Value::Number(n)) if n.is_finite() => *n,
            Some(Value::Number(_)) => {
                return Err(FormulaError::runtime(self.line, "total is not a finite number"));
            }
            Some(other) => {
                return Err(FormulaError::runtime(
                    self.line,
                    format!("total must be a number, got {}", other.type_name()),
                ));
            }
        };

        let breakdown_lines = match self.locals.get(LINES_SLOT) {
            None => Vec::new(),
            Some(Value::List(items)) => items
                .iter()
                .map(|item| self.render(item))
                .collect::<Result<Vec<_>, _>>()?,
            Some(scalar) => vec![self.render(scalar)?],
        };

        Ok(FormulaOutcome {
            total,
            breakdown_lines,
        })
    }

    fn input(&self, name: &str) -> Option<f64> {
        match name {
            "width" => Some(self.context.width),
            "height" => Some(self.context.height),
            "area" => Some(self.context.area),
            "base_total" => Some(self.context.base_total),
            _ => None,
        }
    }

    fn fail(&self, message: impl Into<String>) -> FormulaError {
        FormulaError::runtime(self.line, message)
    }

    fn render(&self, value: &Value) -> Result<String, FormulaError> {
        value.render().ok_or_else(|| self.fail("text value too long"))
    }

    fn check_list(&self, items: Vec<Value>) -> Result<Value, FormulaError> {
        let list = Value::List(items);
        if list.elements() > MAX_LIST_LEN {
            return Err(self.fail("list too long"));
        }
        Ok(list)
    }

    fn tick(&mut self) -> Result<(), FormulaError> {
        self.charge(1)
    }

    /// Spend `units` steps of the budget.
    fn charge(&mut self, units: usize) -> Result<(), FormulaError> {
        self.steps = self.steps.saturating_add(units);
        if self.steps > self.step_limit {
            return Err(FormulaError::StepLimit(self.step_limit));
        }
        Ok(())
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, FormulaError> {
        self.tick()?;
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Text(s) if s.len() > MAX_TEXT_LEN => Err(self.fail("text value too long")),
            Expr::Text(s) => Ok(Value::Text(s.clone())),
            Expr::List(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval(item))
                    .collect::<Result<Vec<_>, _>>()?;
                self.check_list(values)
            }
            Expr::Var(name) => {
                if let Some(n) = self.input(name) {
                    return Ok(Value::Number(n));
                }
                let value = self
                    .locals
                    .get(name)
                    .ok_or_else(|| self.fail(format!("unknown name '{name}'")))?;
                // Copying a list costs a step per value it holds.
                let copied = value.elements();
                let value = value.clone();
                self.charge(copied)?;
                Ok(value)
            }
            Expr::Unary(op, operand) => {
                let value = self.eval(operand)?;
                match (op, value) {
                    (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
                    (UnaryOp::Neg, other) => {
                        Err(self.fail(format!("cannot negate {}", other.type_name())))
                    }
                    (UnaryOp::Not, value) => Ok(Value::Bool(!value.truthy())),
                }
            }
            Expr::Binary(BinaryOp::And, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                if !lhs.truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval(rhs)?.truthy()))
            }
            Expr::Binary(BinaryOp::Or, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                if lhs.truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval(rhs)?.truthy()))
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                self.binary(*op, lhs, rhs)
            }
            Expr::Call(name, args) => self.call(name, args),
        }
    }

    fn binary(&self, op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, FormulaError> {
        use Value::{List, Number, Text};

        match (op, lhs, rhs) {
            (BinaryOp::Add, Number(a), Number(b)) => Ok(Number(a + b)),
            (BinaryOp::Add, List(a), List(b)) => {
                if a.len() + b.len() > MAX_LIST_LEN {
                    return Err(self.fail("list too long"));
                }
                let mut joined = a;
                joined.extend(b);
                self.check_list(joined)
            }
            (BinaryOp::Add, a @ Text(_), b) | (BinaryOp::Add, a, b @ Text(_)) => {
                let mut joined = self.render(&a)?;
                joined.push_str(&self.render(&b)?);
                if joined.len() > MAX_TEXT_LEN {
                    return Err(self.fail("text value too long"));
                }
                Ok(Text(joined))
            }
            (BinaryOp::Sub, Number(a), Number(b)) => Ok(Number(a - b)),
            (BinaryOp::Mul, Number(a), Number(b)) => Ok(Number(a * b)),
            (BinaryOp::Div | BinaryOp::Rem, Number(_), Number(b)) if b == 0.0 => {
                Err(self.fail("division by zero"))
            }
            (BinaryOp::Div, Number(a), Number(b)) => Ok(Number(a / b)),
            (BinaryOp::Rem, Number(a), Number(b)) => Ok(Number(a % b)),
            (BinaryOp::Eq, a, b) => Ok(Value::Bool(a == b)),
            (BinaryOp::NotEq, a, b) => Ok(Value::Bool(a != b)),
            (op @ (BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge), a, b) => {
                let ordering = match (&a, &b) {
                    (Number(x), Number(y)) => x.partial_cmp(y),
                    (Text(x), Text(y)) => Some(x.cmp(y)),
                    _ => None,
                };
                let ordering = ordering.ok_or_else(|| {
                    self.fail(format!("cannot compare {} with {}", a.type_name(), b.type_name()))
                })?;
                Ok(Value::Bool(match op {
                    BinaryOp::Lt => ordering.is_lt(),
                    BinaryOp::Le => ordering.is_le(),
                    BinaryOp::Gt => ordering.is_gt(),
                    _ => ordering.is_ge(),
                }))
            }
            (op, a, b) => Err(self.fail(format!(
                "unsupported operands for {op:?}: {} and {}",
                a.type_name(),
                b.type_name()
            ))),
        }
    }

    fn call(&mut self, name: &str, args: &[Expr]) -> Result<Value, FormulaError> {
        // `if` only evaluates the branch it takes.
        if name == "if" {
            let [cond, then, otherwise] = args else {
                return Err(self.fail("if() takes 3 arguments"));
            };
            return if self.eval(cond)?.truthy() {
                self.eval(then)
            } else {
                self.eval(otherwise)
            };
        }

        let values = args
            .iter()
            .map(|arg| self.eval(arg))
            .collect::<Result<Vec<_>, _>>()?;

        match name {
            "min" | "max" => {
                let numbers = self.numbers(name, &values)?;
                let first = *numbers
                    .first()
                    .ok_or_else(|| self.fail(format!("{name}() needs at least one argument")))?;
                let pick = numbers.iter().skip(1).fold(first, |acc, n| {
                    if name == "min" { acc.min(*n) } else { acc.max(*n) }
                });
                Ok(Value::Number(pick))
            }
            "abs" => Ok(Value::Number(self.single(name, &values)?.abs())),
            "ceil" => Ok(Value::Number(self.single(name, &values)?.ceil())),
            "floor" => Ok(Value::Number(self.single(name, &values)?.floor())),
            "sqrt" => {
                let n = self.single(name, &values)?;
                if n < 0.0 {
                    return Err(self.fail("sqrt() of a negative number"));
                }
                Ok(Value::Number(n.sqrt()))
            }
            "round" => {
                let numbers = self.numbers(name, &values)?;
                match *numbers.as_slice() {
                    [x] => Ok(Value::Number(x.round())),
                    [x, digits] => {
                        let scale = 10f64.powi(digits.clamp(0.0, 12.0) as i32);
                        Ok(Value::Number((x * scale).round() / scale))
                    }
                    _ => Err(self.fail("round() takes 1 or 2 arguments")),
                }
            }
            "str" => match values.as_slice() {
                [value] => Ok(Value::Text(self.render(value)?)),
                _ => Err(self.fail("str() takes 1 argument")),
            },
            "len" => match values.as_slice() {
                [Value::List(items)] => Ok(Value::Number(items.len() as f64)),
                [Value::Text(s)] => Ok(Value::Number(s.chars().count() as f64)),
                _ => Err(self.fail("len() takes one list or text")),
            },
            other => Err(self.fail(format!("unknown function '{other}'"))),
        }
    }

    fn numbers(&self, name: &str, values: &[Value]) -> Result<Vec<f64>, FormulaError> {
        values
            .iter()
            .map(|value| match value {
                Value::Number(n) => Ok(*n),
                other => Err(self.fail(format!(
                    "{name}() expects numbers, got {}",
                    other.type_name()
                ))),
            })
            .collect()
    }

    fn single(&self, name: &str, values: &[Value]) -> Result<f64, FormulaError> {
        match self.numbers(name, values)?.as_slice() {
            [n] => Ok(*n),
            _ => Err(self.fail(format!("{name}() takes 1 argument"))),
        }
    }
}

//! Injected per-rule calculations.
//!
//! Formula code is a small assignment language evaluated in a fresh scope per
//! call. It can read `width`, `height`, `area` and `base_total`, may set
//! `total` and `breakdown_lines`, and has no access to anything else: no host
//! state, no I/O, and a bounded number of evaluation steps.
//!
//! ```text
//! # 10% surcharge on large jobs
//! surcharge = if(area > 100000, base_total * 0.1, 0)
//! total = round(base_total + surcharge, 2)
//! breakdown_lines = ["Surcharge: " + surcharge]
//! ```

mod interp;
mod lexer;
mod parser;

use thiserror::Error;
use tracing::debug;

use forgeprice_core::{PricingError, PricingResult};

pub use parser::{Program, parse};

pub const DEFAULT_STEP_LIMIT: usize = 10_000;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormulaError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: {message}")]
    Runtime { line: usize, message: String },

    #[error("step limit of {0} exceeded")]
    StepLimit(usize),
}

impl FormulaError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn runtime(line: usize, message: impl Into<String>) -> Self {
        Self::Runtime {
            line,
            message: message.into(),
        }
    }
}

/// Read-only inputs visible to formula code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormulaContext {
    pub width: f64,
    pub height: f64,
    pub area: f64,
    pub base_total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormulaOutcome {
    /// `total` as set by the code, or `base_total` when it was left unset.
    pub total: f64,
    pub breakdown_lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormulaEvaluator {
    step_limit: usize,
}

impl Default for FormulaEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_LIMIT)
    }
}

impl FormulaEvaluator {
    pub fn new(step_limit: usize) -> Self {
        Self { step_limit }
    }

    pub fn step_limit(&self) -> usize {
        self.step_limit
    }

    /// Parse without running; used to reject broken code when a rule is saved.
    pub fn compile(&self, code: &str) -> Result<Program, FormulaError> {
        parse(code)
    }

    pub fn run(&self, program: &Program, context: &FormulaContext) -> Result<FormulaOutcome, FormulaError> {
        let mut interpreter = interp::Interpreter::new(context, self.step_limit);
        let outcome = interpreter.run(program);
        debug!(steps = interpreter.steps(), ok = outcome.is_ok(), "formula evaluated");
        outcome
    }

    /// Parse and run `code` for the rule named `rule`.
    pub fn evaluate(&self, rule: &str, code: &str, context: &FormulaContext) -> PricingResult<FormulaOutcome> {
        self.compile(code)
            .and_then(|program| self.run(&program, context))
            .map_err(|err| PricingError::evaluation(rule, err.to_string()))
    }
}

//! Pricing error model.

use thiserror::Error;

/// Result type used across the pricing workspace.
pub type PricingResult<T> = Result<T, PricingError>;

/// Pricing error.
///
/// Every variant carries a message that can be shown to an end user as-is.
/// Transport layers map errors by [`ErrorKind`], never by message text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Input was missing or out of range (e.g. non-positive width).
    #[error("{0}")]
    Validation(String),

    /// No rule or catalog row matched the request.
    #[error("{0}")]
    NotFound(String),

    /// A rule or item definition collides with an existing one.
    #[error("{0}")]
    DefinitionConflict(String),

    /// The backing data (catalog file, store) could not be read.
    #[error("{0}")]
    DataSource(String),

    /// Injected formula code failed while running.
    #[error("formula for rule '{rule}' failed: {message}")]
    Evaluation { rule: String, message: String },
}

/// Coarse classification of a [`PricingError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    DataSource,
    Evaluation,
}

impl ErrorKind {
    /// Whether the failure is caused by caller input or definitions (as opposed
    /// to an operator-visible data/configuration gap).
    pub fn is_user_facing(self) -> bool {
        matches!(self, Self::Validation | Self::NotFound | Self::Conflict)
    }
}

impl PricingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::DefinitionConflict(msg.into())
    }

    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSource(msg.into())
    }

    pub fn evaluation(rule: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Evaluation {
            rule: rule.into(),
            message: msg.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::DefinitionConflict(_) => ErrorKind::Conflict,
            Self::DataSource(_) => ErrorKind::DataSource,
            Self::Evaluation { .. } => ErrorKind::Evaluation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_user_message() {
        let err = PricingError::validation("Width must be greater than zero.");
        assert_eq!(err.to_string(), "Width must be greater than zero.");
    }

    #[test]
    fn evaluation_error_names_the_rule() {
        let err = PricingError::evaluation("banner-large", "division by zero");
        assert_eq!(
            err.to_string(),
            "formula for rule 'banner-large' failed: division by zero"
        );
        assert_eq!(err.kind(), ErrorKind::Evaluation);
        assert!(!err.kind().is_user_facing());
    }

    #[test]
    fn kinds_map_one_to_one() {
        assert_eq!(PricingError::not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(PricingError::conflict("x").kind(), ErrorKind::Conflict);
        assert_eq!(PricingError::data_source("x").kind(), ErrorKind::DataSource);
        assert!(ErrorKind::Conflict.is_user_facing());
        assert!(!ErrorKind::DataSource.is_user_facing());
    }
}

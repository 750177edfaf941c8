//! Error types for glide-core.

use thiserror::Error;

/// Result type for glide-core parsing operations.
pub type Result<T> = std::result::Result<T, GlideError>;

/// Errors surfaced by the parsing entry points.
///
/// The fluent builder itself is fail-soft: it logs these and leaves state
/// untouched instead of returning them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GlideError {
    /// A containment constraint expression could not be parsed.
    #[error("invalid constraint `{input}`: {reason}")]
    InvalidConstraint {
        /// The raw expression.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// A duration or delay given in seconds was not a number.
    #[error("invalid time value `{0}`")]
    InvalidTime(String),
}

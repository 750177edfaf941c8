//! CSS transform functions and the ordered transform stack.
//!
//! Transforms are kept as a list of function calls and composed into a single
//! `transform` declaration by joining them with spaces, in call order. The
//! stack never reorders or folds entries.
//!
//! # Usage
//!
//! ```
//! use glide_core::transform::{TransformFunction, TransformStack};
//!
//! let mut stack = TransformStack::new();
//! stack.push(TransformFunction::Rotate(10.0));
//! stack.push(TransformFunction::Scale(2.0, 2.0));
//! assert_eq!(stack.declaration(), "rotate(10deg) scale(2, 2)");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single CSS transform function call.
///
/// Angles are degrees, translations are pixels, scales are unitless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "args", rename_all = "snake_case")]
pub enum TransformFunction {
    Skew(f64, f64),
    SkewX(f64),
    SkewY(f64),
    Translate(f64, f64),
    TranslateX(f64),
    TranslateY(f64),
    Scale(f64, f64),
    ScaleX(f64),
    ScaleY(f64),
    Rotate(f64),
    /// A fully formed function string, passed through untouched.
    Raw(String),
}

impl fmt::Display for TransformFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skew(x, y) => write!(f, "skew({x}deg, {y}deg)"),
            Self::SkewX(n) => write!(f, "skewX({n}deg)"),
            Self::SkewY(n) => write!(f, "skewY({n}deg)"),
            Self::Translate(x, y) => write!(f, "translate({x}px, {y}px)"),
            Self::TranslateX(n) => write!(f, "translateX({n}px)"),
            Self::TranslateY(n) => write!(f, "translateY({n}px)"),
            Self::Scale(x, y) => write!(f, "scale({x}, {y})"),
            Self::ScaleX(n) => write!(f, "scaleX({n})"),
            Self::ScaleY(n) => write!(f, "scaleY({n})"),
            Self::Rotate(n) => write!(f, "rotate({n}deg)"),
            Self::Raw(s) => f.write_str(s),
        }
    }
}

impl From<&str> for TransformFunction {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_string())
    }
}

impl From<String> for TransformFunction {
    fn from(s: String) -> Self {
        Self::Raw(s)
    }
}

/// Append-only list of transform functions, composed in call order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformStack {
    functions: Vec<TransformFunction>,
}

impl TransformStack {
    /// Create an empty transform stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform function.
    pub fn push(&mut self, function: impl Into<TransformFunction>) {
        self.functions.push(function.into());
    }

    pub fn functions(&self) -> &[TransformFunction] {
        &self.functions
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// The composed value of the `transform` declaration.
    pub fn declaration(&self) -> String {
        self.functions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

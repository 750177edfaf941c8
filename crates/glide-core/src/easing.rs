//! Easing functions for transition timing.
//!
//! This module models CSS timing functions and the short alias names the
//! builder accepts:
//! - `in` -> `ease-in`
//! - `out` -> `ease-out`
//! - `in-out` -> `ease-in-out`
//! - `snap` -> `cubic-bezier(0,1,0.5,1)`
//!
//! Anything that is neither an alias nor a CSS keyword is kept verbatim, so
//! `cubic-bezier(...)` or `steps(...)` strings pass straight through.
//!
//! # Usage
//!
//! ```
//! use glide_core::easing::EasingFunction;
//!
//! assert_eq!(EasingFunction::from_name("in-out").to_string(), "ease-in-out");
//! assert_eq!(EasingFunction::from_name("").to_string(), "ease");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position for stepped timing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// CSS `jump-start` / `start`.
    Start,
    /// CSS `jump-end` / `end`.
    #[default]
    End,
    /// CSS `jump-both`.
    Both,
    /// CSS `jump-none`.
    None,
}

impl StepPosition {
    fn css(self) -> &'static str {
        match self {
            Self::Start => "jump-start",
            Self::End => "jump-end",
            Self::Both => "jump-both",
            Self::None => "jump-none",
        }
    }
}

/// A CSS timing function.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// CSS `linear`.
    Linear,

    /// CSS `ease`, the default.
    #[default]
    Ease,

    /// CSS `ease-in`.
    EaseIn,

    /// CSS `ease-out`.
    EaseOut,

    /// CSS `ease-in-out`.
    EaseInOut,

    /// Custom cubic bezier curve with control points (x1, y1) and (x2, y2).
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },

    /// Stepped timing with `count` intervals.
    Steps { count: u32, position: StepPosition },

    /// Any other timing function string, emitted as given.
    Custom { css: String },
}

impl EasingFunction {
    /// The curve behind the `snap` alias.
    pub const SNAP: Self = Self::CubicBezier {
        x1: 0.0,
        y1: 1.0,
        x2: 0.5,
        y2: 1.0,
    };

    /// Resolve an alias, CSS keyword, or raw timing function string.
    ///
    /// An empty name resolves to `ease`.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "" | "ease" => Self::Ease,
            "in" | "ease-in" => Self::EaseIn,
            "out" | "ease-out" => Self::EaseOut,
            "in-out" | "ease-in-out" => Self::EaseInOut,
            "snap" => Self::SNAP,
            "linear" => Self::Linear,
            other => Self::Custom {
                css: other.to_string(),
            },
        }
    }

    /// Create a custom cubic bezier easing function.
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Create a stepped easing function.
    pub fn steps(count: u32, position: StepPosition) -> Self {
        Self::Steps { count, position }
    }
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({x1},{y1},{x2},{y2})")
            }
            Self::Steps { count, position } => write!(f, "steps({count}, {})", position.css()),
            Self::Custom { css } => f.write_str(css),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(EasingFunction::from_name("in"), EasingFunction::EaseIn);
        assert_eq!(EasingFunction::from_name("out"), EasingFunction::EaseOut);
        assert_eq!(EasingFunction::from_name("in-out"), EasingFunction::EaseInOut);
        assert_eq!(EasingFunction::from_name("snap"), EasingFunction::SNAP);
        assert_eq!(
            EasingFunction::from_name("snap").to_string(),
            "cubic-bezier(0,1,0.5,1)"
        );
    }

    #[test]
    fn test_default_is_ease() {
        assert_eq!(EasingFunction::default(), EasingFunction::Ease);
        assert_eq!(EasingFunction::from_name("  ").to_string(), "ease");
    }

    #[test]
    fn test_passthrough() {
        let custom = EasingFunction::from_name("cubic-bezier(.17,.67,.83,.67)");
        assert_eq!(custom.to_string(), "cubic-bezier(.17,.67,.83,.67)");
        assert_eq!(EasingFunction::from_name("linear"), EasingFunction::Linear);
    }

    #[test]
    fn test_steps_display() {
        assert_eq!(
            EasingFunction::steps(4, StepPosition::End).to_string(),
            "steps(4, jump-end)"
        );
        assert_eq!(
            EasingFunction::steps(1, StepPosition::Start).to_string(),
            "steps(1, jump-start)"
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let easing = EasingFunction::cubic_bezier(0.4, 0.0, 0.2, 1.0);
        let json = serde_json::to_string(&easing).unwrap();
        let parsed: EasingFunction = serde_json::from_str(&json).unwrap();
        assert_eq!(easing, parsed);
    }
}

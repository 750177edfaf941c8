//! Pending style declarations.
//!
//! This module provides:
//! - `StyleValue`: a numeric or verbatim value handed to the builder
//! - `PropertySet`: pending `name -> value` assignments, applied on commit
//! - `TransitionProperties`: ordered names of the animated properties
//!
//! Numeric values set through the animated path pick up a unit from a static
//! property table (`width: 100` becomes `100px`); anything else is stored as is.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefixes used when fanning a property out to vendor-specific names.
pub const VENDOR_PREFIXES: [&str; 4] = ["-webkit-", "-moz-", "-ms-", "-o-"];

/// Unit appended to numeric values of a property, if it has one.
pub fn unit_for(property: &str) -> Option<&'static str> {
    match property {
        "top" | "bottom" | "left" | "right" | "width" | "height" | "font-size" | "margin"
        | "margin-top" | "margin-bottom" | "margin-left" | "margin-right" | "padding"
        | "padding-top" | "padding-bottom" | "padding-left" | "padding-right" => Some("px"),
        _ => None,
    }
}

/// Parse the leading integer of a CSS value (`"50px"` -> 50, `" -3.7em"` -> -3).
///
/// Returns `None` when the value does not start with a number.
pub fn leading_int(value: &str) -> Option<i64> {
    let s = value.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// A value passed to the builder: numbers may receive a unit, text never does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    /// Render this value for `property`, appending the mapped unit to numbers.
    pub fn for_property(&self, property: &str) -> String {
        match (self, unit_for(property)) {
            (Self::Number(n), Some(unit)) => format!("{n}{unit}"),
            (Self::Number(n), None) => n.to_string(),
            (Self::Text(s), _) => s.clone(),
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! number_style_value {
    ($($t:ty),*) => {
        $(impl From<$t> for StyleValue {
            fn from(n: $t) -> Self {
                Self::Number(f64::from(n))
            }
        })*
    };
}

number_style_value!(f64, f32, i32, u32, i16, u16, i8, u8);

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Pending style assignments keyed by CSS property name.
///
/// Entries keep the order in which a name was first assigned so commits apply
/// them deterministically; reassigning a name overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    entries: Vec<(String, String)>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` verbatim under `name`.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Store `value` under each vendor-prefixed form of `name`.
    pub fn insert_vendor(&mut self, name: &str, value: &str) {
        for prefix in VENDOR_PREFIXES {
            self.insert(&format!("{prefix}{name}"), value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Names of the properties that participate in the transition, in first-set order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionProperties {
    names: Vec<String>,
}

impl TransitionProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`; names already present are not appended again.
    pub fn register(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The value of the `transition-properties` declaration.
    pub fn declaration(&self) -> String {
        self.names.join(", ")
    }
}

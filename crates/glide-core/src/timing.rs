//! Duration and delay values.
//!
//! Numbers are milliseconds; strings are seconds (`"1.5"` is 1500ms). Seconds
//! are parsed leniently the way CSS authors write them, so `"1.5s"` also works.

use serde::{Deserialize, Serialize};

use crate::error::{GlideError, Result};

/// A time given either as milliseconds or as a seconds string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Millis(f64),
    Seconds(String),
}

impl TimeValue {
    /// Resolve to milliseconds.
    pub fn to_millis(&self) -> Result<f64> {
        match self {
            Self::Millis(ms) => Ok(*ms),
            Self::Seconds(s) => leading_float(s)
                .map(|secs| secs * 1000.0)
                .ok_or_else(|| GlideError::InvalidTime(s.clone())),
        }
    }
}

/// Parse the leading decimal number of `s`, ignoring any trailing text.
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            c if c.is_ascii_digit() => seen_digit = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse().ok()
}

macro_rules! millis_time_value {
    ($($t:ty),*) => {
        $(impl From<$t> for TimeValue {
            fn from(ms: $t) -> Self {
                Self::Millis(f64::from(ms))
            }
        })*
    };
}

millis_time_value!(f64, f32, u32, i32, u16);

impl From<&str> for TimeValue {
    fn from(s: &str) -> Self {
        Self::Seconds(s.to_string())
    }
}

impl From<String> for TimeValue {
    fn from(s: String) -> Self {
        Self::Seconds(s)
    }
}

impl From<std::time::Duration> for TimeValue {
    fn from(d: std::time::Duration) -> Self {
        Self::Millis(d.as_secs_f64() * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_millis_pass_through() {
        assert_eq!(TimeValue::from(1500).to_millis(), Ok(1500.0));
        assert_eq!(TimeValue::from(250.5).to_millis(), Ok(250.5));
    }

    #[test]
    fn test_seconds_strings() {
        assert_eq!(TimeValue::from("1.5").to_millis(), Ok(1500.0));
        assert_eq!(TimeValue::from("2").to_millis(), Ok(2000.0));
        assert_eq!(TimeValue::from(".25s").to_millis(), Ok(250.0));
        assert_eq!(TimeValue::from(" 3s").to_millis(), Ok(3000.0));
    }

    #[test]
    fn test_invalid_seconds() {
        assert_eq!(
            TimeValue::from("slow").to_millis(),
            Err(GlideError::InvalidTime("slow".to_string()))
        );
        assert!(TimeValue::from("").to_millis().is_err());
        assert!(TimeValue::from(".").to_millis().is_err());
    }

    #[test]
    fn test_std_duration() {
        assert_eq!(
            TimeValue::from(Duration::from_millis(750)).to_millis(),
            Ok(750.0)
        );
    }
}

// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Number rounding and unit formatting.

use serde::{Deserialize, Serialize};

/// Text shown in place of a value that cannot be displayed (absent or NaN).
pub const PLACEHOLDER: &str = "—";

/// Unit prefix family used by [`human_readable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitBase {
    /// Powers of 1000: k, M, G, ...
    Decimal,
    /// Powers of 1024: ki, Mi, Gi, ...
    Binary,
}

impl UnitBase {
    /// Divisor for one prefix step.
    pub fn divisor(self) -> f64 {
        match self {
            Self::Decimal => 1000.0,
            Self::Binary => 1024.0,
        }
    }

    /// Prefixes, starting at the first step.
    pub fn units(self) -> &'static [&'static str] {
        match self {
            Self::Decimal => &["k", "M", "G", "T", "P", "E", "Z", "Y"],
            Self::Binary => &["ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi", "Yi"],
        }
    }
}

/// Round `num` to `digits` decimal places.
pub fn to_fixed_number(num: f64, digits: u32) -> f64 {
    let pow = 10f64.powi(digits as i32);
    (num * pow).round() / pow
}

/// Format `size` with a unit prefix, dividing at least once.
///
/// The value is divided by the base until it drops below it, and the
/// prefix is capped at the largest known unit. Values smaller than the
/// base therefore come out as fractions of the first unit (`0.500k`).
///
/// ```
/// use bmxp_core::units::{human_readable, UnitBase};
///
/// assert_eq!(human_readable(1024.0, UnitBase::Binary, 3), "1.000ki");
/// assert_eq!(human_readable(1_000_000.0, UnitBase::Decimal, 3), "1.000M");
/// ```
pub fn human_readable(size: f64, base: UnitBase, precision: usize) -> String {
    let divisor = base.divisor();
    let units = base.units();

    let mut value = size / divisor;
    let mut i = 0;
    while value >= divisor && i + 1 < units.len() {
        value /= divisor;
        i += 1;
    }
    format!("{:.*}{}", precision, value, units[i])
}

/// Shortest display of a rounded number: `2` rather than `2.000`.
pub fn display_number(value: f64) -> String {
    if value == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{}", value)
}

/// Display an optional metric, falling back to [`PLACEHOLDER`] when the
/// value is absent or not finite.
pub fn display_or_placeholder(value: Option<f64>, render: impl FnOnce(f64) -> String) -> String {
    match value {
        Some(v) if v.is_finite() => render(v),
        _ => PLACEHOLDER.to_string(),
    }
}

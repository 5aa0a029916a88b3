//! Input normalisation.
//!
//! Form fields reach the engine as loosely typed values: strings typed
//! by the visitor, numbers from a quick-select button, or nothing at
//! all.  This module turns them into a [`CalculationInput`] exactly
//! once, before any model runs.  Text is read the way a browser number
//! field is read: the longest numeric prefix counts and the rest is
//! ignored, so `"50000 руб"` is `50000` and `"12.7"` employees is `12`.
//! Anything that yields no number, a non-finite number or a value below
//! the floor becomes the floor: `0` for salary and `1` for headcount.
//! Values above [`MAX_NET_SALARY`] and [`MAX_EMPLOYEE_COUNT`] are capped
//! so every aggregate total stays finite.

use crate::models::CalculationInput;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Largest monthly net salary accepted, in rubles.
pub const MAX_NET_SALARY: f64 = 1e12;

/// Largest headcount accepted.
pub const MAX_EMPLOYEE_COUNT: u32 = 1_000_000;

/// Raw calculator fields as submitted by the site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInput {
    #[serde(default)]
    pub salary: Value,
    #[serde(default)]
    pub employees: Value,
    #[serde(default)]
    pub region: Option<String>,
}

/// Normalises raw form values into an engine input.
pub fn normalize(raw: &RawInput) -> CalculationInput {
    let region = raw
        .region
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);
    CalculationInput {
        net_salary: normalize_salary(&raw.salary),
        employee_count: normalize_employees(&raw.employees),
        region,
    }
}

pub fn normalize_salary(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    };
    clamp_salary(parsed.unwrap_or(0.0))
}

pub fn normalize_employees(value: &Value) -> u32 {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    };
    clamp_employees(parsed.unwrap_or(1))
}

/// Maps NaN, infinities, negatives and `-0.0` to `0` and caps the rest
/// at [`MAX_NET_SALARY`].
pub fn clamp_salary(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value.min(MAX_NET_SALARY)
    } else {
        0.0
    }
}

pub fn clamp_employees(value: i64) -> u32 {
    if value < 1 {
        1
    } else {
        u32::try_from(value).map_or(MAX_EMPLOYEE_COUNT, |count| count.min(MAX_EMPLOYEE_COUNT))
    }
}

/// Parses the longest leading decimal number of `s`, if any.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        // Finite-only domain; clamped to zero by the caller.
        return Some(f64::INFINITY);
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    s[..end].parse().ok()
}

/// Parses the longest leading integer of `s`, saturating on overflow.
fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let negative = bytes.first() == Some(&b'-');
    let start = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
    let digits = count_digits(&bytes[start..]);
    if digits == 0 {
        return None;
    }
    let parsed = s[start..start + digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -parsed } else { parsed })
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

//! Fixed-width field rendering for the INISTRS block.
//!
//! Every column in the block is 8 characters wide. How a value fills its
//! column depends on its kind:
//!
//! | kind    | layout                                             |
//! |---------|----------------------------------------------------|
//! | text    | left-justified, space padded                       |
//! | integer | right-justified, space padded                      |
//! | decimal | shortest round-trip rendering, right-justified     |
//!
//! A decimal whose rendering is wider than 8 characters is cut to its first
//! 8 characters under [`OverflowPolicy::Truncate`]; there is no rounding, so
//! `-1.2345678e-05` becomes `-1.23456`. [`OverflowPolicy::Strict`] refuses
//! the value instead.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::{InistrsError, Result};

pub const FIELD_WIDTH: usize = 8;

/// What to do with a number that does not fit in its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Decimals are cut to the column width, oversized integers are written
    /// whole. Matches what existing decks were produced with.
    #[default]
    Truncate,
    /// Any number that does not fit is an error.
    Strict,
}

/// A value destined for one 8-character column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    Text(&'a str),
    Integer(u64),
    Decimal(f64),
}

impl Field<'_> {
    /// Append the rendered column to `out`.
    ///
    /// Returns `true` when the value overflowed the column and was written
    /// anyway (truncated decimal or wide integer).
    pub fn write_to(&self, out: &mut String, policy: OverflowPolicy) -> Result<bool> {
        match *self {
            Field::Text(text) => {
                if text.chars().count() > FIELD_WIDTH {
                    return Err(overflow("text", text.to_string()));
                }
                let _ = write!(out, "{text:<width$}", width = FIELD_WIDTH);
                Ok(false)
            }
            Field::Integer(value) => {
                let rendered = format!("{value:>width$}", width = FIELD_WIDTH);
                let wide = rendered.len() > FIELD_WIDTH;
                if wide && policy == OverflowPolicy::Strict {
                    return Err(overflow("integer", rendered));
                }
                out.push_str(&rendered);
                Ok(wide)
            }
            Field::Decimal(value) => {
                let natural = natural_decimal(value);
                if natural.len() <= FIELD_WIDTH {
                    let _ = write!(out, "{natural:>width$}", width = FIELD_WIDTH);
                    return Ok(false);
                }
                if policy == OverflowPolicy::Strict {
                    return Err(overflow("decimal", natural));
                }
                // ASCII only, so byte slicing is char slicing.
                out.push_str(&natural[..FIELD_WIDTH]);
                Ok(true)
            }
        }
    }

    pub fn render(&self, policy: OverflowPolicy) -> Result<String> {
        let mut out = String::with_capacity(FIELD_WIDTH);
        self.write_to(&mut out, policy)?;
        Ok(out)
    }
}

fn overflow(kind: &'static str, text: String) -> InistrsError {
    InistrsError::FieldOverflow {
        kind,
        text,
        width: FIELD_WIDTH,
    }
}

/// Shortest round-trip rendering of `value`.
///
/// Positional notation is used for decimal exponents in `-4..16`, with a
/// trailing `.0` on integral values; anything else is written in scientific
/// notation with a signed, at least two digit exponent (`1e-05`, `2.5e+16`).
pub fn natural_decimal(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let text = if value < 0.0 { "-inf" } else { "inf" };
        return text.to_string();
    }
    if value == 0.0 {
        let text = if value.is_sign_negative() { "-0.0" } else { "0.0" };
        return text.to_string();
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "-1.2345e1".
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };
    let digits: String = mantissa
        .trim_start_matches('-')
        .chars()
        .filter(|c| *c != '.')
        .collect();

    let mut out = String::with_capacity(digits.len() + 8);
    if value < 0.0 {
        out.push('-');
    }

    if (-4..16).contains(&exponent) {
        if exponent < 0 {
            out.push_str("0.");
            out.extend(std::iter::repeat_n('0', (-exponent - 1) as usize));
            out.push_str(&digits);
        } else {
            let int_len = exponent as usize + 1;
            if digits.len() <= int_len {
                out.push_str(&digits);
                out.extend(std::iter::repeat_n('0', int_len - digits.len()));
                out.push_str(".0");
            } else {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            }
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        let _ = write!(out, "e{sign}{:02}", exponent.unsigned_abs());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(field: Field<'_>) -> String {
        field.render(OverflowPolicy::Truncate).expect("field renders")
    }

    #[test]
    fn natural_rendering_positional_range() {
        assert_eq!(natural_decimal(-12.345), "-12.345");
        assert_eq!(natural_decimal(3.0), "3.0");
        assert_eq!(natural_decimal(-120.0), "-120.0");
        assert_eq!(natural_decimal(0.5), "0.5");
        assert_eq!(natural_decimal(0.0001), "0.0001");
        assert_eq!(natural_decimal(-0.00123), "-0.00123");
        assert_eq!(natural_decimal(123456.789), "123456.789");
        assert_eq!(natural_decimal(1e15), "1000000000000000.0");
        assert_eq!(natural_decimal(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn natural_rendering_scientific_range() {
        assert_eq!(natural_decimal(1e-5), "1e-05");
        assert_eq!(natural_decimal(-2.5e-7), "-2.5e-07");
        assert_eq!(natural_decimal(1e16), "1e+16");
        assert_eq!(natural_decimal(1.234e20), "1.234e+20");
        assert_eq!(natural_decimal(6.02e123), "6.02e+123");
    }

    #[test]
    fn natural_rendering_zero_and_non_finite() {
        assert_eq!(natural_decimal(0.0), "0.0");
        assert_eq!(natural_decimal(-0.0), "-0.0");
        assert_eq!(natural_decimal(f64::NAN), "nan");
        assert_eq!(natural_decimal(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn text_is_left_justified() {
        assert_eq!(cell(Field::Text("ELEM")), "ELEM    ");
        assert_eq!(cell(Field::Text("INISTRS")), "INISTRS ");
        assert_eq!(cell(Field::Text("")), "        ");
        assert_eq!(cell(Field::Text("EIGHTCHR")), "EIGHTCHR");
    }

    #[test]
    fn long_text_is_an_error_in_both_policies() {
        for policy in [OverflowPolicy::Truncate, OverflowPolicy::Strict] {
            let err = Field::Text("TOOLONGKW").render(policy).expect_err("9 chars");
            assert!(matches!(err, InistrsError::FieldOverflow { kind: "text", .. }));
        }
    }

    #[test]
    fn integer_is_right_justified_and_round_trips() {
        assert_eq!(cell(Field::Integer(1)), "       1");
        for n in [1u64, 42, 1000, 1234567, 99_999_999] {
            let text = cell(Field::Integer(n));
            assert_eq!(text.len(), FIELD_WIDTH);
            assert_eq!(text.trim_start().parse::<u64>().unwrap(), n);
        }
    }

    #[test]
    fn wide_integer_is_written_whole_or_refused() {
        let mut out = String::new();
        let overflowed = Field::Integer(123_456_789)
            .write_to(&mut out, OverflowPolicy::Truncate)
            .unwrap();
        assert!(overflowed);
        assert_eq!(out, "123456789");

        let err = Field::Integer(123_456_789)
            .render(OverflowPolicy::Strict)
            .expect_err("9 digits");
        assert!(matches!(err, InistrsError::FieldOverflow { kind: "integer", .. }));
    }

    #[test]
    fn negative_decimal_keeps_its_sign() {
        let text = cell(Field::Decimal(-12.345));
        assert_eq!(text, " -12.345");
        assert!(text.trim_start().starts_with('-'));
    }

    #[test]
    fn eight_character_decimal_is_unchanged() {
        assert_eq!(cell(Field::Decimal(-1234.56)), "-1234.56");
        assert_eq!(cell(Field::Decimal(-2.5e-07)), "-2.5e-07");

        let mut out = String::new();
        let overflowed = Field::Decimal(12345.67)
            .write_to(&mut out, OverflowPolicy::Strict)
            .unwrap();
        assert!(!overflowed);
        assert_eq!(out, "12345.67");
    }

    #[test]
    fn wide_decimal_is_truncated_without_rounding() {
        let mut out = String::new();
        let overflowed = Field::Decimal(123456.789)
            .write_to(&mut out, OverflowPolicy::Truncate)
            .unwrap();
        assert!(overflowed);
        assert_eq!(out, "123456.7");

        assert_eq!(cell(Field::Decimal(-3.14159265)), "-3.14159");
        assert_eq!(cell(Field::Decimal(-1.2345678e-05)), "-1.23456");
        assert_eq!(cell(Field::Decimal(99_999_999.0)), "99999999");
    }

    #[test]
    fn wide_decimal_is_refused_in_strict_mode() {
        let err = Field::Decimal(123456.789)
            .render(OverflowPolicy::Strict)
            .expect_err("10 characters");
        match err {
            InistrsError::FieldOverflow { kind, text, width } => {
                assert_eq!(kind, "decimal");
                assert_eq!(text, "123456.789");
                assert_eq!(width, 8);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_decimals_are_right_justified() {
        assert_eq!(cell(Field::Decimal(0.0)), "     0.0");
        assert_eq!(cell(Field::Decimal(25.0)), "    25.0");
        assert_eq!(cell(Field::Decimal(1e-5)), "   1e-05");
        assert_eq!(cell(Field::Decimal(1e20)), "   1e+20");
    }

    #[test]
    fn policy_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&OverflowPolicy::Strict).unwrap(), "\"strict\"");
        let policy: OverflowPolicy = serde_json::from_str("\"truncate\"").unwrap();
        assert_eq!(policy, OverflowPolicy::Truncate);
    }
}

//! Field rules shared by the resource validators.
//!
//! Messages follow the wording API clients of this catalog already rely on.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use shop_core::ValidationErrors;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const INVALID_STRING: &str = "Not a valid string.";
pub const INVALID_NUMBER: &str = "A valid number is required.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";

/// Text as sent by the client. Numbers are accepted and kept verbatim.
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decimal from a JSON number or a numeric string.
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Integer from a JSON number or a numeric string; a zero fraction (`"3.0"`) is allowed.
pub fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            let whole = match s.split_once('.') {
                Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
                Some(_) => return None,
                None => s,
            };
            whole.parse().ok()
        }
        _ => None,
    }
}

/// Optional free text; blank input counts as absent.
pub fn optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<Value>,
) -> Option<String> {
    let value = value?;
    let Some(text) = coerce_text(&value) else {
        errors.add(field, INVALID_STRING);
        return None;
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Length bounds for a text field, counted in characters after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRule {
    pub min: usize,
    pub max: usize,
}

impl TextRule {
    pub const fn max(max: usize) -> Self {
        Self { min: 1, max }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Validates a required text field, returning the trimmed value.
    pub fn required(
        &self,
        errors: &mut ValidationErrors,
        field: &str,
        value: Option<Value>,
    ) -> Option<String> {
        let Some(value) = value else {
            errors.add(field, REQUIRED);
            return None;
        };
        let Some(text) = coerce_text(&value) else {
            errors.add(field, INVALID_STRING);
            return None;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            errors.add(field, BLANK);
            return None;
        }

        let len = trimmed.chars().count();
        if len < self.min {
            errors.add(
                field,
                format!("Ensure this field has at least {} characters.", self.min),
            );
            return None;
        }
        if len > self.max {
            errors.add(
                field,
                format!("Ensure this field has no more than {} characters.", self.max),
            );
            return None;
        }
        Some(trimmed.to_string())
    }
}

/// Fixed-point bounds (`max_digits` in total, `decimal_places` after the point).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalRule {
    pub max_digits: u32,
    pub decimal_places: u32,
}

impl DecimalRule {
    pub const fn new(max_digits: u32, decimal_places: u32) -> Self {
        Self {
            max_digits,
            decimal_places,
        }
    }

    /// Returns the first violated bound, if any.
    pub fn check(&self, value: Decimal) -> Option<String> {
        let scale = value.scale();
        let mantissa = value.mantissa().unsigned_abs();
        let significant = if mantissa == 0 {
            1
        } else {
            mantissa.to_string().len() as u32
        };

        let (digits, decimals) = if scale == 0 {
            (significant, 0)
        } else if scale > significant {
            (scale, scale)
        } else {
            (significant, scale)
        };
        let whole = digits - decimals;

        if digits > self.max_digits {
            return Some(format!(
                "Ensure that there are no more than {} digits in total.",
                self.max_digits
            ));
        }
        if decimals > self.decimal_places {
            return Some(format!(
                "Ensure that there are no more than {} decimal places.",
                self.decimal_places
            ));
        }
        if whole > self.max_digits - self.decimal_places {
            return Some(format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                self.max_digits - self.decimal_places
            ));
        }
        None
    }

    /// Parses and bounds-checks a decimal field.
    ///
    /// Accepted values come back with exactly `decimal_places` fractional
    /// digits, so `250` is stored as `250.00`.
    pub fn validate(
        &self,
        errors: &mut ValidationErrors,
        field: &str,
        value: &Value,
    ) -> Option<Decimal> {
        let Some(mut decimal) = parse_decimal(value) else {
            errors.add(field, INVALID_NUMBER);
            return None;
        };
        if let Some(message) = self.check(decimal) {
            errors.add(field, message);
            return None;
        }
        decimal.rescale(self.decimal_places);
        Some(decimal)
    }

    pub fn required(
        &self,
        errors: &mut ValidationErrors,
        field: &str,
        value: Option<Value>,
    ) -> Option<Decimal> {
        match value {
            Some(value) => self.validate(errors, field, &value),
            None => {
                errors.add(field, REQUIRED);
                None
            }
        }
    }
}

/// Validates a required reference to another record.
pub fn required_id(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<Value>,
) -> Option<i64> {
    let Some(value) = value else {
        errors.add(field, REQUIRED);
        return None;
    };
    match parse_integer(&value) {
        None => {
            errors.add(field, INVALID_INTEGER);
            None
        }
        Some(id) if id <= 0 => {
            errors.add(field, format!("Invalid pk \"{id}\" - object does not exist."));
            None
        }
        Some(id) => Some(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn text_rule_trims_and_bounds() {
        let rule = TextRule::between(2, 5);
        let mut errors = ValidationErrors::new();

        assert_eq!(
            rule.required(&mut errors, "t", Some(json!("  abc "))),
            Some("abc".into())
        );
        assert!(errors.is_empty());

        assert_eq!(rule.required(&mut errors, "short", Some(json!("a"))), None);
        assert_eq!(rule.required(&mut errors, "long", Some(json!("abcdef"))), None);
        assert_eq!(rule.required(&mut errors, "blank", Some(json!("   "))), None);
        assert_eq!(rule.required(&mut errors, "missing", None), None);

        assert_eq!(
            errors.messages("short"),
            ["Ensure this field has at least 2 characters."]
        );
        assert_eq!(
            errors.messages("long"),
            ["Ensure this field has no more than 5 characters."]
        );
        assert_eq!(errors.messages("blank"), [BLANK]);
        assert_eq!(errors.messages("missing"), [REQUIRED]);
    }

    #[test]
    fn text_rule_counts_characters_not_bytes() {
        let rule = TextRule::max(3);
        let mut errors = ValidationErrors::new();
        assert!(rule.required(&mut errors, "t", Some(json!("äöü"))).is_some());
    }

    #[test]
    fn decimal_rule_accepts_values_within_bounds() {
        let price = DecimalRule::new(10, 2);
        assert_eq!(price.check(dec("12345678.99")), None);
        assert_eq!(price.check(dec("0")), None);
        assert_eq!(price.check(dec("0.5")), None);
        assert_eq!(price.check(dec("-3.25")), None);
    }

    #[test]
    fn decimal_rule_reports_first_violation() {
        let price = DecimalRule::new(10, 2);
        assert_eq!(
            price.check(dec("123456789.123")).as_deref(),
            Some("Ensure that there are no more than 10 digits in total.")
        );
        assert_eq!(
            price.check(dec("1.234")).as_deref(),
            Some("Ensure that there are no more than 2 decimal places.")
        );
        assert_eq!(
            price.check(dec("123456789")).as_deref(),
            Some("Ensure that there are no more than 8 digits before the decimal point.")
        );

        let stars = DecimalRule::new(3, 1);
        assert_eq!(stars.check(dec("99.9")), None);
        assert!(stars.check(dec("100")).is_some());
        assert!(stars.check(dec("4.55")).is_some());
    }

    #[test]
    fn required_id_rejects_missing_and_non_positive() {
        let mut errors = ValidationErrors::new();
        assert_eq!(required_id(&mut errors, "a", Some(json!(3))), Some(3));
        assert_eq!(required_id(&mut errors, "b", None), None);
        assert_eq!(required_id(&mut errors, "c", Some(json!(0))), None);
        assert_eq!(errors.messages("b"), [REQUIRED]);
        assert_eq!(
            errors.messages("c"),
            ["Invalid pk \"0\" - object does not exist."]
        );
    }

    #[test]
    fn text_rule_rejects_non_scalar_values() {
        let rule = TextRule::between(2, 5);
        let mut errors = ValidationErrors::new();
        assert_eq!(rule.required(&mut errors, "n", Some(json!(42))), Some("42".into()));
        assert_eq!(rule.required(&mut errors, "list", Some(json!(["ab"]))), None);
        assert_eq!(errors.messages("list"), [INVALID_STRING]);
        assert!(!errors.contains("n"));
    }

    #[test]
    fn optional_text_drops_blank_values() {
        let mut errors = ValidationErrors::new();
        assert_eq!(optional_text(&mut errors, "d", None), None);
        assert_eq!(optional_text(&mut errors, "d", Some(json!("  "))), None);
        assert_eq!(
            optional_text(&mut errors, "d", Some(json!(" soft "))),
            Some("soft".into())
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn decimal_values_are_rescaled_to_fixed_point() {
        let price = DecimalRule::new(10, 2);
        let stars = DecimalRule::new(3, 1);
        let mut errors = ValidationErrors::new();

        let whole = price.validate(&mut errors, "price", &json!(250)).unwrap();
        let half = price.validate(&mut errors, "price", &json!("10.5")).unwrap();
        let four = stars.validate(&mut errors, "stars", &json!(4.0)).unwrap();

        assert_eq!(whole.to_string(), "250.00");
        assert_eq!(half.to_string(), "10.50");
        assert_eq!(four.to_string(), "4.0");
        assert!(errors.is_empty());
    }

    #[test]
    fn non_numeric_decimal_is_reported_on_its_field() {
        let price = DecimalRule::new(10, 2);
        let mut errors = ValidationErrors::new();
        assert_eq!(price.validate(&mut errors, "price", &json!("abc")), None);
        assert_eq!(price.validate(&mut errors, "other", &json!(true)), None);
        assert_eq!(price.required(&mut errors, "missing", None), None);
        assert_eq!(errors.messages("price"), [INVALID_NUMBER]);
        assert_eq!(errors.messages("other"), [INVALID_NUMBER]);
        assert_eq!(errors.messages("missing"), [REQUIRED]);
    }

    #[test]
    fn integers_accept_numeric_strings() {
        assert_eq!(parse_integer(&json!("12")), Some(12));
        assert_eq!(parse_integer(&json!(" 7 ")), Some(7));
        assert_eq!(parse_integer(&json!("3.0")), Some(3));
        assert_eq!(parse_integer(&json!(5.0)), Some(5));
        assert_eq!(parse_integer(&json!("3.5")), None);
        assert_eq!(parse_integer(&json!("x")), None);
        assert_eq!(parse_integer(&json!(null)), None);

        let mut errors = ValidationErrors::new();
        assert_eq!(required_id(&mut errors, "id", Some(json!("x"))), None);
        assert_eq!(errors.messages("id"), [INVALID_INTEGER]);
    }
}

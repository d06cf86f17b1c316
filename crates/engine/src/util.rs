//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every ledger enforces the same invariants.

use crate::{EngineError, ResultEngine};

/// Trim `value` and reject it when empty.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text, mapping blank strings to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Ensure a monetary amount is a finite number strictly greater than zero.
pub(crate) fn validate_positive_amount(amount: f64, label: &str) -> ResultEngine<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be greater than 0"
        )));
    }
    Ok(amount)
}

/// Ensure an optional monetary amount, when present, is finite.
pub(crate) fn validate_optional_amount(amount: Option<f64>, label: &str) -> ResultEngine<Option<f64>> {
    match amount {
        Some(value) if !value.is_finite() => Err(EngineError::InvalidAmount(format!(
            "{label} must be a finite number"
        ))),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_name_is_trimmed() {
        assert_eq!(
            normalize_required_name("  Saman  ", "investor name"),
            Ok("Saman".to_string())
        );
        assert_eq!(
            normalize_required_name("   ", "investor name"),
            Err(EngineError::InvalidName(
                "investor name must not be empty".to_string()
            ))
        );
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(Some(" a ")), Some("a".to_string()));
        assert_eq!(normalize_optional_text(None), None);
    }

    #[test]
    fn amounts_must_be_positive() {
        assert_eq!(validate_positive_amount(12.5, "amount"), Ok(12.5));
        assert!(validate_positive_amount(0.0, "amount").is_err());
        assert!(validate_positive_amount(-1.0, "amount").is_err());
        assert!(validate_positive_amount(f64::INFINITY, "amount").is_err());
        assert!(validate_optional_amount(Some(f64::NAN), "profit").is_err());
        assert_eq!(validate_optional_amount(None, "profit"), Ok(None));
    }
}

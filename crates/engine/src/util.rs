//! Internal helpers for input validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::Validation(format!("invalid {label} id")))
}

/// Require a non-empty trimmed string.
pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional string, mapping empty to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Validate the debit/credit pair of an entry input.
///
/// Exactly one of the two must be positive; both must be non-negative.
pub(crate) fn validate_amounts(debit_minor: i64, credit_minor: i64) -> ResultEngine<()> {
    if debit_minor < 0 || credit_minor < 0 {
        return Err(EngineError::Validation(
            "amounts must be non-negative".to_string(),
        ));
    }
    if debit_minor > 0 && credit_minor > 0 {
        return Err(EngineError::Validation(
            "an entry cannot carry both a debit and a credit amount".to_string(),
        ));
    }
    if debit_minor == 0 && credit_minor == 0 {
        return Err(EngineError::Validation(
            "an entry requires a debit or credit amount".to_string(),
        ));
    }
    Ok(())
}

/// Checked balance step; overflow is reported as a validation failure.
pub(crate) fn apply_delta(balance_minor: i64, delta_minor: i64) -> ResultEngine<i64> {
    balance_minor
        .checked_add(delta_minor)
        .ok_or_else(|| EngineError::Validation("running balance overflow".to_string()))
}

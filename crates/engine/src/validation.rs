//! Validation of proposed cell values
//!
//! Column types decide *what* is valid; this module holds the result type and
//! the parsing/bounds helpers they share.
//!
//! ## Blank values
//!
//! Missing values pass every type constraint. Only `is_required` rejects
//! them, and that check runs before the type-specific rules.

use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// Validation Result
// ============================================================================

/// Result of validating a value against a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Value is acceptable and may be persisted.
    Valid,
    /// Value is rejected.
    Invalid {
        /// Human-readable description of why validation failed.
        reason: String,
    },
}

impl ValidationResult {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ValidationResult::Invalid {
            reason: reason.into(),
        }
    }

    /// Returns true if the result is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Returns true if the result is invalid.
    pub fn is_invalid(&self) -> bool {
        matches!(self, ValidationResult::Invalid { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid { reason } => Some(reason),
        }
    }

    /// Chain another check, keeping the first failure
    pub fn and_then(self, next: impl FnOnce() -> ValidationResult) -> ValidationResult {
        match self {
            ValidationResult::Valid => next(),
            invalid => invalid,
        }
    }
}

// ============================================================================
// Numeric Helpers
// ============================================================================

/// Error when parsing numeric input.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericParseError {
    /// Input is empty (after trimming whitespace).
    Empty,
    /// Input contains invalid characters or format.
    InvalidFormat,
    /// Input has a fractional part but a whole number is required.
    FractionalNotAllowed,
}

impl fmt::Display for NumericParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericParseError::Empty => write!(f, "Value is empty"),
            NumericParseError::InvalidFormat => write!(f, "Value is not a valid number"),
            NumericParseError::FractionalNotAllowed => write!(f, "Whole number required (no decimals)"),
        }
    }
}

impl std::error::Error for NumericParseError {}

/// Parse user input as a number.
///
/// # Rules
/// - Whitespace is trimmed
/// - Leading `+` is allowed
/// - Thousands separators (`,` and `_`) are ignored
/// - Decimal point allowed only if `allow_decimal` is true
///
/// # Examples
/// ```
/// use gridedit_engine::validation::parse_numeric_input;
///
/// assert_eq!(parse_numeric_input(" +1,250.5 ", true), Ok(1250.5));
/// assert!(parse_numeric_input("3.0", false).is_err());
/// assert_eq!(parse_numeric_input("3", false), Ok(3.0));
/// ```
pub fn parse_numeric_input(value: &str, allow_decimal: bool) -> Result<f64, NumericParseError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(NumericParseError::Empty);
    }

    let normalized: String = trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();

    if normalized.is_empty() {
        return Err(NumericParseError::InvalidFormat);
    }

    if !allow_decimal && normalized.contains('.') {
        return Err(NumericParseError::FractionalNotAllowed);
    }

    let parsed = normalized
        .parse::<f64>()
        .map_err(|_| NumericParseError::InvalidFormat)?;
    if !parsed.is_finite() {
        return Err(NumericParseError::InvalidFormat);
    }
    Ok(parsed)
}

/// Check `x` against inclusive optional bounds. `render` formats the bounds
/// for the failure message.
pub fn check_bounds<T, F>(x: &T, min: Option<&T>, max: Option<&T>, render: F) -> ValidationResult
where
    T: PartialOrd,
    F: Fn(&T) -> String,
{
    if let Some(min) = min {
        if x.partial_cmp(min) == Some(Ordering::Less) {
            return ValidationResult::invalid(format!(
                "The value must be {} or larger.",
                render(min)
            ));
        }
    }
    if let Some(max) = max {
        if x.partial_cmp(max) == Some(Ordering::Greater) {
            return ValidationResult::invalid(format!(
                "The value must be {} or smaller.",
                render(max)
            ));
        }
    }
    ValidationResult::Valid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_input() {
        assert_eq!(parse_numeric_input("42", true), Ok(42.0));
        assert_eq!(parse_numeric_input("+7", false), Ok(7.0));
        assert_eq!(parse_numeric_input("1_000", false), Ok(1000.0));
        assert_eq!(parse_numeric_input("", true), Err(NumericParseError::Empty));
        assert_eq!(parse_numeric_input("+", true), Err(NumericParseError::InvalidFormat));
        assert_eq!(parse_numeric_input("abc", true), Err(NumericParseError::InvalidFormat));
        assert_eq!(parse_numeric_input("inf", true), Err(NumericParseError::InvalidFormat));
        assert_eq!(
            parse_numeric_input("2.5", false),
            Err(NumericParseError::FractionalNotAllowed)
        );
    }

    #[test]
    fn test_check_bounds_inclusive() {
        let render = |v: &f64| v.to_string();
        assert!(check_bounds(&5.0, Some(&5.0), Some(&10.0), render).is_valid());
        assert!(check_bounds(&10.0, Some(&5.0), Some(&10.0), render).is_valid());
        let low = check_bounds(&4.0, Some(&5.0), None, render);
        assert_eq!(low.reason(), Some("The value must be 5 or larger."));
        let high = check_bounds(&11.0, None, Some(&10.0), render);
        assert_eq!(high.reason(), Some("The value must be 10 or smaller."));
    }

    #[test]
    fn test_and_then_keeps_first_failure() {
        let result = ValidationResult::invalid("first").and_then(|| ValidationResult::invalid("second"));
        assert_eq!(result.reason(), Some("first"));
        let result = ValidationResult::Valid.and_then(|| ValidationResult::invalid("second"));
        assert_eq!(result.reason(), Some("second"));
    }
}

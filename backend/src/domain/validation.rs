//! Field-level validation shared by the entity value types.

use thiserror::Error;

/// A single field failing its constraints.
///
/// `field` names the payload key so adapters can point clients at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is empty or whitespace only.
    #[error("{field} may not be blank")]
    Blank {
        /// Offending field.
        field: &'static str,
    },
    /// A text field exceeds its maximum length in characters.
    #[error("{field} must have at most {max} characters")]
    TooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum number of characters.
        max: usize,
    },
    /// A username contains characters outside letters, digits and `@.+-_`.
    #[error("{field} may contain only letters, digits and @/./+/-/_ characters")]
    InvalidCharacters {
        /// Offending field.
        field: &'static str,
    },
    /// A value is not one of the accepted choices.
    #[error("\"{value}\" is not a valid choice for {field}")]
    InvalidChoice {
        /// Offending field.
        field: &'static str,
        /// Rejected input.
        value: String,
    },
}

impl ValidationError {
    /// Payload key the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Blank { field }
            | Self::TooLong { field, .. }
            | Self::InvalidCharacters { field }
            | Self::InvalidChoice { field, .. } => field,
        }
    }

    /// Stable machine-readable violation code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Blank { .. } => "blank",
            Self::TooLong { .. } => "too_long",
            Self::InvalidCharacters { .. } => "invalid_characters",
            Self::InvalidChoice { .. } => "invalid_choice",
        }
    }
}

/// Accept `value` when it has at most `max` characters.
pub(crate) fn bounded(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value)
}

/// Accept `value` when it is non-blank and, if `max` is set, short enough.
pub(crate) fn required(
    field: &'static str,
    value: String,
    max: Option<usize>,
) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    match max {
        Some(max) => bounded(field, value, max),
        None => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", ValidationError::Blank { field: "name" })]
    #[case("  \t", ValidationError::Blank { field: "name" })]
    #[case("abcdef", ValidationError::TooLong { field: "name", max: 5 })]
    fn required_rejects(#[case] input: &str, #[case] expected: ValidationError) {
        assert_eq!(required("name", input.to_owned(), Some(5)), Err(expected));
    }

    #[rstest]
    fn length_counts_characters_not_bytes() {
        assert_eq!(
            bounded("name", "ééééé".to_owned(), 5),
            Ok("ééééé".to_owned())
        );
    }

    #[rstest]
    fn unbounded_required_accepts_long_text() {
        let text = "word ".repeat(1000);
        assert_eq!(required("content", text.clone(), None), Ok(text));
    }

    #[rstest]
    #[case(ValidationError::Blank { field: "title" }, "title", "blank")]
    #[case(ValidationError::TooLong { field: "name", max: 24 }, "name", "too_long")]
    #[case(ValidationError::InvalidCharacters { field: "username" }, "username", "invalid_characters")]
    #[case(ValidationError::InvalidChoice { field: "type", value: "XX".to_owned() }, "type", "invalid_choice")]
    fn exposes_field_and_code(
        #[case] error: ValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        assert_eq!(error.field(), field);
        assert_eq!(error.code(), code);
    }
}

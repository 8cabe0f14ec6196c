//! Issue field validation
//!
//! Checks the four user-supplied values before anything touches the
//! document. Every check runs, so a submission with several bad fields gets
//! every message back at once, in field order.

use std::fmt;

use thiserror::Error;

/// Raw form input, exactly as typed by the user
#[derive(Debug, Clone, Default)]
pub struct RawFields {
    pub volume: String,
    pub issue: String,
    pub year: String,
    pub date: String,
}

impl RawFields {
    pub fn new(
        volume: impl Into<String>,
        issue: impl Into<String>,
        year: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            volume: volume.into(),
            issue: issue.into(),
            year: year.into(),
            date: date.into(),
        }
    }
}

/// Fields that passed every format check
///
/// Only [`validate`] builds this, so holding one means volume, issue and
/// year are non-empty digit strings and date has the `dddd-dd-dd` shape.
/// Semantic validity is not checked: year `0000` and date `9999-99-99`
/// both pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    volume: String,
    issue: String,
    year: String,
    date: String,
}

impl ValidatedFields {
    pub fn volume(&self) -> &str {
        &self.volume
    }

    pub fn issue(&self) -> &str {
        &self.issue
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}

/// One failed format check
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Volume must be a number.")]
    Volume,

    #[error("Issue must be a number.")]
    Issue,

    #[error("Year must be a number.")]
    Year,

    #[error("Date must be in YYYY-MM-DD format.")]
    Date,
}

/// Every failed check of one submission, in field order (never empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// User-facing messages, one per failed check
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    pub fn contains(&self, error: FieldError) -> bool {
        self.0.contains(&error)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Non-empty and ASCII decimal digits only: no sign, no decimal point.
pub fn is_number(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly `dddd-dd-dd`. No calendar check.
pub fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Validate raw form input
///
/// Runs all four checks independently and returns either the validated
/// fields or every failure found.
pub fn validate(raw: &RawFields) -> Result<ValidatedFields, ValidationErrors> {
    let checks = [
        (is_number(&raw.volume), FieldError::Volume),
        (is_number(&raw.issue), FieldError::Issue),
        (is_number(&raw.year), FieldError::Year),
        (is_iso_date(&raw.date), FieldError::Date),
    ];

    let errors: Vec<FieldError> = checks
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, error)| error)
        .collect();

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    Ok(ValidatedFields {
        volume: raw.volume.clone(),
        issue: raw.issue.clone(),
        year: raw.year.clone(),
        date: raw.date.clone(),
    })
}

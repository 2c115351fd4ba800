use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::checksum::{cpf_is_valid, luhn_is_valid, CPF_DIGIT_COUNT};
use crate::field::{FieldError, FieldId, FieldKind, FormField, ValidationResult};
use crate::mask;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub(crate) fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn current() -> Self {
        let now = Local::now();
        Self::new(now.year(), now.month())
    }

    pub fn previous(self) -> Self {
        if self.month <= 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }
}

/// Stateless per-field validation. The only context it carries is the month
/// card expiry dates are compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldValidator {
    today: YearMonth,
}

impl FieldValidator {
    pub fn now() -> Self {
        Self::at(YearMonth::current())
    }

    pub fn at(today: YearMonth) -> Self {
        Self { today }
    }

    pub fn today(&self) -> YearMonth {
        self.today
    }

    pub fn validate(&self, field: &FormField<'_>) -> ValidationResult {
        ValidationResult::from_check(field.kind, self.check(field))
    }

    pub fn check(&self, field: &FormField<'_>) -> Result<(), FieldError> {
        let value = field.value.trim();
        if value.is_empty() {
            return if field.required {
                Err(FieldError::Required)
            } else {
                Ok(())
            };
        }

        match field.kind {
            FieldKind::Name | FieldKind::Required => Ok(()),
            FieldKind::Email => {
                if is_valid_email(value) {
                    Ok(())
                } else {
                    Err(FieldError::Malformed)
                }
            }
            FieldKind::Cpf => check_cpf(value),
            FieldKind::Phone => {
                let digits = digits_only(value);
                match digits.len() {
                    10 | 11 => Ok(()),
                    actual => Err(FieldError::WrongLength {
                        expected: "10 or 11",
                        actual,
                    }),
                }
            }
            FieldKind::PostalCode => {
                let digits = digits_only(value);
                match digits.len() {
                    8 => Ok(()),
                    actual => Err(FieldError::WrongLength {
                        expected: "8",
                        actual,
                    }),
                }
            }
            FieldKind::CardNumber => check_card_number(value),
            FieldKind::CardExpiry => self.check_expiry(value),
            FieldKind::CardCvv => {
                let digits = digits_only(value);
                match digits.len() {
                    3 | 4 => Ok(()),
                    actual => Err(FieldError::WrongLength {
                        expected: "3 or 4",
                        actual,
                    }),
                }
            }
        }
    }

    fn check_expiry(&self, value: &str) -> Result<(), FieldError> {
        let digits = digits_only(value);
        if digits.len() != 4 {
            return Err(FieldError::WrongLength {
                expected: "4",
                actual: digits.len(),
            });
        }

        let month: u32 = digits[..2].parse().map_err(|_| FieldError::Malformed)?;
        let year: i32 = digits[2..].parse().map_err(|_| FieldError::Malformed)?;
        if !(1..=12).contains(&month) {
            return Err(FieldError::InvalidMonth(month));
        }
        if YearMonth::new(2000 + year, month) < self.today {
            return Err(FieldError::Expired);
        }
        Ok(())
    }
}

fn check_cpf(value: &str) -> Result<(), FieldError> {
    let digits = digits_only(value);
    if digits.len() != CPF_DIGIT_COUNT {
        return Err(FieldError::WrongLength {
            expected: "11",
            actual: digits.len(),
        });
    }
    if digits.bytes().all(|b| b == digits.as_bytes()[0]) {
        return Err(FieldError::RepeatedDigits);
    }
    if !cpf_is_valid(&digits) {
        return Err(FieldError::ChecksumMismatch);
    }
    Ok(())
}

fn check_card_number(value: &str) -> Result<(), FieldError> {
    let card: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if !card.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::Malformed);
    }
    if !(13..=19).contains(&card.len()) {
        return Err(FieldError::WrongLength {
            expected: "13 to 19",
            actual: card.len(),
        });
    }
    if !luhn_is_valid(&card) {
        return Err(FieldError::ChecksumMismatch);
    }
    Ok(())
}

/// Visual state of an input: no marker until it holds a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    Unmarked,
    Valid,
    Invalid,
}

impl Marker {
    pub fn class(self) -> &'static str {
        match self {
            Marker::Unmarked => "",
            Marker::Valid => "valid",
            Marker::Invalid => "invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    id: FieldId,
    value: String,
    marker: Marker,
    error: Option<String>,
}

impl FieldState {
    pub fn new(id: FieldId) -> Self {
        Self {
            id,
            value: String::new(),
            marker: Marker::Unmarked,
            error: None,
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn marker(&self) -> Marker {
        self.marker
    }

    /// Inline error shown under the input, only while the field is marked invalid.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the value without masking or validating, as address lookup does.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Applies the input mask and re-validates when the field is already marked
    /// invalid, so the error clears as soon as the value is fixed.
    pub fn on_input(&mut self, raw: &str, validator: &FieldValidator, required: bool) -> &str {
        self.value = mask::normalize(self.id.kind(), raw);
        if self.marker == Marker::Invalid {
            self.validate(validator, required);
        }
        &self.value
    }

    pub fn on_blur(&mut self, validator: &FieldValidator, required: bool) -> bool {
        self.validate(validator, required)
    }

    pub fn validate(&mut self, validator: &FieldValidator, required: bool) -> bool {
        let kind = self.id.kind();
        let field = FormField {
            kind,
            value: &self.value,
            required,
        };
        let result = validator.validate(&field);

        if self.value.trim().is_empty() {
            self.marker = Marker::Unmarked;
            self.error = None;
        } else if result.is_valid {
            self.marker = Marker::Valid;
            self.error = None;
        } else {
            self.marker = Marker::Invalid;
            self.error = Some(result.error_message);
        }
        result.is_valid
    }
}

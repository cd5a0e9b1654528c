use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::scoring::OrdinalLevel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Rejected write with one entry per offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("invalid input on {} field(s)", .errors.len())]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

/// Collects field-shape failures so a single response can report all of them.
#[derive(Debug, Default)]
pub(crate) struct FieldChecks {
    errors: Vec<FieldError>,
}

impl FieldChecks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reject(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
        self
    }

    pub(crate) fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.reject(field, "this field is required");
        }
        self
    }

    pub(crate) fn level(&mut self, field: &str, value: &str) -> &mut Self {
        if OrdinalLevel::parse(value).is_none() {
            self.reject(field, format!("'{value}' is not a recognised level"));
        }
        self
    }

    pub(crate) fn optional_level(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) if !value.is_empty() => self.level(field, value),
            _ => self,
        }
    }

    pub(crate) fn non_negative(&mut self, field: &str, value: Decimal) -> &mut Self {
        if value.is_sign_negative() && !value.is_zero() {
            self.reject(field, "must not be negative");
        }
        self
    }

    pub(crate) fn within(&mut self, field: &str, value: Decimal, min: Decimal, max: Decimal) -> &mut Self {
        if value < min || value > max {
            self.reject(field, format!("must be between {min} and {max}"));
        }
        self
    }

    pub(crate) fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) if !value.is_empty() && !is_email(value) => {
                self.reject(field, "enter a valid email address")
            }
            _ => self,
        }
    }

    pub(crate) fn phone(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) if !value.is_empty() && !is_phone(value) => {
                self.reject(field, "enter a valid phone number")
            }
            _ => self,
        }
    }

    pub(crate) fn date_order(
        &mut self,
        field: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> &mut Self {
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                self.reject(field, "end date must not precede start date");
            }
        }
        self
    }

    pub(crate) fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: std::mem::take(&mut self.errors),
            })
        }
    }
}

/// `local@domain.tld` with a single `@`.
pub(crate) fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}

/// Optional `+` followed by 9 to 15 digits.
pub(crate) fn is_phone(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    (9..=15).contains(&digits.len()) && digits.bytes().all(|byte| byte.is_ascii_digit())
}

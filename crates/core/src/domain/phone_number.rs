use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::numbering_plan::{LibPhoneNumber, NumberingPlan};

const MAX_E164_DIGITS: usize = 15;
const MIN_E164_DIGITS: usize = 8;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PhoneNumberError {
    #[error("phone number cannot be empty")]
    Empty,
    #[error("invalid phone number format: `{value}` ({reason})")]
    Unparseable { value: String, reason: String },
    #[error("invalid phone number: `{0}`")]
    Invalid(String),
    #[error("only mobile phone numbers are allowed: `{0}`")]
    NotMobile(String),
}

/// A mobile-capable phone number in canonical E.164 form, e.g. `+14155552671`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, PhoneNumberError> {
        Self::parse_with(raw, &LibPhoneNumber)
    }

    pub fn parse_with<P>(raw: &str, plan: &P) -> Result<Self, PhoneNumberError>
    where
        P: NumberingPlan + ?Sized,
    {
        if raw.trim().is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        let number = plan.parse(raw).map_err(|reason| PhoneNumberError::Unparseable {
            value: raw.to_string(),
            reason,
        })?;

        if !plan.is_valid(&number) {
            return Err(PhoneNumberError::Invalid(raw.to_string()));
        }

        if !plan.classify(&number).accepts_mobile() {
            return Err(PhoneNumberError::NotMobile(raw.to_string()));
        }

        Ok(Self(plan.format(&number)))
    }

    /// Rehydrates a value that was validated when it was first written.
    ///
    /// Only the canonical shape is checked; the numbering plan is not
    /// consulted, so stored numbers keep decoding when plan metadata moves.
    pub fn from_canonical(value: &str) -> Result<Self, PhoneNumberError> {
        let Some(digits) = value.strip_prefix('+') else {
            return Err(PhoneNumberError::Invalid(value.to_string()));
        };

        let well_formed = (MIN_E164_DIGITS..=MAX_E164_DIGITS).contains(&digits.len())
            && digits.bytes().all(|byte| byte.is_ascii_digit())
            && !digits.starts_with('0');
        if !well_formed {
            return Err(PhoneNumberError::Invalid(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

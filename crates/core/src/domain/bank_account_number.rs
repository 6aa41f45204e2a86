use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_LENGTH: usize = 15;
const MAX_LENGTH: usize = 34;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BankAccountNumberError {
    #[error("bank account number cannot be empty")]
    Empty,
    #[error("invalid IBAN format: `{0}`")]
    InvalidFormat(String),
    #[error("IBAN length must be between 15 and 34 characters, got {length}: `{value}`")]
    InvalidLength { value: String, length: usize },
    #[error("invalid IBAN checksum: `{0}`")]
    InvalidChecksum(String),
}

/// An IBAN, normalized to uppercase with all spaces removed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BankAccountNumber(String);

impl BankAccountNumber {
    pub fn parse(raw: &str) -> Result<Self, BankAccountNumberError> {
        if raw.trim().is_empty() {
            return Err(BankAccountNumberError::Empty);
        }

        let normalized: String =
            raw.chars().filter(|ch| *ch != ' ').collect::<String>().to_uppercase();

        if !iban_pattern().is_match(&normalized) {
            return Err(BankAccountNumberError::InvalidFormat(raw.to_string()));
        }

        let length = normalized.len();
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(BankAccountNumberError::InvalidLength { value: raw.to_string(), length });
        }

        if iban_remainder(&normalized) != Some(1) {
            return Err(BankAccountNumberError::InvalidChecksum(raw.to_string()));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn iban_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]+$").expect("IBAN pattern is a valid regex")
    })
}

/// ISO 7064 mod-97 over the rearranged IBAN, folded one decimal digit at a
/// time so the expanded number never has to fit in an integer.
fn iban_remainder(iban: &str) -> Option<u32> {
    let (head, tail) = iban.split_at(4);
    let mut remainder = 0u32;

    for ch in tail.chars().chain(head.chars()) {
        match ch {
            '0'..='9' => remainder = fold_digit(remainder, ch as u32 - '0' as u32),
            'A'..='Z' => {
                let value = ch as u32 - 'A' as u32 + 10;
                remainder = fold_digit(remainder, value / 10);
                remainder = fold_digit(remainder, value % 10);
            }
            _ => return None,
        }
    }

    Some(remainder)
}

fn fold_digit(remainder: u32, digit: u32) -> u32 {
    (remainder * 10 + digit) % 97
}

impl fmt::Display for BankAccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BankAccountNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BankAccountNumber {
    type Error = BankAccountNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BankAccountNumber> for String {
    fn from(value: BankAccountNumber) -> Self {
        value.0
    }
}

impl std::str::FromStr for BankAccountNumber {
    type Err = BankAccountNumberError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

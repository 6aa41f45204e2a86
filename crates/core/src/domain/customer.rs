use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::bank_account_number::BankAccountNumber;
use crate::domain::email::Email;
use crate::domain::phone_number::PhoneNumber;
use crate::errors::DomainError;

pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(raw.trim())?))
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Customer aggregate. Identity, names and date of birth are fixed at
/// creation; contact details are replaced wholesale through the `update_*`
/// methods.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Customer {
    id: CustomerId,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    phone_number: PhoneNumber,
    email: Email,
    bank_account_number: BankAccountNumber,
}

impl Customer {
    pub fn new(
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
        phone_number: PhoneNumber,
        email: Email,
        bank_account_number: BankAccountNumber,
    ) -> Result<Self, DomainError> {
        Self::new_as_of(
            first_name,
            last_name,
            date_of_birth,
            phone_number,
            email,
            bank_account_number,
            Utc::now().date_naive(),
        )
    }

    /// Same as [`Customer::new`] with an explicit "today" for the
    /// date-of-birth check.
    pub fn new_as_of(
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
        phone_number: PhoneNumber,
        email: Email,
        bank_account_number: BankAccountNumber,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        let first_name = normalize_name(first_name)
            .ok_or(DomainError::EmptyFirstName)
            .and_then(|name| check_length(name, DomainError::FirstNameTooLong))?;
        let last_name = normalize_name(last_name)
            .ok_or(DomainError::EmptyLastName)
            .and_then(|name| check_length(name, DomainError::LastNameTooLong))?;

        if date_of_birth >= today {
            return Err(DomainError::DateOfBirthNotInPast(date_of_birth));
        }

        Ok(Self {
            id: CustomerId::generate(),
            first_name,
            last_name,
            date_of_birth,
            phone_number,
            email,
            bank_account_number,
        })
    }

    /// Rebuilds a customer from storage. Entity invariants were enforced when
    /// the record was created, so the date-of-birth check is not repeated.
    pub fn restore(
        id: CustomerId,
        first_name: String,
        last_name: String,
        date_of_birth: NaiveDate,
        phone_number: PhoneNumber,
        email: Email,
        bank_account_number: BankAccountNumber,
    ) -> Self {
        Self { id, first_name, last_name, date_of_birth, phone_number, email, bank_account_number }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn bank_account_number(&self) -> &BankAccountNumber {
        &self.bank_account_number
    }

    pub fn update_phone_number(&mut self, phone_number: PhoneNumber) {
        self.phone_number = phone_number;
    }

    pub fn update_email(&mut self, email: Email) {
        self.email = email;
    }

    pub fn update_bank_account_number(&mut self, bank_account_number: BankAccountNumber) {
        self.bank_account_number = bank_account_number;
    }
}

pub(crate) fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn check_length(name: String, error: DomainError) -> Result<String, DomainError> {
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(error);
    }
    Ok(name)
}

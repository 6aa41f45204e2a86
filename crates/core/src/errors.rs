use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{BankAccountNumberError, CustomerId, EmailError, PhoneNumberError};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error(transparent)]
    PhoneNumber(#[from] PhoneNumberError),
    #[error(transparent)]
    BankAccountNumber(#[from] BankAccountNumberError),
    #[error("first name cannot be empty")]
    EmptyFirstName,
    #[error("first name must not exceed 100 characters")]
    FirstNameTooLong,
    #[error("last name cannot be empty")]
    EmptyLastName,
    #[error("last name must not exceed 100 characters")]
    LastNameTooLong,
    #[error("date of birth must be in the past, got {0}")]
    DateOfBirthNotInPast(NaiveDate),
}

impl DomainError {
    /// Request field the error refers to, in the casing of the HTTP projection.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::PhoneNumber(_) => "phoneNumber",
            Self::BankAccountNumber(_) => "bankAccountNumber",
            Self::EmptyFirstName | Self::FirstNameTooLong => "firstName",
            Self::EmptyLastName | Self::LastNameTooLong => "lastName",
            Self::DateOfBirthNotInPast(_) => "dateOfBirth",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    DuplicateEmail,
    DuplicateCustomer,
}

impl ConflictKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::DuplicateEmail => "email address already exists",
            Self::DuplicateCustomer => {
                "customer already exists with the same first name, last name, and date of birth"
            }
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("validation failed for `{field}`: {0}", field = .0.field())]
    Validation(#[from] DomainError),
    #[error("customer `{0}` not found")]
    NotFound(CustomerId),
    #[error("conflict: {}", .0.message())]
    Conflict(ConflictKind),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("command cancelled before any write was issued")]
    Cancelled,
}

impl ApplicationError {
    pub fn is_conflict(&self, kind: ConflictKind) -> bool {
        matches!(self, Self::Conflict(found) if *found == kind)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("conflict: {message}")]
    Conflict { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::NotFound { .. } => "The requested customer does not exist.",
            Self::Conflict { .. } => "The request conflicts with an existing customer.",
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::NotFound { message, .. }
            | Self::Conflict { message, .. }
            | Self::ServiceUnavailable { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::Conflict { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::Conflict { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::Validation(error) => {
                Self::BadRequest { message: format!("{}: {error}", error.field()), correlation_id }
            }
            ApplicationError::NotFound(id) => {
                Self::NotFound { message: format!("customer `{id}` not found"), correlation_id }
            }
            ApplicationError::Conflict(kind) => {
                Self::Conflict { message: kind.message().to_owned(), correlation_id }
            }
            ApplicationError::StorageUnavailable(message) => {
                Self::ServiceUnavailable { message, correlation_id }
            }
            ApplicationError::Cancelled => Self::ServiceUnavailable {
                message: "request cancelled before completion".to_owned(),
                correlation_id,
            },
        }
    }
}

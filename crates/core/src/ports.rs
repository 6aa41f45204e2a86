//! Storage contract consumed by the customer handlers.
//!
//! Implementations must back `add`/`update` with a real uniqueness constraint
//! on the normalized email and report violations as
//! [`StorageError::DuplicateEmail`]. The handlers' existence checks only make
//! the common case fast; they cannot close the check-then-act window between
//! concurrent writers.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Customer, CustomerId, Email};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("email uniqueness constraint violated")]
    DuplicateEmail,
    #[error("customer id `{0}` already stored")]
    DuplicateId(CustomerId),
    #[error("customer `{0}` is not stored")]
    NotFound(CustomerId),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("stored customer could not be decoded: {0}")]
    Decode(String),
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, StorageError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, StorageError>;

    async fn exists_by_name_and_dob(
        &self,
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
    ) -> Result<bool, StorageError>;

    async fn exists_by_email(
        &self,
        email: &Email,
        exclude_id: Option<&CustomerId>,
    ) -> Result<bool, StorageError>;

    async fn list_all(&self) -> Result<Vec<Customer>, StorageError>;

    async fn add(&self, customer: &Customer) -> Result<(), StorageError>;

    async fn update(&self, customer: &Customer) -> Result<(), StorageError>;

    /// Removing an id that is not stored is a no-op.
    async fn delete(&self, id: &CustomerId) -> Result<(), StorageError>;
}

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::application::{storage_failure, CustomerView};
use crate::domain::customer::normalize_name;
use crate::domain::{
    BankAccountNumber, Customer, CustomerId, Email, LibPhoneNumber, NumberingPlan, PhoneNumber,
};
use crate::errors::{ApplicationError, ConflictKind, DomainError};
use crate::ports::CustomerRepository;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
    pub email: String,
    pub bank_account_number: String,
}

/// Replaces contact details only; names and date of birth never change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateCustomer {
    pub id: CustomerId,
    pub phone_number: String,
    pub email: String,
    pub bank_account_number: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeleteCustomer {
    pub id: CustomerId,
}

struct ContactDetails {
    phone_number: PhoneNumber,
    email: Email,
    bank_account_number: BankAccountNumber,
}

pub struct CustomerCommandHandler<P = LibPhoneNumber> {
    repository: Arc<dyn CustomerRepository>,
    numbering_plan: P,
}

impl CustomerCommandHandler<LibPhoneNumber> {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self::with_numbering_plan(repository, LibPhoneNumber)
    }
}

impl<P: NumberingPlan> CustomerCommandHandler<P> {
    pub fn with_numbering_plan(repository: Arc<dyn CustomerRepository>, numbering_plan: P) -> Self {
        Self { repository, numbering_plan }
    }

    pub async fn create(&self, command: CreateCustomer) -> Result<CustomerView, ApplicationError> {
        self.create_with_cancellation(command, &CancellationToken::new()).await
    }

    pub async fn create_with_cancellation(
        &self,
        command: CreateCustomer,
        cancellation: &CancellationToken,
    ) -> Result<CustomerView, ApplicationError> {
        let details =
            self.contact_details(&command.phone_number, &command.email, &command.bank_account_number)?;

        let first_name = normalize_name(&command.first_name).unwrap_or_default();
        let last_name = normalize_name(&command.last_name).unwrap_or_default();
        let duplicate_customer = self
            .repository
            .exists_by_name_and_dob(&first_name, &last_name, command.date_of_birth)
            .await
            .map_err(storage_failure)?;
        if duplicate_customer {
            return Err(ApplicationError::Conflict(ConflictKind::DuplicateCustomer));
        }

        let duplicate_email = self
            .repository
            .exists_by_email(&details.email, None)
            .await
            .map_err(storage_failure)?;
        if duplicate_email {
            return Err(ApplicationError::Conflict(ConflictKind::DuplicateEmail));
        }

        let customer = Customer::new(
            &command.first_name,
            &command.last_name,
            command.date_of_birth,
            details.phone_number,
            details.email,
            details.bank_account_number,
        )?;

        ensure_not_cancelled(cancellation)?;
        self.repository.add(&customer).await.map_err(storage_failure)?;

        Ok(CustomerView::from(&customer))
    }

    pub async fn update(&self, command: UpdateCustomer) -> Result<CustomerView, ApplicationError> {
        self.update_with_cancellation(command, &CancellationToken::new()).await
    }

    pub async fn update_with_cancellation(
        &self,
        command: UpdateCustomer,
        cancellation: &CancellationToken,
    ) -> Result<CustomerView, ApplicationError> {
        let mut customer = self
            .repository
            .find_by_id(&command.id)
            .await
            .map_err(storage_failure)?
            .ok_or(ApplicationError::NotFound(command.id))?;

        let details =
            self.contact_details(&command.phone_number, &command.email, &command.bank_account_number)?;

        let duplicate_email = self
            .repository
            .exists_by_email(&details.email, Some(&command.id))
            .await
            .map_err(storage_failure)?;
        if duplicate_email {
            return Err(ApplicationError::Conflict(ConflictKind::DuplicateEmail));
        }

        customer.update_phone_number(details.phone_number);
        customer.update_email(details.email);
        customer.update_bank_account_number(details.bank_account_number);

        ensure_not_cancelled(cancellation)?;
        self.repository.update(&customer).await.map_err(storage_failure)?;

        Ok(CustomerView::from(&customer))
    }

    pub async fn delete(&self, command: DeleteCustomer) -> Result<(), ApplicationError> {
        self.delete_with_cancellation(command, &CancellationToken::new()).await
    }

    pub async fn delete_with_cancellation(
        &self,
        command: DeleteCustomer,
        cancellation: &CancellationToken,
    ) -> Result<(), ApplicationError> {
        let exists =
            self.repository.find_by_id(&command.id).await.map_err(storage_failure)?.is_some();
        if !exists {
            return Err(ApplicationError::NotFound(command.id));
        }

        ensure_not_cancelled(cancellation)?;
        self.repository.delete(&command.id).await.map_err(storage_failure)
    }

    fn contact_details(
        &self,
        phone_number: &str,
        email: &str,
        bank_account_number: &str,
    ) -> Result<ContactDetails, DomainError> {
        Ok(ContactDetails {
            email: Email::parse(email)?,
            phone_number: PhoneNumber::parse_with(phone_number, &self.numbering_plan)?,
            bank_account_number: BankAccountNumber::parse(bank_account_number)?,
        })
    }
}

fn ensure_not_cancelled(cancellation: &CancellationToken) -> Result<(), ApplicationError> {
    if cancellation.is_cancelled() {
        return Err(ApplicationError::Cancelled);
    }
    Ok(())
}

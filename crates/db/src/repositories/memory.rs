use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use rolodex_core::domain::{Customer, CustomerId, Email};
use rolodex_core::ports::{CustomerRepository, StorageError};

/// Map-backed repository. Email uniqueness is checked and applied under the
/// same write guard, so it gives the same guarantee as the SQL unique index.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.customers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.customers.read().await.is_empty()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, StorageError> {
        let customers = self.customers.read().await;
        Ok(customers.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, StorageError> {
        let customers = self.customers.read().await;
        Ok(customers.values().find(|customer| customer.email() == email).cloned())
    }

    async fn exists_by_name_and_dob(
        &self,
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
    ) -> Result<bool, StorageError> {
        let customers = self.customers.read().await;
        Ok(customers.values().any(|customer| {
            customer.first_name() == first_name
                && customer.last_name() == last_name
                && customer.date_of_birth() == date_of_birth
        }))
    }

    async fn exists_by_email(
        &self,
        email: &Email,
        exclude_id: Option<&CustomerId>,
    ) -> Result<bool, StorageError> {
        let customers = self.customers.read().await;
        Ok(customers
            .values()
            .any(|customer| customer.email() == email && Some(&customer.id()) != exclude_id))
    }

    async fn list_all(&self) -> Result<Vec<Customer>, StorageError> {
        let customers = self.customers.read().await;
        let mut all: Vec<Customer> = customers.values().cloned().collect();
        all.sort_by(|left, right| {
            left.last_name()
                .cmp(right.last_name())
                .then_with(|| left.first_name().cmp(right.first_name()))
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(all)
    }

    async fn add(&self, customer: &Customer) -> Result<(), StorageError> {
        let mut customers = self.customers.write().await;
        if customers.contains_key(&customer.id()) {
            return Err(StorageError::DuplicateId(customer.id()));
        }
        if customers.values().any(|stored| stored.email() == customer.email()) {
            return Err(StorageError::DuplicateEmail);
        }
        customers.insert(customer.id(), customer.clone());
        Ok(())
    }

    async fn update(&self, customer: &Customer) -> Result<(), StorageError> {
        let mut customers = self.customers.write().await;
        let taken = customers
            .values()
            .any(|stored| stored.email() == customer.email() && stored.id() != customer.id());
        if taken {
            return Err(StorageError::DuplicateEmail);
        }

        let stored =
            customers.get_mut(&customer.id()).ok_or(StorageError::NotFound(customer.id()))?;
        *stored = customer.clone();
        Ok(())
    }

    async fn delete(&self, id: &CustomerId) -> Result<(), StorageError> {
        let mut customers = self.customers.write().await;
        customers.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use rolodex_core::domain::{BankAccountNumber, Customer, Email, PhoneNumber};
    use rolodex_core::ports::{CustomerRepository, StorageError};

    use super::InMemoryCustomerRepository;

    fn customer(first: &str, email: &str) -> Customer {
        Customer::new(
            first,
            "Hopper",
            NaiveDate::from_ymd_opt(1906, 12, 9).expect("date"),
            PhoneNumber::from_canonical("+12015550123").expect("phone"),
            Email::parse(email).expect("email"),
            BankAccountNumber::parse("DE89370400440532013000").expect("iban"),
        )
        .expect("customer")
    }

    #[tokio::test]
    async fn in_memory_repo_round_trip() {
        let repo = InMemoryCustomerRepository::new();
        let grace = customer("Grace", "grace@example.com");

        repo.add(&grace).await.expect("add");

        assert_eq!(repo.find_by_id(&grace.id()).await.expect("find"), Some(grace.clone()));
        assert_eq!(repo.find_by_email(grace.email()).await.expect("find"), Some(grace.clone()));
        assert!(repo
            .exists_by_name_and_dob("Grace", "Hopper", grace.date_of_birth())
            .await
            .expect("exists"));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn add_rejects_taken_email_and_reused_id() {
        let repo = InMemoryCustomerRepository::new();
        let grace = customer("Grace", "grace@example.com");
        repo.add(&grace).await.expect("add");

        let twin = customer("Gracie", "grace@example.com");
        assert_eq!(repo.add(&twin).await, Err(StorageError::DuplicateEmail));
        assert_eq!(repo.add(&grace).await, Err(StorageError::DuplicateId(grace.id())));
    }

    #[tokio::test]
    async fn update_keeps_own_email_and_rejects_others() {
        let repo = InMemoryCustomerRepository::new();
        let mut grace = customer("Grace", "grace@example.com");
        let alan = customer("Alan", "alan@example.com");
        repo.add(&grace).await.expect("add");
        repo.add(&alan).await.expect("add");

        repo.update(&grace).await.expect("same email is not a conflict");

        grace.update_email(Email::parse("alan@example.com").expect("email"));
        assert_eq!(repo.update(&grace).await, Err(StorageError::DuplicateEmail));
    }

    #[tokio::test]
    async fn update_of_missing_customer_is_not_found_and_delete_is_a_no_op() {
        let repo = InMemoryCustomerRepository::new();
        let ghost = customer("Ghost", "ghost@example.com");

        assert_eq!(repo.update(&ghost).await, Err(StorageError::NotFound(ghost.id())));
        repo.delete(&ghost.id()).await.expect("delete of absent id");
        assert!(repo.is_empty().await);
    }
}

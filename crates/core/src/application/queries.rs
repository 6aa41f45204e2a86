use std::sync::Arc;

use crate::application::{storage_failure, CustomerView};
use crate::domain::{CustomerId, Email};
use crate::errors::ApplicationError;
use crate::ports::CustomerRepository;

pub struct CustomerQueryHandler {
    repository: Arc<dyn CustomerRepository>,
}

impl CustomerQueryHandler {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, id: &CustomerId) -> Result<Option<CustomerView>, ApplicationError> {
        let customer = self.repository.find_by_id(id).await.map_err(storage_failure)?;
        Ok(customer.as_ref().map(CustomerView::from))
    }

    /// A malformed address cannot belong to any customer, so it resolves to
    /// `None` rather than a validation error.
    pub async fn get_by_email(&self, raw: &str) -> Result<Option<CustomerView>, ApplicationError> {
        let Ok(email) = Email::parse(raw) else {
            return Ok(None);
        };

        let customer = self.repository.find_by_email(&email).await.map_err(storage_failure)?;
        Ok(customer.as_ref().map(CustomerView::from))
    }

    /// Ordered by last name, first name, then id.
    pub async fn list_all(&self) -> Result<Vec<CustomerView>, ApplicationError> {
        let mut customers = self.repository.list_all().await.map_err(storage_failure)?;
        customers.sort_by(|left, right| {
            left.last_name()
                .cmp(right.last_name())
                .then_with(|| left.first_name().cmp(right.first_name()))
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(customers.iter().map(CustomerView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use crate::application::commands::{CreateCustomer, CustomerCommandHandler};
    use crate::application::testing::RecordingRepository;
    use crate::domain::phone_number::tests::StubPlan;
    use crate::domain::CustomerId;

    use super::CustomerQueryHandler;

    async fn seeded() -> (Arc<RecordingRepository>, Vec<uuid::Uuid>) {
        let repository = Arc::new(RecordingRepository::default());
        let commands = CustomerCommandHandler::with_numbering_plan(repository.clone(), StubPlan);
        let mut ids = Vec::new();

        for (first, last, email) in [
            ("Grace", "Hopper", "grace@example.com"),
            ("Ada", "Lovelace", "ada@example.com"),
            ("Alan", "Hopper", "alan@example.com"),
        ] {
            let view = commands
                .create(CreateCustomer {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    date_of_birth: NaiveDate::from_ymd_opt(1980, 5, 17).expect("date"),
                    phone_number: "+14155552671".to_string(),
                    email: email.to_string(),
                    bank_account_number: "GB82WEST12345698765432".to_string(),
                })
                .await
                .expect("seed customer");
            ids.push(view.id);
        }

        (repository, ids)
    }

    #[tokio::test]
    async fn get_by_id_returns_projection_or_none() {
        let (repository, ids) = seeded().await;
        let queries = CustomerQueryHandler::new(repository);

        let found = queries.get_by_id(&CustomerId(ids[1])).await.expect("query");
        assert_eq!(found.map(|view| view.first_name), Some("Ada".to_string()));

        let missing = queries.get_by_id(&CustomerId::generate()).await.expect("query");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn get_by_email_normalizes_and_tolerates_garbage() {
        let (repository, _) = seeded().await;
        let queries = CustomerQueryHandler::new(repository);

        let found = queries.get_by_email("  GRACE@Example.com ").await.expect("query");
        assert_eq!(found.map(|view| view.last_name), Some("Hopper".to_string()));

        assert!(queries.get_by_email("not-an-email").await.expect("query").is_none());
        assert!(queries.get_by_email("nobody@example.com").await.expect("query").is_none());
    }

    #[tokio::test]
    async fn list_all_orders_by_last_then_first_name() {
        let (repository, _) = seeded().await;
        let queries = CustomerQueryHandler::new(repository);

        let names: Vec<String> = queries
            .list_all()
            .await
            .expect("query")
            .into_iter()
            .map(|view| format!("{} {}", view.first_name, view.last_name))
            .collect();

        assert_eq!(names, vec!["Alan Hopper", "Grace Hopper", "Ada Lovelace"]);
    }
}

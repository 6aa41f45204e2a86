use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Customer;

/// Wire projection of a customer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
    pub email: String,
    pub bank_account_number: String,
}

impl From<&Customer> for CustomerView {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id().0,
            first_name: customer.first_name().to_string(),
            last_name: customer.last_name().to_string(),
            date_of_birth: customer.date_of_birth(),
            phone_number: customer.phone_number().to_string(),
            email: customer.email().to_string(),
            bank_account_number: customer.bank_account_number().to_string(),
        }
    }
}

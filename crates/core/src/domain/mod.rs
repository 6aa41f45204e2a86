pub mod bank_account_number;
pub mod customer;
pub mod email;
pub mod numbering_plan;
pub mod phone_number;

pub use bank_account_number::{BankAccountNumber, BankAccountNumberError};
pub use customer::{Customer, CustomerId, MAX_NAME_LENGTH};
pub use email::{Email, EmailError};
pub use numbering_plan::{LibPhoneNumber, LineType, NumberingPlan};
pub use phone_number::{PhoneNumber, PhoneNumberError};

pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ports;

pub use application::{
    CreateCustomer, CustomerCommandHandler, CustomerQueryHandler, CustomerView, DeleteCustomer,
    UpdateCustomer,
};
pub use domain::{BankAccountNumber, Customer, CustomerId, Email, PhoneNumber};
pub use errors::{ApplicationError, ConflictKind, DomainError, InterfaceError};
pub use ports::{CustomerRepository, StorageError};

use rolodex_core::domain::CustomerId;
use rolodex_core::ports::StorageError;

pub mod customer;
pub mod memory;

pub use customer::SqlCustomerRepository;
pub use memory::InMemoryCustomerRepository;

/// Translates a failed write. SQLite reports unique violations as
/// `UNIQUE constraint failed: <table>.<column>`, which is how the email
/// index is told apart from the primary key.
pub(crate) fn write_failure(error: sqlx::Error, id: CustomerId) -> StorageError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            let message = db.message();
            if message.contains("customer.email") {
                return StorageError::DuplicateEmail;
            }
            if message.contains("customer.id") {
                return StorageError::DuplicateId(id);
            }
        }
    }

    read_failure(error)
}

pub(crate) fn read_failure(error: sqlx::Error) -> StorageError {
    match error {
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)
        | sqlx::Error::TypeNotFound { .. } => StorageError::Decode(error.to_string()),
        other => StorageError::Unavailable(other.to_string()),
    }
}

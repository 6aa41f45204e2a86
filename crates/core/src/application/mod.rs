pub mod commands;
pub mod queries;
pub mod view;

pub use commands::{CreateCustomer, CustomerCommandHandler, DeleteCustomer, UpdateCustomer};
pub use queries::CustomerQueryHandler;
pub use view::CustomerView;

use crate::errors::{ApplicationError, ConflictKind};
use crate::ports::StorageError;

/// Storage failures as the handlers report them. A uniqueness violation
/// caught by storage surfaces exactly like the pre-check conflict.
pub(crate) fn storage_failure(error: StorageError) -> ApplicationError {
    match error {
        StorageError::DuplicateEmail => ApplicationError::Conflict(ConflictKind::DuplicateEmail),
        StorageError::NotFound(id) => ApplicationError::NotFound(id),
        other => ApplicationError::StorageUnavailable(other.to_string()),
    }
}

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row};

use rolodex_core::domain::{BankAccountNumber, Customer, CustomerId, Email, PhoneNumber};
use rolodex_core::ports::{CustomerRepository, StorageError};

use super::{read_failure, write_failure};
use crate::DbPool;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for SqlCustomerRepository {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, StorageError> {
        let row = sqlx::query(
            "SELECT id, first_name, last_name, date_of_birth, phone_number, email, bank_account_number
             FROM customer
             WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(read_failure)?;

        row.map(customer_from_row).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, StorageError> {
        let row = sqlx::query(
            "SELECT id, first_name, last_name, date_of_birth, phone_number, email, bank_account_number
             FROM customer
             WHERE email = ?",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(read_failure)?;

        row.map(customer_from_row).transpose()
    }

    async fn exists_by_name_and_dob(
        &self,
        first_name: &str,
        last_name: &str,
        date_of_birth: NaiveDate,
    ) -> Result<bool, StorageError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM customer
             WHERE first_name = ? AND last_name = ? AND date_of_birth = ?",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(date_of_birth.format(DATE_FORMAT).to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(read_failure)?;

        Ok(count > 0)
    }

    async fn exists_by_email(
        &self,
        email: &Email,
        exclude_id: Option<&CustomerId>,
    ) -> Result<bool, StorageError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM customer
             WHERE email = ? AND (? IS NULL OR id <> ?)",
        )
        .bind(email.as_str())
        .bind(exclude_id.map(ToString::to_string))
        .bind(exclude_id.map(ToString::to_string))
        .fetch_one(&self.pool)
        .await
        .map_err(read_failure)?;

        Ok(count > 0)
    }

    async fn list_all(&self) -> Result<Vec<Customer>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, first_name, last_name, date_of_birth, phone_number, email, bank_account_number
             FROM customer
             ORDER BY last_name ASC, first_name ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(read_failure)?;

        rows.into_iter().map(customer_from_row).collect()
    }

    async fn add(&self, customer: &Customer) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO customer (
                id,
                first_name,
                last_name,
                date_of_birth,
                phone_number,
                email,
                bank_account_number,
                created_at,
                updated_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(customer.id().to_string())
        .bind(customer.first_name())
        .bind(customer.last_name())
        .bind(customer.date_of_birth().format(DATE_FORMAT).to_string())
        .bind(customer.phone_number().as_str())
        .bind(customer.email().as_str())
        .bind(customer.bank_account_number().as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|error| write_failure(error, customer.id()))?;

        Ok(())
    }

    async fn update(&self, customer: &Customer) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE customer SET
                phone_number = ?,
                email = ?,
                bank_account_number = ?,
                updated_at = ?
             WHERE id = ?",
        )
        .bind(customer.phone_number().as_str())
        .bind(customer.email().as_str())
        .bind(customer.bank_account_number().as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(customer.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(|error| write_failure(error, customer.id()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(customer.id()));
        }

        Ok(())
    }

    async fn delete(&self, id: &CustomerId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM customer WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(read_failure)?;

        Ok(())
    }
}

fn customer_from_row(row: SqliteRow) -> Result<Customer, StorageError> {
    let id_raw = column::<String>(&row, "id")?;
    let id = CustomerId::parse(&id_raw)
        .map_err(|error| StorageError::Decode(format!("invalid customer id `{id_raw}`: {error}")))?;

    let dob_raw = column::<String>(&row, "date_of_birth")?;
    let date_of_birth = NaiveDate::parse_from_str(&dob_raw, DATE_FORMAT).map_err(|error| {
        StorageError::Decode(format!("invalid date_of_birth `{dob_raw}` for `{id}`: {error}"))
    })?;

    let phone_number = PhoneNumber::from_canonical(&column::<String>(&row, "phone_number")?)
        .map_err(|error| decode_error(id, "phone_number", error))?;
    let email = Email::parse(&column::<String>(&row, "email")?)
        .map_err(|error| decode_error(id, "email", error))?;
    let bank_account_number =
        BankAccountNumber::parse(&column::<String>(&row, "bank_account_number")?)
            .map_err(|error| decode_error(id, "bank_account_number", error))?;

    Ok(Customer::restore(
        id,
        column(&row, "first_name")?,
        column(&row, "last_name")?,
        date_of_birth,
        phone_number,
        email,
        bank_account_number,
    ))
}

fn column<T>(row: &SqliteRow, name: &str) -> Result<T, StorageError>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get::<T, _>(name).map_err(|error| StorageError::Decode(error.to_string()))
}

fn decode_error(id: CustomerId, column: &str, error: impl std::fmt::Display) -> StorageError {
    StorageError::Decode(format!("invalid {column} for `{id}`: {error}"))
}

use chrono::NaiveDate;

use rolodex_core::application::{CreateCustomer, CustomerCommandHandler, CustomerView};
use rolodex_core::domain::NumberingPlan;
use rolodex_core::errors::ApplicationError;

/// A deterministic demo record.
#[derive(Clone, Copy, Debug)]
pub struct DemoCustomer {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub date_of_birth: NaiveDate,
    pub phone_number: &'static str,
    pub email: &'static str,
    pub bank_account_number: &'static str,
}

pub const DEMO_CUSTOMERS: &[DemoCustomer] = &[
    DemoCustomer {
        first_name: "Ada",
        last_name: "Lovelace",
        date_of_birth: date(1815, 12, 10),
        phone_number: "+44 7400 123456",
        email: "ada.lovelace@example.com",
        bank_account_number: "GB82 WEST 1234 5698 7654 32",
    },
    DemoCustomer {
        first_name: "Grace",
        last_name: "Hopper",
        date_of_birth: date(1906, 12, 9),
        phone_number: "+1 201 555 0123",
        email: "grace.hopper@example.com",
        bank_account_number: "DE89 3704 0044 0532 0130 00",
    },
    DemoCustomer {
        first_name: "Alan",
        last_name: "Turing",
        date_of_birth: date(1912, 6, 23),
        phone_number: "+1 415 555 2671",
        email: "alan.turing@example.com",
        bank_account_number: "FR14 2004 1010 0505 0001 3M02 606",
    },
];

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("demo date of birth does not exist"),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub inserted: Vec<CustomerView>,
    /// Emails of demo customers that already existed.
    pub skipped: Vec<String>,
}

impl DemoCustomer {
    fn to_command(self) -> CreateCustomer {
        CreateCustomer {
            first_name: self.first_name.to_string(),
            last_name: self.last_name.to_string(),
            date_of_birth: self.date_of_birth,
            phone_number: self.phone_number.to_string(),
            email: self.email.to_string(),
            bank_account_number: self.bank_account_number.to_string(),
        }
    }
}

/// Creates the demo customers through the command handler, so they pass the
/// same validation and uniqueness rules as any other write. Running it twice
/// inserts nothing the second time.
pub async fn seed_demo_customers<P: NumberingPlan>(
    commands: &CustomerCommandHandler<P>,
) -> Result<SeedResult, ApplicationError> {
    let mut result = SeedResult::default();

    for demo in DEMO_CUSTOMERS {
        match commands.create(demo.to_command()).await {
            Ok(view) => result.inserted.push(view),
            Err(ApplicationError::Conflict(_)) => result.skipped.push(demo.email.to_string()),
            Err(error) => return Err(error),
        }
    }

    Ok(result)
}

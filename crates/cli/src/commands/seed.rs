use std::sync::Arc;

use crate::commands::{prepare, CommandResult, EXIT_DATABASE, EXIT_MIGRATION, EXIT_SEED};
use rolodex_core::application::CustomerCommandHandler;
use rolodex_db::{connect, migrations, seed_demo_customers, SeedResult, SqlCustomerRepository};
use tracing::info;

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), EXIT_DATABASE))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), EXIT_MIGRATION))?;

        let commands =
            CustomerCommandHandler::new(Arc::new(SqlCustomerRepository::new(pool.clone())));
        let seeded = seed_demo_customers(&commands)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), EXIT_SEED));

        pool.close().await;
        seeded
    });

    match result {
        Ok(seeded) => {
            info!(
                event_name = "cli.seed.completed",
                correlation_id = "cli",
                inserted = seeded.inserted.len(),
                skipped = seeded.skipped.len(),
                "demo customers seeded"
            );
            CommandResult::success("seed", summary(&seeded))
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn summary(seeded: &SeedResult) -> String {
    let mut message = format!(
        "seeded {} demo customer(s), skipped {} existing",
        seeded.inserted.len(),
        seeded.skipped.len()
    );
    if !seeded.skipped.is_empty() {
        message.push_str(&format!(" ({})", seeded.skipped.join(", ")));
    }
    message
}

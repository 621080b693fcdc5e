//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Schema changes stay explicit here, so connect without the
    // auto-migration that serve performs.
    let db = Database::connect_without_migrations(&config).await?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            tracing::info!("Applied pending migrations");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            tracing::info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            for entry in db.migration_status().await? {
                let marker = if entry.applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, entry.name);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables before re-running migrations");
            db.fresh_migrations().await?;
            tracing::info!("Database reset complete");
        }
    }

    Ok(())
}

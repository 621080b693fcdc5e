//! Database connection and migration management.

use sea_orm::{Database as SeaDatabase, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;

pub mod migrations;

pub use migrations::Migrator;

/// Status of a single migration as reported by [`Database::migration_status`].
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    pub name: String,
    pub applied: bool,
}

/// Database handle owning the SeaORM connection.
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Connect and bring the schema up to date.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let db = Self::connect_without_migrations(config).await?;
        Migrator::up(&db.connection, None).await?;
        tracing::info!("Database connected, schema up to date");
        Ok(db)
    }

    /// Connect without touching the schema. Used by the migrate command,
    /// which drives schema changes explicitly.
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(&config.database_url).await?;
        Ok(Self { connection })
    }

    /// Borrow the underlying connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Apply all pending migrations.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Roll back the most recent migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Report every known migration and whether it has been applied,
    /// in application order.
    pub async fn migration_status(&self) -> Result<Vec<MigrationStatus>, DbErr> {
        let mut status: Vec<MigrationStatus> =
            Migrator::get_applied_migrations(&self.connection)
                .await?
                .into_iter()
                .map(|m| MigrationStatus {
                    name: m.name().to_string(),
                    applied: true,
                })
                .collect();

        status.extend(
            Migrator::get_pending_migrations(&self.connection)
                .await?
                .into_iter()
                .map(|m| MigrationStatus {
                    name: m.name().to_string(),
                    applied: false,
                }),
        );

        Ok(status)
    }

    /// Drop everything and re-run all migrations.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Check connectivity against the live connection.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection.ping().await
    }
}

//! Migration: Scope email uniqueness to active users.
//!
//! The service-level duplicate check is a pre-check only; this partial
//! unique index is what holds the invariant under concurrent writes.
//! Soft-deleted rows are excluded so a deleted user's email can be
//! registered again.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // sea-query has no builder support for partial indexes
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX uq_users_email_active \
                 ON users (email) WHERE deleted_at IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uq_users_email_active")
                    .table(Users::Table)
                    .to_owned(),
            )
            .await
    }
}

//! Initial database migration.
//!
//! Creates the users and wager_outcomes tables with the uniqueness and
//! append-only constraints the repositories rely on.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(WAGER_OUTCOMES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    email TEXT UNIQUE,
    phone_number TEXT UNIQUE,
    balance NUMERIC(20, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT users_contact_present CHECK (email IS NOT NULL OR phone_number IS NOT NULL)
);
";

const WAGER_OUTCOMES_SQL: &str = r"
CREATE TABLE wager_outcomes (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users (id),
    request_id UUID UNIQUE,
    bet_amount NUMERIC(20, 2) NOT NULL,
    payout NUMERIC(20, 2) NOT NULL,
    panels JSONB NOT NULL,
    outcome JSONB NOT NULL,
    balance_after NUMERIC(20, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX idx_wager_outcomes_user_created ON wager_outcomes (user_id, created_at);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS wager_outcomes;
DROP TABLE IF EXISTS users;
";

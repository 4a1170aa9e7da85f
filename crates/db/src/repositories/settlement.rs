//! Settlement repository: atomic wager settlement and the outcome ledger.
//!
//! `settle` is the only write path for wager outcomes, and the ledger insert
//! and the balance update always commit together or not at all. The account
//! row is locked (`SELECT ... FOR UPDATE`) for the whole read-compute-write
//! sequence, so concurrent settlements for the same user serialize instead
//! of losing updates.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
    prelude::DateTimeWithTimeZone,
};
use serde_json::Value as JsonValue;
use tracing::debug;
use uuid::Uuid;

use crate::entities::{users, wager_outcomes};
use punt_core::settlement::{SettlementEngine, SettlementError};

/// Error types for settlement operations.
#[derive(Debug, thiserror::Error)]
pub enum SettleError {
    /// Account not found (e.g. deleted between token issuance and this call).
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// The outcome was rejected by the settlement engine.
    #[error(transparent)]
    Rejected(#[from] SettlementError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for settling a single wager outcome.
#[derive(Debug, Clone)]
pub struct SettleInput {
    /// Amount staked.
    pub bet_amount: Decimal,
    /// Amount returned to the account.
    pub payout: Decimal,
    /// Opaque wager-shape payload.
    pub panels: JsonValue,
    /// Opaque outcome-detail payload.
    pub outcome: JsonValue,
    /// Optional idempotency key; replays return the original receipt.
    pub request_id: Option<Uuid>,
}

/// Result of a committed (or replayed) settlement.
#[derive(Debug, Clone)]
pub struct SettlementReceipt {
    /// Ledger record ID.
    pub outcome_id: Uuid,
    /// Balance after the settlement.
    pub new_balance: Decimal,
    /// Commit time of the ledger record.
    pub created_at: DateTimeWithTimeZone,
    /// True when an idempotent replay returned an earlier receipt.
    pub replayed: bool,
}

impl SettlementReceipt {
    fn replay(record: &wager_outcomes::Model) -> Self {
        Self {
            outcome_id: record.id,
            new_balance: record.balance_after,
            created_at: record.created_at,
            replayed: true,
        }
    }
}

/// Settlement repository: commits outcomes and reads the ledger.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    db: DatabaseConnection,
    engine: SettlementEngine,
}

impl SettlementRepository {
    /// Creates a new settlement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, engine: SettlementEngine) -> Self {
        Self { db, engine }
    }

    /// Settles a wager outcome for an account.
    ///
    /// Within one database transaction:
    /// 1. replay check on `request_id` (if supplied);
    /// 2. lock the account row and read the balance;
    /// 3. compute the new balance through the settlement engine;
    /// 4. insert the ledger record with its `balance_after` snapshot;
    /// 5. update the account balance;
    /// 6. commit.
    ///
    /// Any failure rolls the whole transaction back, so a ledger record
    /// exists if and only if the balance reflects it.
    ///
    /// # Errors
    ///
    /// Returns `SettleError::AccountNotFound` if the account is gone,
    /// `SettleError::Rejected` if the engine refuses the outcome, and
    /// `SettleError::Database` for storage failures.
    pub async fn settle(
        &self,
        user_id: Uuid,
        input: SettleInput,
    ) -> Result<SettlementReceipt, SettleError> {
        let txn = self.db.begin().await?;

        if let Some(request_id) = input.request_id {
            if let Some(existing) = Self::find_by_request_id(&txn, request_id).await? {
                txn.commit().await?;
                debug!(user_id = %user_id, request_id = %request_id, "Replayed settlement");
                return Ok(SettlementReceipt::replay(&existing));
            }
        }

        let user = users::Entity::find_by_id(user_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(SettleError::AccountNotFound(user_id))?;

        let new_balance =
            self.engine
                .apply_outcome(user.balance, input.bet_amount, input.payout)?;

        let now = Utc::now().into();
        let outcome_id = Uuid::new_v4();
        let record = wager_outcomes::ActiveModel {
            id: Set(outcome_id),
            user_id: Set(user_id),
            request_id: Set(input.request_id),
            bet_amount: Set(input.bet_amount),
            payout: Set(input.payout),
            panels: Set(input.panels),
            outcome: Set(input.outcome),
            balance_after: Set(new_balance),
            created_at: Set(now),
        };

        if let Err(e) = record.insert(&txn).await {
            // A racing request with the same idempotency key committed first:
            // the unique index on request_id caught it. Surface that commit.
            if let (Some(request_id), Some(SqlErr::UniqueConstraintViolation(_))) =
                (input.request_id, e.sql_err())
            {
                drop(txn);
                if let Some(existing) = wager_outcomes::Entity::find()
                    .filter(wager_outcomes::Column::RequestId.eq(request_id))
                    .one(&self.db)
                    .await?
                {
                    debug!(user_id = %user_id, request_id = %request_id, "Replayed settlement after insert race");
                    return Ok(SettlementReceipt::replay(&existing));
                }
            }
            return Err(SettleError::Database(e));
        }

        let mut account = user.into_active_model();
        account.balance = Set(new_balance);
        account.updated_at = Set(now);
        account.update(&txn).await?;

        txn.commit().await?;

        debug!(user_id = %user_id, outcome_id = %outcome_id, "Settled wager outcome");

        Ok(SettlementReceipt {
            outcome_id,
            new_balance,
            created_at: now,
            replayed: false,
        })
    }

    /// Lists an account's outcome records in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<wager_outcomes::Model>, DbErr> {
        wager_outcomes::Entity::find()
            .filter(wager_outcomes::Column::UserId.eq(user_id))
            .order_by_asc(wager_outcomes::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    async fn find_by_request_id<C: sea_orm::ConnectionTrait>(
        conn: &C,
        request_id: Uuid,
    ) -> Result<Option<wager_outcomes::Model>, DbErr> {
        wager_outcomes::Entity::find()
            .filter(wager_outcomes::Column::RequestId.eq(request_id))
            .one(conn)
            .await
    }
}

//! User repository: the account store.
//!
//! One balance record per user. The balance itself is mutated only here and
//! in the settlement repository, both under a `SELECT ... FOR UPDATE` row
//! lock so the two writers serialize against each other.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::users;
use punt_core::settlement::INITIAL_GRANT;

/// Error types for account-store operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Username, email, or phone number collides with an existing account.
    #[error("Username, email, or phone number already exists")]
    DuplicateIdentity,

    /// Account not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Profile view of an account: what the owner may see.
#[derive(Debug, Clone)]
pub struct UserProfile {
    /// The username chosen at registration.
    pub username: String,
    /// Current balance.
    pub balance: Decimal,
}

/// User repository for account operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account with the initial balance grant.
    ///
    /// Uniqueness of username, email, and phone number is enforced by the
    /// store's constraints, not by a prior existence check, so two racing
    /// registrations cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `UserError::DuplicateIdentity` on a uniqueness violation, or
    /// `UserError::Database` for any other storage failure.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<users::Model, UserError> {
        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            email: Set(email.map(ToString::to_string)),
            phone_number: Set(phone_number.map(ToString::to_string)),
            balance: Set(INITIAL_GRANT),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                UserError::DuplicateIdentity
            } else {
                UserError::Database(e)
            }
        })
    }

    /// Finds a user by username, including the credential hash (for login).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Reads the current balance for an account.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if no such account exists.
    pub async fn get_balance(&self, id: Uuid) -> Result<Decimal, UserError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.balance)
    }

    /// Reads the profile (username and balance) for an account.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if no such account exists.
    pub async fn get_profile(&self, id: Uuid) -> Result<UserProfile, UserError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(UserProfile {
            username: user.username,
            balance: user.balance,
        })
    }

    /// Overwrites an account balance (administrative adjustment).
    ///
    /// Runs under the same row lock as settlement, so a direct overwrite can
    /// never interleave with a settlement's read-compute-write sequence.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if no such account exists.
    pub async fn set_balance(&self, id: Uuid, new_balance: Decimal) -> Result<Decimal, UserError> {
        let txn = self.db.begin().await?;

        let user = users::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let mut account = user.into_active_model();
        account.balance = Set(new_balance);
        account.updated_at = Set(Utc::now().into());
        account.update(&txn).await?;

        txn.commit().await?;

        Ok(new_balance)
    }
}

use super::value_objects::UserStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User aggregate root
///
/// A storefront user identified by the chat id of the conversation.
/// Holds the deposited balance every purchase is paid from.
///
/// # Invariants
/// - Balance never goes negative
/// - Credits and debits must be positive amounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: Uuid,
    chat_id: i64,
    balance: Decimal,
    status: UserStatus,
    total_spent: Decimal,
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active user with a zero balance
    pub fn new(chat_id: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat_id,
            balance: Decimal::ZERO,
            status: UserStatus::Active,
            total_spent: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Adds funds to the balance
    ///
    /// # Business Rules
    /// - Amount must be strictly positive
    pub fn credit(&mut self, amount: Decimal) -> Result<(), String> {
        if amount <= Decimal::ZERO {
            return Err("Credit amount must be positive".to_string());
        }
        self.balance += amount;
        Ok(())
    }

    /// Removes funds from the balance
    ///
    /// # Business Rules
    /// - Amount must be strictly positive
    /// - Balance must cover the full amount
    pub fn debit(&mut self, amount: Decimal) -> Result<(), String> {
        if amount <= Decimal::ZERO {
            return Err("Debit amount must be positive".to_string());
        }
        if self.balance < amount {
            return Err(format!(
                "Insufficient balance: have {}, need {}",
                self.balance, amount
            ));
        }
        self.balance -= amount;
        self.total_spent += amount;
        Ok(())
    }

    /// Returns spent funds after a cancelled purchase
    ///
    /// Unlike `credit` this also rolls back the spend counter.
    pub fn refund(&mut self, amount: Decimal) -> Result<(), String> {
        if amount <= Decimal::ZERO {
            return Err("Refund amount must be positive".to_string());
        }
        self.balance += amount;
        self.total_spent -= amount;
        Ok(())
    }

    /// Blocks the user from all storefront actions
    pub fn ban(&mut self) {
        self.status = UserStatus::Banned;
    }

    /// Restores a banned user
    pub fn unban(&mut self) {
        self.status = UserStatus::Active;
    }

    /// True when the user may browse, deposit and order
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn total_spent(&self) -> Decimal {
        self.total_spent
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

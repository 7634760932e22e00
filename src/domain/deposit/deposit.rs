use super::events::DepositEvent;
use super::value_objects::{DepositMethod, DepositStatus};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Deposit aggregate root
///
/// A balance top-up request awaiting manual or automatic confirmation.
/// Manual deposits carry an uploaded proof file id; auto deposits carry
/// the external id the payment gateway assigned.
///
/// # Invariants
/// - Amount must be positive
/// - Status transitions follow the defined rules
/// - A deposit past `expires_at` is marked expired exactly once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    id: Uuid,
    user_id: Uuid,
    amount: Decimal,
    method: DepositMethod,
    status: DepositStatus,
    external_id: Option<String>,
    proof_file: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Deposit {
    /// Creates a new pending deposit
    ///
    /// # Arguments
    /// * `user_id` - The depositing user
    /// * `amount` - Amount to credit on completion (must be positive)
    /// * `method` - Manual or auto confirmation
    /// * `ttl_minutes` - Minutes until an unconfirmed deposit expires
    pub fn new(
        user_id: Uuid,
        amount: Decimal,
        method: DepositMethod,
        ttl_minutes: i64,
    ) -> Result<(Self, Vec<DepositEvent>), String> {
        if amount <= Decimal::ZERO {
            return Err("Deposit amount must be positive".to_string());
        }

        let now = Utc::now();
        let deposit = Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            method,
            status: DepositStatus::Pending,
            external_id: None,
            proof_file: None,
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
        };

        let events = vec![DepositEvent::Opened {
            deposit_id: deposit.id,
            user_id,
            amount,
            method,
        }];

        Ok((deposit, events))
    }

    /// Records the id the payment gateway assigned to this deposit
    pub fn attach_external_id(&mut self, external_id: String) {
        self.external_id = Some(external_id);
    }

    /// Records the uploaded proof file for a manual deposit
    ///
    /// # Business Rules
    /// - Only pending manual deposits accept a proof
    pub fn attach_proof(&mut self, file_id: String) -> Result<(), String> {
        if self.method != DepositMethod::Manual {
            return Err("Only manual deposits take a proof upload".to_string());
        }
        if !self.status.is_pending() {
            return Err(format!("Cannot attach proof in {} status", self.status));
        }
        self.proof_file = Some(file_id);
        Ok(())
    }

    /// Confirmation: Pending -> Completed
    ///
    /// Crediting the user's balance is the caller's responsibility;
    /// the aggregate only records the state change.
    pub fn complete(&mut self) -> Result<DepositEvent, String> {
        self.transition(DepositStatus::Completed)?;
        Ok(DepositEvent::Completed {
            deposit_id: self.id,
            user_id: self.user_id,
            amount: self.amount,
        })
    }

    /// Admin rejection: Pending -> Rejected
    pub fn reject(&mut self) -> Result<DepositEvent, String> {
        self.transition(DepositStatus::Rejected)?;
        Ok(DepositEvent::Rejected { deposit_id: self.id })
    }

    /// Expiry sweep: Pending -> Expired
    pub fn expire(&mut self) -> Result<DepositEvent, String> {
        self.transition(DepositStatus::Expired)?;
        Ok(DepositEvent::Expired { deposit_id: self.id })
    }

    /// User abandonment: Pending -> Cancelled
    pub fn cancel(&mut self) -> Result<DepositEvent, String> {
        self.transition(DepositStatus::Cancelled)?;
        Ok(DepositEvent::Cancelled { deposit_id: self.id })
    }

    fn transition(&mut self, next: DepositStatus) -> Result<(), String> {
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "Cannot move deposit from {} to {}",
                self.status, next
            ));
        }
        self.status = next;
        Ok(())
    }

    /// True for a pending deposit whose TTL has elapsed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status.is_pending() && now > self.expires_at
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn method(&self) -> DepositMethod {
        self.method
    }

    pub fn status(&self) -> DepositStatus {
        self.status
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn proof_file(&self) -> Option<&str> {
        self.proof_file.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

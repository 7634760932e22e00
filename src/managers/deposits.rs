use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::errors::{ShopError, ShopResult};
use crate::domain::deposit::{Deposit, DepositMethod, DepositStatus};
use crate::domain::gateway::{GatewayStatus, PaymentGateway};
use crate::domain::repositories::{DepositRepository, UserRepository};

/// Manager for the deposit lifecycle
///
/// Manual deposits wait for an admin to review the uploaded proof; auto
/// deposits are registered with the payment gateway and polled for
/// completion. Crediting the balance happens on the transition to
/// completed, and the terminal state machine makes the credit fire at
/// most once even if the gateway keeps reporting completed.
pub struct DepositManager {
    deposits: Arc<dyn DepositRepository>,
    users: Arc<dyn UserRepository>,
    gateway: Arc<dyn PaymentGateway>,
    deposit_ttl_minutes: i64,
}

impl DepositManager {
    pub fn new(
        deposits: Arc<dyn DepositRepository>,
        users: Arc<dyn UserRepository>,
        gateway: Arc<dyn PaymentGateway>,
        deposit_ttl_minutes: i64,
    ) -> Self {
        Self {
            deposits,
            users,
            gateway,
            deposit_ttl_minutes,
        }
    }

    /// Opens a manual deposit; the proof upload follows via `/done`
    pub async fn open_manual(&self, user_id: Uuid, amount: Decimal) -> ShopResult<Deposit> {
        let (deposit, events) =
            Deposit::new(user_id, amount, DepositMethod::Manual, self.deposit_ttl_minutes)
                .map_err(ShopError::InvalidOperation)?;
        self.deposits
            .save(&deposit)
            .await
            .map_err(ShopError::Storage)?;
        for event in &events {
            tracing::info!(?event, "Manual deposit opened");
        }
        Ok(deposit)
    }

    /// Opens an auto deposit through the gateway
    ///
    /// Returns the deposit together with the QR-code payment URL the
    /// user is sent to.
    pub async fn open_auto(&self, user_id: Uuid, amount: Decimal) -> ShopResult<(Deposit, String)> {
        let (mut deposit, events) =
            Deposit::new(user_id, amount, DepositMethod::Auto, self.deposit_ttl_minutes)
                .map_err(ShopError::InvalidOperation)?;

        let receipt = self.gateway.create_deposit(amount).await?;
        deposit.attach_external_id(receipt.external_id);

        self.deposits
            .save(&deposit)
            .await
            .map_err(ShopError::Storage)?;
        for event in &events {
            tracing::info!(?event, "Auto deposit opened");
        }
        Ok((deposit, receipt.pay_url))
    }

    /// Looks up a deposit by id
    pub async fn get(&self, deposit_id: Uuid) -> ShopResult<Deposit> {
        self.deposits
            .find_by_id(deposit_id)
            .await
            .map_err(ShopError::Storage)?
            .ok_or(ShopError::DepositNotFound(deposit_id))
    }

    /// Attaches the uploaded proof to a pending manual deposit
    pub async fn attach_proof(&self, deposit_id: Uuid, file_id: String) -> ShopResult<Deposit> {
        let mut deposit = self.get(deposit_id).await?;
        deposit
            .attach_proof(file_id)
            .map_err(ShopError::InvalidOperation)?;
        self.deposits
            .save(&deposit)
            .await
            .map_err(ShopError::Storage)?;
        Ok(deposit)
    }

    /// Admin approval of a manual deposit: complete and credit
    pub async fn approve(&self, deposit_id: Uuid) -> ShopResult<Deposit> {
        let mut deposit = self.get(deposit_id).await?;
        let event = deposit.complete().map_err(ShopError::InvalidOperation)?;
        self.deposits
            .save(&deposit)
            .await
            .map_err(ShopError::Storage)?;
        self.credit_user(&deposit).await?;
        tracing::info!(?event, "Deposit approved");
        Ok(deposit)
    }

    /// Admin rejection of a manual deposit
    pub async fn reject(&self, deposit_id: Uuid) -> ShopResult<Deposit> {
        let mut deposit = self.get(deposit_id).await?;
        let event = deposit.reject().map_err(ShopError::InvalidOperation)?;
        self.deposits
            .save(&deposit)
            .await
            .map_err(ShopError::Storage)?;
        tracing::info!(?event, "Deposit rejected");
        Ok(deposit)
    }

    /// User abandonment; auto deposits are cancelled gateway-side too
    pub async fn cancel(&self, deposit_id: Uuid) -> ShopResult<Deposit> {
        let mut deposit = self.get(deposit_id).await?;
        let event = deposit.cancel().map_err(ShopError::InvalidOperation)?;
        self.deposits
            .save(&deposit)
            .await
            .map_err(ShopError::Storage)?;

        if deposit.method() == DepositMethod::Auto {
            if let Some(external_id) = deposit.external_id() {
                // Gateway refusal is logged, not surfaced; the local
                // record is already cancelled.
                if let Err(e) = self.gateway.cancel_deposit(external_id).await {
                    tracing::warn!(deposit_id = %deposit_id, error = %e, "Gateway-side cancel failed");
                }
            }
        }

        tracing::info!(?event, "Deposit cancelled");
        Ok(deposit)
    }

    /// All deposits a user has opened
    pub async fn list_for_user(&self, user_id: Uuid) -> ShopResult<Vec<Deposit>> {
        self.deposits
            .find_by_user(user_id)
            .await
            .map_err(ShopError::Storage)
    }

    /// Manual deposits awaiting admin review
    pub async fn list_pending_manual(&self) -> ShopResult<Vec<Deposit>> {
        let pending = self
            .deposits
            .find_by_status(DepositStatus::Pending)
            .await
            .map_err(ShopError::Storage)?;
        Ok(pending
            .into_iter()
            .filter(|d| d.method() == DepositMethod::Manual && d.proof_file().is_some())
            .collect())
    }

    /// Asks the gateway about one pending auto deposit
    ///
    /// Completed credits the user exactly once; cancelled closes the
    /// local record; pending and gateway errors leave it for the next
    /// polling pass.
    pub async fn poll_one(&self, deposit_id: Uuid) -> ShopResult<Deposit> {
        let mut deposit = self.get(deposit_id).await?;
        if deposit.method() != DepositMethod::Auto {
            return Err(ShopError::InvalidOperation(
                "Only auto deposits are polled".to_string(),
            ));
        }
        if !deposit.status().is_pending() {
            return Ok(deposit);
        }
        let external_id = deposit
            .external_id()
            .ok_or_else(|| {
                ShopError::InvalidOperation("Auto deposit has no external id".to_string())
            })?
            .to_string();

        match self.gateway.check_deposit(&external_id).await? {
            GatewayStatus::Completed => {
                let event = deposit.complete().map_err(ShopError::InvalidOperation)?;
                self.deposits
                    .save(&deposit)
                    .await
                    .map_err(ShopError::Storage)?;
                self.credit_user(&deposit).await?;
                tracing::info!(?event, "Auto deposit confirmed");
            }
            GatewayStatus::Cancelled => {
                let event = deposit.cancel().map_err(ShopError::InvalidOperation)?;
                self.deposits
                    .save(&deposit)
                    .await
                    .map_err(ShopError::Storage)?;
                tracing::info!(?event, "Auto deposit cancelled gateway-side");
            }
            GatewayStatus::Pending => {}
        }
        Ok(deposit)
    }

    /// The periodic re-check loop over every pending auto deposit
    ///
    /// Returns how many deposits completed this pass. Gateway failures
    /// are logged per deposit and do not stop the loop.
    pub async fn poll_pending(&self) -> ShopResult<usize> {
        let pending = self
            .deposits
            .find_by_status(DepositStatus::Pending)
            .await
            .map_err(ShopError::Storage)?;

        let mut completed = 0;
        for deposit in pending {
            if deposit.method() != DepositMethod::Auto {
                continue;
            }
            match self.poll_one(deposit.id()).await {
                Ok(d) if d.status() == DepositStatus::Completed => completed += 1,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(deposit_id = %deposit.id(), error = %e, "Deposit poll failed")
                }
            }
        }
        Ok(completed)
    }

    /// Marks every pending deposit past its expiry expired, exactly once
    pub async fn expire_pending(&self) -> ShopResult<usize> {
        let now = Utc::now();
        let pending = self
            .deposits
            .find_by_status(DepositStatus::Pending)
            .await
            .map_err(ShopError::Storage)?;

        let mut expired = 0;
        for mut deposit in pending {
            if !deposit.is_expired(now) {
                continue;
            }
            match deposit.expire() {
                Ok(event) => {
                    self.deposits
                        .save(&deposit)
                        .await
                        .map_err(ShopError::Storage)?;
                    tracing::info!(?event, "Deposit expired");
                    expired += 1;
                }
                Err(e) => {
                    tracing::error!(deposit_id = %deposit.id(), error = %e, "Failed to expire deposit")
                }
            }
        }
        Ok(expired)
    }

    async fn credit_user(&self, deposit: &Deposit) -> ShopResult<()> {
        let mut user = self
            .users
            .find_by_id(deposit.user_id())
            .await
            .map_err(ShopError::Storage)?
            .ok_or(ShopError::UserNotFound(deposit.user_id()))?;
        user.credit(deposit.amount())
            .map_err(ShopError::InvalidOperation)?;
        self.users.save(&user).await.map_err(ShopError::Storage)
    }
}

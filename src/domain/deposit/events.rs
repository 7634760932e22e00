use super::value_objects::DepositMethod;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Domain events that occur within the Deposit aggregate
#[derive(Debug, Clone)]
pub enum DepositEvent {
    /// Fired when a user opens a deposit
    Opened {
        deposit_id: Uuid,
        user_id: Uuid,
        amount: Decimal,
        method: DepositMethod,
    },
    /// Fired when a deposit is confirmed and the user is credited
    Completed {
        deposit_id: Uuid,
        user_id: Uuid,
        amount: Decimal,
    },
    /// Fired when an admin rejects a manual deposit
    Rejected { deposit_id: Uuid },
    /// Fired when the expiry sweep retires a pending deposit
    Expired { deposit_id: Uuid },
    /// Fired when the user abandons a deposit
    Cancelled { deposit_id: Uuid },
}

impl DepositEvent {
    /// Returns the deposit_id for this event
    pub fn deposit_id(&self) -> Uuid {
        match self {
            DepositEvent::Opened { deposit_id, .. } => *deposit_id,
            DepositEvent::Completed { deposit_id, .. } => *deposit_id,
            DepositEvent::Rejected { deposit_id } => *deposit_id,
            DepositEvent::Expired { deposit_id } => *deposit_id,
            DepositEvent::Cancelled { deposit_id } => *deposit_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn opened_event_carries_deposit_id() {
        let deposit_id = Uuid::new_v4();
        let event = DepositEvent::Opened {
            deposit_id,
            user_id: Uuid::new_v4(),
            amount: dec!(50),
            method: DepositMethod::Auto,
        };

        assert_eq!(event.deposit_id(), deposit_id);
    }

    #[test]
    fn expired_event_carries_deposit_id() {
        let deposit_id = Uuid::new_v4();
        let event = DepositEvent::Expired { deposit_id };

        assert_eq!(event.deposit_id(), deposit_id);
    }
}

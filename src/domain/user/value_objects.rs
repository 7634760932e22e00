use serde::{Deserialize, Serialize};

/// Account standing of a storefront user
///
/// Banned users keep their record and balance but every storefront
/// action is refused until an admin lifts the ban.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// User may browse, deposit and order
    Active,
    /// User is blocked from all storefront actions
    Banned,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Banned => write!(f, "banned"),
        }
    }
}

use std::str::FromStr;
use uuid::Uuid;

/// Admin-only callback actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    ApproveDeposit(Uuid),
    RejectDeposit(Uuid),
    ApproveOrder(Uuid),
    CompleteOrder(Uuid),
    CancelOrder(Uuid),
    BanUser(Uuid),
    UnbanUser(Uuid),
    /// Paginated user listing, `admin:users:page_N`
    ListUsers { page: usize },
    /// Manual deposits awaiting review
    PendingDeposits,
    /// Orders awaiting approval
    PendingOrders,
}

/// Callback-menu actions, encoded as colon/underscore-delimited strings
///
/// Examples: `shop:page_2`, `product:<uuid>`, `buy:<uuid>`,
/// `deposit:manual`, `deposit:cancel:<uuid>`,
/// `admin:approve_deposit:<uuid>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// Show one catalog page
    Shop { page: usize },
    /// Show one product's details
    ShowProduct(Uuid),
    /// Purchase a product
    Buy(Uuid),
    /// Start a manual deposit
    DepositManual,
    /// Start an auto (gateway QR) deposit
    DepositAuto,
    /// Abandon a pending deposit
    CancelDeposit(Uuid),
    /// List the caller's own orders
    MyOrders,
    Admin(AdminAction),
}

fn parse_page(token: &str) -> Result<usize, String> {
    let n = token
        .strip_prefix("page_")
        .ok_or_else(|| format!("Expected page_N, got '{}'", token))?;
    n.parse::<usize>()
        .map_err(|_| format!("Bad page number '{}'", n))
}

fn parse_uuid(token: &str) -> Result<Uuid, String> {
    Uuid::parse_str(token).map_err(|_| format!("Bad id '{}'", token))
}

impl FromStr for CallbackAction {
    type Err = String;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = data.split(':').collect();
        match parts.as_slice() {
            ["shop", page] => Ok(CallbackAction::Shop {
                page: parse_page(page)?,
            }),
            ["product", id] => Ok(CallbackAction::ShowProduct(parse_uuid(id)?)),
            ["buy", id] => Ok(CallbackAction::Buy(parse_uuid(id)?)),
            ["deposit", "manual"] => Ok(CallbackAction::DepositManual),
            ["deposit", "auto"] => Ok(CallbackAction::DepositAuto),
            ["deposit", "cancel", id] => Ok(CallbackAction::CancelDeposit(parse_uuid(id)?)),
            ["orders"] => Ok(CallbackAction::MyOrders),
            ["admin", rest @ ..] => Self::parse_admin(rest).map(CallbackAction::Admin),
            _ => Err(format!("Unknown callback '{}'", data)),
        }
    }
}

impl CallbackAction {
    fn parse_admin(parts: &[&str]) -> Result<AdminAction, String> {
        match parts {
            ["approve_deposit", id] => Ok(AdminAction::ApproveDeposit(parse_uuid(id)?)),
            ["reject_deposit", id] => Ok(AdminAction::RejectDeposit(parse_uuid(id)?)),
            ["approve_order", id] => Ok(AdminAction::ApproveOrder(parse_uuid(id)?)),
            ["complete_order", id] => Ok(AdminAction::CompleteOrder(parse_uuid(id)?)),
            ["cancel_order", id] => Ok(AdminAction::CancelOrder(parse_uuid(id)?)),
            ["ban_user", id] => Ok(AdminAction::BanUser(parse_uuid(id)?)),
            ["unban_user", id] => Ok(AdminAction::UnbanUser(parse_uuid(id)?)),
            ["users", page] => Ok(AdminAction::ListUsers {
                page: parse_page(page)?,
            }),
            ["pending_deposits"] => Ok(AdminAction::PendingDeposits),
            ["pending_orders"] => Ok(AdminAction::PendingOrders),
            _ => Err(format!("Unknown admin callback '{}'", parts.join(":"))),
        }
    }
}

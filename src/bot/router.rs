use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::callback::{AdminAction, CallbackAction};
use super::commands::Command;
use super::security::{RateLimiter, Verdict};
use super::session::{SessionMap, SessionState};
use crate::domain::deposit::{Deposit, DepositMethod};
use crate::domain::order::Order;
use crate::domain::product::Product;
use crate::domain::user::User;
use crate::managers::{
    DepositManager, OrderManager, Page, ProductManager, ShopError, UserManager,
};

/// Typed reply the host bot renders into a message
///
/// Rendering and formatting are out of scope here; the adapter only
/// decides WHAT to answer.
#[derive(Debug)]
pub enum Reply {
    /// Main menu with the user's current balance
    MainMenu { balance: Decimal },
    /// One catalog page
    Catalog(Page<Product>),
    /// One product's details
    ProductDetails(Product),
    /// Order placed, now pending admin approval
    OrderPlaced(Order),
    /// The caller's order history
    OrderList(Vec<Order>),
    /// Order state changed (approved/cancelled)
    OrderUpdated(Order),
    /// Order delivered with its file ids
    OrderDelivered { order_id: Uuid, files: Vec<String> },
    /// Ask the user to type a deposit amount
    AskDepositAmount { method: DepositMethod },
    /// Manual deposit opened, now waiting for a proof upload
    AwaitingProof(Deposit),
    /// Proof stored; `/done` submits it for review
    ProofAttached(Deposit),
    /// Manual deposit submitted for admin review
    DepositSubmitted(Deposit),
    /// Auto deposit opened; send the user to the QR payment URL
    DepositPayUrl { deposit: Deposit, pay_url: String },
    /// Deposit state changed (approved/rejected/cancelled)
    DepositUpdated(Deposit),
    /// Admin: manual deposits awaiting review
    PendingDeposits(Vec<Deposit>),
    /// Admin: orders awaiting approval
    PendingOrders(Vec<Order>),
    /// Admin: one page of registered users
    UserList(Page<User>),
    /// Admin: a user's standing changed
    UserUpdated(User),
    /// Too many actions; the input was dropped
    RateLimited,
    /// Flood ban in effect
    FloodBanned { until: DateTime<Utc> },
    /// Caller is not an admin
    NotAdmin,
    /// Input did not parse to anything actionable
    Unknown,
    /// The operation failed; text goes straight to the user
    Failure(String),
}

/// Dispatches parsed chat input to the domain managers
///
/// Order of checks for every inbound event: rate limiter, user lookup,
/// ban status, then the session map or the parsed action.
pub struct Router {
    users: Arc<UserManager>,
    products: Arc<ProductManager>,
    orders: Arc<OrderManager>,
    deposits: Arc<DepositManager>,
    sessions: SessionMap,
    limiter: RateLimiter,
    admin_chat_ids: Vec<i64>,
    page_size: usize,
}

impl Router {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<UserManager>,
        products: Arc<ProductManager>,
        orders: Arc<OrderManager>,
        deposits: Arc<DepositManager>,
        limiter: RateLimiter,
        admin_chat_ids: Vec<i64>,
        page_size: usize,
    ) -> Self {
        Self {
            users,
            products,
            orders,
            deposits,
            sessions: SessionMap::new(),
            limiter,
            admin_chat_ids,
            page_size,
        }
    }

    fn is_admin(&self, chat_id: i64) -> bool {
        self.admin_chat_ids.contains(&chat_id)
    }

    // Uniform failure path: log and hand the text back to the user.
    fn failure(context: &str, error: ShopError) -> Reply {
        tracing::error!(context, error = %error, "Operation failed");
        Reply::Failure(error.to_string())
    }

    /// Handles a plain chat message
    ///
    /// `attachment` carries the opaque file id when the message had an
    /// upload; the upload plumbing itself lives in the host bot.
    pub async fn handle_message(
        &self,
        chat_id: i64,
        text: &str,
        attachment: Option<&str>,
    ) -> Reply {
        match self.limiter.check(chat_id).await {
            Verdict::Allowed => {}
            Verdict::Limited => return Reply::RateLimited,
            Verdict::Banned { until } => return Reply::FloodBanned { until },
        }

        let user = match self.users.get_or_register(chat_id).await {
            Ok(user) => user,
            Err(e) => return Self::failure("get_or_register", e),
        };
        if !user.is_active() {
            return Reply::Failure("Your account is banned".to_string());
        }

        if let Some(command) = Command::parse(text) {
            return self.handle_command(chat_id, &user, command).await;
        }

        match self.sessions.get(chat_id).await {
            SessionState::AwaitingDepositAmount { method } => {
                self.handle_amount_input(chat_id, &user, method, text).await
            }
            SessionState::AwaitingProof { deposit_id } => match attachment {
                Some(file_id) => match self.deposits.attach_proof(deposit_id, file_id.to_string()).await {
                    Ok(deposit) => Reply::ProofAttached(deposit),
                    Err(e) => Self::failure("attach_proof", e),
                },
                None => Reply::AwaitingProof(match self.deposits.get(deposit_id).await {
                    Ok(deposit) => deposit,
                    Err(e) => return Self::failure("get_deposit", e),
                }),
            },
            SessionState::Idle => Reply::Unknown,
        }
    }

    async fn handle_command(&self, chat_id: i64, user: &User, command: Command) -> Reply {
        match command {
            Command::Start => {
                self.sessions.clear(chat_id).await;
                Reply::MainMenu {
                    balance: user.balance(),
                }
            }
            Command::Done => match self.sessions.get(chat_id).await {
                SessionState::AwaitingProof { deposit_id } => {
                    let deposit = match self.deposits.get(deposit_id).await {
                        Ok(deposit) => deposit,
                        Err(e) => return Self::failure("get_deposit", e),
                    };
                    if deposit.proof_file().is_none() {
                        return Reply::Failure(
                            "Upload a payment proof before sending /done".to_string(),
                        );
                    }
                    self.sessions.clear(chat_id).await;
                    Reply::DepositSubmitted(deposit)
                }
                _ => Reply::Unknown,
            },
        }
    }

    async fn handle_amount_input(
        &self,
        chat_id: i64,
        user: &User,
        method: DepositMethod,
        text: &str,
    ) -> Reply {
        let amount = match Decimal::from_str(text.trim()) {
            Ok(amount) if amount > Decimal::ZERO => amount,
            _ => return Reply::Failure(format!("'{}' is not a valid amount", text.trim())),
        };

        match method {
            DepositMethod::Manual => match self.deposits.open_manual(user.id(), amount).await {
                Ok(deposit) => {
                    self.sessions
                        .set(
                            chat_id,
                            SessionState::AwaitingProof {
                                deposit_id: deposit.id(),
                            },
                        )
                        .await;
                    Reply::AwaitingProof(deposit)
                }
                Err(e) => Self::failure("open_manual", e),
            },
            DepositMethod::Auto => match self.deposits.open_auto(user.id(), amount).await {
                Ok((deposit, pay_url)) => {
                    self.sessions.clear(chat_id).await;
                    Reply::DepositPayUrl { deposit, pay_url }
                }
                Err(e) => Self::failure("open_auto", e),
            },
        }
    }

    /// Handles a callback-menu press
    pub async fn handle_callback(&self, chat_id: i64, data: &str) -> Reply {
        match self.limiter.check(chat_id).await {
            Verdict::Allowed => {}
            Verdict::Limited => return Reply::RateLimited,
            Verdict::Banned { until } => return Reply::FloodBanned { until },
        }

        let user = match self.users.get_or_register(chat_id).await {
            Ok(user) => user,
            Err(e) => return Self::failure("get_or_register", e),
        };
        if !user.is_active() {
            return Reply::Failure("Your account is banned".to_string());
        }

        let action = match data.parse::<CallbackAction>() {
            Ok(action) => action,
            Err(e) => {
                tracing::warn!(chat_id, data, error = %e, "Bad callback data");
                return Reply::Unknown;
            }
        };

        match action {
            CallbackAction::Shop { page } => {
                match self.products.catalog_page(page, self.page_size).await {
                    Ok(page) => Reply::Catalog(page),
                    Err(e) => Self::failure("catalog_page", e),
                }
            }
            CallbackAction::ShowProduct(id) => match self.products.get(id).await {
                Ok(product) => Reply::ProductDetails(product),
                Err(e) => Self::failure("get_product", e),
            },
            CallbackAction::Buy(product_id) => {
                match self.orders.place(user.id(), product_id).await {
                    Ok(order) => Reply::OrderPlaced(order),
                    Err(e) => Self::failure("place_order", e),
                }
            }
            CallbackAction::MyOrders => match self.orders.list_for_user(user.id()).await {
                Ok(orders) => Reply::OrderList(orders),
                Err(e) => Self::failure("list_orders", e),
            },
            CallbackAction::DepositManual => {
                self.sessions
                    .set(
                        chat_id,
                        SessionState::AwaitingDepositAmount {
                            method: DepositMethod::Manual,
                        },
                    )
                    .await;
                Reply::AskDepositAmount {
                    method: DepositMethod::Manual,
                }
            }
            CallbackAction::DepositAuto => {
                self.sessions
                    .set(
                        chat_id,
                        SessionState::AwaitingDepositAmount {
                            method: DepositMethod::Auto,
                        },
                    )
                    .await;
                Reply::AskDepositAmount {
                    method: DepositMethod::Auto,
                }
            }
            CallbackAction::CancelDeposit(deposit_id) => {
                match self.deposits.get(deposit_id).await {
                    Ok(deposit) if deposit.user_id() != user.id() => {
                        Reply::Failure("That deposit is not yours".to_string())
                    }
                    Ok(_) => {
                        self.sessions.clear(chat_id).await;
                        match self.deposits.cancel(deposit_id).await {
                            Ok(deposit) => Reply::DepositUpdated(deposit),
                            Err(e) => Self::failure("cancel_deposit", e),
                        }
                    }
                    Err(e) => Self::failure("get_deposit", e),
                }
            }
            CallbackAction::Admin(admin_action) => {
                if !self.is_admin(chat_id) {
                    tracing::warn!(chat_id, "Non-admin tried an admin action");
                    return Reply::NotAdmin;
                }
                self.handle_admin(admin_action).await
            }
        }
    }

    async fn handle_admin(&self, action: AdminAction) -> Reply {
        match action {
            AdminAction::ApproveDeposit(id) => match self.deposits.approve(id).await {
                Ok(deposit) => Reply::DepositUpdated(deposit),
                Err(e) => Self::failure("approve_deposit", e),
            },
            AdminAction::RejectDeposit(id) => match self.deposits.reject(id).await {
                Ok(deposit) => Reply::DepositUpdated(deposit),
                Err(e) => Self::failure("reject_deposit", e),
            },
            AdminAction::ApproveOrder(id) => match self.orders.approve(id).await {
                Ok(order) => Reply::OrderUpdated(order),
                Err(e) => Self::failure("approve_order", e),
            },
            AdminAction::CompleteOrder(id) => match self.orders.complete(id).await {
                Ok(files) => Reply::OrderDelivered {
                    order_id: id,
                    files,
                },
                Err(e) => Self::failure("complete_order", e),
            },
            AdminAction::CancelOrder(id) => match self.orders.cancel(id, "admin").await {
                Ok(order) => Reply::OrderUpdated(order),
                Err(e) => Self::failure("cancel_order", e),
            },
            AdminAction::BanUser(id) => match self.users.ban(id).await {
                Ok(user) => Reply::UserUpdated(user),
                Err(e) => Self::failure("ban_user", e),
            },
            AdminAction::UnbanUser(id) => match self.users.unban(id).await {
                Ok(user) => Reply::UserUpdated(user),
                Err(e) => Self::failure("unban_user", e),
            },
            AdminAction::ListUsers { page } => {
                match self.users.list_page(page, self.page_size).await {
                    Ok(page) => Reply::UserList(page),
                    Err(e) => Self::failure("list_users", e),
                }
            }
            AdminAction::PendingDeposits => match self.deposits.list_pending_manual().await {
                Ok(deposits) => Reply::PendingDeposits(deposits),
                Err(e) => Self::failure("pending_deposits", e),
            },
            AdminAction::PendingOrders => match self.orders.list_pending().await {
                Ok(orders) => Reply::PendingOrders(orders),
                Err(e) => Self::failure("pending_orders", e),
            },
        }
    }
}

//! End-to-end storefront flows over real JSON files
//!
//! Wires the managers and the router against a temp data directory and
//! a mock payment gateway, then walks the user and admin flows the way
//! the chat transport would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use uuid::Uuid;

use shopbot_api::bot::{RateLimiter, RateLimiterConfig, Reply, Router};
use shopbot_api::domain::deposit::DepositStatus;
use shopbot_api::domain::gateway::{
    GatewayError, GatewayReceipt, GatewayStatus, PaymentGateway,
};
use shopbot_api::domain::order::{OrderStatus, PaymentStatus};
use shopbot_api::infrastructure::repositories::{
    JsonDepositRepository, JsonOrderRepository, JsonProductRepository, JsonUserRepository,
};
use shopbot_api::infrastructure::store::JsonStore;
use shopbot_api::managers::{
    DepositManager, OrderManager, ProductManager, ShopError, Sweeper, UserManager,
};

const ADMIN_CHAT: i64 = 1000;
const USER_CHAT: i64 = 7;

/// Scriptable stand-in for the payment gateway
struct MockGateway {
    status: Mutex<GatewayStatus>,
    checks: AtomicUsize,
    cancelled: Mutex<Vec<String>>,
}

impl MockGateway {
    fn new() -> Self {
        Self {
            status: Mutex::new(GatewayStatus::Pending),
            checks: AtomicUsize::new(0),
            cancelled: Mutex::new(Vec::new()),
        }
    }

    fn set_status(&self, status: GatewayStatus) {
        *self.status.lock().unwrap() = status;
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_deposit(&self, _amount: Decimal) -> Result<GatewayReceipt, GatewayError> {
        Ok(GatewayReceipt {
            external_id: "ext-123".to_string(),
            pay_url: "https://pay.example/qr/ext-123".to_string(),
        })
    }

    async fn check_deposit(&self, _external_id: &str) -> Result<GatewayStatus, GatewayError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        Ok(*self.status.lock().unwrap())
    }

    async fn cancel_deposit(&self, external_id: &str) -> Result<(), GatewayError> {
        self.cancelled.lock().unwrap().push(external_id.to_string());
        Ok(())
    }
}

struct TestShop {
    _dir: TempDir,
    gateway: Arc<MockGateway>,
    users: Arc<UserManager>,
    products: Arc<ProductManager>,
    orders: Arc<OrderManager>,
    deposits: Arc<DepositManager>,
    router: Router,
}

/// Builds the whole stack over a temp data directory
///
/// Negative TTLs put every new order/deposit past its expiry, which is
/// how the sweep tests fabricate stale records.
fn build_shop(order_ttl: i64, deposit_ttl: i64, rate: RateLimiterConfig) -> TestShop {
    let dir = TempDir::new().unwrap();

    let user_repo = Arc::new(JsonUserRepository::new(Arc::new(JsonStore::new(
        dir.path().join("users.json"),
        None,
    ))));
    let product_repo = Arc::new(JsonProductRepository::new(Arc::new(JsonStore::new(
        dir.path().join("products.json"),
        None,
    ))));
    let order_repo = Arc::new(JsonOrderRepository::new(Arc::new(JsonStore::new(
        dir.path().join("orders.json"),
        None,
    ))));
    let deposit_repo = Arc::new(JsonDepositRepository::new(Arc::new(JsonStore::new(
        dir.path().join("deposits.json"),
        None,
    ))));

    let gateway = Arc::new(MockGateway::new());

    let users = Arc::new(UserManager::new(user_repo.clone()));
    let products = Arc::new(ProductManager::new(product_repo.clone()));
    let orders = Arc::new(OrderManager::new(
        order_repo,
        user_repo.clone(),
        product_repo,
        order_ttl,
    ));
    let deposits = Arc::new(DepositManager::new(
        deposit_repo,
        user_repo,
        gateway.clone(),
        deposit_ttl,
    ));

    let router = Router::new(
        users.clone(),
        products.clone(),
        orders.clone(),
        deposits.clone(),
        RateLimiter::new(rate),
        vec![ADMIN_CHAT],
        6,
    );

    TestShop {
        _dir: dir,
        gateway,
        users,
        products,
        orders,
        deposits,
        router,
    }
}

fn default_shop() -> TestShop {
    build_shop(60, 120, RateLimiterConfig::default())
}

#[tokio::test]
async fn placing_an_order_debits_balance_and_stock() {
    let shop = default_shop();

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    shop.users.credit(user.id(), dec!(20)).await.unwrap();
    let product = shop
        .products
        .create("VPN key".to_string(), dec!(4.99), Some(3))
        .await
        .unwrap();

    let order = shop.orders.place(user.id(), product.id()).await.unwrap();

    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.payment_status(), PaymentStatus::Unpaid);
    assert_eq!(order.amount(), dec!(4.99));

    let user = shop.users.get(user.id()).await.unwrap();
    assert_eq!(user.balance(), dec!(15.01));
    assert_eq!(user.total_spent(), dec!(4.99));

    let product = shop.products.get(product.id()).await.unwrap();
    assert_eq!(product.stock(), Some(2));
}

#[tokio::test]
async fn insufficient_balance_leaves_everything_untouched() {
    let shop = default_shop();

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    shop.users.credit(user.id(), dec!(1)).await.unwrap();
    let product = shop
        .products
        .create("Game".to_string(), dec!(10), Some(5))
        .await
        .unwrap();

    let result = shop.orders.place(user.id(), product.id()).await;
    assert!(matches!(result, Err(ShopError::InvalidOperation(_))));

    let user = shop.users.get(user.id()).await.unwrap();
    assert_eq!(user.balance(), dec!(1));
    let product = shop.products.get(product.id()).await.unwrap();
    assert_eq!(product.stock(), Some(5));
    assert!(shop.orders.list_pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn out_of_stock_product_cannot_be_ordered() {
    let shop = default_shop();

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    shop.users.credit(user.id(), dec!(50)).await.unwrap();
    let product = shop
        .products
        .create("Rare".to_string(), dec!(5), Some(0))
        .await
        .unwrap();

    let result = shop.orders.place(user.id(), product.id()).await;
    assert!(matches!(result, Err(ShopError::ProductUnavailable(_))));

    let user = shop.users.get(user.id()).await.unwrap();
    assert_eq!(user.balance(), dec!(50));
}

#[tokio::test]
async fn approving_a_pending_order_marks_processing_and_paid() {
    let shop = default_shop();

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    shop.users.credit(user.id(), dec!(10)).await.unwrap();
    let product = shop
        .products
        .create("Key".to_string(), dec!(2), None)
        .await
        .unwrap();
    let order = shop.orders.place(user.id(), product.id()).await.unwrap();

    let order = shop.orders.approve(order.id()).await.unwrap();
    assert_eq!(order.status(), OrderStatus::Processing);
    assert_eq!(order.payment_status(), PaymentStatus::Paid);

    // Approving twice fails and changes nothing.
    assert!(shop.orders.approve(order.id()).await.is_err());
    let order = shop.orders.get(order.id()).await.unwrap();
    assert_eq!(order.status(), OrderStatus::Processing);
}

#[tokio::test]
async fn cancelling_a_paid_order_refunds_and_restocks() {
    let shop = default_shop();

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    shop.users.credit(user.id(), dec!(10)).await.unwrap();
    let product = shop
        .products
        .create("Key".to_string(), dec!(6), Some(1))
        .await
        .unwrap();
    let order = shop.orders.place(user.id(), product.id()).await.unwrap();
    shop.orders.approve(order.id()).await.unwrap();

    let order = shop.orders.cancel(order.id(), "admin").await.unwrap();
    assert_eq!(order.status(), OrderStatus::Cancelled);
    assert_eq!(order.payment_status(), PaymentStatus::Refunded);

    let user = shop.users.get(user.id()).await.unwrap();
    assert_eq!(user.balance(), dec!(10));
    assert_eq!(user.total_spent(), Decimal::ZERO);

    let product = shop.products.get(product.id()).await.unwrap();
    assert_eq!(product.stock(), Some(1));
}

#[tokio::test]
async fn completing_an_order_delivers_the_product_files() {
    let shop = default_shop();

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    shop.users.credit(user.id(), dec!(10)).await.unwrap();
    let product = shop
        .products
        .create("Pack".to_string(), dec!(3), None)
        .await
        .unwrap();
    shop.products
        .add_file(product.id(), "file-a".to_string())
        .await
        .unwrap();
    shop.products
        .add_file(product.id(), "file-b".to_string())
        .await
        .unwrap();

    let order = shop.orders.place(user.id(), product.id()).await.unwrap();
    shop.orders.approve(order.id()).await.unwrap();
    let files = shop.orders.complete(order.id()).await.unwrap();

    assert_eq!(files, vec!["file-a".to_string(), "file-b".to_string()]);
    let order = shop.orders.get(order.id()).await.unwrap();
    assert_eq!(order.status(), OrderStatus::Completed);
}

#[tokio::test]
async fn manual_deposit_approval_credits_the_balance() {
    let shop = default_shop();

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    let deposit = shop.deposits.open_manual(user.id(), dec!(30)).await.unwrap();
    shop.deposits
        .attach_proof(deposit.id(), "proof-img".to_string())
        .await
        .unwrap();

    let pending = shop.deposits.list_pending_manual().await.unwrap();
    assert_eq!(pending.len(), 1);

    let deposit = shop.deposits.approve(deposit.id()).await.unwrap();
    assert_eq!(deposit.status(), DepositStatus::Completed);

    let user = shop.users.get(user.id()).await.unwrap();
    assert_eq!(user.balance(), dec!(30));

    // Approving again hits the terminal state, no double credit.
    assert!(shop.deposits.approve(deposit.id()).await.is_err());
    let user = shop.users.get(user.id()).await.unwrap();
    assert_eq!(user.balance(), dec!(30));
}

#[tokio::test]
async fn rejected_deposit_never_credits() {
    let shop = default_shop();

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    let deposit = shop.deposits.open_manual(user.id(), dec!(30)).await.unwrap();
    let deposit = shop.deposits.reject(deposit.id()).await.unwrap();

    assert_eq!(deposit.status(), DepositStatus::Rejected);
    let user = shop.users.get(user.id()).await.unwrap();
    assert_eq!(user.balance(), Decimal::ZERO);
}

#[tokio::test]
async fn auto_deposit_poll_credits_exactly_once() {
    let shop = default_shop();

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    let (deposit, pay_url) = shop.deposits.open_auto(user.id(), dec!(15)).await.unwrap();
    assert_eq!(deposit.external_id(), Some("ext-123"));
    assert_eq!(pay_url, "https://pay.example/qr/ext-123");

    // Gateway still pending: nothing happens.
    assert_eq!(shop.deposits.poll_pending().await.unwrap(), 0);
    let user_now = shop.users.get(user.id()).await.unwrap();
    assert_eq!(user_now.balance(), Decimal::ZERO);

    // Gateway completes; the next pass credits once.
    shop.gateway.set_status(GatewayStatus::Completed);
    assert_eq!(shop.deposits.poll_pending().await.unwrap(), 1);

    // The gateway keeps saying completed, but the deposit is terminal.
    assert_eq!(shop.deposits.poll_pending().await.unwrap(), 0);

    let user_now = shop.users.get(user.id()).await.unwrap();
    assert_eq!(user_now.balance(), dec!(15));
}

#[tokio::test]
async fn cancelling_an_auto_deposit_reaches_the_gateway() {
    let shop = default_shop();

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    let (deposit, _) = shop.deposits.open_auto(user.id(), dec!(15)).await.unwrap();

    let deposit = shop.deposits.cancel(deposit.id()).await.unwrap();
    assert_eq!(deposit.status(), DepositStatus::Cancelled);
    assert_eq!(
        shop.gateway.cancelled.lock().unwrap().as_slice(),
        ["ext-123".to_string()]
    );
}

#[tokio::test]
async fn expiry_sweep_retires_stale_records_exactly_once() {
    // Negative TTLs: every record is born expired.
    let shop = build_shop(-1, -1, RateLimiterConfig::default());

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    shop.users.credit(user.id(), dec!(10)).await.unwrap();
    let product = shop
        .products
        .create("Key".to_string(), dec!(4), Some(1))
        .await
        .unwrap();
    shop.orders.place(user.id(), product.id()).await.unwrap();
    shop.deposits.open_manual(user.id(), dec!(9)).await.unwrap();

    let sweeper = Sweeper::new(
        shop.orders.clone(),
        shop.deposits.clone(),
        std::time::Duration::from_secs(3600),
    );

    let report = sweeper.run_once().await;
    assert_eq!(report.orders_expired, 1);
    assert_eq!(report.deposits_expired, 1);
    assert_eq!(report.deposits_completed, 0);

    // Expired order was refunded and restocked.
    let user_now = shop.users.get(user.id()).await.unwrap();
    assert_eq!(user_now.balance(), dec!(10));
    let product = shop.products.get(product.id()).await.unwrap();
    assert_eq!(product.stock(), Some(1));

    // Second pass is a no-op.
    let report = sweeper.run_once().await;
    assert_eq!(report.orders_expired, 0);
    assert_eq!(report.deposits_expired, 0);
}

#[tokio::test]
async fn router_walks_the_purchase_flow() {
    let shop = default_shop();

    let reply = shop.router.handle_message(USER_CHAT, "/start", None).await;
    assert!(matches!(
        reply,
        Reply::MainMenu { balance } if balance == Decimal::ZERO
    ));

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    shop.users.credit(user.id(), dec!(20)).await.unwrap();
    let product = shop
        .products
        .create("Key".to_string(), dec!(5), None)
        .await
        .unwrap();

    let reply = shop.router.handle_callback(USER_CHAT, "shop:page_1").await;
    match reply {
        Reply::Catalog(page) => assert_eq!(page.items.len(), 1),
        other => panic!("Expected Catalog, got {:?}", other),
    }

    let order_id = match shop
        .router
        .handle_callback(USER_CHAT, &format!("buy:{}", product.id()))
        .await
    {
        Reply::OrderPlaced(order) => order.id(),
        other => panic!("Expected OrderPlaced, got {:?}", other),
    };

    // Admin approves through the admin menu.
    let reply = shop
        .router
        .handle_callback(ADMIN_CHAT, &format!("admin:approve_order:{}", order_id))
        .await;
    match reply {
        Reply::OrderUpdated(order) => {
            assert_eq!(order.status(), OrderStatus::Processing);
            assert_eq!(order.payment_status(), PaymentStatus::Paid);
        }
        other => panic!("Expected OrderUpdated, got {:?}", other),
    }
}

#[tokio::test]
async fn router_walks_the_manual_deposit_flow() {
    let shop = default_shop();

    let reply = shop.router.handle_callback(USER_CHAT, "deposit:manual").await;
    assert!(matches!(reply, Reply::AskDepositAmount { .. }));

    let deposit_id = match shop.router.handle_message(USER_CHAT, "25.00", None).await {
        Reply::AwaitingProof(deposit) => deposit.id(),
        other => panic!("Expected AwaitingProof, got {:?}", other),
    };

    // /done before any proof upload is refused.
    let reply = shop.router.handle_message(USER_CHAT, "/done", None).await;
    assert!(matches!(reply, Reply::Failure(_)));

    let reply = shop
        .router
        .handle_message(USER_CHAT, "", Some("proof-img"))
        .await;
    assert!(matches!(reply, Reply::ProofAttached(_)));

    let reply = shop.router.handle_message(USER_CHAT, "/done", None).await;
    assert!(matches!(reply, Reply::DepositSubmitted(_)));

    let reply = shop
        .router
        .handle_callback(ADMIN_CHAT, &format!("admin:approve_deposit:{}", deposit_id))
        .await;
    assert!(matches!(reply, Reply::DepositUpdated(_)));

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    assert_eq!(user.balance(), dec!(25.00));
}

#[tokio::test]
async fn router_rejects_garbage_amounts() {
    let shop = default_shop();

    shop.router.handle_callback(USER_CHAT, "deposit:manual").await;
    let reply = shop
        .router
        .handle_message(USER_CHAT, "lots of money", None)
        .await;
    assert!(matches!(reply, Reply::Failure(_)));

    let reply = shop.router.handle_message(USER_CHAT, "-5", None).await;
    assert!(matches!(reply, Reply::Failure(_)));
}

#[tokio::test]
async fn manual_balance_adjustments() {
    let shop = default_shop();

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    shop.users.credit(user.id(), dec!(40)).await.unwrap();
    let user = shop.users.debit(user.id(), dec!(15)).await.unwrap();
    assert_eq!(user.balance(), dec!(25));

    // Over-debit fails and leaves the balance alone.
    let result = shop.users.debit(user.id(), dec!(100)).await;
    assert!(matches!(result, Err(ShopError::InvalidOperation(_))));
    let user = shop.users.get(user.id()).await.unwrap();
    assert_eq!(user.balance(), dec!(25));

    assert!(shop.users.debit(user.id(), Decimal::ZERO).await.is_err());
}

#[tokio::test]
async fn absurd_page_numbers_come_back_empty() {
    let shop = default_shop();

    shop.products
        .create("Key".to_string(), dec!(5), None)
        .await
        .unwrap();

    // A well-formed callback can carry any page number; it must never
    // take the handler down.
    let data = format!("shop:page_{}", usize::MAX);
    match shop.router.handle_callback(USER_CHAT, &data).await {
        Reply::Catalog(page) => {
            assert!(page.items.is_empty());
            assert_eq!(page.total_items, 1);
        }
        other => panic!("Expected Catalog, got {:?}", other),
    }

    let data = format!("admin:users:page_{}", usize::MAX);
    match shop.router.handle_callback(ADMIN_CHAT, &data).await {
        Reply::UserList(page) => assert!(page.items.is_empty()),
        other => panic!("Expected UserList, got {:?}", other),
    }
}

#[tokio::test]
async fn admin_actions_are_gated() {
    let shop = default_shop();
    let id = Uuid::new_v4();

    let reply = shop
        .router
        .handle_callback(USER_CHAT, &format!("admin:approve_order:{}", id))
        .await;
    assert!(matches!(reply, Reply::NotAdmin));

    // Malformed callback data is dropped, not a panic.
    let reply = shop.router.handle_callback(USER_CHAT, "buy:not-a-uuid").await;
    assert!(matches!(reply, Reply::Unknown));
}

#[tokio::test]
async fn banned_user_is_locked_out() {
    let shop = default_shop();

    let user = shop.users.get_or_register(USER_CHAT).await.unwrap();
    shop.users.ban(user.id()).await.unwrap();

    let reply = shop.router.handle_message(USER_CHAT, "/start", None).await;
    assert!(matches!(reply, Reply::Failure(_)));

    let reply = shop.router.handle_callback(USER_CHAT, "shop:page_1").await;
    assert!(matches!(reply, Reply::Failure(_)));
}

#[tokio::test]
async fn router_rate_limits_floods() {
    let shop = build_shop(
        60,
        120,
        RateLimiterConfig {
            window_secs: 60,
            max_actions: 2,
            strikes_to_ban: 99,
            ban_secs: 300,
        },
    );

    shop.router.handle_message(USER_CHAT, "/start", None).await;
    shop.router.handle_message(USER_CHAT, "/start", None).await;
    let reply = shop.router.handle_message(USER_CHAT, "/start", None).await;
    assert!(matches!(reply, Reply::RateLimited));
}

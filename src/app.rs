use std::sync::Arc;
use std::time::Duration;

use crate::bot::{RateLimiter, Router};
use crate::config::Config;
use crate::infrastructure::gateway::HttpPaymentGateway;
use crate::infrastructure::repositories::{
    JsonDepositRepository, JsonOrderRepository, JsonProductRepository, JsonUserRepository,
};
use crate::infrastructure::store::{FileCipher, JsonStore};
use crate::managers::{DepositManager, OrderManager, ProductManager, Sweeper, UserManager};

/// The wired storefront
///
/// The host chat transport feeds its inbound events into `router`;
/// `sweeper` is the background loop the process keeps alive.
pub struct App {
    pub router: Arc<Router>,
    pub sweeper: Sweeper,
}

impl App {
    /// Wires stores, repositories, managers and the router from config
    pub fn build(config: &Config) -> Result<Self, String> {
        let cipher = match &config.encryption {
            Some((key_hex, iv_hex)) => {
                let cipher = FileCipher::from_hex(key_hex, iv_hex)?;
                tracing::info!("Data files will be AES encrypted");
                Some(cipher)
            }
            None => {
                tracing::warn!("DATA_ENCRYPTION_KEY not set, storing plain JSON");
                None
            }
        };

        // Collection stores, one JSON file each
        let user_store = Arc::new(JsonStore::new(
            config.data_dir.join("users.json"),
            cipher.clone(),
        ));
        let product_store = Arc::new(JsonStore::new(
            config.data_dir.join("products.json"),
            cipher.clone(),
        ));
        let order_store = Arc::new(JsonStore::new(
            config.data_dir.join("orders.json"),
            cipher.clone(),
        ));
        let deposit_store =
            Arc::new(JsonStore::new(config.data_dir.join("deposits.json"), cipher));

        let user_repo = Arc::new(JsonUserRepository::new(user_store));
        let product_repo = Arc::new(JsonProductRepository::new(product_store));
        let order_repo = Arc::new(JsonOrderRepository::new(order_store));
        let deposit_repo = Arc::new(JsonDepositRepository::new(deposit_store));

        let gateway = Arc::new(
            HttpPaymentGateway::new(
                config.gateway_base_url.clone(),
                config.gateway_api_key.clone(),
                config.gateway_timeout_secs,
            )
            .map_err(|e| format!("Failed to build gateway client: {}", e))?,
        );

        let users = Arc::new(UserManager::new(user_repo.clone()));
        let products = Arc::new(ProductManager::new(product_repo.clone()));
        let orders = Arc::new(OrderManager::new(
            order_repo,
            user_repo.clone(),
            product_repo,
            config.order_ttl_minutes,
        ));
        let deposits = Arc::new(DepositManager::new(
            deposit_repo,
            user_repo,
            gateway,
            config.deposit_ttl_minutes,
        ));

        let router = Arc::new(Router::new(
            users,
            products,
            orders.clone(),
            deposits.clone(),
            RateLimiter::new(config.rate_limit),
            config.admin_chat_ids.clone(),
            config.page_size,
        ));

        let sweeper = Sweeper::new(
            orders,
            deposits,
            Duration::from_secs(config.sweep_interval_secs),
        );

        Ok(Self { router, sweeper })
    }
}

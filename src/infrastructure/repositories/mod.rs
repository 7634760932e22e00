// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces over JsonStore

pub mod json_deposit_repository;
pub mod json_order_repository;
pub mod json_product_repository;
pub mod json_user_repository;

pub use json_deposit_repository::JsonDepositRepository;
pub use json_order_repository::JsonOrderRepository;
pub use json_product_repository::JsonProductRepository;
pub use json_user_repository::JsonUserRepository;

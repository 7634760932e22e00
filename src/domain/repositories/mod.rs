// Repository trait exports
// Contracts the infrastructure layer implements

pub mod deposit_repository;
pub mod order_repository;
pub mod product_repository;
pub mod user_repository;

pub use deposit_repository::DepositRepository;
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;

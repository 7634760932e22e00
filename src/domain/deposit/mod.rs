pub mod deposit;
pub mod events;
pub mod value_objects;

pub use deposit::Deposit;
pub use value_objects::{DepositMethod, DepositStatus};

pub mod events;
pub mod order;
pub mod value_objects;

pub use order::Order;
pub use value_objects::{OrderStatus, PaymentStatus};

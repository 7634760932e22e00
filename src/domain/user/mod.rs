pub mod user;
pub mod value_objects;

pub use user::User;
pub use value_objects::UserStatus;

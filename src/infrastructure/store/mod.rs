pub mod crypto;
pub mod json_store;

pub use crypto::FileCipher;
pub use json_store::{JsonStore, StoreError};

//! Shopbot API Library
//!
//! Core of a chat-bot storefront: users browse digital products,
//! deposit balance manually or through a payment gateway, place orders,
//! and admins approve or reject transactions. Records live in flat JSON
//! files with an optional whole-file AES codec.

pub mod app;
pub mod bot;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod managers;

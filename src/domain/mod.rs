// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod deposit;
pub mod gateway;
pub mod order;
pub mod product;
pub mod repositories;
pub mod user;

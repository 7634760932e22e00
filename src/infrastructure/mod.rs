// Infrastructure layer
// Adapters that implement domain contracts against the outside world

pub mod gateway;
pub mod repositories;
pub mod store;

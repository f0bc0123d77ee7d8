pub mod notifications;
pub mod seed;
pub mod session;
pub mod sources;
pub mod store;

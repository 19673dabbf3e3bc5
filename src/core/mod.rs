pub mod error;
pub mod executor;
pub mod session;

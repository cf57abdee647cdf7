//! Account domain module.
//!
//! # Module Structure
//!
//! - `model`: Gateway response type (`AuthResponse`)
//! - `gateway`: Account actions of the record store (`AccountGateway`)
//! - `password`: Client-side password hashing

mod gateway;
mod model;
mod password;

pub use gateway::AccountGateway;
pub use model::AuthResponse;
pub use password::hash_password;

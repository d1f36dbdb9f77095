pub mod epochs;
pub mod error;
pub mod health;
pub mod now;

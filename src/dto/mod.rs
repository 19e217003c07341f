pub mod auth;
pub mod common;
pub mod decimal_serde;
pub mod trade;
pub mod wallet;

// Re-export commonly used types for convenience
pub use auth::*;
pub use common::*;
pub use trade::*;
pub use wallet::*;

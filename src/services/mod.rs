//! Service layer for the relay and gateway business logic.

pub mod format;
pub mod token_cache;

pub use format::{OutboundMessage, build_message};
pub use token_cache::{IssuedToken, TokenCache};

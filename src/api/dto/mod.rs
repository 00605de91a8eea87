//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by service:
//! - `relay` - Notification relay request/response DTOs
//! - `gateway` - Search/add gateway request/response DTOs
//! - `error` - Common error response DTOs

mod error;
mod gateway;
mod relay;

pub use error::ErrorResponse;
pub use gateway::{AddRequest, ApiResponse, SearchForm, TokenStatus};
pub use relay::{NotificationRequest, PushAck, ServiceStatus};

//! HTTP request handlers, organized by service.

pub mod gateway;
pub mod relay;

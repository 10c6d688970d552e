//! HTTP handlers for the server.

pub mod call;
pub mod status;

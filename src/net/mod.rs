//! HTTP transport and wire types for the chat server API.

pub mod api;
pub mod types;

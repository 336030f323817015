//! Shared building blocks for the restaurant service crates: response
//! types that every surface agrees on and the tracing bootstrap.

pub mod types;
pub mod utils;

//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod session;

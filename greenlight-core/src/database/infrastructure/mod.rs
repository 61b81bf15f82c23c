//! Adapters implementing the database ports.

pub mod memory;
pub mod postgres;

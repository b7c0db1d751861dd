//! Core operations.
//!
//! This module contains the business logic for pgdata commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod generate;
pub mod introspect;

pub use check::check;
pub use generate::generate;
pub use introspect::{connect, introspect};

//! Core types and trait definitions for the rollcall attendance store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod activity;
pub mod attendance;
pub mod error;
pub mod instance;
pub mod patch;
pub mod person;
pub mod store;

mod validate;

pub use error::{Error, Result};
pub use patch::Patch;

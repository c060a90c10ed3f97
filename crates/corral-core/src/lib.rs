//! Core types and traits for the corral connection pool.
//!
//! This crate provides the foundational abstractions shared by every pool:
//!
//! - `ManageConnection` trait for minting and probing pooled connections
//! - `Error` taxonomy for checkout failures
//! - `Result` alias used throughout the workspace

pub mod error;
pub mod manage;

pub use error::{Error, HealthError, Result};
pub use manage::{FnManager, ManageConnection};

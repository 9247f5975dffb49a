//! Core types and trait definitions for the Flatshare expense ledger.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod ledger;
pub mod money;
pub mod period;
pub mod room;
pub mod store;
pub mod summary;
pub mod validate;

pub use error::{Error, Result};

//! Catalog Provisioner Core - Shared domain types.
//!
//! This crate provides the types shared by the provisioning service and its tools:
//! - `api` - HTTP service that provisions products against a shop's catalog
//! - `cli` - Command-line tools for migrations and location bookkeeping
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Shop domains, record IDs, catalog submissions and remote statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Core types for the catalog provisioner.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod shop;
pub mod status;
pub mod submission;

pub use id::*;
pub use shop::{ShopDomain, ShopDomainError};
pub use status::*;
pub use submission::{ImageSubmission, ProductOption, ProductSubmission, VariantSubmission};

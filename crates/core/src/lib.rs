//! Metafield Groups Core - Shared types library.
//!
//! This crate provides common types used across all Metafield Groups components:
//! - `admin` - Embedded admin service (groups, metafield assignment, free gifts)
//! - `cli` - Command-line tools for migrations and group management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs and Shopify global ID parsing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

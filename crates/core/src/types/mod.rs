//! Core types for Metafield Groups.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod gid;
pub mod id;

pub use gid::{GidError, ShopifyGid, ShopifyResource};
pub use id::MetafieldGroupId;

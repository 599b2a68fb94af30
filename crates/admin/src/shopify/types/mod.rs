//! Domain types for Shopify Admin API.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! response shapes in `admin::queries`.

pub mod common;
pub mod metafield;
pub mod product;

// Re-export all types for convenience
pub use common::*;
pub use metafield::*;
pub use product::*;

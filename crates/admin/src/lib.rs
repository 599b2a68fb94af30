//! Metafield Groups Admin library.
//!
//! Embedded Shopify admin service: named metafield groups, metafield
//! definition assignment, and per-product free gift selection stored in a
//! product metafield.
//!
//! The library exposes the router so it can be driven by the binary, the CLI
//! and the integration tests alike.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;

//! Business logic services for admin.
//!
//! # Services
//!
//! - `free_gifts` - Write changed free gift selections to Shopify
//! - `groups` - Combined create/delete/update action for metafield groups

pub mod free_gifts;
pub mod groups;

pub use free_gifts::{GiftVariantWriter, SubmissionReport, submit_changes};
pub use groups::{
    GroupAction, GroupActionError, GroupActionInput, GroupOutcome, MISSING_FIELDS_MESSAGE,
};

//! Domain models for admin.

pub mod gift_selection;
pub mod metafield_group;
pub mod session;

pub use gift_selection::{GiftItem, GiftItemKind, GiftPanelDraft, GiftRow, PendingGiftUpdate};
pub use metafield_group::{GroupName, GroupNameError, MetafieldGroup, MetafieldSelection};
pub use session::{Notice, PickerPage};

//! Askama filters shared by the admin templates.
//!
//! Filters return `askama::Result` even when they cannot fail.

use std::fmt::Display;

use metafield_groups_core::ShopifyGid;

/// Year for the footer: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Short form of a Shopify GID for chips: `{{ metafield|gid_tail }}` turns
/// `gid://shopify/MetafieldDefinition/123` into `123`.
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn gid_tail(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(tail(&value.to_string()))
}

/// Anything that is not a global ID is shown as-is.
fn tail(gid: &str) -> String {
    ShopifyGid::parse(gid).map_or_else(|_| gid.to_string(), |gid| gid.id().to_string())
}

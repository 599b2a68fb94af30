//! URL-encoded form helpers.
//!
//! Checkbox lists submit the same key once per checked box, which
//! `axum::Form` cannot collect; these helpers read the raw body instead.

use url::form_urlencoded;

/// All values submitted under `key`, in submission order.
#[must_use]
pub fn values(body: &[u8], key: &str) -> Vec<String> {
    form_urlencoded::parse(body)
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .collect()
}

/// The first value submitted under `key`.
#[must_use]
pub fn value(body: &[u8], key: &str) -> Option<String> {
    form_urlencoded::parse(body)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

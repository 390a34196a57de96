//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Parse a feed URL after placeholder substitution.
pub fn parse_feed_url(rendered: &str) -> crate::error::Result<Url> {
    Url::parse(rendered).map_err(|e| {
        crate::error::AppError::config(format!("invalid feed URL '{rendered}': {e}"))
    })
}

/// Whether an organization name is the "every organization" wildcard.
pub fn is_wildcard(name: &str) -> bool {
    name.eq_ignore_ascii_case("all")
}

//! HTML helpers shared by the connectors
//!
//! This module handles the markup-level work that every connector needs:
//! - Whitespace-normalized text extraction from elements
//! - Resolving listing links against the page they were found on
//! - Price hints from page metadata tags
//!
//! Every helper returns `Option` rather than an error: missing markup simply
//! means a missing field.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use url::Url;

lazy_static! {
    static ref META_PRICE_SELECTOR: Selector = Selector::parse(
        r#"meta[property="product:price:amount"], meta[property="og:price:amount"]"#
    )
    .unwrap();
}

/// Joins an element's text nodes with `separator`
///
/// Each text node is trimmed and empty nodes are dropped, so
/// `<span>Used</span> <span> 45,210 miles </span>` joined with `" "` gives
/// `"Used 45,210 miles"`.
pub fn element_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Text of the first descendant matching `selector`, if it is non-empty
pub fn select_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|el| element_text(el, " "))
        .filter(|s| !s.is_empty())
}

/// Attribute of the first descendant matching `selector`
pub fn select_attr(element: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Extracts a price hint from `product:price:amount` or `og:price:amount`
///
/// # Example
///
/// ```
/// use car_finder::crawler::extract_meta_price;
///
/// let html = r#"<html><head><meta property="og:price:amount" content="8500"></head></html>"#;
/// assert_eq!(extract_meta_price(html), Some("8500".to_string()));
/// ```
pub fn extract_meta_price(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    document
        .select(&META_PRICE_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            // Only accept HTTP and HTTPS URLs
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

//! Fixed-size pagination.
//!
//! Collections are served in pages of [`DEFAULT_PAGE_SIZE`] records. The
//! page size lives in application state so deployments can change it; the
//! API itself exposes no per-request override, only a 1-based `page`
//! parameter.

use axum::http::header::HeaderMap;

/// Records per collection page.
pub const DEFAULT_PAGE_SIZE: u64 = 3;

/// Extract the 1-based `page` parameter from decoded query pairs.
///
/// Missing, malformed, or zero values fall back to page 1.
#[must_use]
pub fn parse_page(params: &[(String, String)]) -> u64 {
    params
        .iter()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse::<u64>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// Convert a 1-based page number into an `(offset, limit)` pair.
///
/// Saturates instead of overflowing: absurdly large page numbers land on
/// an empty page past the end of the collection.
#[must_use]
pub fn page_bounds(page: u64, page_size: u64) -> (u64, u64) {
    (page.saturating_sub(1).saturating_mul(page_size), page_size)
}

/// Number of pages needed for `total` records.
#[must_use]
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    total.div_ceil(page_size.max(1))
}

/// Sanitize resource name by removing control characters for HTTP headers.
fn sanitize_resource_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

/// Build the `Content-Range` and `X-Total-Pages` headers for a page.
///
/// Pages past the end of the collection render as `{name} */{total}`.
#[must_use]
pub fn pagination_headers(
    offset: u64,
    limit: u64,
    total: u64,
    page_size: u64,
    resource_name: &str,
) -> HeaderMap {
    let safe_name = sanitize_resource_name(resource_name);

    let content_range = if total == 0 || offset >= total {
        format!("{safe_name} */{total}")
    } else {
        let last = (offset + limit).min(total) - 1;
        format!("{safe_name} {offset}-{last}/{total}")
    };

    let mut headers = HeaderMap::new();
    if let Ok(value) = content_range.parse() {
        headers.insert("Content-Range", value);
    }
    if let Ok(value) = total_pages(total, page_size).to_string().parse() {
        headers.insert("X-Total-Pages", value);
    }

    headers
}

use reqwest::Url;

/// Resolve a listing link found on a provider page against that provider's
/// origin. Absolute http(s) links pass through; anything else is rejected.
pub fn resolve_listing_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let base = Url::parse(base).ok()?;
    let url = base.join(href).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

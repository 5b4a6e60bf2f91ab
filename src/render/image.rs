use reqwest::Url;

/// Source to render for an image reference: the reference itself when it can
/// be loaded at all, otherwise `placeholder`.
pub fn image_src<'a>(candidate: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match candidate.map(str::trim) {
        Some(src) if is_web_url(src) => src,
        _ => placeholder,
    }
}

/// Non-empty http(s) URL or site-relative path.
pub(crate) fn is_web_url(src: &str) -> bool {
    if src.is_empty() {
        return false;
    }
    if src.starts_with('/') && !src.starts_with("//") {
        return true;
    }
    matches!(Url::parse(src), Ok(url) if matches!(url.scheme(), "http" | "https"))
}

/// `onerror` handler that swaps a broken image for the placeholder once.
pub fn onerror_fallback(placeholder: &str) -> String {
    format!("this.onerror=null;this.src='{}'", placeholder.replace('\'', "%27"))
}

//! Shared helpers for page generation.

/// Escape text for inclusion in HTML element content or attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Compute a relative URL from one generated page to another (RFC 3986).
///
/// Both arguments are output-root-relative page paths such as
/// `onc/Tumor.html`. The last segment of `from` is the current document, so
/// the base directory is everything before it.
///
/// # Examples
///
/// ```
/// use dmdoc_renderer::relative_path;
///
/// assert_eq!(relative_path("onc/Tumor.html", "onc/Grade.html"), "Grade.html");
/// assert_eq!(relative_path("index.html", "onc/index.html"), "onc/index.html");
/// assert_eq!(
///     relative_path("onc/Tumor.html", "shr/core/Quantity.html"),
///     "../shr/core/Quantity.html"
/// );
/// ```
#[must_use]
pub fn relative_path(from: &str, to: &str) -> String {
    let from_segs: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segs: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    // A trailing slash means `from` names a directory, not a document.
    let from_dir = match from_segs.split_last() {
        Some((_, dir)) if !from.ends_with('/') => dir,
        _ => &from_segs[..],
    };

    let common = from_dir
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let result = format!(
        "{}{}",
        "../".repeat(from_dir.len() - common),
        to_segs[common..].join("/")
    );
    if result.is_empty() {
        "./".to_owned()
    } else {
        result
    }
}

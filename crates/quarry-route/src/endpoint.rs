//! Endpoint normalisation.

/// Normalises an endpoint URL for deduplication.
///
/// Strips a leading `scheme://` and any trailing `/`, so
/// `http://dc1/fdsnws/` and `https://dc1/fdsnws` compare equal. Text that
/// does not start with a valid scheme is kept as is.
#[must_use]
pub fn normalize_endpoint(url: &str) -> String {
    let url = url.trim();
    let rest = match url.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => url,
    };
    rest.trim_end_matches('/').to_string()
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn is_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

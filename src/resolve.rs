use tracing::warn;
use url::Url;

/// Resolves `reference` against the page URL with the standard URL join.
pub fn resolve(base: &Url, reference: &str) -> Option<Url> {
    base.join(reference).ok()
}

/// Absolute form of `reference`.
///
/// A reference that already parses as a URL is returned byte for byte, so its
/// digest and listed form match the markup. Only relative references are
/// joined; one the join rejects is kept verbatim.
pub fn absolute_url(base: &Url, reference: &str) -> String {
    if Url::parse(reference).is_ok() {
        return reference.to_string();
    }

    match resolve(base, reference) {
        Some(url) => url.into(),
        None => {
            warn!(reference, "can't resolve reference, keeping it as is");
            reference.to_string()
        }
    }
}

//! URL utilities for consistent endpoint construction.

/// Normalize a base URL by removing trailing slashes, so appending a path
/// never produces double slashes.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and a route path into a complete endpoint URL.
///
/// # Examples
///
/// ```
/// use kumo::utils::url::construct_endpoint;
///
/// assert_eq!(
///     construct_endpoint("http://127.0.0.1:5000", "api/chat"),
///     "http://127.0.0.1:5000/api/chat"
/// );
/// assert_eq!(
///     construct_endpoint("http://127.0.0.1:5000/", "/api/chat"),
///     "http://127.0.0.1:5000/api/chat"
/// );
/// ```
pub fn construct_endpoint(base_url: &str, route: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let route = route.trim_start_matches('/');
    format!("{normalized_base}/{route}")
}

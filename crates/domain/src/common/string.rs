//! String helpers.

/// Extracts the host name shown next to a story link.
///
/// Takes the segment after `://` up to the next `/` (or everything up to the
/// first `/` when there is no scheme) and drops a leading `www.`.
///
/// # Examples
///
/// ```
/// use snooze_domain::common::host_name;
///
/// assert_eq!(host_name("https://www.rust-lang.org/learn"), "rust-lang.org");
/// assert_eq!(host_name("example.com/path"), "example.com");
/// ```
pub fn host_name(url: &str) -> &str {
    let host = match url.split_once("://") {
        Some((_, rest)) => rest.split('/').next().unwrap_or(rest),
        None => url.split('/').next().unwrap_or(url),
    };
    host.strip_prefix("www.").unwrap_or(host)
}

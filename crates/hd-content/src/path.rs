//! Site path resolution.
//!
//! Resolves references found in `src`/`href` attributes against the path of the
//! document that contains them. All results are site-rooted (`/en/...`).

/// Whether a reference is already absolute or points off-site.
///
/// Site-rooted paths (`/...`, including protocol-relative `//host/...`) and
/// anything with a URI scheme (`http:`, `https:`, `data:`, `mailto:`) count as
/// absolute.
///
/// # Examples
///
/// ```
/// use hd_content::is_absolute;
///
/// assert!(is_absolute("/en/Content/A.htm"));
/// assert!(is_absolute("https://example.com/x.png"));
/// assert!(!is_absolute("../images/x.png"));
/// ```
pub fn is_absolute(reference: &str) -> bool {
    reference.starts_with('/') || has_scheme(reference)
}

/// RFC 3986 scheme: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`.
fn has_scheme(reference: &str) -> bool {
    let Some((scheme, _)) = reference.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Directory portion of an anchor path, as segments.
///
/// The last segment is treated as a file name unless the path ends with `/`.
fn anchor_dir(anchor_path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = anchor_path.split('/').collect();
    // Drop the file name (or the empty segment after a trailing slash)
    segments.pop();
    segments
}

/// Collapse `.`/`..`/empty segments into a site-rooted path.
///
/// A `..` above the site root is clamped at the root.
fn collapse<'a>(segments: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut stack: Vec<&str> = Vec::new();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    stack
}

/// Resolve a reference against the document that contains it.
///
/// - Absolute and external references are returned unchanged.
/// - Relative references are joined to the directory of `anchor_path`, `.` and
///   `..` segments are collapsed (clamping at the site root), and the result
///   starts with exactly one `/`.
/// - Backslashes are treated as path separators.
///
/// Never fails: malformed input degrades to a best-effort site path.
///
/// # Examples
///
/// ```
/// use hd_content::resolve;
///
/// assert_eq!(
///     resolve("/en/Content/A/B.htm", "../images/x.png"),
///     "/en/Content/images/x.png"
/// );
/// assert_eq!(resolve("/en/Content/A/B.htm", "/absolute/x.png"), "/absolute/x.png");
/// ```
pub fn resolve(anchor_path: &str, reference: &str) -> String {
    if is_absolute(reference) {
        return reference.to_owned();
    }

    let anchor = anchor_path.replace('\\', "/");
    let reference = reference.replace('\\', "/");

    let segments = collapse(anchor_dir(&anchor).into_iter().chain(reference.split('/')));
    let mut resolved = format!("/{}", segments.join("/"));
    if reference.ends_with('/') && !segments.is_empty() {
        resolved.push('/');
    }
    resolved
}

/// Normalize a topic reference to a collapsed site-rooted path.
///
/// Unlike [`resolve`], this also collapses `..` inside already-rooted paths,
/// since a topic reference is a storage location rather than a link to keep
/// verbatim.
///
/// # Examples
///
/// ```
/// use hd_content::normalize_site_path;
///
/// assert_eq!(normalize_site_path("en/Content/./A.htm"), "/en/Content/A.htm");
/// assert_eq!(normalize_site_path("/en/Content/X/../A.htm"), "/en/Content/A.htm");
/// ```
pub fn normalize_site_path(reference: &str) -> String {
    let reference = reference.replace('\\', "/");
    format!("/{}", collapse(reference.split('/')).join("/"))
}

//! URL slugs for topic hrefs.

/// Convert a topic href to a URL slug.
///
/// Strips the leading `/` and the `.htm` extension, lowercases, replaces
/// anything outside `[a-z0-9/]` with `-`, and collapses dash runs.
///
/// # Examples
///
/// ```
/// use hd_content::href_to_slug;
///
/// assert_eq!(
///     href_to_slug("/en/Content/Explore/Getting Started.htm"),
///     "en/content/explore/getting-started"
/// );
/// ```
#[must_use]
pub fn href_to_slug(href: &str) -> String {
    let trimmed = href.strip_prefix('/').unwrap_or(href);
    let trimmed = trimmed.strip_suffix(".htm").unwrap_or(trimmed);

    let mut slug = String::with_capacity(trimmed.len());
    for c in trimmed.to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '/' {
            c
        } else {
            '-'
        };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_owned()
}

//! Image source resolution.

use std::sync::LazyLock;

use regex::Regex;

use crate::html::rewrite;
use crate::path::{is_absolute, resolve};

static IMG_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)(<img\b[^>]*?\s)src\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
});

/// Rewrite relative `<img src>` values to site-rooted paths.
///
/// `anchor_path` is the path of the document the markup came from. Absolute
/// and external sources are left as written. Unquoted values are re-emitted
/// double-quoted, and an empty `src` is dropped since it names no image.
pub(crate) fn resolve_image_paths(html: &str, anchor_path: &str) -> String {
    rewrite(html, &IMG_SRC_RE, &[], |caps, _| {
        let (src, quote) = match (caps.get(2), caps.get(3), caps.get(4)) {
            (Some(m), _, _) => (m.as_str(), '"'),
            (None, Some(m), _) => (m.as_str(), '\''),
            (None, None, Some(m)) => (m.as_str(), '"'),
            (None, None, None) => return None,
        };
        let head = &caps[1];
        if src.trim().is_empty() {
            return Some(head.trim_end().to_owned());
        }
        if is_absolute(src) {
            return caps.get(4).map(|_| format!("{head}src=\"{src}\""));
        }
        let resolved = resolve(anchor_path, src);
        Some(format!("{head}src={quote}{resolved}{quote}"))
    })
}

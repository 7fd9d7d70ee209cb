//! Topic discovery by filesystem walking.
//!
//! Only identifies files; nothing is read at this stage.

use std::fs;
use std::path::Path;

use hd_storage::is_topic_file;

/// Collect site paths of topic files below `dir`.
///
/// `site_prefix` is the site path corresponding to `dir` (no trailing slash,
/// e.g. `"/en/Content"`). Hidden files and directories are skipped. Returns an
/// empty Vec if `dir` doesn't exist.
pub(crate) fn scan_topics(dir: &Path, site_prefix: &str) -> Vec<String> {
    let mut paths = Vec::new();
    if dir.is_dir() {
        scan_directory(dir, site_prefix, &mut paths);
    }
    paths.sort();
    paths
}

/// Recursively collect topic files from a directory.
fn scan_directory(dir_path: &Path, site_prefix: &str, paths: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir_path) else {
        tracing::debug!(path = %dir_path.display(), "Skipping unreadable directory");
        return;
    };

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let child = format!("{site_prefix}/{name}");
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
        if is_dir {
            scan_directory(&entry.path(), &child, paths);
        } else if is_topic_file(&name) {
            paths.push(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_scan_missing_dir() {
        let temp = tempfile::tempdir().unwrap();
        let paths = scan_topics(&temp.path().join("nope"), "/en");
        assert!(paths.is_empty());
    }

    #[test]
    fn test_scan_nested_sorted() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("Content/Explore")).unwrap();
        fs::write(root.join("Content/Welcome.htm"), "").unwrap();
        fs::write(root.join("Content/Explore/Start.htm"), "").unwrap();
        fs::write(root.join("Content/Explore/logo.png"), "").unwrap();

        let paths = scan_topics(root, "/en");
        assert_eq!(
            paths,
            vec!["/en/Content/Explore/Start.htm", "/en/Content/Welcome.htm"]
        );
    }

    #[test]
    fn test_scan_skips_hidden() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join(".cache/Old.htm"), "").unwrap();
        fs::write(root.join(".Draft.htm"), "").unwrap();
        fs::write(root.join("Page.html"), "").unwrap();

        let paths = scan_topics(root, "/en");
        assert_eq!(paths, vec!["/en/Page.html"]);
    }
}

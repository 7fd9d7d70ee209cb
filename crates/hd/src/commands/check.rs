//! `hd check` command implementation.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::path::PathBuf;

use clap::Args;
use hd_content::{TopicLoader, UNTITLED, href_to_slug};
use hd_storage::Storage;

use super::{load_config, topic_loader};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Language tree to check (default: configured default language).
    #[arg(short, long)]
    language: Option<String>,

    /// Content root directory (overrides config).
    #[arg(short, long, env = "HD_ROOT")]
    root: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover helpdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = load_config(self.config.as_deref(), self.root, None)?;
        let content = &config.content_resolved;

        let language = self
            .language
            .unwrap_or_else(|| content.default_language.clone());
        if !content.has_language(&language) {
            return Err(CliError::Validation(format!(
                "Unknown language: {language}"
            )));
        }

        let (storage, loader) = topic_loader(&config);
        let paths = storage.scan(&format!("/{language}/"))?;
        output.info(&format!(
            "Checking {} topics in {}",
            paths.len(),
            storage.root().join(&language).display()
        ));

        let problems = check_topics(&loader, &paths);
        for problem in &problems {
            output.warning(&problem.to_string());
        }

        if problems.is_empty() {
            output.success("No problems found");
            Ok(())
        } else {
            Err(CliError::Validation(format!(
                "{} problem(s) found in {} topics",
                problems.len(),
                paths.len()
            )))
        }
    }
}

/// What is wrong with a topic.
#[derive(Debug, PartialEq, Eq)]
enum ProblemKind {
    Unreadable,
    Untitled,
    MissingSnippet {
        reference: String,
        resolved_path: String,
    },
    SlugCollision {
        other: String,
    },
}

/// A problem found in one topic.
#[derive(Debug, PartialEq, Eq)]
struct Problem {
    path: String,
    kind: ProblemKind,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.path)?;
        match &self.kind {
            ProblemKind::Unreadable => write!(f, "cannot be read"),
            ProblemKind::Untitled => write!(f, "no title (shown as \"{UNTITLED}\")"),
            ProblemKind::MissingSnippet {
                reference,
                resolved_path,
            } => write!(f, "snippet {reference} not found at {resolved_path}"),
            ProblemKind::SlugCollision { other } => {
                write!(f, "URL slug collides with {other}")
            }
        }
    }
}

/// Load every topic and collect problems, in path order.
fn check_topics(loader: &TopicLoader, paths: &[String]) -> Vec<Problem> {
    let mut problems = Vec::new();
    let mut slugs: HashMap<String, &str> = HashMap::new();

    for path in paths {
        let mut push = |kind| {
            problems.push(Problem {
                path: path.clone(),
                kind,
            });
        };

        match slugs.entry(href_to_slug(path)) {
            Entry::Occupied(entry) => push(ProblemKind::SlugCollision {
                other: (*entry.get()).to_owned(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(path);
            }
        }

        let Some((topic, report)) = loader.load_with_report(path) else {
            push(ProblemKind::Unreadable);
            continue;
        };
        if topic.title == UNTITLED {
            push(ProblemKind::Untitled);
        }
        for missing in report.missing_snippets {
            push(ProblemKind::MissingSnippet {
                reference: missing.reference,
                resolved_path: missing.resolved_path,
            });
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hd_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    fn paths(storage: &MockStorage) -> Vec<String> {
        storage.scan("/en/").unwrap()
    }

    #[test]
    fn test_clean_topics() {
        let storage = MockStorage::new()
            .with_file("/en/A.htm", "<title>A</title><body><p>a</p></body>")
            .with_file("/en/B.htm", "<body><h1>B</h1></body>");
        let paths = paths(&storage);
        let loader = TopicLoader::new(Arc::new(storage));

        assert_eq!(check_topics(&loader, &paths), Vec::new());
    }

    #[test]
    fn test_reports_untitled_and_missing_snippets() {
        let storage = MockStorage::new()
            .with_file("/en/Content/A.htm", "<body><p>no title</p></body>")
            .with_file(
                "/en/Content/B.htm",
                r#"<h1>B</h1><MadCap:snippetBlock src="../Snips/Gone.flsnp" />"#,
            );
        let paths = paths(&storage);
        let loader = TopicLoader::new(Arc::new(storage));

        let problems = check_topics(&loader, &paths);
        assert_eq!(
            problems,
            vec![
                Problem {
                    path: "/en/Content/A.htm".to_owned(),
                    kind: ProblemKind::Untitled,
                },
                Problem {
                    path: "/en/Content/B.htm".to_owned(),
                    kind: ProblemKind::MissingSnippet {
                        reference: "../Snips/Gone.flsnp".to_owned(),
                        resolved_path: "/en/Snips/Gone.flsnp".to_owned(),
                    },
                },
            ]
        );
        assert_eq!(
            problems[1].to_string(),
            "/en/Content/B.htm: snippet ../Snips/Gone.flsnp not found at /en/Snips/Gone.flsnp"
        );
    }

    #[test]
    fn test_reports_unreadable() {
        let storage = MockStorage::new()
            .with_file("/en/A.htm", "<h1>A</h1>")
            .with_unreadable("/en/A.htm");
        let paths = vec!["/en/A.htm".to_owned()];
        let loader = TopicLoader::new(Arc::new(storage));

        let problems = check_topics(&loader, &paths);
        assert_eq!(problems[0].kind, ProblemKind::Unreadable);
        assert_eq!(problems[0].to_string(), "/en/A.htm: cannot be read");
    }

    #[test]
    fn test_reports_slug_collision() {
        let storage = MockStorage::new()
            .with_file("/en/Getting Started.htm", "<h1>One</h1>")
            .with_file("/en/getting-started.htm", "<h1>Two</h1>");
        let paths = paths(&storage);
        let loader = TopicLoader::new(Arc::new(storage));

        let problems = check_topics(&loader, &paths);
        assert_eq!(
            problems,
            vec![Problem {
                path: "/en/getting-started.htm".to_owned(),
                kind: ProblemKind::SlugCollision {
                    other: "/en/Getting Started.htm".to_owned(),
                },
            }]
        );
    }
}

//! `hd render` command implementation.

use std::path::PathBuf;

use clap::Args;
use hd_content::{LoadReport, TopicLoader};

use super::{load_config, topic_loader};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Topic reference (e.g. "/en/Content/Explore/Getting-Started.htm").
    href: String,

    /// Print only the normalized body markup instead of the JSON record.
    #[arg(long)]
    html: bool,

    /// Language for references without a language segment (overrides config).
    #[arg(short, long)]
    language: Option<String>,

    /// Content root directory (overrides config).
    #[arg(short, long, env = "HD_ROOT")]
    root: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover helpdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = load_config(self.config.as_deref(), self.root, self.language)?;
        let (_, loader) = topic_loader(&config);

        let reference = config.content_resolved.localize(&self.href);
        let (text, report) = render(&loader, &reference, self.html)?;

        for missing in &report.missing_snippets {
            output.warning(&format!(
                "Snippet not found: {} ({})",
                missing.reference, missing.resolved_path
            ));
        }
        output.emit(&text);
        Ok(())
    }
}

/// Load a topic and format it for output.
fn render(
    loader: &TopicLoader,
    reference: &str,
    html_only: bool,
) -> Result<(String, LoadReport), CliError> {
    let (topic, report) = loader
        .load_with_report(reference)
        .ok_or_else(|| CliError::NotFound(reference.to_owned()))?;

    let text = if html_only {
        topic.body_html
    } else {
        serde_json::to_string_pretty(&topic)?
    };
    Ok((text, report))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hd_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    fn loader() -> TopicLoader {
        let storage = MockStorage::new().with_file(
            "/en/Content/Start.htm",
            concat!(
                "<html><head><title>Start</title></head><body>",
                "<p>Hi <MadCap:snippetText src=\"Name.flsnp\" /></p></body></html>"
            ),
        );
        TopicLoader::new(Arc::new(storage))
    }

    #[test]
    fn test_render_html_only() {
        let (text, report) = render(&loader(), "/en/Content/Start.htm", true).unwrap();
        assert_eq!(
            text,
            r#"<p>Hi <span class="snippet-text">📄 Name.flsnp</span></p>"#
        );
        assert_eq!(report.missing_snippets.len(), 1);
    }

    #[test]
    fn test_render_json_record() {
        let (text, _) = render(&loader(), "/en/Content/Start.htm", false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["title"], "Start");
        assert_eq!(value["content"], value["body"]);
        assert_eq!(value["sourcePath"], "/en/Content/Start.htm");
    }

    #[test]
    fn test_render_not_found() {
        let err = render(&loader(), "/en/Content/Nope.htm", false).unwrap_err();
        assert_eq!(err.to_string(), "Content not found: /en/Content/Nope.htm");
    }
}

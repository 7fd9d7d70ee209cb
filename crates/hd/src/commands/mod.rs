//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod render;

pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hd_config::{CliSettings, Config};
use hd_content::TopicLoader;
use hd_storage_fs::FsStorage;

use crate::error::CliError;

/// Load configuration with CLI overrides applied.
fn load_config(
    config_path: Option<&Path>,
    root: Option<PathBuf>,
    default_language: Option<String>,
) -> Result<Config, CliError> {
    let cli_settings = CliSettings {
        root,
        default_language,
    };
    Ok(Config::load(config_path, Some(&cli_settings))?)
}

/// Create a topic loader over the configured content root.
fn topic_loader(config: &Config) -> (Arc<FsStorage>, TopicLoader) {
    let storage = Arc::new(FsStorage::new(config.content_resolved.root.clone()));
    let loader = TopicLoader::new(Arc::clone(&storage) as Arc<dyn hd_storage::Storage>);
    (storage, loader)
}

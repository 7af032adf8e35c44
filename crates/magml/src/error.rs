//! CLI error types.

use std::path::PathBuf;

use magml_config::ConfigError;

use crate::item::ItemError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid source pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0}")]
    Glob(#[from] glob::GlobError),

    #[error("{}: {source}", path.display())]
    Item {
        path: PathBuf,
        #[source]
        source: ItemError,
    },
}

//! Configuration management for the MagML compiler.
//!
//! Parses `magml.toml` with serde and discovers it in the current directory
//! or any parent. CLI flags are applied on top through [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `convert.sources`
//! - `convert.output`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use magml_renderer::{CompileOptions, ContentIndex};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only `Some` fields override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub preview: Option<bool>,
    pub compatibility: Option<bool>,
    /// Glob pattern selecting column item files.
    pub sources: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "magml.toml";

const DEFAULT_SOURCES: &str = "*.xml";
const DEFAULT_OUTPUT: &str = "index.html";
const DEFAULT_UNTITLED: &str = "NO NAME";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compilation switches.
    pub render: RenderConfig,
    /// Batch conversion settings as written in TOML.
    convert: ConvertConfigRaw,
    /// Content store known to `$$ref` and `$$ctree`.
    pub content: ContentConfig,

    /// Resolved conversion settings (set after loading).
    #[serde(skip)]
    pub convert_resolved: ConvertConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Compilation switches.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub preview: bool,
    pub compatibility: bool,
}

impl RenderConfig {
    #[must_use]
    pub fn options(&self) -> CompileOptions {
        CompileOptions::default()
            .with_preview(self.preview)
            .with_compatibility(self.compatibility)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConvertConfigRaw {
    sources: Option<String>,
    output: Option<String>,
    untitled: Option<String>,
}

/// Resolved batch conversion settings.
#[derive(Debug)]
pub struct ConvertConfig {
    /// Glob pattern selecting column item files.
    pub sources: PathBuf,
    /// HTML file the converted items are written to.
    pub output: PathBuf,
    /// Heading used for items without a subject.
    pub untitled: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

impl ConvertConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            sources: base.join(DEFAULT_SOURCES),
            output: base.join(DEFAULT_OUTPUT),
            untitled: DEFAULT_UNTITLED.to_owned(),
        }
    }
}

/// Content items and short keywords.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub short_keywords: Vec<String>,
    /// Content item titles keyed by id.
    pub items: BTreeMap<String, String>,
}

impl ContentConfig {
    /// Build the resolver handed to the compiler.
    #[must_use]
    pub fn to_index(&self) -> ContentIndex {
        let mut index = ContentIndex::new();
        for (id, title) in &self.items {
            index.insert_item(id.as_str(), title.as_str());
        }
        index.extend(self.short_keywords.iter().map(String::as_str));
        index
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`convert.output`").
        field: String,
        /// Error message (e.g., "${`OUT_DIR`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `magml.toml` in the current directory and parents, falling back to
    /// defaults relative to the current directory.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(preview) = settings.preview {
            self.render.preview = preview;
        }
        if let Some(compatibility) = settings.compatibility {
            self.render.compatibility = compatibility;
        }
        if let Some(sources) = &settings.sources {
            self.convert_resolved.sources.clone_from(sources);
        }
        if let Some(output) = &settings.output {
            self.convert_resolved.output.clone_from(output);
        }
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            convert_resolved: ConvertConfig::with_base(base),
            ..Self::default()
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values. Called automatically after loading
    /// from file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let convert = &self.convert_resolved;
        require_non_empty(&convert.untitled, "convert.untitled")?;
        require_non_empty(&convert.sources.to_string_lossy(), "convert.sources")?;
        require_non_empty(&convert.output.to_string_lossy(), "convert.output")?;

        if self.content.items.keys().any(|id| id.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "content.items ids cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref sources) = self.convert.sources {
            self.convert.sources = Some(expand::expand_env(sources, "convert.sources")?);
        }
        if let Some(ref output) = self.convert.output {
            self.convert.output = Some(expand::expand_env(output, "convert.output")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    ///
    /// Empty values stay empty so validation can reject them.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| match path {
            Some("") => PathBuf::new(),
            Some(path) => config_dir.join(path),
            None => config_dir.join(default),
        };

        self.convert_resolved = ConvertConfig {
            sources: resolve(self.convert.sources.as_deref(), DEFAULT_SOURCES),
            output: resolve(self.convert.output.as_deref(), DEFAULT_OUTPUT),
            untitled: self
                .convert
                .untitled
                .clone()
                .unwrap_or_else(|| DEFAULT_UNTITLED.to_owned()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magml_renderer::ContentResolver;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(!config.render.preview);
        assert!(!config.render.compatibility);
        assert_eq!(config.convert_resolved.sources, PathBuf::from("/test/*.xml"));
        assert_eq!(
            config.convert_resolved.output,
            PathBuf::from("/test/index.html")
        );
        assert_eq!(config.convert_resolved.untitled, "NO NAME");
        assert!(config.content.items.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render.options(), CompileOptions::default());
    }

    #[test]
    fn test_parse_render_config() {
        let toml = r"
[render]
preview = true
compatibility = true
";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.render.options(),
            CompileOptions {
                preview: true,
                compatibility: true
            }
        );
    }

    #[test]
    fn test_content_index() {
        let toml = r#"
[content]
short_keywords = ["news", "tech"]

[content.items]
"20050101000000" = "New Year"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let index = config.content.to_index();
        assert_eq!(
            index
                .resolve_content_item("20050101000000")
                .map(|item| item.title),
            Some("New Year".to_owned())
        );
        assert!(index.is_short_keyword("tech"));
        assert!(!index.is_short_keyword("sports"));
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[convert]
sources = "columns/*.xml"
output = "/var/www/columns.html"
untitled = "Untitled"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.convert_resolved.sources,
            PathBuf::from("/project/columns/*.xml")
        );
        assert_eq!(
            config.convert_resolved.output,
            PathBuf::from("/var/www/columns.html")
        );
        assert_eq!(config.convert_resolved.untitled, "Untitled");
    }

    #[test]
    fn test_empty_untitled_is_rejected() {
        let toml = r#"
[convert]
untitled = " "
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("convert.untitled"));
    }

    #[test]
    fn test_empty_output_is_rejected() {
        let toml = r#"
[convert]
output = ""
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("convert.output"));
    }

    #[test]
    fn test_empty_item_id_is_rejected() {
        let toml = r#"
[content.items]
"" = "Nothing"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            preview: Some(true),
            output: Some(PathBuf::from("/tmp/out.html")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert!(config.render.preview);
        assert!(!config.render.compatibility);
        assert_eq!(config.convert_resolved.output, PathBuf::from("/tmp/out.html"));
        assert_eq!(config.convert_resolved.sources, PathBuf::from("/test/*.xml"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("magml.toml");
        std::fs::write(&path, "[render]\ncompatibility = true\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert!(config.render.compatibility);
        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.convert_resolved.sources, dir.path().join("*.xml"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("magml.toml");
        std::fs::write(&path, "[render\n").unwrap();
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}

//! `magml render` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use magml_config::{CliSettings, Config};
use magml_renderer::{CompileResult, Compiler};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Path to the MagML source file.
    file: PathBuf,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render for authoring preview.
    #[arg(long)]
    preview: bool,

    /// Emit compatibility markers.
    #[arg(long)]
    compatibility: bool,

    /// Write the full compile result as JSON.
    #[arg(long)]
    json: bool,

    /// Path to configuration file (default: auto-discover magml.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            preview: self.preview.then_some(true),
            compatibility: self.compatibility.then_some(true),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let source = std::fs::read_to_string(&self.file)?;
        let compiler = Compiler::new(config.content.to_index());
        let result = compiler.compile(&source, config.render.options());

        for message in &result.diagnostics {
            output.warning(&format!("{}: {message}", self.file.display()));
        }

        let rendered = format_result(&result, self.json)?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, rendered)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => io::stdout().write_all(rendered.as_bytes())?,
        }

        Ok(())
    }
}

fn format_result(result: &CompileResult, json: bool) -> Result<String, CliError> {
    if json {
        let mut text = serde_json::to_string_pretty(result)?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(result.xhtml.clone())
    }
}

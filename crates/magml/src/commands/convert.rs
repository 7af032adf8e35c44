//! `magml convert` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use magml_config::{CliSettings, Config};
use magml_renderer::{CompileOptions, Compiler, ContentResolver, escape_html};

use crate::error::CliError;
use crate::item::Item;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Glob pattern selecting item files (overrides config).
    sources: Option<PathBuf>,

    /// HTML file to write (overrides config).
    output: Option<PathBuf>,

    /// Render for authoring preview.
    #[arg(long)]
    preview: bool,

    /// Emit compatibility markers.
    #[arg(long)]
    compatibility: bool,

    /// Path to configuration file (default: auto-discover magml.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ConvertArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            preview: self.preview.then_some(true),
            compatibility: self.compatibility.then_some(true),
            sources: self.sources,
            output: self.output,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let convert = &config.convert_resolved;

        let paths = find_sources(&convert.sources)?;
        if paths.is_empty() {
            output.warning(&format!(
                "No item files match {}",
                convert.sources.display()
            ));
        }

        let compiler = Compiler::new(config.content.to_index());
        let page = Page::build(
            &compiler,
            config.render.options(),
            &convert.untitled,
            &paths,
        )?;

        for warning in &page.warnings {
            output.warning(warning);
        }
        std::fs::write(&convert.output, &page.html)?;

        output.success(&format!(
            "Converted {} of {} item(s) into {}",
            page.converted,
            paths.len(),
            convert.output.display()
        ));
        if page.with_errors > 0 {
            output.info(&format!("{} item(s) contain markup errors", page.with_errors));
        }

        Ok(())
    }
}

/// Files matching `pattern`, sorted.
fn find_sources(pattern: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut paths = glob::glob(&pattern.to_string_lossy())?.collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    Ok(paths)
}

/// Concatenated output for a set of items.
#[derive(Debug, Default)]
struct Page {
    html: String,
    converted: usize,
    with_errors: usize,
    warnings: Vec<String>,
}

impl Page {
    /// Compile every item with a body into one page, in the given order.
    ///
    /// Items without a body are skipped with a warning.
    fn build<R: ContentResolver>(
        compiler: &Compiler<R>,
        options: CompileOptions,
        untitled: &str,
        paths: &[PathBuf],
    ) -> Result<Self, CliError> {
        let mut page = Self::default();

        for path in paths {
            let xml = std::fs::read_to_string(path)?;
            let item = Item::parse(&xml).map_err(|source| CliError::Item {
                path: path.clone(),
                source,
            })?;

            let Some(body) = item.body else {
                page.warnings
                    .push(format!("{}: no body element, skipped", path.display()));
                continue;
            };
            let subject = item.subject.as_deref().unwrap_or(untitled);

            let result = compiler.compile(&body, options);
            tracing::debug!(path = %path.display(), subject, "Converted item");
            if result.encountered_error {
                page.with_errors += 1;
                for message in &result.diagnostics {
                    page.warnings.push(format!("{}: {message}", path.display()));
                }
            }

            page.html.push_str("<h1>");
            page.html.push_str(&escape_html(subject));
            page.html.push_str("</h1>\n");
            page.html.push_str(&result.xhtml);
            page.html.push('\n');
            page.converted += 1;
        }

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magml_renderer::NoContent;
    use pretty_assertions::assert_eq;

    const ITEM_OPEN: &str = r#"<item xmlns="http://www.piedey.co.jp/ns/magsite1/column">"#;

    fn write_item(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("{ITEM_OPEN}{content}</item>")).unwrap();
        path
    }

    #[test]
    fn test_find_sources_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_item(dir.path(), "b.xml", "");
        write_item(dir.path(), "a.xml", "");
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let paths = find_sources(&dir.path().join("*.xml")).unwrap();

        assert_eq!(
            paths,
            vec![dir.path().join("a.xml"), dir.path().join("b.xml")]
        );
    }

    #[test]
    fn test_build_page() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_item(
            dir.path(),
            "1.xml",
            "<subject>Fish &amp; Chips</subject><body>$$* hot$$!</body>",
        );
        let second = write_item(dir.path(), "2.xml", "<body>plain</body>");
        let skipped = write_item(dir.path(), "3.xml", "<subject>Empty</subject>");

        let compiler = Compiler::new(NoContent);
        let page = Page::build(
            &compiler,
            CompileOptions::default(),
            "NO NAME",
            &[first, second, skipped],
        )
        .unwrap();

        assert_eq!(
            page.html,
            "<h1>Fish &amp; Chips</h1>\n<div><p><strong>hot</strong></p>\n</div>\n\n\
             <h1>NO NAME</h1>\n<div><p>plain</p>\n</div>\n\n"
        );
        assert_eq!(page.converted, 2);
        assert_eq!(page.with_errors, 0);
        assert_eq!(page.warnings.len(), 1);
        assert!(page.warnings[0].ends_with("no body element, skipped"));
    }

    #[test]
    fn test_build_page_reports_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_item(dir.path(), "1.xml", "<body>$$pm</body>");

        let compiler = Compiler::new(NoContent);
        let page = Page::build(&compiler, CompileOptions::default(), "-", &[path]).unwrap();

        assert_eq!(page.with_errors, 1);
        assert!(page.warnings[0].ends_with(": pm markup is not supported."));
    }

    #[test]
    fn test_map_ids_unique_across_items() {
        let dir = tempfile::tempdir().unwrap();
        let body = "<body>$$gmp ,,35,139,,</body>";
        let paths = [
            write_item(dir.path(), "1.xml", body),
            write_item(dir.path(), "2.xml", body),
        ];

        let compiler = Compiler::new(NoContent);
        let page = Page::build(&compiler, CompileOptions::default(), "-", &paths).unwrap();

        assert!(page.html.contains("id=\"gm0\""));
        assert!(page.html.contains("id=\"gm1\""));
    }

    #[test]
    fn test_malformed_item_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xml");
        std::fs::write(&path, "<item><body></item>").unwrap();

        let compiler = Compiler::new(NoContent);
        let err = Page::build(&compiler, CompileOptions::default(), "-", &[path]).unwrap_err();

        assert!(matches!(err, CliError::Item { .. }));
        assert!(err.to_string().contains("bad.xml"));
    }
}

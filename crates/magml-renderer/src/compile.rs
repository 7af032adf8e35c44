//! Compilation entry points.

use std::sync::atomic::AtomicUsize;

use crate::generator::Generator;
use crate::parser::parse;
use crate::resolver::{ContentResolver, NoContent};
use crate::sink::XhtmlWriter;

/// Output switches for a single compilation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Authoring preview: raw XHTML fragments pass through and every link
    /// opens a new window.
    pub preview: bool,
    /// Emit the legacy `it:` marker elements for downstream rewriting.
    pub compatibility: bool,
}

impl CompileOptions {
    #[must_use]
    pub fn with_preview(mut self, enabled: bool) -> Self {
        self.preview = enabled;
        self
    }

    #[must_use]
    pub fn with_compatibility(mut self, enabled: bool) -> Self {
        self.compatibility = enabled;
        self
    }
}

/// Result of compiling one document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompileResult {
    /// XHTML fragment wrapped in a single `div`.
    pub xhtml: String,
    /// Whether any diagnostic was written into the output.
    pub encountered_error: bool,
    /// Diagnostic messages in document order.
    pub diagnostics: Vec<String>,
    /// Names given by `$$cat` lines.
    pub categories: Vec<String>,
    /// Ids from `$$asin`, `$$isbn` and `$$vc` lines.
    pub embedded_reference_ids: Vec<String>,
    /// Ids from `$$asinr` lines.
    pub represented_reference_ids: Vec<String>,
}

/// Reusable compiler bound to a content resolver.
///
/// Map element ids are drawn from a counter owned by the compiler, so ids
/// stay distinct across every document compiled with the same instance.
///
/// # Example
///
/// ```
/// use magml_renderer::{CompileOptions, Compiler, NoContent};
///
/// let compiler = Compiler::new(NoContent);
/// let result = compiler.compile("$$* bold$$!", CompileOptions::default());
/// assert_eq!(result.xhtml, "<div><p><strong>bold</strong></p>\n</div>\n");
/// ```
#[derive(Debug, Default)]
pub struct Compiler<R> {
    resolver: R,
    embed_ids: AtomicUsize,
}

impl<R: ContentResolver> Compiler<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            embed_ids: AtomicUsize::new(0),
        }
    }

    /// Compile MagML source. Never fails; problems in the source are
    /// reported inside the returned markup.
    pub fn compile(&self, source: &str, options: CompileOptions) -> CompileResult {
        let root = parse(source);
        let generator = Generator::new(XhtmlWriter::new(), options, &self.resolver, &self.embed_ids);
        let (writer, report) = generator.generate(&root);
        let xhtml = writer.finish();

        tracing::debug!(
            lines = root.children.len(),
            bytes = xhtml.len(),
            diagnostics = report.diagnostics.len(),
            preview = options.preview,
            compatibility = options.compatibility,
            "Compiled MagML document"
        );

        CompileResult {
            xhtml,
            encountered_error: report.encountered_error,
            diagnostics: report.diagnostics,
            categories: report.categories,
            embedded_reference_ids: report.embedded_reference_ids,
            represented_reference_ids: report.represented_reference_ids,
        }
    }
}

/// Compile with no content store and a fresh id counter.
#[must_use]
pub fn compile(source: &str, preview_mode: bool, compatibility_mode: bool) -> CompileResult {
    let options = CompileOptions::default()
        .with_preview(preview_mode)
        .with_compatibility(compatibility_mode);
    Compiler::new(NoContent).compile(source, options)
}

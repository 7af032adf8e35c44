//! XHTML generation from the document tree.
//!
//! The generator walks logical lines in order and keeps an explicit stack of
//! open structural contexts (lists, tables, quotes, indents, pre and
//! large-text blocks). Block directives push and pop that stack; inline
//! directives write straight into whatever element is innermost in the sink.
//!
//! Nothing here fails. Misplaced or malformed directives become visible
//! `<span class="error">` diagnostics and set the error flag. Unmatched end
//! directives and invalid switch arguments are collected and written as
//! trailing paragraphs once every context is closed.

mod args;
mod block;
mod context;
mod embed;
mod inline;

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::compile::CompileOptions;
use crate::directive::BlockDirective;
use crate::node::Node;
use crate::resolver::ContentResolver;
use crate::sink::OutputSink;

use context::{ContextKind, OpenContext};
use inline::NestDepths;

/// Namespace bound to the `it` prefix in compatibility mode.
const INTERIM_NAMESPACE: &str = "http://www.piedey.co.jp/xmlns/modulaf/interim";

/// Everything gathered during generation apart from the markup itself.
#[derive(Debug, Default)]
pub(crate) struct Report {
    pub(crate) encountered_error: bool,
    pub(crate) diagnostics: Vec<String>,
    pub(crate) categories: Vec<String>,
    pub(crate) embedded_reference_ids: Vec<String>,
    pub(crate) represented_reference_ids: Vec<String>,
}

/// Single-use XHTML generator.
pub(crate) struct Generator<'a, S> {
    sink: S,
    options: CompileOptions,
    resolver: &'a dyn ContentResolver,
    embed_ids: &'a AtomicUsize,
    contexts: Vec<OpenContext>,
    nesting: NestDepths,
    pre_mode: bool,
    table_header_pending: bool,
    deferred: Vec<String>,
    report: Report,
}

impl<'a, S: OutputSink> Generator<'a, S> {
    pub(crate) fn new(
        sink: S,
        options: CompileOptions,
        resolver: &'a dyn ContentResolver,
        embed_ids: &'a AtomicUsize,
    ) -> Self {
        Self {
            sink,
            options,
            resolver,
            embed_ids,
            contexts: Vec::new(),
            nesting: NestDepths::default(),
            pre_mode: false,
            table_header_pending: false,
            deferred: Vec::new(),
            report: Report::default(),
        }
    }

    /// Render a parsed document, consuming the generator.
    pub(crate) fn generate(mut self, root: &Node) -> (S, Report) {
        if self.options.compatibility {
            self.sink
                .open_element("div", &[("xmlns:it", INTERIM_NAMESPACE)]);
        } else {
            self.sink.open_element("div", &[]);
        }
        self.contexts.push(OpenContext::root());

        for line in &root.children {
            self.line(line);
        }

        while self.contexts.len() > 1 {
            self.pop_context();
        }
        for message in std::mem::take(&mut self.deferred) {
            self.sink.open_element("p", &[]);
            self.inline_error(&message);
            self.sink.close_element();
        }
        self.sink.close_element();

        (self.sink, self.report)
    }

    fn current(&self) -> OpenContext {
        self.contexts
            .last()
            .copied()
            .unwrap_or_else(OpenContext::root)
    }

    /// Open a structural context for `directive`.
    ///
    /// Inside a list the context gets its own `li`, owned by the same directive.
    fn open_context(&mut self, kind: ContextKind, directive: BlockDirective) {
        if self.current().kind.is_list() {
            self.push_context(ContextKind::ListItem, directive);
        }
        self.push_context(kind, directive);
    }

    fn push_context(&mut self, kind: ContextKind, directive: BlockDirective) {
        match kind.class() {
            Some(class) => self.sink.open_element(kind.tag(), &[("class", class)]),
            None => self.sink.open_element(kind.tag(), &[]),
        }
        self.contexts.push(OpenContext {
            kind,
            opener: Some(directive),
        });
    }

    fn pop_context(&mut self) {
        if self.contexts.len() > 1 {
            self.contexts.pop();
            self.sink.close_element();
        }
    }

    /// Close the current context if `directive` opened it.
    fn close_context(&mut self, directive: BlockDirective) {
        if self.contexts.len() > 1 && self.current().is_opened_by(directive) {
            self.pop_context();
            if self.current().kind == ContextKind::ListItem {
                self.pop_context();
            }
        } else {
            let name = directive.name();
            self.defer(format!(
                "An end {name} markup was found without a matching start {name} markup."
            ));
        }
    }

    /// Open whatever lets line-level content sit in the current context:
    /// `li` in lists, `tr`/`td` in tables, and `p` elsewhere when
    /// `paragraph` is set. Returns how many elements were opened.
    fn open_slot(&mut self, paragraph: bool) -> usize {
        let kind = self.current().kind;
        if kind.is_list() {
            self.sink.open_element("li", &[]);
            1
        } else if kind == ContextKind::Table {
            self.sink.open_element("tr", &[]);
            self.sink.open_element("td", &[]);
            2
        } else if paragraph {
            self.sink.open_element("p", &[]);
            1
        } else {
            0
        }
    }

    fn close_slot(&mut self, opened: usize) {
        for _ in 0..opened {
            self.sink.close_element();
        }
    }

    fn record(&mut self, message: &str) {
        tracing::trace!(message, "diagnostic");
        self.report.encountered_error = true;
        self.report.diagnostics.push(message.to_owned());
    }

    /// Write a diagnostic span at the current inline position.
    fn inline_error(&mut self, message: &str) {
        self.record(message);
        self.sink
            .text_element("span", &[("class", "error")], message);
    }

    /// Write a diagnostic as its own line in the current context.
    fn block_error(&mut self, message: &str) {
        let opened = self.open_slot(true);
        self.inline_error(message);
        self.close_slot(opened);
    }

    /// Queue a diagnostic for the end of the document.
    fn defer(&mut self, message: String) {
        self.deferred.push(message);
    }

    fn next_embed_id(&self) -> usize {
        self.embed_ids.fetch_add(1, Ordering::Relaxed)
    }
}

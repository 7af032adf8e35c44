//! Logical lines and block directives.

use super::Generator;
use super::args::Switch;
use super::context::ContextKind;
use crate::directive::BlockDirective;
use crate::node::{Node, NodeKind};
use crate::sink::OutputSink;

/// Marker written for an empty line in compatibility mode.
const PARAGRAPH_SEPARATOR_MARKER: &str = "<it:whiteSeparatorBetweenParagraphs />\n";

impl<S: OutputSink> Generator<'_, S> {
    pub(super) fn line(&mut self, line: &Node) {
        if let Some(first) = line.children.first()
            && first.kind == NodeKind::XhtmlFragment
        {
            self.xhtml_fragment(&first.value);
            return;
        }

        if !self.check_block_stands_alone(line) {
            return;
        }

        if let [node] = line.children.as_slice()
            && node.kind == NodeKind::BlockMarkup
        {
            if let Some(directive) = BlockDirective::from_name(&node.value) {
                self.block(directive, node);
            }
            return;
        }

        self.plain_line(line);
    }

    /// A block directive must be the only thing on its line.
    fn check_block_stands_alone(&mut self, line: &Node) -> bool {
        if let [only] = line.children.as_slice()
            && only.kind == NodeKind::BlockMarkup
        {
            return true;
        }
        let Some(block) = line
            .children
            .iter()
            .find(|child| child.kind == NodeKind::BlockMarkup)
        else {
            return true;
        };
        self.block_error(&format!(
            "{} markup cannot share its line with other content.",
            block.value
        ));
        false
    }

    fn block(&mut self, directive: BlockDirective, node: &Node) {
        if directive == BlockDirective::Table {
            self.table(node);
            return;
        }
        if self.current().kind == ContextKind::Table {
            self.block_error(&format!(
                "{} markup cannot be written inside table markup.",
                node.value
            ));
            return;
        }

        match directive {
            BlockDirective::Heading1
            | BlockDirective::Heading2
            | BlockDirective::Heading3
            | BlockDirective::Heading4
            | BlockDirective::Heading5 => self.heading(directive, node),
            BlockDirective::UnorderedList
            | BlockDirective::OrderedList
            | BlockDirective::Indent
            | BlockDirective::BlockQuote
            | BlockDirective::LargeText
            | BlockDirective::Pre => self.structural(directive, node),
            BlockDirective::Pm | BlockDirective::Fl | BlockDirective::Fhide => {
                self.block_error(&format!("{} markup is not supported.", node.value));
            }
            BlockDirective::Category => self.report.categories.push(node.inner_text()),
            BlockDirective::Video => self.video(node),
            BlockDirective::ContentTree => self.content_tree(node),
            BlockDirective::Map | BlockDirective::MapPoint | BlockDirective::MapPolyline => {
                self.map(directive, node);
            }
            BlockDirective::Asin | BlockDirective::Isbn | BlockDirective::VendorCode => {
                let id = node.inner_text().trim().to_owned();
                self.report.embedded_reference_ids.push(id);
            }
            BlockDirective::RepresentAsin => {
                let id = node.inner_text().trim().to_owned();
                self.report.represented_reference_ids.push(id);
            }
            BlockDirective::Table => {}
        }
    }

    fn heading(&mut self, directive: BlockDirective, node: &Node) {
        let text = match node.children.as_slice() {
            [child] if child.kind == NodeKind::Text => child.value.as_str(),
            _ => {
                self.block_error(&format!(
                    "{} markup may contain only text of one or more characters.",
                    node.value
                ));
                return;
            }
        };
        if !self.current().kind.accepts_blocks() {
            self.block_error(&format!(
                "{} markup cannot be written outside a block context.",
                node.value
            ));
            return;
        }
        let tag = match directive.heading_level() {
            Some(2) => "h2",
            Some(3) => "h3",
            Some(4) => "h4",
            Some(5) => "h5",
            _ => "h6",
        };
        self.sink.text_element(tag, &[], text);
    }

    /// Lists, indents, quotes, large text and pre blocks.
    fn structural(&mut self, directive: BlockDirective, node: &Node) {
        let Some(kind) = ContextKind::for_directive(directive) else {
            return;
        };
        match Switch::of(node) {
            Switch::Start => self.start_structural(kind, directive),
            Switch::End => self.close_context(directive),
            Switch::Toggle if self.current().is_opened_by(directive) => {
                self.close_context(directive);
            }
            Switch::Toggle => self.start_structural(kind, directive),
            Switch::Unknown(argument) => self.defer_switch_error(&argument),
        }
    }

    fn start_structural(&mut self, kind: ContextKind, directive: BlockDirective) {
        if kind == ContextKind::Pre
            && self
                .contexts
                .iter()
                .any(|context| context.is_opened_by(BlockDirective::Pre))
        {
            self.block_error("pre markup cannot be written inside pre markup.");
            return;
        }
        self.open_context(kind, directive);
    }

    fn table(&mut self, node: &Node) {
        match Switch::of(node) {
            Switch::Start => self.start_table(),
            Switch::End => self.close_context(BlockDirective::Table),
            Switch::Toggle if self.current().is_opened_by(BlockDirective::Table) => {
                self.close_context(BlockDirective::Table);
            }
            Switch::Toggle => self.start_table(),
            Switch::Unknown(argument) => self.defer_switch_error(&argument),
        }
    }

    /// Only the current context is checked: a table inside a list inside a
    /// table is accepted.
    fn start_table(&mut self) {
        if self.current().kind == ContextKind::Table {
            self.block_error("table markup cannot be written inside table markup.");
            return;
        }
        self.open_context(ContextKind::Table, BlockDirective::Table);
        self.table_header_pending = true;
    }

    fn defer_switch_error(&mut self, argument: &str) {
        self.defer(format!(
            "{argument} is invalid. It must be start, end or empty."
        ));
    }

    fn content_tree(&mut self, node: &Node) {
        if self.current().kind.is_list() {
            self.block_error("ctree markup cannot be used inside ul/ol markup.");
            return;
        }
        let short_name = node.inner_text();
        let short_name = short_name.trim();
        if !short_name.is_empty() && !self.resolver.is_short_keyword(short_name) {
            self.block_error(&format!("{short_name} is not a short keyword name."));
            return;
        }
        self.block_error("ctree is not supported.");
    }

    fn plain_line(&mut self, line: &Node) {
        let kind = self.current().kind;
        if kind == ContextKind::Table {
            self.table_row(line);
            self.table_header_pending = false;
            return;
        }

        self.pre_mode = kind == ContextKind::Pre;
        if kind.is_list() {
            self.sink.open_element("li", &[]);
            self.inline_children(line, 0);
            self.sink.close_element();
        } else if line.children.is_empty() {
            if self.options.compatibility {
                self.sink.write_raw(PARAGRAPH_SEPARATOR_MARKER);
            } else {
                self.sink
                    .open_element("div", &[("class", "spaceBetweenPara")]);
                self.sink.close_element();
            }
        } else {
            self.sink.open_element("p", &[]);
            self.inline_children(line, 0);
            self.sink.close_element();
        }
        self.pre_mode = false;
    }

    /// One table row. Commas in plain text start a new cell; escaped commas
    /// and inline markup stay in the current one. A trailing comma adds no
    /// empty cell.
    fn table_row(&mut self, line: &Node) {
        let cell = if self.table_header_pending { "th" } else { "td" };
        let children = &line.children;
        let mut next = 0;
        let mut pending = String::new();

        self.sink.open_element("tr", &[]);
        while next < children.len() || !pending.is_empty() {
            self.sink.open_element(cell, &[]);
            loop {
                if !pending.is_empty() {
                    if let Some(comma) = pending.find(',') {
                        self.sink.write_text(&pending[..comma]);
                        pending.replace_range(..=comma, "");
                        break;
                    }
                    self.sink.write_text(&pending);
                    pending.clear();
                }
                let Some(child) = children.get(next) else {
                    break;
                };
                match child.kind {
                    NodeKind::Text => pending.clone_from(&child.value),
                    NodeKind::EscapedText => self.sink.write_text(&child.value),
                    _ => self.inline_node(child, 0),
                }
                next += 1;
            }
            self.sink.close_element();
        }
        self.sink.close_element();
    }
}

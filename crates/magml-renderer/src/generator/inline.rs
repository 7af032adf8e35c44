//! Inline directives and text runs.

use super::Generator;
use super::args::{skip_spaces, skip_word};
use crate::directive::InlineDirective;
use crate::escape::wikipedia_title;
use crate::node::{Node, NodeKind};
use crate::sink::OutputSink;

const WIKIPEDIA_ROOT: &str = "https://ja.wikipedia.org/";
const WIKIPEDIA_ARTICLE: &str = "https://ja.wikipedia.org/wiki/";

/// Content items are linked by id through the content viewer.
const CONTENT_LINK_PREFIX: &str = "Content.modf?id=";

/// Current depth of each directive that must not contain itself.
#[derive(Debug, Default)]
pub(super) struct NestDepths {
    underline: u32,
    strong: u32,
    emphasis: u32,
    strike: u32,
    hide: u32,
    quote: u32,
    anchor: u32,
}

impl NestDepths {
    fn depth_mut(&mut self, directive: InlineDirective) -> Option<&mut u32> {
        match directive {
            InlineDirective::Underline => Some(&mut self.underline),
            InlineDirective::Strong => Some(&mut self.strong),
            InlineDirective::Emphasis => Some(&mut self.emphasis),
            InlineDirective::Strike => Some(&mut self.strike),
            InlineDirective::Hide => Some(&mut self.hide),
            InlineDirective::Quote => Some(&mut self.quote),
            InlineDirective::Anchor | InlineDirective::ExternalAnchor => Some(&mut self.anchor),
            _ => None,
        }
    }
}

impl<S: OutputSink> Generator<'_, S> {
    /// Render the children of `node`, dropping `skip` bytes from the first one.
    pub(super) fn inline_children(&mut self, node: &Node, skip: usize) {
        for (i, child) in node.children.iter().enumerate() {
            self.inline_node(child, if i == 0 { skip } else { 0 });
        }
    }

    pub(super) fn inline_node(&mut self, node: &Node, skip: usize) {
        match node.kind {
            NodeKind::Text | NodeKind::EscapedText => {
                self.text_run(node.value.get(skip..).unwrap_or_default());
            }
            NodeKind::ErrorText => self.inline_error(&node.value),
            NodeKind::InlineMarkup => {
                if let Some(directive) = InlineDirective::from_name(&node.value) {
                    self.inline_markup(directive, node);
                }
            }
            NodeKind::BlockMarkup => self.inline_error(&format!(
                "{} markup cannot be written inside inline markup.",
                node.value
            )),
            NodeKind::XhtmlFragment => {
                self.inline_error("xhtml markup must start at the beginning of a line.");
            }
            NodeKind::Root | NodeKind::LogicalLine => {}
        }
    }

    fn text_run(&mut self, text: &str) {
        if !self.pre_mode {
            self.sink.write_text(text);
            return;
        }
        if text.contains('\t') {
            self.inline_error("Tab characters cannot be used. Use spaces instead.");
        }
        self.sink.write_text(&text.replace(' ', "\u{a0}"));
    }

    fn inline_markup(&mut self, directive: InlineDirective, node: &Node) {
        match directive {
            InlineDirective::Underline => {
                self.wrapped(directive, node, "span", &[("class", "generalUnderlined")]);
            }
            InlineDirective::Strong => self.wrapped(directive, node, "strong", &[]),
            InlineDirective::Emphasis => self.wrapped(directive, node, "em", &[]),
            InlineDirective::Strike => {
                self.wrapped(directive, node, "span", &[("class", "strikeout")]);
            }
            InlineDirective::Hide => {
                self.wrapped(directive, node, "span", &[("class", "generalHide")]);
            }
            InlineDirective::Quote => self.wrapped(directive, node, "q", &[]),
            InlineDirective::Anchor => self.anchor(node, false),
            InlineDirective::ExternalAnchor => self.anchor(node, true),
            InlineDirective::Color => self.color(node),
            InlineDirective::Wikipedia => self.wikipedia(node),
            InlineDirective::ContentReference => self.content_reference(node),
            InlineDirective::Image => self.image(node),
            InlineDirective::Flash => {
                self.inline_error("Flash is no longer supported. (flash markup is obsolete)");
            }
            InlineDirective::SuperQuiz => self.inline_error(
                "Super quizzes are no longer supported. (superq markup is obsolete)",
            ),
        }
    }

    /// Report self-nesting and bump the depth counter.
    fn enter(&mut self, directive: InlineDirective, node: &Node) {
        let Some(depth) = self.nesting.depth_mut(directive) else {
            return;
        };
        let nested = *depth > 0;
        *depth += 1;
        if nested {
            self.inline_error(&format!("{} markup cannot be nested.", node.value));
        }
    }

    fn leave(&mut self, directive: InlineDirective) {
        if let Some(depth) = self.nesting.depth_mut(directive) {
            *depth = depth.saturating_sub(1);
        }
    }

    fn wrapped(
        &mut self,
        directive: InlineDirective,
        node: &Node,
        tag: &'static str,
        attrs: &[(&str, &str)],
    ) {
        self.enter(directive, node);
        self.sink.open_element(tag, attrs);
        self.inline_children(node, 0);
        self.sink.close_element();
        self.leave(directive);
    }

    /// The first child must be text; returns it, or reports why not.
    fn leading_argument<'n>(&mut self, node: &'n Node) -> Option<&'n str> {
        match node.children.first() {
            None => {
                self.inline_error(&format!("{} markup has no content.", node.value));
                None
            }
            Some(child) if child.kind == NodeKind::Text => Some(&child.value),
            Some(_) => {
                self.inline_error(&format!(
                    "{} markup content must start with a URL.",
                    node.value
                ));
                None
            }
        }
    }

    fn anchor(&mut self, node: &Node, external: bool) {
        let Some(src) = self.leading_argument(node) else {
            return;
        };
        let url_end = skip_word(src, 0);
        let url = &src[..url_end];
        let directive = if external {
            InlineDirective::ExternalAnchor
        } else {
            InlineDirective::Anchor
        };

        self.enter(directive, node);
        if external || self.options.preview {
            self.sink
                .open_element("a", &[("href", url), ("target", "_blank")]);
        } else {
            self.sink.open_element("a", &[("href", url)]);
        }
        self.inline_children(node, skip_spaces(src, url_end));
        self.sink.close_element();
        self.leave(directive);
    }

    fn color(&mut self, node: &Node) {
        let Some(src) = self.leading_argument(node) else {
            return;
        };
        let color_end = skip_word(src, 0);
        let style = format!("color: {};", &src[..color_end]);
        self.sink.open_element("span", &[("style", style.as_str())]);
        self.inline_children(node, skip_spaces(src, color_end));
        self.sink.close_element();
    }

    fn wikipedia(&mut self, node: &Node) {
        match node.children.as_slice() {
            [] => self
                .sink
                .text_element("a", &[("href", WIKIPEDIA_ROOT)], "WikiPedia"),
            [keyword] if keyword.kind == NodeKind::Text => {
                let url = format!("{WIKIPEDIA_ARTICLE}{}", wikipedia_title(&keyword.value));
                self.sink
                    .text_element("a", &[("href", url.as_str())], &keyword.value);
            }
            _ => self.inline_error(&format!(
                "{} markup may contain only simple text.",
                node.value
            )),
        }
    }

    fn content_reference(&mut self, node: &Node) {
        let Some(src) = self.leading_argument(node) else {
            return;
        };
        let id = src.trim();
        match self.resolver.resolve_content_item(id) {
            Some(item) => {
                let href = format!("{CONTENT_LINK_PREFIX}{id}");
                self.sink.text_element("a", &[("href", href.as_str())], &item.title);
            }
            None => self.inline_error(&format!(
                "No content was found for {id} given in {} markup.",
                node.value
            )),
        }
    }

    /// Images are no longer rendered, but the argument is still validated.
    fn image(&mut self, node: &Node) {
        let Some(src) = self.leading_argument(node) else {
            return;
        };
        if node.children.len() > 1 {
            self.inline_error(
                "img markup contains content that cannot be interpreted. \
                 Check that it is closed with $$!.",
            );
            return;
        }
        let number = &src[..skip_word(src, 0)];
        if number.parse::<u32>().is_err() {
            self.inline_error(&format!(
                "{number} cannot be interpreted as an image number. Write it with ASCII digits."
            ));
            return;
        }
        self.inline_error("img markup is not supported.");
    }
}

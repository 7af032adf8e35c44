//! Recursive-descent parser from tokens to a [`Node`] tree.
//!
//! Every logical line becomes a [`NodeKind::LogicalLine`] under the root. A
//! `$$name` recursively parses its body up to the matching `$$!`; a line end
//! closes every directive still open on that line without complaint.

use crate::directive::{BlockDirective, InlineDirective};
use crate::node::{Node, NodeKind};
use crate::token::Token;
use crate::tokenizer::Tokenizer;

/// Text written for a `$$!` with nothing to close.
const STRAY_MARKUP_END: &str = "$$!";

/// Deepest directive nesting the parser follows. The rest of a line that
/// nests deeper is dropped.
pub(crate) const MAX_NESTING: usize = 128;

/// Parse MagML source into a normalized document tree.
#[must_use]
pub fn parse(src: &str) -> Node {
    let mut tokenizer = Tokenizer::new(src);
    let mut lines = Vec::new();
    loop {
        let token = tokenizer.next_token();
        if token == Token::EndOfInput {
            break;
        }
        let mut children = Vec::new();
        let terminator = parse_run(&mut tokenizer, token, &mut children, 0);
        debug_assert!(terminator.ends_line());
        lines.push(Node::new(NodeKind::LogicalLine, "", children));
    }

    let mut root = Node::new(NodeKind::Root, "", lines);
    normalize(&mut root);
    root
}

/// Parse tokens into `nodes`, starting with `first`.
///
/// At the top level (`depth` 0) the run ends at a line end. Inside a
/// directive body it also ends at `$$!`, which is consumed. Returns the
/// first token not yet placed in the tree.
fn parse_run<'a>(
    tokenizer: &mut Tokenizer<'a>,
    first: Token<'a>,
    nodes: &mut Vec<Node>,
    depth: usize,
) -> Token<'a> {
    let mut token = first;
    loop {
        token = match token {
            Token::Newline | Token::EndOfInput => return token,
            Token::MarkupEnd if depth > 0 => return tokenizer.next_token(),
            Token::MarkupEnd => {
                nodes.push(Node::text(STRAY_MARKUP_END));
                tokenizer.next_token()
            }
            Token::MarkupStart(_) if depth >= MAX_NESTING => {
                tracing::debug!(depth, "nesting limit reached");
                nodes.push(Node::leaf(
                    NodeKind::ErrorText,
                    format!("Markup cannot be nested more than {MAX_NESTING} levels deep."),
                ));
                return skip_line(tokenizer);
            }
            Token::MarkupStart(name) => {
                let mut body = Vec::new();
                let next = tokenizer.next_token();
                let after = parse_run(tokenizer, next, &mut body, depth + 1);
                nodes.push(markup_node(name, body));
                after
            }
            Token::Text(text) => {
                nodes.push(Node::text(text));
                tokenizer.next_token()
            }
            Token::EscapedText(text) => {
                nodes.push(Node::leaf(NodeKind::EscapedText, text));
                tokenizer.next_token()
            }
            Token::XhtmlFragment(content) => {
                nodes.push(Node::leaf(NodeKind::XhtmlFragment, content));
                return tokenizer.next_token();
            }
        };
    }
}

/// Discard tokens up to and including the end of the current line.
fn skip_line<'a>(tokenizer: &mut Tokenizer<'a>) -> Token<'a> {
    loop {
        let token = tokenizer.next_token();
        if token.ends_line() {
            return token;
        }
    }
}

/// Classify a parsed directive by name.
fn markup_node(name: &str, body: Vec<Node>) -> Node {
    if BlockDirective::from_name(name).is_some() {
        Node::new(NodeKind::BlockMarkup, name, body)
    } else if InlineDirective::from_name(name).is_some() {
        Node::new(NodeKind::InlineMarkup, name, body)
    } else {
        tracing::trace!(name, "unknown directive");
        Node::leaf(
            NodeKind::ErrorText,
            format!("{name} is not a MagML markup name."),
        )
    }
}

/// Merge adjacent text children, bottom-up, at every level of the tree.
///
/// Empty text runs are dropped. Running this twice changes nothing.
pub fn normalize(node: &mut Node) {
    for child in &mut node.children {
        normalize(child);
    }

    let mut merged: Vec<Node> = Vec::with_capacity(node.children.len());
    let mut pending = String::new();
    for child in node.children.drain(..) {
        if child.kind == NodeKind::Text {
            pending.push_str(&child.value);
            continue;
        }
        if !pending.is_empty() {
            merged.push(Node::text(std::mem::take(&mut pending)));
        }
        merged.push(child);
    }
    if !pending.is_empty() {
        merged.push(Node::text(pending));
    }
    node.children = merged;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line(children: Vec<Node>) -> Node {
        Node::new(NodeKind::LogicalLine, "", children)
    }

    fn inline(name: &str, children: Vec<Node>) -> Node {
        Node::new(NodeKind::InlineMarkup, name, children)
    }

    fn block(name: &str, children: Vec<Node>) -> Node {
        Node::new(NodeKind::BlockMarkup, name, children)
    }

    #[test]
    fn test_empty_source_has_no_lines() {
        assert!(parse("").children.is_empty());
    }

    #[test]
    fn test_trailing_newline_does_not_add_a_line() {
        assert_eq!(parse("a\n").children, vec![line(vec![Node::text("a")])]);
        assert_eq!(
            parse("a\n\n").children,
            vec![line(vec![Node::text("a")]), line(vec![])]
        );
    }

    #[test]
    fn test_inline_markup() {
        let root = parse("x $$* bold $$! y");
        assert_eq!(
            root.children,
            vec![line(vec![
                Node::text("x "),
                inline("*", vec![Node::text("bold ")]),
                Node::text(" y"),
            ])]
        );
    }

    #[test]
    fn test_nested_markup() {
        let root = parse("$$_ $$_ nested $$! $$!");
        assert_eq!(
            root.children,
            vec![line(vec![inline(
                "_",
                vec![inline("_", vec![Node::text("nested ")]), Node::text(" ")]
            )])]
        );
    }

    #[test]
    fn test_block_markup_ends_at_line_end() {
        let root = parse("$$ul\nitem");
        assert_eq!(
            root.children,
            vec![
                line(vec![block("ul", vec![])]),
                line(vec![Node::text("item")])
            ]
        );
    }

    #[test]
    fn test_unterminated_markup_closes_at_line_end() {
        let root = parse("$$* open\nnext");
        assert_eq!(
            root.children,
            vec![
                line(vec![inline("*", vec![Node::text("open")])]),
                line(vec![Node::text("next")]),
            ]
        );
    }

    #[test]
    fn test_stray_markup_end_is_text() {
        let root = parse("a$$!b");
        assert_eq!(root.children, vec![line(vec![Node::text("a$$!b")])]);
    }

    #[test]
    fn test_unknown_markup_becomes_error_leaf() {
        let root = parse("$$bogus body $$* x $$! $$!");
        let children = &root.children[0].children;
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind, NodeKind::ErrorText);
        assert_eq!(children[0].value, "bogus is not a MagML markup name.");
        assert!(children[0].children.is_empty());
    }

    #[test]
    fn test_escaped_comma_stays_separate() {
        let root = parse("a$$,b");
        assert_eq!(
            root.children,
            vec![line(vec![
                Node::text("a"),
                Node::leaf(NodeKind::EscapedText, ","),
                Node::text("b"),
            ])]
        );
    }

    #[test]
    fn test_character_escapes_merge_into_text() {
        let root = parse("1$$$2$$z3");
        assert_eq!(
            root.children,
            vec![line(vec![Node::text("1$2\u{3000}3")])]
        );
    }

    #[test]
    fn test_xhtml_fragment_ends_line() {
        let root = parse("$$xhtml\n<b/>\n$$xhtml\nafter");
        assert_eq!(
            root.children,
            vec![
                line(vec![Node::leaf(NodeKind::XhtmlFragment, "<b/>\n")]),
                line(vec![Node::text("after")]),
            ]
        );
    }

    fn depth(node: &Node) -> usize {
        node.children.iter().map(depth).max().map_or(0, |d| d + 1)
    }

    #[test]
    fn test_deep_nesting_is_cut_off() {
        let src = format!("{}\nafter", "$$* ".repeat(100_000));
        let root = parse(&src);

        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1], line(vec![Node::text("after")]));
        // root, line, MAX_NESTING directives, error leaf
        assert_eq!(depth(&root), MAX_NESTING + 2);

        let mut node = &root.children[0];
        while let Some(child) = node.children.last() {
            node = child;
        }
        assert_eq!(node.kind, NodeKind::ErrorText);
        assert_eq!(
            node.value,
            "Markup cannot be nested more than 128 levels deep."
        );
    }

    #[test]
    fn test_nesting_up_to_the_limit_is_kept() {
        let src = "$$* ".repeat(MAX_NESTING);
        let root = parse(&src);
        assert_eq!(depth(&root), MAX_NESTING + 1);
    }

    #[test]
    fn test_normalize_merges_and_drops_empty_text() {
        let mut node = line(vec![
            Node::text("a"),
            Node::text(""),
            Node::text("b"),
            Node::leaf(NodeKind::EscapedText, ","),
            Node::text(""),
            inline("*", vec![Node::text("c"), Node::text("d")]),
        ]);
        normalize(&mut node);
        assert_eq!(
            node,
            line(vec![
                Node::text("ab"),
                Node::leaf(NodeKind::EscapedText, ","),
                inline("*", vec![Node::text("cd")]),
            ])
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = parse("a$$$b $$* c$$zd $$! e$$,f\n$$ul\n$$table\nx,y$$,z");
        let mut twice = once.clone();
        normalize(&mut twice);
        assert_eq!(once, twice);
    }
}

//! Document tree built by the parser.

/// Kind of a [`Node`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// The document; children are logical lines.
    Root,
    /// One line of source; children are the line's content.
    LogicalLine,
    /// Directive rendered in place. `value` holds the directive name.
    InlineMarkup,
    /// Directive acting on document structure. `value` holds the directive name.
    BlockMarkup,
    /// Plain text.
    Text,
    /// Literal text produced by `$$,`.
    EscapedText,
    /// Parse-time diagnostic. Always a leaf.
    ErrorText,
    /// Raw XHTML captured by an `$$xhtml` block.
    XhtmlFragment,
}

/// A node of the MagML document tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub value: String,
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node with children.
    #[must_use]
    pub fn new(kind: NodeKind, value: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            kind,
            value: value.into(),
            children,
        }
    }

    /// Create a childless node.
    #[must_use]
    pub fn leaf(kind: NodeKind, value: impl Into<String>) -> Self {
        Self::new(kind, value, Vec::new())
    }

    /// Create a plain text node.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Text, value)
    }

    /// Whether this node is a block markup with the given name.
    #[must_use]
    pub fn is_block(&self, name: &str) -> bool {
        self.kind == NodeKind::BlockMarkup && self.value == name
    }

    /// Concatenated text of all text-like descendants.
    ///
    /// Markup nodes contribute only their children, never their names.
    #[must_use]
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child.kind {
                NodeKind::Text | NodeKind::EscapedText | NodeKind::ErrorText => {
                    out.push_str(&child.value);
                }
                _ => {}
            }
            child.collect_text(out);
        }
    }

    /// Text of the first child when it is a plain text node.
    #[must_use]
    pub fn leading_text(&self) -> Option<&str> {
        match self.children.first() {
            Some(child) if child.kind == NodeKind::Text => Some(&child.value),
            _ => None,
        }
    }
}

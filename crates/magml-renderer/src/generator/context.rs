//! Open structural contexts.

use crate::directive::BlockDirective;

/// Element kind of an open context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ContextKind {
    /// The document's outer `div`.
    Root,
    UnorderedList,
    OrderedList,
    /// An `li` opened to hold a block context inside a list.
    ListItem,
    Indent,
    Pre,
    LargeText,
    BlockQuote,
    Table,
}

impl ContextKind {
    /// Structural context opened by a block directive, if it opens one.
    pub(crate) fn for_directive(directive: BlockDirective) -> Option<Self> {
        let kind = match directive {
            BlockDirective::UnorderedList => Self::UnorderedList,
            BlockDirective::OrderedList => Self::OrderedList,
            BlockDirective::Indent => Self::Indent,
            BlockDirective::Pre => Self::Pre,
            BlockDirective::LargeText => Self::LargeText,
            BlockDirective::BlockQuote => Self::BlockQuote,
            BlockDirective::Table => Self::Table,
            _ => return None,
        };
        Some(kind)
    }

    pub(crate) fn tag(self) -> &'static str {
        match self {
            Self::Root | Self::Indent | Self::Pre | Self::LargeText => "div",
            Self::UnorderedList => "ul",
            Self::OrderedList => "ol",
            Self::ListItem => "li",
            Self::BlockQuote => "blockquote",
            Self::Table => "table",
        }
    }

    pub(crate) fn class(self) -> Option<&'static str> {
        match self {
            Self::Indent => Some("generalIndent"),
            Self::Pre => Some("generalMonospace"),
            Self::LargeText => Some("largeText"),
            _ => None,
        }
    }

    pub(crate) fn is_list(self) -> bool {
        matches!(self, Self::UnorderedList | Self::OrderedList)
    }

    /// Whether paragraphs and headings may be written directly inside.
    pub(crate) fn accepts_blocks(self) -> bool {
        !self.is_list() && self != Self::Table
    }
}

/// One entry of the open-context stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OpenContext {
    pub(crate) kind: ContextKind,
    /// Directive that opened the context; `None` for the root.
    pub(crate) opener: Option<BlockDirective>,
}

impl OpenContext {
    pub(crate) fn root() -> Self {
        Self {
            kind: ContextKind::Root,
            opener: None,
        }
    }

    pub(crate) fn is_opened_by(&self, directive: BlockDirective) -> bool {
        self.opener == Some(directive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_directive() {
        assert_eq!(
            ContextKind::for_directive(BlockDirective::BlockQuote),
            Some(ContextKind::BlockQuote)
        );
        assert_eq!(ContextKind::for_directive(BlockDirective::Category), None);
    }

    #[test]
    fn test_accepts_blocks() {
        assert!(ContextKind::Root.accepts_blocks());
        assert!(ContextKind::ListItem.accepts_blocks());
        assert!(!ContextKind::OrderedList.accepts_blocks());
        assert!(!ContextKind::Table.accepts_blocks());
    }
}

//! Argument parsing shared by directive handlers.

use crate::node::{Node, NodeKind};
use crate::tokenizer::is_space;

/// What a block directive's argument asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Switch {
    Start,
    End,
    /// Empty argument: close if this directive's context is current, else open.
    Toggle,
    /// Anything else; carries the raw argument.
    Unknown(String),
}

impl Switch {
    /// Read the argument of a structural block directive.
    pub(crate) fn of(node: &Node) -> Self {
        let argument = node.inner_text();
        match argument.trim().to_lowercase().as_str() {
            "start" => Self::Start,
            "end" => Self::End,
            "" => Self::Toggle,
            _ => Self::Unknown(argument),
        }
    }
}

/// Split a directive body on commas.
///
/// Commas inside plain text separate arguments; `$$,` escapes are kept as
/// literal commas. Returns `None` when the body holds anything but text.
pub(crate) fn comma_arguments(node: &Node) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    for child in &node.children {
        match child.kind {
            NodeKind::Text => {
                for c in child.value.chars() {
                    if c == ',' {
                        args.push(std::mem::take(&mut current));
                    } else {
                        current.push(c);
                    }
                }
            }
            NodeKind::EscapedText => current.push_str(&child.value),
            _ => return None,
        }
    }
    args.push(current);
    Some(args)
}

/// Byte offset of the first whitespace at or after `from`, or the end of `s`.
pub(crate) fn skip_word(s: &str, from: usize) -> usize {
    s[from..].find(is_space).map_or(s.len(), |i| from + i)
}

/// Byte offset of the first non-whitespace at or after `from`, or the end of `s`.
pub(crate) fn skip_spaces(s: &str, from: usize) -> usize {
    let rest = &s[from..];
    from + (rest.len() - rest.trim_start_matches(is_space).len())
}

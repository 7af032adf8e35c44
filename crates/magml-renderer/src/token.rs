//! Lexical tokens produced by the [`Tokenizer`](crate::Tokenizer).

/// A single MagML token.
///
/// Text runs borrow from the source; decoded escapes borrow static literals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// `$$name`, opening a directive.
    MarkupStart(&'a str),
    /// `$$!`, closing the innermost open directive.
    MarkupEnd,
    /// Ordinary text, or the character decoded from `$$$`, `$$z`, `$$h` or `$$y`.
    Text(&'a str),
    /// Literal text that comma splitting must leave alone (`$$,`).
    EscapedText(&'a str),
    /// One line terminator: `\r\n`, `\r` or `\n`.
    Newline,
    /// Raw lines captured between two `$$xhtml` sentinels, each followed by `\n`.
    XhtmlFragment(String),
    /// Source exhausted.
    EndOfInput,
}

impl Token<'_> {
    /// Whether this token terminates a logical line.
    #[must_use]
    pub fn ends_line(&self) -> bool {
        matches!(self, Self::Newline | Self::EndOfInput)
    }
}

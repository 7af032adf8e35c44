//! MagML tokenizer.
//!
//! Scans the source one token per call. Dispatch is by prefix, in this order:
//!
//! 1. `$$xhtml` followed by a line terminator starts a raw block that runs to a
//!    line consisting of `$$xhtml` alone.
//! 2. `$$$`, `$$z`, `$$h`, `$$y` decode to `$`, U+3000, U+00A0 and U+00A5.
//! 3. `$$,` is a literal comma that is never treated as a separator.
//! 4. `$$!` closes a directive.
//! 5. `$$name` opens a directive; whitespace after the name is skipped.
//! 6. `\r\n`, `\r` or `\n` is one newline.
//! 7. Anything else is text up to the next line terminator or `$$`.

use crate::token::Token;

/// Directive marker.
const MARKER: &str = "$$";

/// Opening and closing line of a raw XHTML block.
const XHTML_SENTINEL: &str = "$$xhtml";

/// Three-character escapes decoded to a single literal character.
const CHARACTER_ESCAPES: &[(&str, &str)] = &[
    ("$$$", "$"),
    ("$$z", "\u{3000}"),
    ("$$h", "\u{a0}"),
    ("$$y", "\u{a5}"),
];

/// Escapes that produce text comma splitting must not touch.
const LITERAL_ESCAPES: &[(&str, &str)] = &[("$$,", ",")];

/// Whitespace as MagML sees it: space, tab and the ideographic space.
#[must_use]
pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{3000}')
}

/// Streaming tokenizer over a MagML source string.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer positioned at the start of `src`.
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Consume and return the next token.
    ///
    /// Returns [`Token::EndOfInput`] once the source is exhausted, on every call.
    pub fn next_token(&mut self) -> Token<'a> {
        let rest = &self.src[self.pos..];
        if rest.is_empty() {
            return Token::EndOfInput;
        }

        if let Some(after) = rest.strip_prefix(XHTML_SENTINEL)
            && after.starts_with(['\r', '\n'])
        {
            return self.xhtml_block();
        }

        if rest.starts_with(MARKER) {
            return self.directive(rest);
        }

        if let Some(len) = line_terminator_len(rest) {
            self.pos += len;
            return Token::Newline;
        }

        let len = text_len(rest);
        self.pos += len;
        Token::Text(&rest[..len])
    }

    /// Tokens starting with `$$`, apart from the XHTML block opener.
    fn directive(&mut self, rest: &'a str) -> Token<'a> {
        for &(escape, literal) in CHARACTER_ESCAPES {
            if rest.starts_with(escape) {
                self.pos += escape.len();
                return Token::Text(literal);
            }
        }
        for &(escape, literal) in LITERAL_ESCAPES {
            if rest.starts_with(escape) {
                self.pos += escape.len();
                return Token::EscapedText(literal);
            }
        }
        if rest.starts_with("$$!") {
            self.pos += 3;
            return Token::MarkupEnd;
        }

        let body = &rest[MARKER.len()..];
        let name_len = name_len(body);
        let after_name = &body[name_len..];
        let spaces = after_name.len() - after_name.trim_start_matches(is_space).len();
        self.pos += MARKER.len() + name_len + spaces;
        Token::MarkupStart(&body[..name_len])
    }

    /// Capture raw lines up to a line that reads `$$xhtml`.
    ///
    /// The cursor is left just before the terminator of the last line read so
    /// the caller still sees a newline token.
    fn xhtml_block(&mut self) -> Token<'a> {
        self.pos += XHTML_SENTINEL.len();
        self.pos += line_terminator_len(&self.src[self.pos..]).unwrap_or(0);

        let mut content = String::new();
        let mut last_line_end = self.pos;
        while self.pos < self.src.len() {
            let rest = &self.src[self.pos..];
            let line_len = rest.find(['\r', '\n']).unwrap_or(rest.len());
            let line = &rest[..line_len];
            last_line_end = self.pos + line_len;
            self.pos = last_line_end + line_terminator_len(&rest[line_len..]).unwrap_or(0);
            if line == XHTML_SENTINEL {
                break;
            }
            content.push_str(line);
            content.push('\n');
        }
        self.pos = last_line_end;
        Token::XhtmlFragment(content)
    }
}

/// Length of the line terminator at the start of `s`, if there is one.
fn line_terminator_len(s: &str) -> Option<usize> {
    if s.starts_with("\r\n") {
        Some(2)
    } else if s.starts_with(['\r', '\n']) {
        Some(1)
    } else {
        None
    }
}

/// Length of a directive name: up to whitespace, a line terminator or `$$`.
fn name_len(body: &str) -> usize {
    body.char_indices()
        .find(|&(i, c)| c == '\r' || c == '\n' || is_space(c) || body[i..].starts_with(MARKER))
        .map_or(body.len(), |(i, _)| i)
}

/// Length of a plain text run: up to a line terminator or `$$`.
fn text_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' | b'\n' => break,
            b'$' if bytes.get(i + 1) == Some(&b'$') => break,
            _ => i += 1,
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokenize(src: &str) -> Vec<Token<'_>> {
        let mut tokenizer = Tokenizer::new(src);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token();
            if token == Token::EndOfInput {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(tokenize("hello world"), vec![Token::Text("hello world")]);
    }

    #[test]
    fn test_empty_source() {
        let mut tokenizer = Tokenizer::new("");
        assert_eq!(tokenizer.next_token(), Token::EndOfInput);
        assert_eq!(tokenizer.next_token(), Token::EndOfInput);
    }

    #[test]
    fn test_markup_start_skips_trailing_whitespace() {
        assert_eq!(
            tokenize("$$* \u{3000}\tbold $$!"),
            vec![
                Token::MarkupStart("*"),
                Token::Text("bold "),
                Token::MarkupEnd
            ]
        );
    }

    #[test]
    fn test_markup_name_stops_at_marker() {
        assert_eq!(
            tokenize("$$ul$$!"),
            vec![Token::MarkupStart("ul"), Token::MarkupEnd]
        );
    }

    #[test]
    fn test_markup_name_stops_at_newline() {
        assert_eq!(
            tokenize("$$ul\nitem"),
            vec![Token::MarkupStart("ul"), Token::Newline, Token::Text("item")]
        );
    }

    #[test]
    fn test_character_escapes() {
        assert_eq!(
            tokenize("$$$$$z$$h$$y"),
            vec![
                Token::Text("$"),
                Token::Text("\u{3000}"),
                Token::Text("\u{a0}"),
                Token::Text("\u{a5}"),
            ]
        );
    }

    #[test]
    fn test_escape_wins_over_directive_name() {
        assert_eq!(
            tokenize("$$zone"),
            vec![Token::Text("\u{3000}"), Token::Text("one")]
        );
    }

    #[test]
    fn test_escaped_comma() {
        assert_eq!(
            tokenize("a$$,b"),
            vec![Token::Text("a"), Token::EscapedText(","), Token::Text("b")]
        );
    }

    #[test]
    fn test_dollar_escape_then_escaped_comma() {
        assert_eq!(
            tokenize("$$$$$,$$z"),
            vec![
                Token::Text("$"),
                Token::EscapedText(","),
                Token::Text("\u{3000}")
            ]
        );
    }

    #[test]
    fn test_line_terminators() {
        assert_eq!(
            tokenize("a\r\nb\rc\nd"),
            vec![
                Token::Text("a"),
                Token::Newline,
                Token::Text("b"),
                Token::Newline,
                Token::Text("c"),
                Token::Newline,
                Token::Text("d"),
            ]
        );
    }

    #[test]
    fn test_single_dollar_is_text() {
        assert_eq!(tokenize("cost $5"), vec![Token::Text("cost $5")]);
    }

    #[test]
    fn test_multibyte_text_and_names() {
        assert_eq!(
            tokenize("日本語$$cl red 赤$$!"),
            vec![
                Token::Text("日本語"),
                Token::MarkupStart("cl"),
                Token::Text("red 赤"),
                Token::MarkupEnd,
            ]
        );
    }

    #[test]
    fn test_xhtml_block() {
        let tokens = tokenize("$$xhtml\n<b>x</b>\n<i/>\n$$xhtml\nafter");
        assert_eq!(
            tokens,
            vec![
                Token::XhtmlFragment("<b>x</b>\n<i/>\n".to_owned()),
                Token::Newline,
                Token::Text("after"),
            ]
        );
    }

    #[test]
    fn test_xhtml_block_with_crlf() {
        let tokens = tokenize("$$xhtml\r\n<br/>\r\n$$xhtml\r\n");
        assert_eq!(
            tokens,
            vec![Token::XhtmlFragment("<br/>\n".to_owned()), Token::Newline]
        );
    }

    #[test]
    fn test_xhtml_block_unterminated() {
        let tokens = tokenize("$$xhtml\n<p>open");
        assert_eq!(tokens, vec![Token::XhtmlFragment("<p>open\n".to_owned())]);
    }

    #[test]
    fn test_xhtml_without_line_end_is_a_directive() {
        assert_eq!(tokenize("$$xhtml"), vec![Token::MarkupStart("xhtml")]);
    }
}

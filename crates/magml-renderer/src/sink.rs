//! Output sink abstraction and the XHTML string writer.

use crate::escape::{escape_html, escape_text};

/// Elements followed by a line break when closed.
const BLOCK_ELEMENTS: &[&str] = &[
    "div",
    "p",
    "ul",
    "ol",
    "li",
    "table",
    "tr",
    "blockquote",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
];

/// Destination for generated markup.
///
/// Elements are opened and closed explicitly; the sink keeps the stack of
/// open tags so `close_element` needs no argument.
pub trait OutputSink {
    /// Write character data, escaping as needed.
    fn write_text(&mut self, text: &str);

    /// Write markup verbatim.
    fn write_raw(&mut self, markup: &str);

    /// Write a start tag with the given attributes.
    fn open_element(&mut self, tag: &'static str, attrs: &[(&str, &str)]);

    /// Write the end tag of the innermost open element.
    fn close_element(&mut self);

    /// Write an element containing only text.
    fn text_element(&mut self, tag: &'static str, attrs: &[(&str, &str)], text: &str) {
        self.open_element(tag, attrs);
        self.write_text(text);
        self.close_element();
    }
}

/// [`OutputSink`] writing to a single string buffer.
#[derive(Debug, Default)]
pub struct XhtmlWriter {
    out: String,
    open: Vec<&'static str>,
}

impl XhtmlWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Close any open elements and return the markup.
    #[must_use]
    pub fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.close_element();
        }
        self.out
    }
}

impl OutputSink for XhtmlWriter {
    fn write_text(&mut self, text: &str) {
        self.out.push_str(&escape_text(text));
    }

    fn write_raw(&mut self, markup: &str) {
        self.out.push_str(markup);
    }

    fn open_element(&mut self, tag: &'static str, attrs: &[(&str, &str)]) {
        self.out.push('<');
        self.out.push_str(tag);
        for (name, value) in attrs {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            self.out.push_str(&escape_html(value));
            self.out.push('"');
        }
        self.out.push('>');
        self.open.push(tag);
    }

    fn close_element(&mut self) {
        let Some(tag) = self.open.pop() else {
            return;
        };
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
        if BLOCK_ELEMENTS.contains(&tag) {
            self.out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_elements() {
        let mut w = XhtmlWriter::new();
        w.open_element("p", &[]);
        w.open_element("span", &[("class", "error")]);
        w.write_text("a < b & c");
        w.close_element();
        w.close_element();
        assert_eq!(
            w.finish(),
            "<p><span class=\"error\">a &lt; b &amp; c</span></p>\n"
        );
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let mut w = XhtmlWriter::new();
        w.text_element("a", &[("href", "x?a=1&b=\"2\"")], "t");
        assert_eq!(w.finish(), "<a href=\"x?a=1&amp;b=&quot;2&quot;\">t</a>");
    }

    #[test]
    fn test_finish_closes_open_elements() {
        let mut w = XhtmlWriter::new();
        w.open_element("div", &[]);
        w.open_element("ul", &[]);
        assert_eq!(w.finish(), "<div><ul></ul>\n</div>\n");
    }

    #[test]
    fn test_close_without_open_is_ignored() {
        let mut w = XhtmlWriter::new();
        w.close_element();
        w.write_raw("<br />");
        assert_eq!(w.finish(), "<br />");
    }
}

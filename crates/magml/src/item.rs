//! Column item documents.
//!
//! An item is an XML document whose `subject` and `body` elements live in
//! the column namespace. Other elements are ignored; only the first
//! `subject` and the first `body` are read.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

/// Namespace of the column item elements.
const ITEM_NAMESPACE: &[u8] = b"http://www.piedey.co.jp/ns/magsite1/column";

/// Error reading an item document.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ItemError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
}

/// Text content of an item.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Item {
    pub(crate) subject: Option<String>,
    pub(crate) body: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Subject,
    Body,
}

/// Element currently being collected and how deep inside it the reader is.
struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

impl Item {
    /// Read the subject and body text from an item document.
    ///
    /// Element text includes the text of all descendants.
    pub(crate) fn parse(xml: &str) -> Result<Self, ItemError> {
        let mut reader = NsReader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut item = Self::default();
        let mut capture: Option<Capture> = None;

        loop {
            let (ns, event) = reader.read_resolved_event()?;
            match event {
                Event::Start(e) => {
                    if let Some(capture) = &mut capture {
                        capture.depth += 1;
                    } else if let Some(field) = item.wanted(&ns, e.local_name().as_ref()) {
                        capture = Some(Capture {
                            field,
                            depth: 1,
                            text: String::new(),
                        });
                    }
                }
                Event::Empty(e) => {
                    if capture.is_none()
                        && let Some(field) = item.wanted(&ns, e.local_name().as_ref())
                    {
                        item.store(field, String::new());
                    }
                }
                Event::Text(e) => {
                    if let Some(capture) = &mut capture {
                        capture.text.push_str(&reader.decoder().decode(&e)?);
                    }
                }
                Event::GeneralRef(e) => {
                    if let Some(capture) = &mut capture {
                        let entity = reader.decoder().decode(&e)?;
                        capture.text.push_str(&decode_entity(&entity));
                    }
                }
                Event::CData(e) => {
                    if let Some(capture) = &mut capture {
                        capture.text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(_) => {
                    if let Some(open) = &mut capture {
                        open.depth -= 1;
                    }
                    if capture.as_ref().is_some_and(|open| open.depth == 0)
                        && let Some(done) = capture.take()
                    {
                        item.store(done.field, done.text);
                    }
                }
                Event::Eof => break,
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
        }

        Ok(item)
    }

    /// Field `local_name` maps to, if it is still unset.
    fn wanted(&self, ns: &ResolveResult<'_>, local_name: &[u8]) -> Option<Field> {
        if *ns != ResolveResult::Bound(Namespace(ITEM_NAMESPACE)) {
            return None;
        }
        match local_name {
            b"subject" if self.subject.is_none() => Some(Field::Subject),
            b"body" if self.body.is_none() => Some(Field::Body),
            _ => None,
        }
    }

    fn store(&mut self, field: Field, text: String) {
        let slot = match field {
            Field::Subject => &mut self.subject,
            Field::Body => &mut self.body,
        };
        slot.get_or_insert(text);
    }
}

/// Decode an entity reference name to its character value.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = match s.strip_prefix("#x").or_else(|| s.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => s[1..].parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_item() {
        let xml = r#"<?xml version="1.0"?>
<item xmlns="http://www.piedey.co.jp/ns/magsite1/column">
  <subject>Rust &amp; MagML</subject>
  <body>$$* bold$$!
line two</body>
</item>"#;
        let item = Item::parse(xml).unwrap();
        assert_eq!(item.subject.as_deref(), Some("Rust & MagML"));
        assert_eq!(item.body.as_deref(), Some("$$* bold$$!\nline two"));
    }

    #[test]
    fn test_prefixed_namespace_and_cdata() {
        let xml = r#"<c:item xmlns:c="http://www.piedey.co.jp/ns/magsite1/column">
<c:body><![CDATA[a < b]]>&#x41;</c:body></c:item>"#;
        let item = Item::parse(xml).unwrap();
        assert_eq!(item.subject, None);
        assert_eq!(item.body.as_deref(), Some("a < bA"));
    }

    #[test]
    fn test_other_namespaces_are_ignored() {
        let xml = r#"<item xmlns:c="http://www.piedey.co.jp/ns/magsite1/column">
<subject>plain</subject><c:subject>first</c:subject><c:subject>second</c:subject>
</item>"#;
        let item = Item::parse(xml).unwrap();
        assert_eq!(item.subject.as_deref(), Some("first"));
    }

    #[test]
    fn test_nested_text_is_collected() {
        let xml = r#"<item xmlns="http://www.piedey.co.jp/ns/magsite1/column">
<body>one<span xmlns="">two</span>three</body><subject/></item>"#;
        let item = Item::parse(xml).unwrap();
        assert_eq!(item.body.as_deref(), Some("onetwothree"));
        assert_eq!(item.subject.as_deref(), Some(""));
    }

    #[test]
    fn test_malformed_item() {
        assert!(Item::parse("<item><body></item>").is_err());
    }
}

//! Well-formedness check for raw XHTML fragments.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// Why a fragment is not well-formed XML.
#[derive(Debug, thiserror::Error)]
pub(crate) enum FragmentError {
    #[error("{0}")]
    Xml(#[from] quick_xml::Error),

    #[error("{0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("{0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    #[error("invalid attribute value: {0}")]
    AttributeValue(String),

    #[error("reference to undefined entity &{0};")]
    UndefinedEntity(String),

    #[error("end tag </{0}> does not match any open element")]
    UnexpectedEnd(String),

    #[error("element <{0}> is not closed")]
    Unclosed(String),

    #[error("content after the root element")]
    TrailingContent,

    #[error("unexpected XML or document type declaration")]
    Declaration,
}

/// Check that `fragment` parses as XML content inside a single `div`.
pub(crate) fn check_well_formed(fragment: &str) -> Result<(), FragmentError> {
    let wrapped = format!("<div>{fragment}</div>");
    let mut reader = Reader::from_str(&wrapped);
    reader.config_mut().trim_text(false);

    let mut open: Vec<String> = Vec::new();
    let mut root_closed = false;
    loop {
        let event = reader.read_event()?;
        if root_closed && !is_ignorable_after_root(&event) {
            return Err(FragmentError::TrailingContent);
        }
        match event {
            Event::Start(e) => {
                check_attributes(&e)?;
                open.push(reader.decoder().decode(e.name().as_ref())?.into_owned());
            }
            Event::Empty(e) => check_attributes(&e)?,
            Event::End(e) => {
                let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
                if open.pop().as_deref() != Some(name.as_str()) {
                    return Err(FragmentError::UnexpectedEnd(name));
                }
                root_closed = open.is_empty();
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?;
                if !is_defined_entity(&entity) {
                    return Err(FragmentError::UndefinedEntity(entity.into_owned()));
                }
            }
            Event::Decl(_) | Event::DocType(_) => return Err(FragmentError::Declaration),
            Event::Text(_) | Event::CData(_) | Event::Comment(_) | Event::PI(_) => {}
            Event::Eof => break,
        }
    }

    match open.pop() {
        Some(name) => Err(FragmentError::Unclosed(name)),
        None => Ok(()),
    }
}

fn check_attributes(e: &quick_xml::events::BytesStart<'_>) -> Result<(), FragmentError> {
    for attr in e.attributes() {
        let attr = attr?;
        attr.unescape_value()
            .map_err(|err| FragmentError::AttributeValue(err.to_string()))?;
    }
    Ok(())
}

/// After the root closes only whitespace, comments and processing instructions may follow.
fn is_ignorable_after_root(event: &Event<'_>) -> bool {
    match event {
        Event::Text(t) => t.iter().all(u8::is_ascii_whitespace),
        Event::Comment(_) | Event::PI(_) | Event::Eof => true,
        _ => false,
    }
}

/// The five predefined XML entities and numeric character references.
fn is_defined_entity(entity: &str) -> bool {
    match entity {
        "lt" | "gt" | "amp" | "apos" | "quot" => true,
        s if s.starts_with("#x") || s.starts_with("#X") => u32::from_str_radix(&s[2..], 16)
            .ok()
            .and_then(char::from_u32)
            .is_some(),
        s if s.starts_with('#') => s[1..].parse::<u32>().ok().and_then(char::from_u32).is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_fragment() {
        assert!(check_well_formed("<p class=\"x\">a <b>b</b></p>\n<br />\n").is_ok());
    }

    #[test]
    fn test_accepts_text_only() {
        assert!(check_well_formed("just text\n").is_ok());
        assert!(check_well_formed("").is_ok());
    }

    #[test]
    fn test_accepts_predefined_and_numeric_entities() {
        assert!(check_well_formed("&lt;&amp;&#160;&#x3000;").is_ok());
    }

    #[test]
    fn test_rejects_undefined_entity() {
        let err = check_well_formed("a&nbsp;b").unwrap_err();
        assert!(matches!(err, FragmentError::UndefinedEntity(ref e) if e == "nbsp"));
    }

    #[test]
    fn test_rejects_unclosed_element() {
        assert!(check_well_formed("<p>open").is_err());
    }

    #[test]
    fn test_rejects_mismatched_end() {
        assert!(check_well_formed("<b><i>x</b></i>").is_err());
    }

    #[test]
    fn test_rejects_second_root() {
        assert!(check_well_formed("a</div><div>b").is_err());
    }

    #[test]
    fn test_rejects_duplicate_attribute() {
        assert!(check_well_formed("<p a=\"1\" a=\"2\"></p>").is_err());
    }
}

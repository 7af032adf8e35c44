//! The fixed MagML directive vocabulary.
//!
//! A `$$name` whose name belongs to neither set is reported as an unknown
//! directive by the parser.

/// Directives that act on document structure. They must stand alone on their
/// logical line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockDirective {
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    UnorderedList,
    OrderedList,
    Indent,
    Pre,
    Table,
    /// Retired.
    Pm,
    /// Retired.
    Fl,
    Category,
    Video,
    ContentTree,
    BlockQuote,
    Map,
    MapPoint,
    MapPolyline,
    LargeText,
    /// Retired.
    Fhide,
    Asin,
    RepresentAsin,
    Isbn,
    VendorCode,
}

impl BlockDirective {
    /// Every block directive.
    pub const ALL: &'static [Self] = &[
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::Heading4,
        Self::Heading5,
        Self::UnorderedList,
        Self::OrderedList,
        Self::Indent,
        Self::Pre,
        Self::Table,
        Self::Pm,
        Self::Fl,
        Self::Category,
        Self::Video,
        Self::ContentTree,
        Self::BlockQuote,
        Self::Map,
        Self::MapPoint,
        Self::MapPolyline,
        Self::LargeText,
        Self::Fhide,
        Self::Asin,
        Self::RepresentAsin,
        Self::Isbn,
        Self::VendorCode,
    ];

    /// Look up a directive by its source name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let directive = match name {
            "1" => Self::Heading1,
            "2" => Self::Heading2,
            "3" => Self::Heading3,
            "4" => Self::Heading4,
            "5" => Self::Heading5,
            "ul" => Self::UnorderedList,
            "ol" => Self::OrderedList,
            ">" => Self::Indent,
            "pre" => Self::Pre,
            "table" => Self::Table,
            "pm" => Self::Pm,
            "fl" => Self::Fl,
            "cat" => Self::Category,
            "xyt" => Self::Video,
            "ctree" => Self::ContentTree,
            "bq" => Self::BlockQuote,
            "gm" => Self::Map,
            "gmp" => Self::MapPoint,
            "gml" => Self::MapPolyline,
            "ltx" => Self::LargeText,
            "fhide" => Self::Fhide,
            "asin" => Self::Asin,
            "asinr" => Self::RepresentAsin,
            "isbn" => Self::Isbn,
            "vc" => Self::VendorCode,
            _ => return None,
        };
        Some(directive)
    }

    /// Source name, as written after `$$`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Heading1 => "1",
            Self::Heading2 => "2",
            Self::Heading3 => "3",
            Self::Heading4 => "4",
            Self::Heading5 => "5",
            Self::UnorderedList => "ul",
            Self::OrderedList => "ol",
            Self::Indent => ">",
            Self::Pre => "pre",
            Self::Table => "table",
            Self::Pm => "pm",
            Self::Fl => "fl",
            Self::Category => "cat",
            Self::Video => "xyt",
            Self::ContentTree => "ctree",
            Self::BlockQuote => "bq",
            Self::Map => "gm",
            Self::MapPoint => "gmp",
            Self::MapPolyline => "gml",
            Self::LargeText => "ltx",
            Self::Fhide => "fhide",
            Self::Asin => "asin",
            Self::RepresentAsin => "asinr",
            Self::Isbn => "isbn",
            Self::VendorCode => "vc",
        }
    }

    /// Heading level in the output (`$$1` is `h2`).
    #[must_use]
    pub fn heading_level(self) -> Option<u8> {
        match self {
            Self::Heading1 => Some(2),
            Self::Heading2 => Some(3),
            Self::Heading3 => Some(4),
            Self::Heading4 => Some(5),
            Self::Heading5 => Some(6),
            _ => None,
        }
    }
}

/// Directives rendered in place within a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InlineDirective {
    Underline,
    Strong,
    Emphasis,
    Strike,
    Anchor,
    ExternalAnchor,
    Image,
    Wikipedia,
    ContentReference,
    Hide,
    Quote,
    Color,
    Flash,
    SuperQuiz,
}

impl InlineDirective {
    /// Every inline directive.
    pub const ALL: &'static [Self] = &[
        Self::Underline,
        Self::Strong,
        Self::Emphasis,
        Self::Strike,
        Self::Anchor,
        Self::ExternalAnchor,
        Self::Image,
        Self::Wikipedia,
        Self::ContentReference,
        Self::Hide,
        Self::Quote,
        Self::Color,
        Self::Flash,
        Self::SuperQuiz,
    ];

    /// Look up a directive by its source name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let directive = match name {
            "_" => Self::Underline,
            "*" => Self::Strong,
            "/" => Self::Emphasis,
            "-" => Self::Strike,
            "a" => Self::Anchor,
            "ae" => Self::ExternalAnchor,
            "img" => Self::Image,
            "wikipedia" => Self::Wikipedia,
            "ref" => Self::ContentReference,
            "xhide" => Self::Hide,
            "q" => Self::Quote,
            "cl" => Self::Color,
            "flash" => Self::Flash,
            "superq" => Self::SuperQuiz,
            _ => return None,
        };
        Some(directive)
    }

    /// Source name, as written after `$$`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Underline => "_",
            Self::Strong => "*",
            Self::Emphasis => "/",
            Self::Strike => "-",
            Self::Anchor => "a",
            Self::ExternalAnchor => "ae",
            Self::Image => "img",
            Self::Wikipedia => "wikipedia",
            Self::ContentReference => "ref",
            Self::Hide => "xhide",
            Self::Quote => "q",
            Self::Color => "cl",
            Self::Flash => "flash",
            Self::SuperQuiz => "superq",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for &directive in BlockDirective::ALL {
            assert_eq!(BlockDirective::from_name(directive.name()), Some(directive));
        }
        for &directive in InlineDirective::ALL {
            assert_eq!(InlineDirective::from_name(directive.name()), Some(directive));
        }
    }

    #[test]
    fn test_sets_are_disjoint() {
        for &directive in BlockDirective::ALL {
            assert_eq!(InlineDirective::from_name(directive.name()), None);
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(BlockDirective::from_name("xhtml"), None);
        assert_eq!(InlineDirective::from_name("B"), None);
        assert_eq!(InlineDirective::from_name(""), None);
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(BlockDirective::Heading1.heading_level(), Some(2));
        assert_eq!(BlockDirective::Heading5.heading_level(), Some(6));
        assert_eq!(BlockDirective::Table.heading_level(), None);
    }
}

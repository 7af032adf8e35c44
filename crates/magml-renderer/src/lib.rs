//! MagML to XHTML fragment compiler.
//!
//! MagML is a line-oriented wiki markup. Directives start with `$$name` and
//! end with `$$!` or at the end of the line. This crate turns MagML source
//! into an XHTML fragment wrapped in a single `div`, together with the
//! categories and product ids the source declares.
//!
//! # Architecture
//!
//! - [`Tokenizer`]: splits source into [`Token`]s
//! - [`parse`]: builds a normalized [`Node`] tree of logical lines
//! - the generator: walks the tree and writes through an [`OutputSink`]
//! - [`Compiler`]: ties the stages together and owns map id allocation
//!
//! Compilation never fails. Malformed input produces
//! `<span class="error">` diagnostics in the output and sets
//! [`CompileResult::encountered_error`].
//!
//! # Example
//!
//! ```
//! use magml_renderer::compile;
//!
//! let result = compile("$$ul\nfirst\nsecond\n$$ul", false, false);
//! assert_eq!(
//!     result.xhtml,
//!     "<div><ul><li>first</li>\n<li>second</li>\n</ul>\n</div>\n"
//! );
//! assert!(!result.encountered_error);
//! ```

mod compile;
mod directive;
mod escape;
mod fragment;
mod generator;
mod node;
mod parser;
mod resolver;
mod sink;
mod token;
mod tokenizer;

pub use compile::{CompileOptions, CompileResult, Compiler, compile};
pub use directive::{BlockDirective, InlineDirective};
pub use escape::{escape_html, escape_text};
pub use node::{Node, NodeKind};
pub use parser::{normalize, parse};
pub use resolver::{ContentIndex, ContentItem, ContentResolver, NoContent};
pub use sink::{OutputSink, XhtmlWriter};
pub use token::Token;
pub use tokenizer::{Tokenizer, is_space};

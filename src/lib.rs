//! An external scanner for frontmatter blocks and string literals, in the shape parser runtimes
//! such as tree-sitter expect.
//!
//! The [`Scanner`] is driven through the [`Lexer`] trait and carries nothing between calls except
//! its stack of open literals, which hosts persist with [`Scanner::serialize`].
//! [`driver::tokenize`] is a small end-to-end host.

pub mod driver;
pub mod lexer;
pub mod logging;
pub mod scanner;

pub use hardlight_base::{
	Delimiter, DelimiterStack, Modifiers, StateError, TokenSet, TokenType, SERIALIZED_CAPACITY,
};

pub use lexer::{Lexer, SourceLexer};
pub use scanner::{ScanRequest, Scanner};

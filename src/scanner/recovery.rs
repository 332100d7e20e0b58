//! Whitespace skipping ahead of a string start.
//!
//! During error recovery the host asks for every token kind at once, and the scanner ends up
//! hunting for a quote character through whatever blank space follows.

use crate::lexer::Lexer;

/// Skips blanks and line breaks as insignificant trivia.
pub(super) fn skip_whitespace<L: Lexer + ?Sized>(lexer: &mut L) {
	while matches!(lexer.lookahead(), Some(' ' | '\t' | '\n' | '\r')) {
		lexer.advance(true);
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	use crate::lexer::SourceLexer;

	#[test]
	fn skips_blanks_and_line_breaks() {
		let mut lexer = SourceLexer::new(" \t\r\n x");
		skip_whitespace(&mut lexer);
		assert_eq!(Some('x'), lexer.lookahead());
		assert_eq!(5, lexer.token_start());
	}

	#[test]
	fn stops_at_other_whitespace() {
		// only ASCII blanks are trivia here
		let mut lexer = SourceLexer::new("\u{a0}x");
		skip_whitespace(&mut lexer);
		assert_eq!(0, lexer.cursor());
	}

	#[test]
	fn end_of_input() {
		let mut lexer = SourceLexer::new("  ");
		skip_whitespace(&mut lexer);
		assert!(lexer.eof());
		assert_eq!(2..2, lexer.token_range());
	}
}

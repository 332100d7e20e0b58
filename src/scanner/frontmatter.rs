//! The leading document block, fenced by lines of exactly three dashes.

use hardlight_base::TokenType;

use super::{Miss, ScanResult};
use crate::lexer::{Lexer, SourceLexer};

const FENCE_LEN: usize = 3;

/// Scans every line up to (but excluding) the next fence line.
///
/// The lexer is expected to sit just past the opening fence. On success the scan cursor has also
/// consumed the closing fence and its terminator, although the committed token does not include
/// them.
pub(super) fn scan<L: Lexer + ?Sized>(lexer: &mut L) -> ScanResult {
	loop {
		if lexer.lookahead() == Some('-') {
			// the fence isn't part of the token, so it can be highlighted on its own
			lexer.mark_end();
			if at_fence(lexer) {
				return Ok(TokenType::Frontmatter);
			}
		}

		// not a fence; this line is all frontmatter
		while !matches!(lexer.lookahead(), None | Some('\n' | '\r')) {
			lexer.advance(false);
		}
		if !consume_line_break(lexer) {
			return Err(Miss::NoMatch);
		}
	}
}

/// Returns the byte length of the fence line (terminator included) at the very start of `src`,
/// if there is one.
pub(crate) fn fence_len(src: &str) -> Option<usize> {
	let mut lexer = SourceLexer::new(src);
	at_fence(&mut lexer).then(|| lexer.cursor())
}

/// Consumes a run of dashes, and if there were exactly three, any trailing blanks and the line
/// break. Returns `true` if that made up a whole fence line.
fn at_fence<L: Lexer + ?Sized>(lexer: &mut L) -> bool {
	let mut dashes = 0usize;
	while lexer.lookahead() == Some('-') {
		lexer.advance(false);
		dashes += 1;
	}
	if dashes != FENCE_LEN {
		return false;
	}

	while matches!(lexer.lookahead(), Some(' ' | '\t')) {
		lexer.advance(false);
	}
	consume_line_break(lexer)
}

/// Consumes one `\n`, `\r\n` or lone `\r`.
fn consume_line_break<L: Lexer + ?Sized>(lexer: &mut L) -> bool {
	match lexer.lookahead() {
		Some('\r') => {
			lexer.advance(false);
			if lexer.lookahead() == Some('\n') {
				lexer.advance(false);
			}
			true
		},
		Some('\n') => {
			lexer.advance(false);
			true
		},
		_ => false,
	}
}

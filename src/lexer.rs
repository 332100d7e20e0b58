//! The character source a scanner is driven through.
//!
//! A [`Lexer`] keeps two positions: the scan cursor, which only ever moves forward as characters
//! are looked at, and the committed token end, which only moves when the scanner calls
//! [`Lexer::mark_end`]. A scanner can therefore look ahead (say, for two more quote characters)
//! without committing to them.

use std::ops::Range;

/// Character source exposed by a host to the scanner.
pub trait Lexer {
	/// The character under the cursor, or `None` at end of input.
	fn lookahead(&self) -> Option<char>;

	/// Moves the cursor past the lookahead character.
	///
	/// With `skip` set, the character is insignificant leading trivia, and the token start moves
	/// past it too.
	fn advance(&mut self, skip: bool);

	/// Commits the current cursor position as the end of the token being scanned.
	fn mark_end(&mut self);

	/// Returns `true` once the cursor has reached end of input.
	fn eof(&self) -> bool {
		self.lookahead().is_none()
	}
}

impl<L: Lexer + ?Sized> Lexer for &mut L {
	#[inline]
	fn lookahead(&self) -> Option<char> {
		(**self).lookahead()
	}

	#[inline]
	fn advance(&mut self, skip: bool) {
		(**self).advance(skip)
	}

	#[inline]
	fn mark_end(&mut self) {
		(**self).mark_end()
	}

	#[inline]
	fn eof(&self) -> bool {
		(**self).eof()
	}
}


/// A [`Lexer`] over an in-memory string.
///
/// All offsets are byte offsets into the source.
#[derive(Debug, Clone)]
pub struct SourceLexer<'a> {
	src: &'a str,
	start: usize,
	cursor: usize,
	end: Option<usize>,
}

impl<'a> SourceLexer<'a> {
	/// Starts scanning at the beginning of `src`.
	#[inline]
	pub fn new(src: &'a str) -> Self {
		Self::at(src, 0)
	}

	/// Starts scanning at byte `offset`.
	///
	/// Offsets past the end, or inside a multi-byte character, are moved back to the closest
	/// character boundary.
	pub fn at(src: &'a str, offset: usize) -> Self {
		let mut offset = offset.min(src.len());
		while !src.is_char_boundary(offset) {
			offset -= 1;
		}

		Self {
			src,
			start: offset,
			cursor: offset,
			end: None,
		}
	}

	/// The scan cursor.
	#[inline]
	pub fn cursor(&self) -> usize {
		self.cursor
	}

	/// Where the current token starts, after any skipped trivia.
	#[inline]
	pub fn token_start(&self) -> usize {
		self.start
	}

	/// Where the current token ends: the last committed position, or the cursor if nothing was
	/// ever committed.
	pub fn token_end(&self) -> usize {
		self.end.unwrap_or(self.cursor).max(self.start)
	}

	#[inline]
	pub fn token_range(&self) -> Range<usize> {
		self.token_start()..self.token_end()
	}

	/// The source text of the current token.
	pub fn text(&self) -> &'a str {
		&self.src[self.token_range()]
	}
}

impl<'a> Lexer for SourceLexer<'a> {
	fn lookahead(&self) -> Option<char> {
		self.src[self.cursor..].chars().next()
	}

	fn advance(&mut self, skip: bool) {
		let Some(ch) = self.lookahead() else {
			return;
		};
		self.cursor += ch.len_utf8();
		if skip {
			self.start = self.cursor;
		}
	}

	fn mark_end(&mut self) {
		self.end = Some(self.cursor);
	}

	fn eof(&self) -> bool {
		self.cursor >= self.src.len()
	}
}

//! String literal start and content scanning.

use ascii::AsciiChar;
use hardlight_base::{Delimiter, Modifiers, TokenType};

use super::{Miss, ScanResult};
use crate::lexer::Lexer;

/// Scans the opening quote (or three of them) of a literal.
pub(super) fn scan_start<L: Lexer + ?Sized>(lexer: &mut L, modifiers: Modifiers)
-> ScanResult<Delimiter> {
	let mut delimiter = lexer.lookahead()
		.and_then(Delimiter::for_char)
		.ok_or(Miss::NoMatch)?;
	lexer.advance(false);
	lexer.mark_end();

	let end = delimiter.end_character();
	if end != AsciiChar::Grave {
		if probe(lexer, end.as_char(), 2) == 2 {
			lexer.mark_end();
			delimiter = delimiter.with_triple();
		}
		// otherwise the probed quotes are left for the next scan to close the literal with
	}

	Ok(delimiter.with_modifiers(modifiers))
}

/// Scans literal content up to the next point the grammar handles itself, such as an escape
/// sequence or the end of the literal.
///
/// Returns [`TokenType::StringEnd`] only for a terminator with no content ahead of it, so content
/// and terminator are always separate tokens.
pub(super) fn scan_content<L: Lexer + ?Sized>(lexer: &mut L, delimiter: Delimiter) -> ScanResult {
	let end = delimiter.end_character().as_char();
	let mut has_content = false;

	while let Some(ch) = lexer.lookahead() {
		match ch {
			'{' | '}' if delimiter.is_format() => {
				lexer.mark_end();
				return content_or_miss(has_content);
			},

			'\\' if delimiter.is_raw() => {
				lexer.advance(false);
				// protects the end character but stays part of the content
				if matches!(lexer.lookahead(), Some(next) if next == end || next == '\\') {
					lexer.advance(false);
				}
				has_content = true;
			},

			'\\' if delimiter.is_bytes() => {
				lexer.mark_end();
				lexer.advance(false);
				match lexer.lookahead() {
					// unicode escapes mean nothing in a bytes literal
					Some('N' | 'u' | 'U') => {
						lexer.advance(false);
						has_content = true;
					},
					_ => return content_or_miss(has_content),
				}
			},

			'\\' => {
				lexer.mark_end();
				return content_or_miss(has_content);
			},

			_ if ch == end && delimiter.is_triple() => {
				lexer.mark_end();
				if probe(lexer, end, 3) == 3 {
					if has_content {
						return Ok(TokenType::StringContent);
					}
					lexer.mark_end();
					return Ok(TokenType::StringEnd);
				}
				// one or two end characters are ordinary content
				has_content = true;
			},

			_ if ch == end => {
				if has_content {
					lexer.mark_end();
					return Ok(TokenType::StringContent);
				}
				lexer.advance(false);
				lexer.mark_end();
				return Ok(TokenType::StringEnd);
			},

			'\n' if has_content && !delimiter.is_triple() => return Err(Miss::Unterminated),

			_ => {
				lexer.advance(false);
				has_content = true;
			},
		}
	}

	Err(Miss::Unterminated)
}

#[inline]
fn content_or_miss(has_content: bool) -> ScanResult {
	if has_content {
		Ok(TokenType::StringContent)
	} else {
		Err(Miss::NoMatch)
	}
}

/// Consumes up to `max` consecutive `end` characters, returning how many there were.
fn probe<L: Lexer + ?Sized>(lexer: &mut L, end: char, max: usize) -> usize {
	let mut count = 0;
	while count < max && lexer.lookahead() == Some(end) {
		lexer.advance(false);
		count += 1;
	}
	count
}


#[cfg(test)]
mod tests {
	use super::*;

	use crate::lexer::SourceLexer;

	fn start(src: &str, modifiers: Modifiers) -> Option<(Delimiter, &str)> {
		let mut lexer = SourceLexer::new(src);
		let delimiter = scan_start(&mut lexer, modifiers).ok()?;
		Some((delimiter, lexer.text()))
	}

	fn content(src: &str, delimiter: Delimiter) -> Result<(TokenType, &str), Miss> {
		let mut lexer = SourceLexer::new(src);
		let kind = scan_content(&mut lexer, delimiter)?;
		Ok((kind, lexer.text()))
	}

	fn quote(ch: char) -> Delimiter {
		Delimiter::for_char(ch).unwrap()
	}

	#[test]
	fn start_shapes() {
		assert_eq!(Some((quote('"'), "\"")), start("\"a", Modifiers::NONE));
		assert_eq!(Some((quote('"'), "\"")), start("\"\"", Modifiers::NONE));
		assert_eq!(Some((quote('"').with_triple(), "\"\"\"")), start("\"\"\"\"", Modifiers::NONE));
		assert_eq!(Some((quote('`'), "`")), start("```", Modifiers::NONE));
		assert_eq!(None, start("a'", Modifiers::NONE));

		let (delimiter, _) = start("'''", Modifiers::FORMAT).unwrap();
		assert!(delimiter.is_triple());
		assert!(delimiter.is_format());
	}

	#[test]
	fn content_stops_before_terminator() {
		assert_eq!(Ok((TokenType::StringContent, "abc")), content("abc'", quote('\'')));
		assert_eq!(Ok((TokenType::StringEnd, "'")), content("'rest", quote('\'')));
	}

	#[test]
	fn blank_line_start_is_content() {
		// a newline only ends a single-line literal once there is content ahead of it
		assert_eq!(Ok((TokenType::StringContent, "\nab")), content("\nab'", quote('\'')));
		assert_eq!(Err(Miss::Unterminated), content("ab\n'", quote('\'')));
	}

	#[test]
	fn triple_terminator_after_stray_quotes() {
		let triple = quote('\'').with_triple();
		// the first three quotes close the literal
		assert_eq!(Ok((TokenType::StringContent, "a")), content("a'''''", triple));
		assert_eq!(Ok((TokenType::StringEnd, "'''")), content("''''", triple));
		assert_eq!(Err(Miss::Unterminated), content("a''", triple));
	}

	#[test]
	fn raw_format_braces() {
		let delimiter = quote('"').with_modifiers(Modifiers::RAW | Modifiers::FORMAT);
		assert_eq!(Ok((TokenType::StringContent, "\\d")), content("\\d{", delimiter));
		assert_eq!(Err(Miss::NoMatch), content("}", delimiter));
	}

	#[test]
	fn probe_stops_at_max() {
		let mut lexer = SourceLexer::new("''''");
		assert_eq!(3, probe(&mut lexer, '\'', 3));
		assert_eq!(3, lexer.cursor());
		assert_eq!(1, probe(&mut lexer, '\'', 3));
	}
}

//! A small host that drives the [`Scanner`] over a whole document.
//!
//! Real hosts are parser runtimes that know the surrounding grammar. This one only knows enough
//! of one (literal prefixes, escapes, interpolation braces) to split a document into highlight
//! tokens, so the scanner can be exercised end to end.

use std::collections::VecDeque;
use std::fmt;
use std::ops::Range;

use hardlight_base::{Delimiter, Modifiers, SerializedStack, TokenSet, TokenType};
use tracing::{debug, trace};

use crate::lexer::SourceLexer;
use crate::scanner::{fence_len, ScanRequest, Scanner};

const TARGET: &str = crate::logging::DRIVER;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	/// A `---` line opening or closing the frontmatter block.
	FrontmatterFence,
	Frontmatter,
	/// Anything outside a literal.
	Text,
	/// Modifier letters directly before a literal's opening quote.
	StringPrefix,
	StringStart,
	StringContent,
	StringEnd,
	/// A backslash and the character after it, or a doubled brace in a format literal.
	Escape,
	InterpolationStart,
	InterpolationEnd,
	Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	pub kind: TokenKind,
	/// Byte range in the source.
	pub span: Range<usize>,
}

impl Token {
	#[inline]
	pub fn text<'a>(&self, src: &'a str) -> &'a str {
		&src[self.span.clone()]
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}..{} {:?}", self.span.start, self.span.end, self.kind)
	}
}

/// Splits a whole document into tokens.
pub fn tokenize(src: &str) -> Vec<Token> {
	Tokenizer::new(src).collect()
}

#[derive(Debug)]
enum Frame {
	Literal {
		delimiter: Delimiter,
		/// Scanner state from before the literal was opened.
		restore: SerializedStack,
	},
	Interpolation {
		/// Unmatched `{` inside the embedded code.
		braces: usize,
	},
}

/// Iterator over the tokens of a document.
///
/// The scanner is persisted and restored around every scan, the way a parser runtime would.
#[derive(Debug)]
pub struct Tokenizer<'a> {
	src: &'a str,
	pos: usize,
	scanner: Scanner,
	state: SerializedStack,
	frames: Vec<Frame>,
	/// Tokens not yet handed out, each with the scanner state that was current when it ended.
	pending: VecDeque<(Token, SerializedStack)>,
	started: bool,
}

impl<'a> Tokenizer<'a> {
	pub fn new(src: &'a str) -> Self {
		let scanner = Scanner::new();
		Self {
			src,
			pos: 0,
			state: scanner.snapshot(),
			scanner,
			frames: Vec::new(),
			pending: VecDeque::new(),
			started: false,
		}
	}

	/// The scanner, as of the most recent scan.
	#[inline]
	pub fn scanner(&self) -> &Scanner {
		&self.scanner
	}

	/// Returns the next token along with the persisted scanner state as of that token.
	pub fn next_with_state(&mut self) -> Option<(Token, SerializedStack)> {
		loop {
			if let Some(entry) = self.pending.pop_front() {
				return Some(entry);
			}
			if !self.step() {
				return None;
			}
		}
	}

	fn emit(&mut self, kind: TokenKind, span: Range<usize>) {
		let state = self.state.clone();
		self.emit_with_state(kind, span, state);
	}

	fn emit_with_state(&mut self, kind: TokenKind, span: Range<usize>, state: SerializedStack) {
		if span.is_empty() {
			return;
		}
		trace!(target: TARGET, ?kind, ?span, "token");
		self.pending.push_back((Token { kind, span }, state));
	}

	/// Runs one scan at `offset` with the scanner restored from the persisted state, and persists
	/// it again afterwards.
	fn scan(&mut self, offset: usize, request: impl Into<ScanRequest>)
	-> Option<(TokenType, SourceLexer<'a>)> {
		let mut lexer = SourceLexer::at(self.src, offset);
		self.scanner.deserialize(&self.state);
		let kind = self.scanner.scan(&mut lexer, request)?;
		self.state = self.scanner.snapshot();
		Some((kind, lexer))
	}

	fn rest(&self) -> &'a str {
		&self.src[self.pos..]
	}

	fn frontmatter(&mut self) {
		let Some(fence) = fence_len(self.src) else {
			return;
		};

		match self.scan(fence, TokenType::Frontmatter) {
			Some((_, lexer)) => {
				debug!(target: TARGET, range = ?lexer.token_range(), "found frontmatter");
				self.emit(TokenKind::FrontmatterFence, 0..fence);
				self.emit(TokenKind::Frontmatter, lexer.token_range());
				self.emit(TokenKind::FrontmatterFence, lexer.token_end()..lexer.cursor());
				self.pos = lexer.cursor();
			},
			None => debug!(target: TARGET, "frontmatter block is never closed"),
		}
	}

	/// Produces the next batch of tokens. Returns `false` at end of input.
	fn step(&mut self) -> bool {
		if !self.started {
			self.started = true;
			self.frontmatter();
			if !self.pending.is_empty() {
				return true;
			}
		}

		if self.pos >= self.src.len() {
			self.unwind();
			return !self.pending.is_empty();
		}

		match self.frames.last() {
			Some(&Frame::Literal { delimiter, .. }) => self.literal_step(delimiter),
			_ => self.code_step(),
		}
		true
	}

	fn literal_step(&mut self, delimiter: Delimiter) {
		if let Some((kind, lexer)) = self.scan(self.pos, TokenSet::of(TokenType::StringContent)) {
			let range = lexer.token_range();
			self.pos = range.end;
			if kind == TokenType::StringEnd {
				self.emit(TokenKind::StringEnd, range);
				self.frames.pop();
			} else {
				self.emit(TokenKind::StringContent, range);
			}
			return;
		}

		// the scanner stopped at something the grammar handles
		let rest = self.rest();
		let mut chars = rest.chars();
		let start = self.pos;
		match (chars.next(), chars.next()) {
			(Some('\\'), next) => {
				let len = 1 + next.map_or(0, char::len_utf8);
				self.emit(TokenKind::Escape, start..start + len);
				self.pos += len;
			},
			(Some('{'), Some('{')) | (Some('}'), Some('}')) if delimiter.is_format() => {
				self.emit(TokenKind::Escape, start..start + 2);
				self.pos += 2;
			},
			(Some('{'), _) if delimiter.is_format() => {
				self.emit(TokenKind::InterpolationStart, start..start + 1);
				self.frames.push(Frame::Interpolation { braces: 0 });
				self.pos += 1;
			},
			(Some('}'), _) if delimiter.is_format() => {
				self.emit(TokenKind::Error, start..start + 1);
				self.pos += 1;
			},
			_ => self.unterminated(),
		}
	}

	/// Gives up on the innermost literal, flagging the rest of the line.
	fn unterminated(&mut self) {
		let line_end = self.rest().find('\n').map_or(self.src.len(), |i| self.pos + i);
		debug!(target: TARGET, at = self.pos, "unterminated string literal");

		if let Some(Frame::Literal { restore, .. }) = self.frames.pop() {
			self.restore(restore);
		}
		self.emit(TokenKind::Error, self.pos..line_end);
		self.pos = line_end;
	}

	/// Closes everything still open at end of input. Leaves a zero-width error token at the end if
	/// any literal was open.
	fn unwind(&mut self) {
		let mut outermost = None;
		while let Some(frame) = self.frames.pop() {
			if let Frame::Literal { restore, .. } = frame {
				outermost = Some(restore);
			}
		}

		if let Some(restore) = outermost {
			debug!(target: TARGET, "string literal open at end of input");
			self.restore(restore);
			let end = self.src.len();
			let token = Token { kind: TokenKind::Error, span: end..end };
			self.pending.push_back((token, self.state.clone()));
		}
	}

	fn restore(&mut self, state: SerializedStack) {
		self.scanner.deserialize(&state);
		self.state = state;
	}

	fn code_step(&mut self) {
		let start = self.pos;
		let mut end = start;

		for (offset, ch) in self.rest().char_indices() {
			let at = start + offset;
			match ch {
				'\'' | '"' | '`' => {
					let prefix_start = prefix_start(self.src, start, at);
					match Modifiers::from_prefix(&self.src[prefix_start..at]) {
						Some(modifiers) => {
							self.emit(TokenKind::Text, start..prefix_start);
							self.open_literal(prefix_start, at, modifiers);
						},
						None => {
							self.emit(TokenKind::Text, start..at);
							self.open_literal(at, at, Modifiers::NONE);
						},
					}
					return;
				},
				'{' | '}' => if let Some(Frame::Interpolation { braces }) = self.frames.last_mut() {
					if ch == '{' {
						*braces += 1;
					} else if *braces > 0 {
						*braces -= 1;
					} else {
						self.emit(TokenKind::Text, start..at);
						self.emit(TokenKind::InterpolationEnd, at..at + 1);
						self.frames.pop();
						self.pos = at + 1;
						return;
					}
				},
				_ => {},
			}
			end = at + ch.len_utf8();
		}

		self.emit(TokenKind::Text, start..end);
		self.pos = end;
	}

	fn open_literal(&mut self, prefix_start: usize, quote: usize, modifiers: Modifiers) {
		let restore = self.state.clone();
		let request = ScanRequest::new(TokenSet::of(TokenType::StringStart))
			.with_modifiers(modifiers);

		let opened = self.scan(quote, request)
			.and_then(|(_, lexer)| Some((lexer.token_range(), self.scanner.delimiters().top()?)));

		match opened {
			Some((range, delimiter)) => {
				// the prefix precedes the literal, so it belongs to the state before it
				self.emit_with_state(TokenKind::StringPrefix, prefix_start..quote, restore.clone());
				self.emit(TokenKind::StringStart, range.clone());
				self.frames.push(Frame::Literal { delimiter, restore });
				self.pos = range.end;
			},
			None => {
				// too deeply nested to track
				let len = self.rest()[quote - self.pos..].chars().next().map_or(1, char::len_utf8);
				self.emit(TokenKind::Text, prefix_start..quote);
				self.emit(TokenKind::Error, quote..quote + len);
				self.pos = quote + len;
			},
		}
	}
}

impl<'a> Iterator for Tokenizer<'a> {
	type Item = Token;

	#[inline]
	fn next(&mut self) -> Option<Token> {
		self.next_with_state().map(|(token, _)| token)
	}
}

fn is_identifier(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_'
}

/// Returns where the identifier run ending at `quote` starts, without going back past `floor`.
fn prefix_start(src: &str, floor: usize, quote: usize) -> usize {
	src[floor..quote]
		.char_indices()
		.rev()
		.take_while(|&(_, ch)| is_identifier(ch))
		.last()
		.map_or(quote, |(offset, _)| floor + offset)
}


#[cfg(test)]
mod tests {
	use super::*;

	use TokenKind::*;

	#[track_caller]
	fn assert_tokens(src: &str, expected: &[(TokenKind, &str)]) {
		let tokens = tokenize(src);
		let got = tokens.iter().map(|t| (t.kind, t.text(src))).collect::<Vec<_>>();
		assert_eq!(expected, &*got, "tokenizing {:?}", src);
	}

	/// Every byte belongs to exactly one token, in order.
	#[track_caller]
	fn assert_covers(src: &str) {
		let mut pos = 0;
		for token in tokenize(src) {
			assert_eq!(pos, token.span.start, "gap before {} in {:?}", token, src);
			pos = token.span.end;
		}
		assert_eq!(src.len(), pos, "tokens of {:?} stop short", src);
	}

	#[test]
	fn plain_literal() {
		assert_tokens("x = \"hi\"\n", &[
			(Text, "x = "), (StringStart, "\""), (StringContent, "hi"), (StringEnd, "\""),
			(Text, "\n"),
		]);
	}

	#[test]
	fn frontmatter_block() {
		assert_tokens("---\ntitle: x\n---\nbody", &[
			(FrontmatterFence, "---\n"), (Frontmatter, "title: x\n"), (FrontmatterFence, "---\n"),
			(Text, "body"),
		]);
	}

	#[test]
	fn empty_frontmatter_block() {
		assert_tokens("---\n---\n", &[(FrontmatterFence, "---\n"), (FrontmatterFence, "---\n")]);
	}

	#[test]
	fn unclosed_frontmatter_is_text() {
		assert_tokens("---\ntitle: 'x'", &[
			(Text, "---\ntitle: "), (StringStart, "'"), (StringContent, "x"), (StringEnd, "'"),
		]);
	}

	#[test]
	fn fences_later_in_the_document_are_text() {
		assert_tokens("a\n---\nb\n---\n", &[(Text, "a\n---\nb\n---\n")]);
	}

	#[test]
	fn prefixes() {
		assert_tokens("rb'\\d'", &[
			(StringPrefix, "rb"), (StringStart, "'"), (StringContent, "\\d"), (StringEnd, "'"),
		]);
		assert_tokens("print(u\"x\")", &[
			(Text, "print("), (StringPrefix, "u"), (StringStart, "\""), (StringContent, "x"),
			(StringEnd, "\""), (Text, ")"),
		]);
		// not a prefix, just an identifier
		assert_tokens("abc\"x\"", &[
			(Text, "abc"), (StringStart, "\""), (StringContent, "x"), (StringEnd, "\""),
		]);
	}

	#[test]
	fn escapes() {
		assert_tokens("'a\\nb\\''", &[
			(StringStart, "'"), (StringContent, "a"), (Escape, "\\n"), (StringContent, "b"),
			(Escape, "\\'"), (StringEnd, "'"),
		]);
		assert_tokens("b\"\\u00e9\\x00\"", &[
			(StringPrefix, "b"), (StringStart, "\""), (StringContent, "\\u00e9"), (Escape, "\\x"),
			(StringContent, "00"), (StringEnd, "\""),
		]);
	}

	#[test]
	fn interpolation() {
		assert_tokens("f\"a{x}b\"", &[
			(StringPrefix, "f"), (StringStart, "\""), (StringContent, "a"),
			(InterpolationStart, "{"), (Text, "x"), (InterpolationEnd, "}"),
			(StringContent, "b"), (StringEnd, "\""),
		]);
	}

	#[test]
	fn doubled_braces() {
		assert_tokens("f'{{x}}'", &[
			(StringPrefix, "f"), (StringStart, "'"), (Escape, "{{"), (StringContent, "x"),
			(Escape, "}}"), (StringEnd, "'"),
		]);
	}

	#[test]
	fn stray_closing_brace() {
		assert_tokens("f'a}b'", &[
			(StringPrefix, "f"), (StringStart, "'"), (StringContent, "a"), (Error, "}"),
			(StringContent, "b"), (StringEnd, "'"),
		]);
	}

	#[test]
	fn nested_literal_in_interpolation() {
		assert_tokens("f\"{'q'}\"", &[
			(StringPrefix, "f"), (StringStart, "\""), (InterpolationStart, "{"),
			(StringStart, "'"), (StringContent, "q"), (StringEnd, "'"),
			(InterpolationEnd, "}"), (StringEnd, "\""),
		]);
	}

	#[test]
	fn braces_inside_interpolation() {
		assert_tokens("f'{ {1: 2}[1] }'", &[
			(StringPrefix, "f"), (StringStart, "'"), (InterpolationStart, "{"),
			(Text, " {1: 2}[1] "), (InterpolationEnd, "}"), (StringEnd, "'"),
		]);
	}

	#[test]
	fn deep_nesting_unwinds() {
		let src = "f'{f\"{x}\"}'";
		let mut tokenizer = Tokenizer::new(src);
		let mut max_depth = 0;
		while tokenizer.next().is_some() {
			max_depth = max_depth.max(tokenizer.scanner().delimiters().len());
		}
		assert_eq!(2, max_depth);
		assert!(tokenizer.scanner().delimiters().is_empty());
		assert_covers(src);
	}

	#[test]
	fn unterminated_literal_recovers() {
		assert_tokens("'abc\nx = \"y\"", &[
			(StringStart, "'"), (Error, "abc"), (Text, "\nx = "), (StringStart, "\""),
			(StringContent, "y"), (StringEnd, "\""),
		]);
	}

	#[test]
	fn unterminated_at_end_of_input() {
		let src = "x = f'a{b}c";
		let mut tokenizer = Tokenizer::new(src);
		let tokens = tokenizer.by_ref().collect::<Vec<_>>();
		assert_eq!(Some(Error), tokens.last().map(|t| t.kind));
		assert_eq!("c", tokens[tokens.len() - 1].text(src));
		assert!(tokenizer.scanner().delimiters().is_empty());
	}

	#[test]
	fn literal_open_at_end_of_input() {
		for src in ["x = '", "x = 'abc\\", "x = f'{", "x = f'{ y", "f'{\"a"] {
			let mut tokenizer = Tokenizer::new(src);
			let tokens = tokenizer.by_ref().collect::<Vec<_>>();
			assert_eq!(Some(&Token { kind: Error, span: src.len()..src.len() }), tokens.last(),
				"tokenizing {:?}", src);
			assert!(tokenizer.scanner().delimiters().is_empty(), "tokenizing {:?}", src);
			assert_covers(src);
		}
	}

	#[test]
	fn inner_literal_open_at_end_of_input() {
		let src = "f'{\"a";
		let kinds = tokenize(src).into_iter().map(|t| (t.kind, t.text(src))).collect::<Vec<_>>();
		assert_eq!(&[(Error, "a"), (Error, "")][..], &kinds[kinds.len() - 2..]);
	}

	#[test]
	fn states_follow_tokens() {
		use hardlight_base::delimiter::flags;

		let src = "x = f'a' y";
		let open = [1, flags::SINGLE_QUOTE | flags::FORMAT];
		let mut tokenizer = Tokenizer::new(src);
		let mut got = Vec::new();
		while let Some((token, state)) = tokenizer.next_with_state() {
			got.push((token.kind, state.to_vec()));
		}

		assert_eq!(vec![
			(Text, vec![0]),
			(StringPrefix, vec![0]),
			(StringStart, open.to_vec()),
			(StringContent, open.to_vec()),
			(StringEnd, vec![0]),
			(Text, vec![0]),
		], got);
	}

	#[test]
	fn recovery_error_carries_restored_state() {
		let mut tokenizer = Tokenizer::new("'ab\n");
		let states = std::iter::from_fn(|| tokenizer.next_with_state())
			.map(|(token, state)| (token.kind, state.to_vec()))
			.collect::<Vec<_>>();
		assert_eq!(Some(&(Error, vec![0])), states.get(1));
	}

	#[test]
	fn triple_literal_spans_lines() {
		assert_tokens("'''a\n'b'''", &[
			(StringStart, "'''"), (StringContent, "a\n'b"), (StringEnd, "'''"),
		]);
	}

	#[test]
	fn coverage() {
		for src in [
			"", "plain", "---\na: 1\n---\n'x'", "f'{a!r:>{w}}'", "'\\", "'a\nb'c'",
			"r'\\''", "\"\"\"\n\"\"\"", "`cmd {x}`", "x = 'é' # ünïcödé",
		] {
			assert_covers(src);
		}
	}

	#[test]
	fn identifier_runs() {
		assert_eq!(3, prefix_start("ab rf'", 0, 5));
		assert_eq!(4, prefix_start("ab (\"", 0, 4));
		assert_eq!(2, prefix_start("abrf'", 2, 4));
	}
}

//! The external scanner: frontmatter blocks and string literals.
//!
//! The host calls [`Scanner::scan`] with the set of token kinds it can accept at the current
//! position. Between calls, the only state the scanner carries is its [`DelimiterStack`], which
//! the host snapshots with [`Scanner::serialize`] after every scan and restores with
//! [`Scanner::deserialize`] before the next one.

mod frontmatter;
mod recovery;
mod string;

pub(crate) use frontmatter::fence_len;

use hardlight_base::{DelimiterStack, Modifiers, SerializedStack, StackFull, TokenSet, TokenType};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::lexer::Lexer;

pub(crate) const TARGET: &str = crate::logging::SCANNER;

/// What the host will accept at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanRequest {
	/// Acceptable token kinds.
	pub valid: TokenSet,
	/// Prefix modifiers for a literal opened by this scan. Ignored unless a string-start token
	/// is produced.
	pub modifiers: Modifiers,
}

impl ScanRequest {
	#[inline]
	pub const fn new(valid: TokenSet) -> Self {
		Self { valid, modifiers: Modifiers::NONE }
	}

	#[must_use]
	#[inline]
	pub const fn with_modifiers(self, modifiers: Modifiers) -> Self {
		Self { modifiers, ..self }
	}
}

impl From<TokenSet> for ScanRequest {
	#[inline]
	fn from(valid: TokenSet) -> Self {
		Self::new(valid)
	}
}

impl From<TokenType> for ScanRequest {
	#[inline]
	fn from(kind: TokenType) -> Self {
		Self::new(TokenSet::of(kind))
	}
}

/// Why a scan produced nothing. Only ever logged: the host just sees "no token".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum Miss {
	#[error("no token of the requested kinds starts here")]
	NoMatch,
	#[error("string literal is not terminated")]
	Unterminated,
	#[error(transparent)]
	StackFull(#[from] StackFull),
}

pub(crate) type ScanResult<T = TokenType> = Result<T, Miss>;

/// Scanner state for one parse session.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
	stack: DelimiterStack,
}

impl Scanner {
	/// Constructs a scanner with no open literals.
	pub const fn new() -> Self {
		Self { stack: DelimiterStack::new() }
	}

	/// Scans one token, returning its kind, or `None` if none of the requested kinds can be
	/// produced here.
	///
	/// The token's extent is whatever `lexer` last committed with [`Lexer::mark_end`]. On
	/// failure the scanner state is left as it was before the call, apart from the position of
	/// `lexer`, which the host is expected to discard.
	pub fn scan<L>(&mut self, lexer: &mut L, request: impl Into<ScanRequest>) -> Option<TokenType>
	where L: Lexer + ?Sized {
		let request = request.into();
		match self.try_scan(lexer, request) {
			Ok(kind) => {
				debug!(target: TARGET, ?kind, depth = self.stack.len(), "produced token");
				Some(kind)
			},
			Err(miss) => {
				trace!(target: TARGET, valid = ?request.valid, %miss, "no token");
				None
			},
		}
	}

	fn try_scan<L: Lexer + ?Sized>(&mut self, lexer: &mut L, request: ScanRequest) -> ScanResult {
		let valid = request.valid;
		let recovering = valid.is_error_recovery();

		if valid.contains(TokenType::StringContent) && !recovering {
			if let Some(delimiter) = self.stack.top() {
				let kind = string::scan_content(lexer, delimiter)?;
				if kind == TokenType::StringEnd {
					self.stack.pop();
				}
				return Ok(kind);
			}
		}

		if valid.contains(TokenType::Frontmatter) && !recovering {
			return frontmatter::scan(lexer);
		}

		// anything skipped from here on is leading trivia
		lexer.mark_end();
		recovery::skip_whitespace(lexer);

		if valid.contains(TokenType::StringStart) {
			let delimiter = string::scan_start(lexer, request.modifiers)?;
			self.stack.push(delimiter)?;
			trace!(target: TARGET, ?delimiter, "opened literal");
			return Ok(TokenType::StringStart);
		}

		Err(Miss::NoMatch)
	}

	/// Writes the scanner state into `buffer`, returning the number of bytes used.
	///
	/// A buffer of [`SERIALIZED_CAPACITY`](hardlight_base::SERIALIZED_CAPACITY) bytes is always
	/// big enough.
	pub fn serialize(&self, buffer: &mut [u8]) -> usize {
		let written = self.stack.serialize_into(buffer);
		if written < self.stack.len() + 1 {
			warn!(target: TARGET, depth = self.stack.len(), buffer_len = buffer.len(),
				"state buffer too small, innermost literals dropped");
		}
		written
	}

	/// Returns the scanner state as an owned byte array.
	pub fn snapshot(&self) -> SerializedStack {
		self.stack.to_bytes()
	}

	/// Restores state written by [`Scanner::serialize`]. An empty buffer resets the scanner.
	///
	/// Malformed state can't be reported back through the host, so it is logged and the scanner
	/// starts over with no open literals.
	pub fn deserialize(&mut self, buffer: &[u8]) {
		match DelimiterStack::deserialize(buffer) {
			Ok(stack) => self.stack = stack,
			Err(e) => {
				warn!(target: TARGET, error = %e, len = buffer.len(), "discarding scanner state");
				self.stack.clear();
			},
		}
	}

	/// The currently open literals.
	#[inline]
	pub fn delimiters(&self) -> &DelimiterStack {
		&self.stack
	}
}

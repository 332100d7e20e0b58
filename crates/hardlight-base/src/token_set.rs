//! External token kinds, and sets of them.

use std::fmt;

/// A token kind the scanner knows how to produce (or, for [`TokenType::ScanError`], a marker
/// the host sets during error recovery).
///
/// The discriminants are the host grammar's external token indices.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenType {
	Frontmatter = 0,
	StringStart = 1,
	StringContent = 2,
	StringEnd = 3,
	ScanError = 4,
}

impl TokenType {
	/// Every token type, in index order.
	pub const ALL: [TokenType; 5] = [
		Self::Frontmatter,
		Self::StringStart,
		Self::StringContent,
		Self::StringEnd,
		Self::ScanError,
	];

	#[inline]
	pub const fn index(self) -> usize {
		self as usize
	}

	pub fn from_index(index: usize) -> Option<Self> {
		Self::ALL.get(index).copied()
	}

	#[inline]
	const fn bit(self) -> u8 {
		1 << self as u8
	}
}

/// The token kinds a host will accept at the current position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSet(u8);

impl TokenSet {
	pub const EMPTY: Self = Self(0);

	/// Every kind, which is what a host asks for while it recovers from a parse error.
	pub const ALL: Self = Self(0b1_1111);

	#[inline]
	pub const fn of(kind: TokenType) -> Self {
		Self(kind.bit())
	}

	#[must_use]
	#[inline]
	pub const fn with(self, kind: TokenType) -> Self {
		Self(self.0 | kind.bit())
	}

	#[inline]
	pub const fn contains(self, kind: TokenType) -> bool {
		self.0 & kind.bit() != 0
	}

	#[inline]
	pub const fn is_empty(self) -> bool {
		self.0 == 0
	}

	/// Returns `true` if the host is hunting for any token it can find after a parse error.
	#[inline]
	pub const fn is_error_recovery(self) -> bool {
		self.contains(TokenType::ScanError)
	}

	/// Builds a set from a host's valid-symbols array, indexed by [`TokenType::index`]. Entries
	/// past the known kinds are ignored.
	pub fn from_valid_symbols(valid: &[bool]) -> Self {
		valid.iter()
			.enumerate()
			.filter(|&(_, &is_valid)| is_valid)
			.filter_map(|(index, _)| TokenType::from_index(index))
			.collect()
	}

	pub fn iter(self) -> impl Iterator<Item = TokenType> {
		TokenType::ALL.into_iter().filter(move |&kind| self.contains(kind))
	}
}

impl From<TokenType> for TokenSet {
	#[inline]
	fn from(kind: TokenType) -> Self {
		Self::of(kind)
	}
}

impl FromIterator<TokenType> for TokenSet {
	fn from_iter<T: IntoIterator<Item = TokenType>>(iter: T) -> Self {
		iter.into_iter().fold(Self::EMPTY, Self::with)
	}
}

impl fmt::Debug for TokenSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn indices_are_stable() {
		for (index, kind) in TokenType::ALL.into_iter().enumerate() {
			assert_eq!(index, kind.index());
			assert_eq!(Some(kind), TokenType::from_index(index));
		}
		assert_eq!(None, TokenType::from_index(5));
	}

	#[test]
	fn membership() {
		let set = TokenSet::of(TokenType::StringStart).with(TokenType::StringContent);
		assert!(set.contains(TokenType::StringStart));
		assert!(set.contains(TokenType::StringContent));
		assert!(!set.contains(TokenType::StringEnd));
		assert!(!set.is_error_recovery());
		assert!(TokenSet::ALL.is_error_recovery());
		assert!(TokenSet::EMPTY.is_empty());

		let all = TokenType::ALL.into_iter().collect::<TokenSet>();
		assert_eq!(TokenSet::ALL, all);
	}

	#[test]
	fn from_valid_symbols() {
		let set = TokenSet::from_valid_symbols(&[true, false, true, false, false, true, true]);
		assert_eq!(TokenSet::of(TokenType::Frontmatter).with(TokenType::StringContent), set);
		assert_eq!(TokenSet::EMPTY, TokenSet::from_valid_symbols(&[]));
	}

	#[test]
	fn debug_output() {
		let set = TokenSet::of(TokenType::StringEnd).with(TokenType::Frontmatter);
		assert_eq!("{Frontmatter, StringEnd}", format!("{:?}", set));
	}
}

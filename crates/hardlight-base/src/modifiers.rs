//! Literal prefix modifiers.
//!
//! The scanner never looks behind a quote character to find out what kind of literal it opens.
//! Instead, the host recognises the prefix (`r`, `b`, `f`, and their combinations) as part of its
//! own grammar and passes the resulting [`Modifiers`] along with the string-start request.

use std::{fmt, ops::{BitOr, BitOrAssign}};

use crate::delimiter::flags;

/// A set of prefix modifiers, using the same bit positions as [`Delimiter`](crate::Delimiter).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u8);

impl Modifiers {
	/// A plain literal.
	pub const NONE: Self = Self(0);

	/// `r` prefix.
	pub const RAW: Self = Self(flags::RAW);

	/// `b` prefix.
	pub const BYTES: Self = Self(flags::BYTES);

	/// `f` prefix.
	pub const FORMAT: Self = Self(flags::FORMAT);

	/// Keeps only the modifier bits of `bits`.
	#[inline]
	pub const fn from_bits_truncate(bits: u8) -> Self {
		Self(bits & flags::MODIFIER_MASK)
	}

	#[inline]
	pub const fn bits(self) -> u8 {
		self.0
	}

	#[inline]
	pub const fn contains(self, other: Self) -> bool {
		self.0 & other.0 == other.0
	}

	#[inline]
	pub const fn is_empty(self) -> bool {
		self.0 == 0
	}

	/// Parses a literal prefix (the identifier characters directly in front of the opening
	/// quote).
	///
	/// Letters are case-insensitive. Accepted prefixes are the empty string, `u`, `r`, `b`, `f`,
	/// and the two-letter combinations `rb`, `br`, `rf` and `fr` in either order. Anything
	/// else is not a literal prefix at all, and yields `None`.
	pub fn from_prefix(prefix: &str) -> Option<Self> {
		let mut seen = Self::NONE;

		for ch in prefix.chars() {
			let this = match ch.to_ascii_lowercase() {
				'r' => Self::RAW,
				'b' => Self::BYTES,
				'f' => Self::FORMAT,
				// accepted for compatibility, means nothing to the scanner
				'u' if prefix.len() == 1 => continue,
				_ => return None,
			};
			if seen.contains(this) {
				return None;
			}
			seen |= this;
		}

		match seen {
			// bytes can't be interpolated
			s if s.contains(Self::BYTES | Self::FORMAT) => None,
			s => Some(s),
		}
	}
}

impl BitOr for Modifiers {
	type Output = Self;

	#[inline]
	fn bitor(self, rhs: Self) -> Self {
		Self(self.0 | rhs.0)
	}
}

impl BitOrAssign for Modifiers {
	#[inline]
	fn bitor_assign(&mut self, rhs: Self) {
		self.0 |= rhs.0;
	}
}

impl fmt::Debug for Modifiers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Modifiers[")?;
		let mut first = true;
		for (flag, name) in [(Self::RAW, "raw"), (Self::BYTES, "bytes"), (Self::FORMAT, "format")] {
			if self.contains(flag) {
				if !first {
					f.write_str(", ")?;
				}
				first = false;
				f.write_str(name)?;
			}
		}
		f.write_str("]")
	}
}

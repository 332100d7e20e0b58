//! Open string literals, as tracked by the scanner in its own serialised form.

use std::fmt;

use arrayvec::ArrayVec;
use ascii::{AsciiChar, AsciiStr};

use crate::modifiers::Modifiers;

/// Namespace for flag bits.
///
/// These values are written verbatim into the scanner's persisted state, so the layout must stay
/// stable between releases.
pub mod flags {
	/// The literal is closed by `'`.
	pub const SINGLE_QUOTE       : u8 = 1<<0;

	/// The literal is closed by `"`.
	pub const DOUBLE_QUOTE       : u8 = 1<<1;

	/// The literal is closed by a backquote.
	pub const BACK_QUOTE         : u8 = 1<<2;

	/// Backslashes only protect the end character (or another backslash) from ending the literal.
	pub const RAW                : u8 = 1<<3;

	/// Braces delimit embedded expressions.
	pub const FORMAT             : u8 = 1<<4;

	/// The literal was opened with three end characters, and must be closed with three too.
	pub const TRIPLE             : u8 = 1<<5;

	/// `\N`, `\u` and `\U` are not escape introducers.
	pub const BYTES              : u8 = 1<<6;

	/// Never set in a valid delimiter.
	pub const RESERVED           : u8 = 1<<7;

	/// Marks the bits naming the end character. Exactly one of them is set.
	pub const END_CHARACTER_MASK : u8 = SINGLE_QUOTE | DOUBLE_QUOTE | BACK_QUOTE;

	/// Marks the bits set by literal prefixes.
	pub const MODIFIER_MASK      : u8 = RAW | FORMAT | BYTES;
}

/// A currently-open string literal.
///
/// `Delimiter` is exactly one byte wide, and that byte is what ends up in serialised scanner
/// state. Any value obtained through the public constructors names exactly one end character, and
/// a backquote delimiter is never triple.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Delimiter {
	flags: u8,
}

static_assertions::assert_eq_size!(u8, Delimiter);

impl Delimiter {
	/// Constructs a plain, single-character delimiter closed by `end`.
	///
	/// Returns `None` if `end` is not one of `'`, `"` or a backquote.
	pub fn new(end: AsciiChar) -> Option<Self> {
		let bit = match end {
			AsciiChar::Apostrophe => flags::SINGLE_QUOTE,
			AsciiChar::Quotation => flags::DOUBLE_QUOTE,
			AsciiChar::Grave => flags::BACK_QUOTE,
			_ => return None,
		};
		Some(Self { flags: bit })
	}

	/// Like [`Delimiter::new`], but for any `char`.
	pub fn for_char(end: char) -> Option<Self> {
		AsciiChar::from_ascii(end).ok().and_then(Self::new)
	}

	/// Reconstructs a delimiter from its serialised byte, rejecting bytes that break the
	/// delimiter rules.
	pub fn from_byte(byte: u8) -> Option<Self> {
		let end_bits = byte & flags::END_CHARACTER_MASK;
		let is_valid = end_bits.count_ones() == 1
			&& byte & flags::RESERVED == 0
			&& !(end_bits == flags::BACK_QUOTE && byte & flags::TRIPLE != 0);

		is_valid.then_some(Self { flags: byte })
	}

	/// Returns the serialised byte for this delimiter.
	#[inline]
	pub const fn to_byte(self) -> u8 {
		self.flags
	}

	/// Returns a copy of this delimiter marked as triple-quoted.
	///
	/// Backquote literals cannot be triple; for those, the delimiter is returned unchanged.
	#[must_use]
	pub fn with_triple(self) -> Self {
		if self.flags & flags::BACK_QUOTE != 0 {
			return self;
		}
		Self { flags: self.flags | flags::TRIPLE }
	}

	/// Returns a copy of this delimiter with the given prefix modifiers added.
	#[must_use]
	pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
		Self { flags: self.flags | (modifiers.bits() & flags::MODIFIER_MASK) }
	}

	/// The character that closes this literal.
	pub fn end_character(self) -> AsciiChar {
		match self.flags & flags::END_CHARACTER_MASK {
			flags::SINGLE_QUOTE => AsciiChar::Apostrophe,
			flags::DOUBLE_QUOTE => AsciiChar::Quotation,
			flags::BACK_QUOTE => AsciiChar::Grave,
			bits => unreachable!("delimiter has end character bits {:03b}", bits),
		}
	}

	/// Returns `true` if `ch` is this literal's end character.
	#[inline]
	pub fn is_end_character(self, ch: char) -> bool {
		self.end_character().as_char() == ch
	}

	/// The prefix modifiers this literal was opened with.
	#[inline]
	pub fn modifiers(self) -> Modifiers {
		Modifiers::from_bits_truncate(self.flags)
	}

	#[inline]
	pub const fn is_raw(self) -> bool {
		self.flags & flags::RAW != 0
	}

	#[inline]
	pub const fn is_bytes(self) -> bool {
		self.flags & flags::BYTES != 0
	}

	#[inline]
	pub const fn is_format(self) -> bool {
		self.flags & flags::FORMAT != 0
	}

	#[inline]
	pub const fn is_triple(self) -> bool {
		self.flags & flags::TRIPLE != 0
	}
}

impl fmt::Debug for Delimiter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let end = self.end_character();
		let mut opener = ArrayVec::<AsciiChar, 3>::new();
		opener.push(end);
		if self.is_triple() {
			opener.push(end);
			opener.push(end);
		}

		write!(f, "Delimiter({}", <&AsciiStr>::from(&*opener))?;
		for (set, name) in [
			(self.is_raw(), "raw"),
			(self.is_bytes(), "bytes"),
			(self.is_format(), "format"),
		] {
			if set {
				write!(f, " {}", name)?;
			}
		}
		f.write_str(")")
	}
}

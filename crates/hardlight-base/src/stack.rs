//! Container module for [`DelimiterStack`] and its serialised form.
//!
//! The serialised form is one count byte followed by that many delimiter bytes, innermost last:
//!
//! ```text
//! [count] [delimiter 0] [delimiter 1] ... [delimiter count-1]
//! ```

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::delimiter::Delimiter;

/// The most literals that can be open at once. This is what fits in the count byte.
pub const MAX_DEPTH: usize = u8::MAX as usize;

/// Buffer size that is always big enough to hold a serialised stack.
pub const SERIALIZED_CAPACITY: usize = MAX_DEPTH + 1;

/// Serialised stack bytes.
pub type SerializedStack = ArrayVec<u8, SERIALIZED_CAPACITY>;

/// Returned by [`DelimiterStack::push`] when [`MAX_DEPTH`] literals are already open. The
/// rejected delimiter is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("too many nested string literals (at most {} may be open)", MAX_DEPTH)]
pub struct StackFull(pub Delimiter);

/// Reasons a serialised stack can fail to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
	#[error("state declares {declared} delimiters, but only {available} bytes follow")]
	Truncated { declared: u8, available: usize },
	#[error("{0} unexpected bytes after the delimiter list")]
	TrailingBytes(usize),
	#[error("byte {index} (&{byte:02x}) is not a valid delimiter")]
	InvalidDelimiter { index: usize, byte: u8 },
}

/// The ordered set of currently-open string literals, innermost last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelimiterStack {
	entries: ArrayVec<Delimiter, MAX_DEPTH>,
}

impl DelimiterStack {
	/// Constructs an empty stack.
	pub const fn new() -> Self {
		Self { entries: ArrayVec::new_const() }
	}

	/// Opens a new innermost literal.
	pub fn push(&mut self, delimiter: Delimiter) -> Result<(), StackFull> {
		self.entries.try_push(delimiter).map_err(|e| StackFull(e.element()))
	}

	/// Closes the innermost literal.
	#[inline]
	pub fn pop(&mut self) -> Option<Delimiter> {
		self.entries.pop()
	}

	/// Returns the innermost open literal.
	#[inline]
	pub fn top(&self) -> Option<Delimiter> {
		self.entries.last().copied()
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	#[inline]
	pub fn is_full(&self) -> bool {
		self.entries.is_full()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	/// Writes the serialised stack into `buffer`, returning the number of bytes written.
	///
	/// If `buffer` can't hold every delimiter, the innermost ones are left out (and the count byte
	/// says so). An empty buffer receives nothing at all.
	pub fn serialize_into(&self, buffer: &mut [u8]) -> usize {
		let (count_slot, rest) = match buffer.split_first_mut() {
			Some(split) => split,
			None => return 0,
		};

		let count = self.entries.len().min(MAX_DEPTH).min(rest.len());
		*count_slot = count as u8;
		for (dst, delimiter) in rest.iter_mut().zip(&self.entries[..count]) {
			*dst = delimiter.to_byte();
		}

		count + 1
	}

	/// Returns the serialised stack.
	pub fn to_bytes(&self) -> SerializedStack {
		let mut out = SerializedStack::new();
		out.push(self.entries.len() as u8);
		out.extend(self.entries.iter().map(|d| d.to_byte()));
		out
	}

	/// Loads a stack from its serialised form.
	///
	/// An empty buffer loads as an empty stack.
	pub fn deserialize(buffer: &[u8]) -> Result<Self, StateError> {
		let (&declared, rest) = match buffer.split_first() {
			Some(split) => split,
			None => return Ok(Self::new()),
		};

		match rest.len().cmp(&(declared as usize)) {
			std::cmp::Ordering::Less => return Err(StateError::Truncated {
				declared,
				available: rest.len(),
			}),
			std::cmp::Ordering::Greater => return Err(StateError::TrailingBytes(
				rest.len() - declared as usize)),
			std::cmp::Ordering::Equal => {},
		};

		let mut entries = ArrayVec::new();
		for (index, &byte) in rest.iter().enumerate() {
			let delimiter = Delimiter::from_byte(byte)
				.ok_or(StateError::InvalidDelimiter { index, byte })?;
			// `declared` is a u8, so this always fits
			entries.push(delimiter);
		}

		Ok(Self { entries })
	}
}

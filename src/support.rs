use core::fmt;
use std::fs;
use std::fmt::Write as _;
use std::io::{self, Read};

/// Reads a whole input file, or stdin if `path` is `-`.
pub(crate) fn read_input(path: &str) -> io::Result<Vec<u8>> {
	match path {
		"-" => {
			let mut buffer = Vec::new();
			io::stdin().lock().read_to_end(&mut buffer)?;
			Ok(buffer)
		},
		path => fs::read(path),
	}
}


/// Shows bytes as a list of two-digit hex values.
pub(crate) struct HexArray<'a>(pub &'a [u8]);

impl<'a> fmt::Debug for HexArray<'a> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_char('[')?;
		let mut show_comma = false;
		for &b in self.0 {
			if show_comma {
				f.write_str(", ")?;
			}
			show_comma = true;
			write!(f, "{:02x}", b)?;
		}
		f.write_char(']')
	}
}

impl<'a> fmt::Display for HexArray<'a> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		<Self as fmt::Debug>::fmt(self, f)
	}
}

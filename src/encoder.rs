//! Booth radix-8 recoding.
//!
//! The multiplier is extended to `3k` bits, shifted left by one to seed the recoding with an implicit zero,
//! and then read as `k` overlapping 4-bit windows `[3i + 3 : 3i]`. Each window is one signed digit in `-4..=4`.

use crate::{Operand, width::MAX_WINDOWS};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Magnitude {
	#[default]
	Zero,
	One,
	Two,
	Three,
	Four,
}

impl Magnitude {
	pub const fn value(self) -> u8 {
		match self {
			Self::Zero => 0,
			Self::One => 1,
			Self::Two => 2,
			Self::Three => 3,
			Self::Four => 4,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BoothDigit {
	pub magnitude: Magnitude,
	pub negative: bool,
}

impl BoothDigit {
	/// Decodes one window.
	///
	/// The low three bits are XORed with the top bit, which turns a negative window into its magnitude,
	/// and the result is looked up in the magnitude table.
	/// `0b0000` and `0b1111` both decode to a non-negative zero.
	pub const fn decode(window: u8) -> Self {
		let top = window & 0b1000 != 0;
		let broadcast = if top { 0b111 } else { 0b000 };
		let flipped = (window ^ broadcast) & 0b111;

		#[allow(clippy::match_same_arms)]
		let magnitude = match flipped {
			0b000 => Magnitude::Zero,

			0b001 |
			0b010 => Magnitude::One,

			0b011 |
			0b100 => Magnitude::Two,

			0b101 |
			0b110 => Magnitude::Three,

			0b111 => Magnitude::Four,

			_ => unreachable!(),
		};

		Self { magnitude, negative: top && !matches!(magnitude, Magnitude::Zero) }
	}

	pub const fn value(self) -> i8 {
		#[allow(clippy::cast_possible_wrap)]
		let magnitude = self.magnitude.value() as i8;
		if self.negative { -magnitude } else { magnitude }
	}
}

/// The multiplier as seen by the encoder: `3k + 1` bits, bit 0 always clear.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PaddedMultiplier {
	bits: u128,
	windows: usize,
}

impl PaddedMultiplier {
	pub const fn new(multiplier: Operand) -> Self {
		let width = multiplier.width();
		#[allow(clippy::cast_sign_loss)]
		let bits = (multiplier.value() << 1) as u128 & crate::width::mask(width.padded_bits());
		Self { bits, windows: width.windows() }
	}

	pub const fn bits(self) -> u128 {
		self.bits
	}

	pub const fn windows(self) -> usize {
		self.windows
	}

	/// Bits `[3i + 3 : 3i]`.
	#[allow(clippy::cast_possible_truncation)]
	pub const fn window(self, i: usize) -> u8 {
		(self.bits >> (3 * i)) as u8 & 0b1111
	}

	pub fn recode(self) -> Digits {
		let mut digits = [BoothDigit::default(); MAX_WINDOWS];
		for (i, digit) in digits[..self.windows].iter_mut().enumerate() {
			*digit = BoothDigit::decode(self.window(i));
		}
		Digits { digits, len: self.windows }
	}
}

/// The recoded multiplier, least significant digit first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Digits {
	digits: [BoothDigit; MAX_WINDOWS],
	len: usize,
}

impl Digits {
	pub fn as_slice(&self) -> &[BoothDigit] {
		&self.digits[..self.len]
	}

	/// `sum(digit * 8^i)`. Used to check a recoding.
	pub fn value(&self) -> i128 {
		self.as_slice().iter().rev().fold(0, |acc, digit| acc * 8 + i128::from(digit.value()))
	}
}

#[cfg(test)]
mod tests {
	use super::{BoothDigit, Magnitude, PaddedMultiplier};
	use crate::{Operand, Width};

	#[test]
	fn decode() {
		static TESTS: &[(u8, Magnitude, bool, i8)] = &[
			(0b0000, Magnitude::Zero, false, 0),
			(0b0001, Magnitude::One, false, 1),
			(0b0010, Magnitude::One, false, 1),
			(0b0011, Magnitude::Two, false, 2),
			(0b0100, Magnitude::Two, false, 2),
			(0b0101, Magnitude::Three, false, 3),
			(0b0110, Magnitude::Three, false, 3),
			(0b0111, Magnitude::Four, false, 4),
			(0b1000, Magnitude::Four, true, -4),
			(0b1001, Magnitude::Three, true, -3),
			(0b1010, Magnitude::Three, true, -3),
			(0b1011, Magnitude::Two, true, -2),
			(0b1100, Magnitude::Two, true, -2),
			(0b1101, Magnitude::One, true, -1),
			(0b1110, Magnitude::One, true, -1),
			(0b1111, Magnitude::Zero, false, 0),
		];
		for &(window, magnitude, negative, value) in TESTS {
			let digit = BoothDigit::decode(window);
			assert_eq!(digit, BoothDigit { magnitude, negative }, "{window:04b}");
			assert_eq!(digit.value(), value, "{window:04b}");

			let arithmetic =
				-4 * i8::from(window >> 3 & 1 != 0) +
				2 * i8::from(window >> 2 & 1 != 0) +
				i8::from(window >> 1 & 1 != 0) +
				i8::from(window & 1 != 0);
			assert_eq!(digit.value(), arithmetic, "{window:04b}");
		}
	}

	#[test]
	fn recoding_is_exact() {
		for bits in [1, 2, 3, 5, 8, 9, 16] {
			let width = Width::new(bits).unwrap();
			for raw in 0..=width.mask().min(0xffff) {
				for signed in [false, true] {
					let multiplier = Operand::new(width, raw, signed);
					let digits = PaddedMultiplier::new(multiplier).recode();
					assert_eq!(digits.as_slice().len(), width.windows());
					assert_eq!(digits.value(), multiplier.value(), "{raw:#x} {bits} {signed}");
				}
			}
		}
	}

	#[test]
	fn padding() {
		let padded = PaddedMultiplier::new(Operand::new(Width::W8, 0x80, true));
		assert_eq!(padded.bits(), 0b11_0000_0000);

		let padded = PaddedMultiplier::new(Operand::new(Width::W8, 0x80, false));
		assert_eq!(padded.bits(), 0b01_0000_0000);
		assert_eq!(padded.window(0), 0b0000);
		assert_eq!(padded.window(2), 0b0100);
	}

	#[test]
	fn negative_zero_windows_are_empty() {
		let padded = PaddedMultiplier::new(Operand::new(Width::W8, 0xff, true));
		for digit in padded.recode().as_slice() {
			assert!(!digit.negative || digit.magnitude != Magnitude::Zero);
		}
		assert_eq!(padded.recode().value(), -1);
	}
}

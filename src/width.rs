use crate::Error;

/// Widest operand any core accepts. The product of two such operands fills a `u128`.
pub const MAX_WIDTH: u32 = 64;

/// Booth windows needed by a [`MAX_WIDTH`]-bit multiplier.
pub const MAX_WINDOWS: usize = (MAX_WIDTH + 1).div_ceil(3) as usize;

/// Bits added above the operand so that 4M never truncates.
pub const GUARD_BITS: u32 = 3;

/// Operand width N, and every register width derived from it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Width(u32);

impl Width {
	pub const W8: Self = Self(8);
	pub const W16: Self = Self(16);
	pub const W32: Self = Self(32);
	pub const W64: Self = Self(64);

	pub fn new(bits: u32) -> Result<Self, Error> {
		if (1..=MAX_WIDTH).contains(&bits) {
			Ok(Self(bits))
		}
		else {
			Err(Error::UnsupportedWidth { bits, max: MAX_WIDTH })
		}
	}

	pub const fn bits(self) -> u32 {
		self.0
	}

	pub const fn mask(self) -> u64 {
		u64::MAX >> (64 - self.0)
	}

	pub const fn truncate(self, raw: u64) -> u64 {
		raw & self.mask()
	}

	pub const fn product_bits(self) -> u32 {
		self.0 * 2
	}

	pub const fn product_mask(self) -> u128 {
		mask(self.product_bits())
	}

	/// Width of the sign/zero-extended multiplicand.
	pub const fn extended_bits(self) -> u32 {
		self.0 + GUARD_BITS
	}

	/// Number of Booth windows, `ceil((N + 1) / 3)`.
	///
	/// The extra bit keeps the top window of an unsigned multiplier non-negative.
	pub const fn windows(self) -> usize {
		(self.0 + 1).div_ceil(3) as usize
	}

	/// Width of the multiplier once extended to `3k` bits and seeded with the implicit low zero.
	pub const fn padded_bits(self) -> u32 {
		self.windows() as u32 * 3 + 1
	}

	/// Parses a raw operand.
	///
	/// Non-negative values must fit in N unsigned bits, negative values in N signed bits.
	/// Negative values are returned in two's complement.
	pub fn check(self, name: &'static str, value: i128) -> Result<u64, Error> {
		let bits = self.0;
		let min = -(1_i128 << (bits - 1));
		let max = (1_i128 << bits) - 1;
		if (min..=max).contains(&value) {
			#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
			Ok(self.truncate(value as u64))
		}
		else {
			Err(Error::OperandOverflow { name, value, bits })
		}
	}
}

impl std::fmt::Display for Width {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

/// Low `bits` bits set, for `bits` in `0..=128`.
pub(crate) const fn mask(bits: u32) -> u128 {
	if bits == 0 { 0 } else { u128::MAX >> (128 - bits) }
}

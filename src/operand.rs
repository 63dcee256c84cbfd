use crate::Width;

/// An N-bit operand tagged with its interpretation at the moment it enters a core.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Operand {
	bits: u64,
	width: Width,
	signed: bool,
}

impl Operand {
	/// Bits above `width` are dropped.
	pub const fn new(width: Width, bits: u64, signed: bool) -> Self {
		Self { bits: width.truncate(bits), width, signed }
	}

	pub const fn bits(self) -> u64 {
		self.bits
	}

	pub const fn width(self) -> Width {
		self.width
	}

	pub const fn is_signed(self) -> bool {
		self.signed
	}

	/// The interpreted value.
	pub const fn value(self) -> i128 {
		let shift = 128 - self.width.bits();
		if self.signed {
			((self.bits as i128) << shift) >> shift
		}
		else {
			self.bits as i128
		}
	}

	/// Sign or zero extension to `N + GUARD_BITS` bits.
	pub const fn extend(self) -> ExtendedOperand {
		ExtendedOperand { value: self.value(), width: self.width }
	}
}

/// A multiplicand extended far enough that every Booth multiple up to 4M is representable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExtendedOperand {
	value: i128,
	width: Width,
}

impl ExtendedOperand {
	pub const fn value(self) -> i128 {
		self.value
	}

	pub const fn bits(self) -> u32 {
		self.width.extended_bits()
	}

	/// Two's complement encoding, `bits()` wide.
	#[allow(clippy::cast_sign_loss)]
	pub const fn encoding(self) -> u128 {
		self.value as u128 & crate::width::mask(self.bits())
	}
}

#[cfg(test)]
mod tests {
	use super::Operand;
	use crate::Width;

	#[test]
	fn value() {
		static TESTS: &[(u32, u64, bool, i128)] = &[
			(8, 0x7f, true, 127),
			(8, 0x80, true, -128),
			(8, 0x80, false, 128),
			(8, 0xff, true, -1),
			(8, 0xff, false, 255),
			(8, 0x1ff, false, 255),
			(1, 1, true, -1),
			(1, 1, false, 1),
			(16, 0xfff6, true, -10),
			(64, u64::MAX, true, -1),
			(64, u64::MAX, false, u64::MAX as i128),
		];
		for &(bits, raw, signed, expected) in TESTS {
			let operand = Operand::new(Width::new(bits).unwrap(), raw, signed);
			assert_eq!(operand.value(), expected, "{raw:#x} {bits} {signed}");
			assert_eq!(operand.extend().value(), expected);
		}
	}

	#[test]
	fn extension_holds_four_times() {
		let width = Width::W8;
		for raw in 0..=0xff {
			for signed in [false, true] {
				let m = Operand::new(width, raw, signed).extend();
				let limit = 1_i128 << (m.bits() - 1);
				assert!((-limit..limit).contains(&(m.value() * 4)), "{raw:#x} {signed}");
			}
		}
	}

	#[test]
	fn encoding() {
		let m = Operand::new(Width::W8, 0x80, true).extend();
		assert_eq!(m.bits(), 11);
		assert_eq!(m.encoding(), 0b111_1000_0000);

		let m = Operand::new(Width::W8, 0x80, false).extend();
		assert_eq!(m.encoding(), 0b000_1000_0000);
	}
}

//! Arbitrary-precision model the cores are checked against.

use num_bigint::{BigInt, Sign};
use num_traits::{One as _, ToPrimitive as _};

use crate::{Operand, SignMode, Width};

/// The exact product of the two interpreted operands.
pub fn reference_multiply(width: Width, multiplicand: u64, multiplier: u64, mode: SignMode) -> BigInt {
	let a = Operand::new(width, multiplicand, mode.multiplicand_is_signed());
	let b = Operand::new(width, multiplier, mode.multiplier_is_signed());
	BigInt::from(a.value()) * BigInt::from(b.value())
}

/// [`reference_multiply`] as a `2N`-bit two's complement bit pattern.
pub fn product_bits(width: Width, multiplicand: u64, multiplier: u64, mode: SignMode) -> u128 {
	let mut product = reference_multiply(width, multiplicand, multiplier, mode);
	if product.sign() == Sign::Minus {
		product += BigInt::one() << width.product_bits();
	}
	product.to_u128().unwrap()
}

#[cfg(test)]
mod tests {
	use num_bigint::BigInt;

	use super::{product_bits, reference_multiply};
	use crate::{SignMode, Width};

	#[test]
	fn scenarios() {
		static TESTS: &[(u32, u64, u64, SignMode, u128)] = &[
			(8, 10, 5, SignMode::UU, 50),
			(8, 0xf6, 5, SignMode::SS, 0xffce),
			(16, 0xffff, 0xffff, SignMode::UU, 0xfffe_0001),
			(16, 0x8000, 0x8000, SignMode::SS, 0x4000_0000),
			(16, 0xfff6, 0x000a, SignMode::SU, 0xffff_ff9c),
			(64, u64::MAX, u64::MAX, SignMode::UU, 0xffff_ffff_ffff_fffe_0000_0000_0000_0001),
			(64, u64::MAX, u64::MAX, SignMode::SS, 1),
		];
		for &(bits, a, b, mode, expected) in TESTS {
			let width = Width::new(bits).unwrap();
			assert_eq!(product_bits(width, a, b, mode), expected, "{a:#x} * {b:#x} {mode}");
		}

		assert_eq!(reference_multiply(Width::W8, 0xf6, 5, SignMode::SS), BigInt::from(-50_i32));
		assert_eq!(reference_multiply(Width::W16, 0xfff6, 0x000a, SignMode::SU), BigInt::from(-100_i32));
		assert_eq!(reference_multiply(Width::W16, 0xfff6, 0x000a, SignMode::US), BigInt::from(0xfff6 * 10_i32));
	}
}

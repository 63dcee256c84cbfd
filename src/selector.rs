//! Partial product selection.
//!
//! A negative digit selects the one's complement of its multiple. The `+1` that completes the negation is
//! collected separately in a [`CorrectionVector`], so selection itself is pure select/XOR logic and all
//! carries are left to the reduction network.

use crate::{
	ExtendedOperand, Operand, Width,
	encoder::{BoothDigit, Digits, Magnitude, PaddedMultiplier},
	width::MAX_WINDOWS,
};

/// The multiples of M a digit can select. 3M is the only one that needs an adder and is computed once.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Multiples {
	m: i128,
	m3: i128,
}

impl Multiples {
	pub const fn precompute(m: ExtendedOperand) -> Self {
		let m = m.value();
		Self { m, m3: m + (m << 1) }
	}

	pub const fn m(self) -> i128 {
		self.m
	}

	pub const fn hard_multiple(self) -> i128 {
		self.m3
	}

	pub const fn select(self, magnitude: Magnitude) -> i128 {
		match magnitude {
			Magnitude::Zero => 0,
			Magnitude::One => self.m,
			Magnitude::Two => self.m << 1,
			Magnitude::Three => self.m3,
			Magnitude::Four => self.m << 2,
		}
	}
}

/// One selected multiple, already shifted to `3 * index` and truncated to the product width.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PartialProduct {
	pub bits: u128,
	pub correction: bool,
	pub shift: u32,
}

impl PartialProduct {
	pub fn select(digit: BoothDigit, index: usize, multiples: Multiples, width: Width) -> Self {
		let mask = width.product_mask();
		let shift = u32::try_from(index * 3).unwrap();

		#[allow(clippy::cast_sign_loss)]
		let multiple = multiples.select(digit.magnitude) as u128;
		let multiple = if digit.negative { !multiple } else { multiple };
		let bits = multiple.checked_shl(shift).unwrap_or(0) & mask;

		Self { bits, correction: digit.negative, shift }
	}
}

/// One set bit per negative partial product, at that product's shift.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(transparent)]
pub struct CorrectionVector(u128);

impl CorrectionVector {
	pub fn assemble<'a>(partial_products: impl IntoIterator<Item = &'a PartialProduct>, width: Width) -> Self {
		let bits =
			partial_products.into_iter()
			.filter(|pp| pp.correction)
			.fold(0, |acc, pp| acc | 1_u128.checked_shl(pp.shift).unwrap_or(0));
		Self(bits & width.product_mask())
	}

	pub const fn bits(self) -> u128 {
		self.0
	}
}

/// Everything the reduction network sums for one operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BoothTerms {
	partial_products: [PartialProduct; MAX_WINDOWS],
	len: usize,
	correction: CorrectionVector,
	width: Width,
}

impl BoothTerms {
	pub fn new(digits: &Digits, multiples: Multiples, width: Width) -> Self {
		let mut partial_products = [PartialProduct::default(); MAX_WINDOWS];
		let digits = digits.as_slice();
		for (i, (pp, &digit)) in partial_products.iter_mut().zip(digits).enumerate() {
			*pp = PartialProduct::select(digit, i, multiples, width);
		}
		let len = digits.len();
		let correction = CorrectionVector::assemble(&partial_products[..len], width);
		Self { partial_products, len, correction, width }
	}

	/// Recodes `multiplier` and selects against `multiplicand` in one go.
	pub fn recode(multiplicand: Operand, multiplier: Operand) -> Self {
		let width = multiplicand.width();
		let multiples = Multiples::precompute(multiplicand.extend());
		let digits = PaddedMultiplier::new(multiplier).recode();
		Self::new(&digits, multiples, width)
	}

	pub fn partial_products(&self) -> &[PartialProduct] {
		&self.partial_products[..self.len]
	}

	pub const fn correction(&self) -> CorrectionVector {
		self.correction
	}

	/// All addends: the partial products followed by the correction vector.
	pub fn addends(&self) -> impl Iterator<Item = u128> + '_ {
		self.partial_products().iter().map(|pp| pp.bits).chain(std::iter::once(self.correction.bits()))
	}

	/// Plain modular sum of all addends. The reduction network must agree with this.
	pub fn sum(&self) -> u128 {
		self.addends().fold(0_u128, u128::wrapping_add) & self.width.product_mask()
	}
}

#[cfg(test)]
mod tests {
	use super::{BoothTerms, CorrectionVector, Multiples, PartialProduct};
	use crate::{
		Operand, SignMode, Width,
		encoder::{BoothDigit, Magnitude},
		reference,
	};

	#[test]
	fn hard_multiple_is_computed_once() {
		let m = Operand::new(Width::W8, 0x55, false).extend();
		let multiples = Multiples::precompute(m);
		assert_eq!(multiples.hard_multiple(), 0x55 * 3);
		assert_eq!(multiples.select(Magnitude::Three), 0x55 * 3);
		assert_eq!(multiples.select(Magnitude::Four), 0x55 * 4);
		assert_eq!(multiples.select(Magnitude::Zero), 0);

		let m = Operand::new(Width::W8, 0x80, true).extend();
		assert_eq!(Multiples::precompute(m).hard_multiple(), -384);
	}

	#[test]
	fn negative_selection_is_ones_complement() {
		let width = Width::W8;
		let multiples = Multiples::precompute(Operand::new(width, 5, false).extend());

		let digit = BoothDigit { magnitude: Magnitude::Two, negative: true };
		let pp = PartialProduct::select(digit, 1, multiples, width);
		assert!(pp.correction);
		assert_eq!(pp.shift, 3);
		assert_eq!(pp.bits, (!10_u128 << 3) & 0xffff);
		assert_eq!(pp.bits.wrapping_add(1 << 3) & 0xffff, 0xffb0);
	}

	#[test]
	fn zero_digits_contribute_nothing() {
		let width = Width::W8;
		let multiples = Multiples::precompute(Operand::new(width, 0xff, false).extend());
		for window in [0b0000, 0b1111] {
			let pp = PartialProduct::select(BoothDigit::decode(window), 2, multiples, width);
			assert_eq!(pp, PartialProduct { bits: 0, correction: false, shift: 6 });
		}
	}

	#[test]
	fn correction_vector_is_sparse() {
		// -1 recodes to a single negative digit in window 0.
		let terms = BoothTerms::recode(Operand::new(Width::W8, 3, false), Operand::new(Width::W8, 0xff, true));
		assert_eq!(terms.correction(), CorrectionVector(0b1));

		// -100 recodes to -4, +4, -2.
		let terms = BoothTerms::recode(Operand::new(Width::W8, 3, false), Operand::new(Width::W8, 0x9c, true));
		let expected = terms.partial_products().iter().filter(|pp| pp.correction).fold(0_u128, |acc, pp| acc | (1_u128 << pp.shift));
		assert_eq!(terms.correction().bits(), expected);
		assert_eq!(terms.correction().bits().count_ones(), u32::try_from(terms.partial_products().iter().filter(|pp| pp.correction).count()).unwrap());
	}

	#[test]
	fn exhaustive_8bit() {
		let width = Width::W8;
		for mode in SignMode::ALL {
			for a in 0..=0xff {
				for b in 0..=0xff {
					let terms = BoothTerms::recode(
						Operand::new(width, a, mode.multiplicand_is_signed()),
						Operand::new(width, b, mode.multiplier_is_signed()),
					);
					assert_eq!(terms.sum(), reference::product_bits(width, a, b, mode), "{a:#x} * {b:#x} {mode}");
				}
			}
		}
	}

	#[test]
	fn most_negative() {
		let width = Width::W8;
		let terms = BoothTerms::recode(Operand::new(width, 0x80, true), Operand::new(width, 1, true));
		assert_eq!(terms.sum(), 0xff80);
	}
}

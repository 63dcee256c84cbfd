//! Carry-save reduction and the segmented final adder.
//!
//! Addends are compressed three at a time into (sum, carry) pairs using only bitwise logic until two remain.
//! The last pair is resolved by a [`SplitAdder`]: the low segment is added first and its carry feeds the high
//! segment one stage later, so no single stage carries across the whole product width.

use crate::width::{MAX_WINDOWS, mask};

/// Partial products plus the correction vector.
pub const MAX_ADDENDS: usize = MAX_WINDOWS + 1;

/// Default low segment of the final adder.
pub const DEFAULT_SPLIT: u32 = 8;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CarrySave {
	pub sum: u128,
	pub carry: u128,
}

impl CarrySave {
	/// Bits that differ from `previous`. Switching activity of the pair register.
	pub const fn toggles(self, previous: Self) -> u32 {
		(self.sum ^ previous.sum).count_ones() + (self.carry ^ previous.carry).count_ones()
	}
}

/// 3:2 compressor over `width` bits.
pub const fn compress(a: u128, b: u128, c: u128, width: u32) -> CarrySave {
	let mask = mask(width);
	let sum = a ^ b ^ c;
	let majority = (a & b) | (a & c) | (b & c);
	CarrySave { sum: sum & mask, carry: (majority << 1) & mask }
}

/// Reduces `addends` to one carry-save pair, returning the pair and the number of compressor levels used.
pub fn reduce(addends: &[u128], width: u32) -> (CarrySave, usize) {
	assert!(addends.len() <= MAX_ADDENDS, "{} addends", addends.len());

	let mut level = [0_u128; MAX_ADDENDS];
	level[..addends.len()].copy_from_slice(addends);
	let mut len = addends.len();
	let mut levels = 0;

	while len > 2 {
		let mut next = [0_u128; MAX_ADDENDS];
		let mut next_len = 0;

		let mut groups = level[..len].chunks_exact(3);
		for group in &mut groups {
			let CarrySave { sum, carry } = compress(group[0], group[1], group[2], width);
			next[next_len] = sum;
			next[next_len + 1] = carry;
			next_len += 2;
		}
		for &rest in groups.remainder() {
			next[next_len] = rest;
			next_len += 1;
		}

		level = next;
		len = next_len;
		levels += 1;
	}

	let mask = mask(width);
	(CarrySave { sum: level[0] & mask, carry: level[1] & mask }, levels)
}

/// Final adder cut into a low and a high segment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SplitAdder {
	low_bits: u32,
	width: u32,
}

/// The low segment's result and carry, waiting for the high segment.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LowSegment {
	pub bits: u128,
	pub carry: bool,
}

impl SplitAdder {
	/// `low_bits` is clamped to `width`.
	pub const fn new(low_bits: u32, width: u32) -> Self {
		Self { low_bits: if low_bits < width { low_bits } else { width }, width }
	}

	pub const fn low_bits(self) -> u32 {
		self.low_bits
	}

	pub const fn high_bits(self) -> u32 {
		self.width - self.low_bits
	}

	pub fn add_low(self, pair: CarrySave) -> LowSegment {
		let mask = mask(self.low_bits);
		let (sum, overflow) = (pair.sum & mask).overflowing_add(pair.carry & mask);
		let carry = overflow || sum.checked_shr(self.low_bits).unwrap_or(0) != 0;
		LowSegment { bits: sum & mask, carry }
	}

	pub fn add_high(self, pair: CarrySave, low: LowSegment) -> u128 {
		let sum = pair.sum.checked_shr(self.low_bits).unwrap_or(0);
		let carry = pair.carry.checked_shr(self.low_bits).unwrap_or(0);
		let high = sum.wrapping_add(carry).wrapping_add(u128::from(low.carry)) & mask(self.high_bits());
		high.checked_shl(self.low_bits).unwrap_or(0) | low.bits
	}
}

#[cfg(test)]
mod tests {
	use super::{CarrySave, SplitAdder, compress, reduce};
	use crate::width::mask;

	#[test]
	fn compressor_preserves_sum() {
		static TESTS: &[(u128, u128, u128)] = &[
			(0, 0, 0),
			(1, 1, 1),
			(0xff, 0x01, 0x80),
			(0xffff, 0xffff, 0xffff),
			(0x1234, 0xfedc, 0x0f0f),
		];
		for &(a, b, c) in TESTS {
			let CarrySave { sum, carry } = compress(a, b, c, 16);
			assert_eq!(sum.wrapping_add(carry) & 0xffff, (a + b + c) & 0xffff, "{a:#x} {b:#x} {c:#x}");
		}
	}

	#[test]
	fn reduce_levels() {
		static TESTS: &[(usize, usize)] = &[
			(0, 0),
			(1, 0),
			(2, 0),
			(3, 1),
			(4, 2),
			(7, 4),
			(23, 7),
		];
		for &(n, levels) in TESTS {
			let addends: Vec<u128> = (1..=n).map(|i| (i as u128) * 0x1111).collect();
			let (pair, actual_levels) = reduce(&addends, 32);
			assert_eq!(actual_levels, levels, "{n}");
			assert_eq!(pair.sum.wrapping_add(pair.carry) & mask(32), addends.iter().sum::<u128>() & mask(32), "{n}");
		}
	}

	#[test]
	fn split_adder() {
		static TESTS: &[(u32, u32, u128, u128)] = &[
			(8, 16, 0x00ff, 0x0001),
			(8, 16, 0xffff, 0x0001),
			(8, 16, 0x1234, 0x4321),
			(8, 16, 0x80ff, 0x80ff),
			(4, 16, 0x000f, 0x000f),
			(16, 16, 0xffff, 0xffff),
			(20, 16, 0x00ff, 0x00ff),
			(8, 128, u128::MAX, 1),
			(128, 128, u128::MAX - 1, 1),
		];
		for &(low_bits, width, sum, carry) in TESTS {
			let adder = SplitAdder::new(low_bits, width);
			let pair = CarrySave { sum, carry };
			let low = adder.add_low(pair);
			assert_eq!(adder.add_high(pair, low), sum.wrapping_add(carry) & mask(width), "{low_bits} {width} {sum:#x} {carry:#x}");
		}
	}

	#[test]
	fn split_adder_low_carry() {
		let adder = SplitAdder::new(8, 16);
		let low = adder.add_low(CarrySave { sum: 0x80, carry: 0x80 });
		assert_eq!(low.bits, 0);
		assert!(low.carry);
		assert_eq!(adder.high_bits(), 8);
	}
}

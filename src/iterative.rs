//! Multi-cycle core: one Booth window per tick, summed in a single shift-accumulate register.
//!
//! The register holds the running sum in its upper field and the not yet consumed multiplier bits in its lower
//! field. Each round adds the selected multiple (one's complement plus carry-in for negative digits) to the upper
//! field and then arithmetic-shifts the whole register right by three, which exposes the next window at the low
//! end. The register is sized for the widest operand; narrower operands only change the round count and where the
//! product ends up.

mod awint {
	use awint::{Bits, InlAwi};

	type Awi128 = awint::inlawi_ty!(128);
	type Awi68 = awint::inlawi_ty!(68);
	type Awi135 = awint::inlawi_ty!(135);

	/// Width of the lower field: the padded multiplier of a 64-bit operand.
	pub(super) const LOW_BITS: usize = 67;

	/// A multiple of the extended multiplicand, wide enough for the running sum of a 64-bit operand.
	#[derive(Clone, Copy, Debug)]
	#[repr(transparent)]
	pub(super) struct I68(Awi68);

	impl From<i128> for I68 {
		fn from(i: i128) -> Self {
			let i: Awi128 = i.into();
			let mut result = Awi68::zero();
			result.sign_resize_(&i);
			Self(result)
		}
	}

	impl I68 {
		pub(super) fn zero() -> Self {
			Self(Awi68::zero())
		}

		pub(super) fn add(self, rhs: Self) -> Self {
			let mut inner = self.0;
			inner.add_(&rhs.0).unwrap();
			Self(inner)
		}

		pub(super) fn not(self) -> Self {
			let mut inner = self.0;
			inner.not_();
			Self(inner)
		}
	}

	impl std::ops::Shl<usize> for I68 {
		type Output = Self;

		fn shl(self, rhs: usize) -> Self::Output {
			let mut inner = self.0;
			inner.shl_(rhs).unwrap();
			Self(inner)
		}
	}

	#[derive(Clone, Copy, Debug)]
	#[repr(transparent)]
	pub(super) struct Accumulator(Awi135);

	impl Accumulator {
		pub(super) fn zero() -> Self {
			Self(Awi135::zero())
		}

		/// Upper field cleared, lower field holding the padded multiplier.
		pub(super) fn load(padded_multiplier: u128) -> Self {
			let padded_multiplier: Awi128 = padded_multiplier.into();
			let mut result = Awi135::zero();
			result.zero_resize_(&padded_multiplier);
			Self(result)
		}

		pub(super) fn window(self) -> u8 {
			self.0.to_u8() & 0b1111
		}

		// self[67..] += rhs + cin
		pub(super) fn add_upper(self, cin: bool, rhs: I68) -> Self {
			let upper = awint::inlawi!(&self.0[67..135]).unwrap();
			let mut sum = Awi68::zero();
			sum.cin_sum_(cin, &upper, &rhs.0).unwrap();
			Self(awint::inlawi!(sum, &self.0[..67] ; ..135).unwrap())
		}

		/// The `bits` wide field starting at `offset`.
		pub(super) fn field(self, offset: usize, bits: u32) -> u128 {
			let mut inner = self.0;
			inner.lshr_(offset).unwrap();
			inner.to_u128() & crate::width::mask(bits)
		}

		pub(super) fn toggles(self, previous: Self) -> u32 {
			let mut inner = self.0;
			inner.xor_(&previous.0).unwrap();
			u32::try_from(inner.count_ones()).unwrap()
		}
	}

	impl std::ops::Shr<usize> for Accumulator {
		type Output = Self;

		fn shr(self, rhs: usize) -> Self::Output {
			let mut inner = self.0;
			inner.ashr_(rhs).unwrap();
			Self(inner)
		}
	}
}
use awint::{Accumulator, I68, LOW_BITS};

use crate::{
	Core, Operand, Outputs, Product, Request, SignMode, Statistics, Width,
	encoder::{BoothDigit, Magnitude, PaddedMultiplier},
};

/// The four selectable multiples. Only 3M costs an addition, and it is paid once at capture.
#[derive(Clone, Copy, Debug)]
struct Multiples {
	m: I68,
	m2: I68,
	m3: I68,
	m4: I68,
}

impl Multiples {
	fn precompute(multiplicand: Operand) -> Self {
		let m: I68 = multiplicand.extend().value().into();
		let m2 = m << 1;
		Self { m, m2, m3: m.add(m2), m4: m << 2 }
	}

	fn select(&self, digit: BoothDigit) -> I68 {
		let multiple = match digit.magnitude {
			Magnitude::Zero => I68::zero(),
			Magnitude::One => self.m,
			Magnitude::Two => self.m2,
			Magnitude::Three => self.m3,
			Magnitude::Four => self.m4,
		};
		if digit.negative { multiple.not() } else { multiple }
	}
}

/// One operation in flight.
#[derive(Clone, Copy, Debug)]
struct Operation {
	width: Width,
	mode: SignMode,
	multiples: Multiples,
	acc: Accumulator,
	remaining: usize,
}

impl Operation {
	fn capture(width: Width, request: Request) -> Self {
		let mode = request.mode;
		let multiplicand = Operand::new(width, request.multiplicand, mode.multiplicand_is_signed());
		let multiplier = Operand::new(width, request.multiplier, mode.multiplier_is_signed());
		let padded = PaddedMultiplier::new(multiplier);
		Self {
			width,
			mode,
			multiples: Multiples::precompute(multiplicand),
			acc: Accumulator::load(padded.bits()),
			remaining: width.windows(),
		}
	}
}

enum Step {
	Pending(Operation),
	Done(Product, Accumulator),
}

/// Consumes one window.
fn round(mut op: Operation) -> Step {
	let window = op.acc.window();
	let digit = BoothDigit::decode(window);

	tracing::trace!(window = format_args!("{window:04b}"), digit = digit.value(), remaining = op.remaining, "round");

	op.acc = op.acc.add_upper(digit.negative, op.multiples.select(digit)) >> 3;
	op.remaining -= 1;

	if op.remaining == 0 {
		let offset = LOW_BITS - 3 * op.width.windows();
		let bits = op.acc.field(offset, op.width.product_bits());
		Step::Done(Product::new(bits, op.width, op.mode), op.acc)
	}
	else {
		Step::Pending(op)
	}
}

#[derive(Debug)]
enum State {
	Idle,
	Active(Operation),
}

/// Single-flight controller around the shift-accumulate register.
///
/// A start is captured only while idle. A start while active is ignored and does not disturb the operation in
/// flight.
#[derive(Debug)]
pub struct IterativeCore {
	width: Width,
	state: State,
	acc: Accumulator,
	statistics: Statistics,
}

impl IterativeCore {
	pub fn new(width: Width) -> Self {
		Self {
			width,
			state: State::Idle,
			acc: Accumulator::zero(),
			statistics: Default::default(),
		}
	}
}

impl Core for IterativeCore {
	fn width(&self) -> Width {
		self.width
	}

	fn ready(&self) -> bool {
		matches!(self.state, State::Idle)
	}

	fn busy(&self) -> bool {
		!self.ready()
	}

	fn latency(&self) -> usize {
		self.width.windows() + 1
	}

	fn initiation_interval(&self) -> usize {
		self.width.windows() + 1
	}

	fn tick(&mut self, start: Option<Request>) -> Outputs {
		let previous = self.acc;
		let mut accepted = false;

		let done = match std::mem::replace(&mut self.state, State::Idle) {
			State::Idle => {
				if let Some(request) = start {
					tracing::debug!(?request, "captured");
					let op = Operation::capture(self.width, request);
					self.acc = op.acc;
					self.state = State::Active(op);
					accepted = true;
				}
				None
			},

			State::Active(op) => {
				if let Some(request) = start {
					tracing::warn!(?request, "start while busy ignored");
				}

				match round(op) {
					Step::Pending(op) => {
						self.acc = op.acc;
						self.state = State::Active(op);
						None
					},

					Step::Done(product, acc) => {
						tracing::debug!(%product, "done");
						self.acc = acc;
						Some(product)
					},
				}
			},
		};

		let outputs = Outputs { done, busy: self.busy() };
		self.statistics.record(start.is_some(), accepted, outputs);
		self.statistics.toggles += u64::from(self.acc.toggles(previous));
		outputs
	}

	fn reset(&mut self) {
		self.state = State::Idle;
		self.acc = Accumulator::zero();
	}

	fn statistics(&self) -> Statistics {
		self.statistics
	}
}

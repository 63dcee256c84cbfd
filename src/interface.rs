use crate::{SignMode, Width};

/// Operands and sign mode presented with a start pulse.
///
/// Bits above the core's width are ignored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Request {
	pub multiplicand: u64,
	pub multiplier: u64,
	pub mode: SignMode,
}

/// The exact 2N-bit product.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Product {
	bits: u128,
	width: Width,
	mode: SignMode,
}

impl Product {
	pub const fn new(bits: u128, width: Width, mode: SignMode) -> Self {
		Self { bits: bits & width.product_mask(), width, mode }
	}

	pub const fn bits(self) -> u128 {
		self.bits
	}

	/// Operand width N. The product is `2N` bits.
	pub const fn width(self) -> Width {
		self.width
	}

	pub const fn mode(self) -> SignMode {
		self.mode
	}

	/// The product sign-extended from `2N` bits.
	pub const fn to_i128(self) -> i128 {
		let shift = 128 - self.width.product_bits();
		(self.bits << shift).cast_signed() >> shift
	}

	/// The numeric value, signed unless both operands were unsigned.
	pub fn to_bigint(self) -> num_bigint::BigInt {
		if self.mode.product_is_signed() {
			self.to_i128().into()
		}
		else {
			self.bits.into()
		}
	}
}

impl std::fmt::Display for Product {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let digits = self.width.product_bits().div_ceil(4) as usize;
		write!(f, "0x{:0digits$x} ({})", self.bits, self.to_bigint())
	}
}

/// What a core drives at the end of a tick.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Outputs {
	/// Completion pulse. `Some` on exactly one tick per captured operation.
	pub done: Option<Product>,

	/// Level. Set while a start on the next tick would be ignored or would have to wait.
	pub busy: bool,
}

/// The tick-level request/response contract every multiplier core implements.
///
/// One call to [`Core::tick`] is one clock edge: the core samples `start` together with its own registers from
/// the previous tick and produces the registers for the next one.
pub trait Core {
	/// Operand width N.
	fn width(&self) -> Width;

	/// Whether a start presented on the next tick is captured.
	fn ready(&self) -> bool;

	fn busy(&self) -> bool;

	/// Ticks an operation occupies, from the tick its start is sampled through the tick its completion is signalled.
	fn latency(&self) -> usize;

	/// Minimum ticks between successive accepted starts.
	fn initiation_interval(&self) -> usize;

	fn tick(&mut self, start: Option<Request>) -> Outputs;

	/// Returns every state machine to idle and clears every register.
	fn reset(&mut self);

	fn statistics(&self) -> Statistics;
}

impl<C: Core + ?Sized> Core for Box<C> {
	fn width(&self) -> Width { (**self).width() }

	fn ready(&self) -> bool { (**self).ready() }

	fn busy(&self) -> bool { (**self).busy() }

	fn latency(&self) -> usize { (**self).latency() }

	fn initiation_interval(&self) -> usize { (**self).initiation_interval() }

	fn tick(&mut self, start: Option<Request>) -> Outputs { (**self).tick(start) }

	fn reset(&mut self) { (**self).reset(); }

	fn statistics(&self) -> Statistics { (**self).statistics() }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Statistics {
	pub ticks: u64,
	pub accepted: u64,
	pub completed: u64,
	pub ignored_starts: u64,
	pub busy_ticks: u64,

	/// Register bits flipped, summed over all ticks.
	pub toggles: u64,
}

impl Statistics {
	pub(crate) fn record(&mut self, start: bool, accepted: bool, outputs: Outputs) {
		self.ticks += 1;
		if accepted {
			self.accepted += 1;
		}
		else if start {
			self.ignored_starts += 1;
		}
		if outputs.done.is_some() {
			self.completed += 1;
		}
		if outputs.busy {
			self.busy_ticks += 1;
		}
	}
}

impl std::fmt::Display for Statistics {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "ticks:          {}", self.ticks)?;
		writeln!(f, "accepted:       {}", self.accepted)?;
		writeln!(f, "completed:      {}", self.completed)?;
		writeln!(f, "ignored starts: {}", self.ignored_starts)?;
		writeln!(f, "busy ticks:     {}", self.busy_ticks)?;
		writeln!(f, "toggles:        {}", self.toggles)?;
		Ok(())
	}
}

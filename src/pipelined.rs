//! Fully unrolled core: one operation enters per tick and moves through five registered stages.
//!
//! | Stage     | Work                                                               |
//! |-----------|--------------------------------------------------------------------|
//! | capture   | register the operands and mode                                     |
//! | recode    | extend M, precompute 3M, decode every window                       |
//! | compress  | select partial products, assemble the correction, 3:2 reduce       |
//! | low add   | low segment of the split adder                                     |
//! | high add  | high segment plus the low segment's carry; completion              |
//!
//! Splitting the final adder costs one stage of latency but no throughput.

use crate::{
	Core, Operand, Outputs, Product, Request, SignMode, Statistics, Width,
	encoder::{Digits, PaddedMultiplier},
	reduction::{CarrySave, DEFAULT_SPLIT, LowSegment, MAX_ADDENDS, SplitAdder, reduce},
	selector::{BoothTerms, Multiples},
};

#[derive(Clone, Copy, Debug)]
struct Captured {
	multiplicand: Operand,
	multiplier: Operand,
	mode: SignMode,
}

#[derive(Clone, Copy, Debug)]
struct Recoded {
	multiples: Multiples,
	digits: Digits,
	mode: SignMode,
}

#[derive(Clone, Copy, Debug)]
struct Compressed {
	pair: CarrySave,
	mode: SignMode,
}

#[derive(Clone, Copy, Debug)]
struct LowAdded {
	pair: CarrySave,
	low: LowSegment,
	mode: SignMode,
}

#[derive(Debug)]
pub struct PipelinedCore {
	width: Width,
	adder: SplitAdder,

	captured: Option<Captured>,
	recoded: Option<Recoded>,
	compressed: Option<Compressed>,
	low_added: Option<LowAdded>,

	/// Holds its last value while the compress stage is empty.
	carry_save: CarrySave,

	statistics: Statistics,
}

impl PipelinedCore {
	pub fn new(width: Width) -> Self {
		Self::with_split(width, DEFAULT_SPLIT)
	}

	/// `low_bits` is the width of the first final adder segment, clamped to the product width.
	pub fn with_split(width: Width, low_bits: u32) -> Self {
		Self {
			width,
			adder: SplitAdder::new(low_bits, width.product_bits()),
			captured: None,
			recoded: None,
			compressed: None,
			low_added: None,
			carry_save: Default::default(),
			statistics: Default::default(),
		}
	}

	pub fn split_adder(&self) -> SplitAdder {
		self.adder
	}

	/// Operations captured but not yet completed.
	pub fn in_flight(&self) -> usize {
		usize::from(self.captured.is_some()) +
		usize::from(self.recoded.is_some()) +
		usize::from(self.compressed.is_some()) +
		usize::from(self.low_added.is_some())
	}

	fn capture(width: Width, request: Request) -> Captured {
		let mode = request.mode;
		Captured {
			multiplicand: Operand::new(width, request.multiplicand, mode.multiplicand_is_signed()),
			multiplier: Operand::new(width, request.multiplier, mode.multiplier_is_signed()),
			mode,
		}
	}

	fn recode(captured: Captured) -> Recoded {
		Recoded {
			multiples: Multiples::precompute(captured.multiplicand.extend()),
			digits: PaddedMultiplier::new(captured.multiplier).recode(),
			mode: captured.mode,
		}
	}

	fn compress(width: Width, recoded: &Recoded) -> Compressed {
		let terms = BoothTerms::new(&recoded.digits, recoded.multiples, width);

		let mut addends = [0_u128; MAX_ADDENDS];
		let mut len = 0;
		for (slot, addend) in addends.iter_mut().zip(terms.addends()) {
			*slot = addend;
			len += 1;
		}

		let (pair, levels) = reduce(&addends[..len], width.product_bits());
		tracing::trace!(addends = len, levels, sum = format_args!("{:#x}", pair.sum), carry = format_args!("{:#x}", pair.carry), "compressed");

		Compressed { pair, mode: recoded.mode }
	}
}

impl Core for PipelinedCore {
	fn width(&self) -> Width {
		self.width
	}

	fn ready(&self) -> bool {
		true
	}

	fn busy(&self) -> bool {
		false
	}

	fn latency(&self) -> usize {
		5
	}

	fn initiation_interval(&self) -> usize {
		1
	}

	fn tick(&mut self, start: Option<Request>) -> Outputs {
		let width = self.width;
		let adder = self.adder;

		// Every stage reads the registers as they were before this edge.
		let done = self.low_added.take().map(|LowAdded { pair, low, mode }| {
			let product = Product::new(adder.add_high(pair, low), width, mode);
			tracing::debug!(%product, "done");
			product
		});
		self.low_added = self.compressed.take().map(|Compressed { pair, mode }| LowAdded { pair, low: adder.add_low(pair), mode });
		self.compressed = self.recoded.take().map(|recoded| Self::compress(width, &recoded));
		self.recoded = self.captured.take().map(Self::recode);
		self.captured = start.map(|request| {
			tracing::debug!(?request, "captured");
			Self::capture(width, request)
		});

		if let Some(compressed) = self.compressed {
			self.statistics.toggles += u64::from(compressed.pair.toggles(self.carry_save));
			self.carry_save = compressed.pair;
		}

		let outputs = Outputs { done, busy: false };
		self.statistics.record(start.is_some(), start.is_some(), outputs);
		outputs
	}

	fn reset(&mut self) {
		self.captured = None;
		self.recoded = None;
		self.compressed = None;
		self.low_added = None;
		self.carry_save = Default::default();
	}

	fn statistics(&self) -> Statistics {
		self.statistics
	}
}

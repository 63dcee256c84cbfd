//! A `2n`-bit multiplier built from four `n`-bit lanes.
//!
//! Each operand is cut into halves, `A = Ah * 2^n + Al` and `B = Bh * 2^n + Bl`. Only the high halves carry the
//! operands' signs, so the four lanes run in the modes
//!
//! | Lane  | Operands  | Mode                              |
//! |-------|-----------|-----------------------------------|
//! | ll    | Al * Bl   | uu                                |
//! | hl    | Ah * Bl   | multiplicand's signedness only    |
//! | lh    | Al * Bh   | multiplier's signedness only      |
//! | hh    | Ah * Bh   | the request's mode                |
//!
//! and are recombined as `A * B = (hh * 2^n + ll[n..] + hl + lh) * 2^n + ll[..n]`.

use crate::{Core, Error, Outputs, Product, Request, SignMode, Statistics, Width, width::mask};

/// Widest lane. Two such lanes make a [`crate::width::MAX_WIDTH`]-bit multiplier.
pub const MAX_LANE_WIDTH: u32 = crate::width::MAX_WIDTH / 2;

/// Splits a `2n`-bit request into the four lane requests, in the order ll, hl, lh, hh.
pub fn split(lane_width: Width, request: Request) -> [Request; 4] {
	let Request { multiplicand, multiplier, mode } = request;
	let n = lane_width.bits();
	let multiplicand_low = lane_width.truncate(multiplicand);
	let multiplicand_high = lane_width.truncate(multiplicand >> n);
	let multiplier_low = lane_width.truncate(multiplier);
	let multiplier_high = lane_width.truncate(multiplier >> n);

	[
		Request { multiplicand: multiplicand_low, multiplier: multiplier_low, mode: SignMode::UU },
		Request { multiplicand: multiplicand_high, multiplier: multiplier_low, mode: SignMode::from_signedness(mode.multiplicand_is_signed(), false) },
		Request { multiplicand: multiplicand_low, multiplier: multiplier_high, mode: SignMode::from_signedness(false, mode.multiplier_is_signed()) },
		Request { multiplicand: multiplicand_high, multiplier: multiplier_high, mode },
	]
}

/// Combines four lane products, in the order ll, hl, lh, hh, into the `4n`-bit product.
///
/// The low `n` bits come straight from ll. The two middle terms are summed first, and only that sum is added to
/// `hh` concatenated with the high half of ll.
pub fn recombine(lanes: [Product; 4]) -> Product {
	let [ll, hl, lh, hh] = lanes;
	let lane_width = ll.width();
	let n = lane_width.bits();
	let upper_bits = 3 * n;

	let low = ll.bits() & mask(n);

	let middle = lane_value(hl) + lane_value(lh);

	let base = (hh.bits() << n) | (ll.bits() >> n);
	#[allow(clippy::cast_sign_loss)]
	let upper = base.wrapping_add(middle as u128) & mask(upper_bits);

	// Lane widths are at most 32 bits, so the composed width always exists.
	let width = Width::new(2 * n).unwrap();
	Product::new((upper << n) | low, width, hh.mode())
}

#[allow(clippy::cast_possible_wrap)]
fn lane_value(product: Product) -> i128 {
	if product.mode().product_is_signed() {
		product.to_i128()
	}
	else {
		product.bits() as i128
	}
}

/// Four lanes started on the same tick, plus a registered recombination stage.
///
/// The lanes are identical cores with a fixed latency, so they always complete on the same tick.
#[derive(Debug)]
pub struct WideComposer<C> {
	width: Width,
	lanes: [C; 4],
	combine: Option<[Product; 4]>,
	statistics: Statistics,
}

impl<C> WideComposer<C> where C: Core {
	/// A `2 * lane_width`-bit composer whose lanes are built by `lane`.
	pub fn new(lane_width: Width, mut lane: impl FnMut(Width) -> C) -> Result<Self, Error> {
		if lane_width.bits() > MAX_LANE_WIDTH {
			return Err(Error::UnsupportedLaneWidth { bits: lane_width.bits(), max: MAX_LANE_WIDTH });
		}

		Ok(Self {
			width: Width::new(2 * lane_width.bits())?,
			lanes: std::array::from_fn(|_| lane(lane_width)),
			combine: None,
			statistics: Default::default(),
		})
	}

	pub fn lanes(&self) -> &[C; 4] {
		&self.lanes
	}
}

impl<C> Core for WideComposer<C> where C: Core {
	fn width(&self) -> Width {
		self.width
	}

	fn ready(&self) -> bool {
		self.lanes.iter().all(Core::ready)
	}

	fn busy(&self) -> bool {
		self.lanes.iter().any(Core::busy)
	}

	fn latency(&self) -> usize {
		self.lanes[0].latency() + 1
	}

	fn initiation_interval(&self) -> usize {
		self.lanes[0].initiation_interval()
	}

	fn tick(&mut self, start: Option<Request>) -> Outputs {
		let done = self.combine.take().map(|lanes| {
			let product = recombine(lanes);
			tracing::debug!(%product, "done");
			product
		});

		let starts = match start {
			Some(request) if self.ready() => {
				tracing::debug!(?request, "captured");
				Some(split(self.lanes[0].width(), request))
			},

			Some(request) => {
				tracing::warn!(?request, "start while busy ignored");
				None
			},

			None => None,
		};

		let mut lane_outputs = [Outputs::default(); 4];
		for (i, (lane, outputs)) in self.lanes.iter_mut().zip(&mut lane_outputs).enumerate() {
			*outputs = lane.tick(starts.map(|starts| starts[i]));
		}

		self.combine = match lane_outputs.map(|outputs| outputs.done) {
			[Some(ll), Some(hl), Some(lh), Some(hh)] => {
				tracing::trace!(%ll, %hl, %lh, %hh, "lanes done");
				Some([ll, hl, lh, hh])
			},

			[None, None, None, None] => None,

			lanes => unreachable!("lanes completed on different ticks: {lanes:?}"),
		};

		let outputs = Outputs { done, busy: lane_outputs.iter().any(|outputs| outputs.busy) };
		self.statistics.record(start.is_some(), starts.is_some(), outputs);
		outputs
	}

	fn reset(&mut self) {
		for lane in &mut self.lanes {
			lane.reset();
		}
		self.combine = None;
	}

	fn statistics(&self) -> Statistics {
		let toggles = self.lanes.iter().map(|lane| lane.statistics().toggles).sum();
		Statistics { toggles, ..self.statistics }
	}
}

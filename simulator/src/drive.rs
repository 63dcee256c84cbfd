use anyhow::Context as _;
use booth::{Core, Product, Request};

#[derive(Debug)]
pub(crate) struct Completion {
	/// Index into the issued requests.
	pub(crate) index: usize,
	pub(crate) product: Product,
	pub(crate) issued_at: u64,
	pub(crate) done_at: u64,
}

/// Issues `requests` in order and collects one completion per request.
///
/// A request is presented while the core is not busy. With `back_to_back` it is presented on every tick instead,
/// and presented again on the next tick if the core did not take it.
pub(crate) fn run(core: &mut dyn Core, requests: &[Request], back_to_back: bool) -> anyhow::Result<Vec<Completion>> {
	let per_operation = u64::try_from(core.latency() + core.initiation_interval()).context("latency overflow")?;
	let limit = (u64::try_from(requests.len()).context("too many requests")? + 1) * per_operation * 2;

	let mut next = 0;
	let mut in_flight = std::collections::VecDeque::new();
	let mut completions = Vec::with_capacity(requests.len());
	let mut tick = 0_u64;

	while completions.len() < requests.len() {
		anyhow::ensure!(tick < limit, "{} of {} operations still incomplete after {tick} ticks", requests.len() - completions.len(), requests.len());
		tick += 1;

		let start = requests.get(next).copied().filter(|_| back_to_back || !core.busy());
		let accepted = start.is_some() && core.ready();

		let outputs = core.tick(start);

		if accepted {
			tracing::trace!(tick, index = next, "issued");
			in_flight.push_back((next, tick));
			next += 1;
		}

		if let Some(product) = outputs.done {
			let (index, issued_at) = in_flight.pop_front().context("completion with no operation in flight")?;
			tracing::trace!(tick, index, "completed");
			completions.push(Completion { index, product, issued_at, done_at: tick });
		}
	}

	Ok(completions)
}

#[cfg(test)]
mod tests {
	use booth::{Core, IterativeCore, PipelinedCore, Request, SignMode, Streaming, WideComposer, Width, reference};

	use super::run;

	fn requests(width: Width) -> Vec<Request> {
		(0..24_u64)
			.map(|i| Request {
				multiplicand: width.truncate(0x9e37_79b9_7f4a_7c15_u64.wrapping_mul(i + 1)),
				multiplier: width.truncate(0xc2b2_ae3d_27d4_eb4f_u64.wrapping_mul(i + 7)),
				mode: SignMode::from_bits(u8::try_from(i % 4).unwrap()),
			})
			.collect()
	}

	fn check(core: &mut dyn Core, back_to_back: bool) {
		let width = core.width();
		let requests = requests(width);
		let completions = run(core, &requests, back_to_back).unwrap();

		assert_eq!(completions.len(), requests.len());
		for (i, completion) in completions.iter().enumerate() {
			assert_eq!(completion.index, i);
			let request = requests[i];
			assert_eq!(completion.product.to_bigint(), reference::reference_multiply(width, request.multiplicand, request.multiplier, request.mode));
			assert!(completion.done_at >= completion.issued_at + u64::try_from(core.latency()).unwrap() - 1);
		}
	}

	#[test]
	fn every_core() {
		for back_to_back in [false, true] {
			check(&mut IterativeCore::new(Width::W8), back_to_back);
			check(&mut IterativeCore::new(Width::W64), back_to_back);
			check(&mut PipelinedCore::new(Width::W32), back_to_back);
			check(&mut Streaming::new(IterativeCore::new(Width::W16)), back_to_back);
			check(&mut Streaming::new(PipelinedCore::new(Width::W16)), back_to_back);
			check(&mut WideComposer::new(Width::W8, IterativeCore::new).unwrap(), back_to_back);
			check(&mut WideComposer::new(Width::W32, PipelinedCore::new).unwrap(), back_to_back);
		}
	}

	#[test]
	fn back_to_back_counts_ignored_starts() {
		let mut core = IterativeCore::new(Width::W8);
		let requests = requests(Width::W8);
		_ = run(&mut core, &requests, true).unwrap();

		let statistics = core.statistics();
		assert_eq!(statistics.accepted, 24);
		assert_eq!(statistics.completed, 24);
		// Each of the first 23 operations turns away a start on every tick after its capture.
		assert_eq!(statistics.ignored_starts, 23 * 3);

		let mut core = IterativeCore::new(Width::W8);
		_ = run(&mut core, &requests, false).unwrap();
		assert_eq!(core.statistics().ignored_starts, 0);
	}
}

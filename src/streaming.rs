use crate::{Core, Outputs, Request, Statistics, Width};

/// A depth-1 input buffer in front of another core.
///
/// A start is registered into the buffer and handed to the inner core on a later tick, as soon as the inner core
/// can take it. Because the buffer frees up on the hand-off tick, the caller can queue the next operation while
/// the previous one is still being worked on, so the inner core's initiation interval is kept even though every
/// operation takes one tick longer end to end.
///
/// `busy` is asserted while the buffer holds an operation, including the tick it was loaded on.
/// A start that arrives while the buffer is full and the inner core can't drain it is ignored.
#[derive(Debug)]
pub struct Streaming<C> {
	inner: C,
	buffer: Option<Request>,
	busy: bool,
	statistics: Statistics,
}

impl<C> Streaming<C> where C: Core {
	pub fn new(inner: C) -> Self {
		Self {
			inner,
			buffer: None,
			busy: false,
			statistics: Default::default(),
		}
	}

	pub fn inner(&self) -> &C {
		&self.inner
	}

	/// The operation waiting for the inner core, if any.
	pub fn buffered(&self) -> Option<Request> {
		self.buffer
	}
}

impl<C> Core for Streaming<C> where C: Core {
	fn width(&self) -> Width {
		self.inner.width()
	}

	fn ready(&self) -> bool {
		self.buffer.is_none() || self.inner.ready()
	}

	fn busy(&self) -> bool {
		self.busy
	}

	fn latency(&self) -> usize {
		self.inner.latency() + 1
	}

	fn initiation_interval(&self) -> usize {
		self.inner.initiation_interval()
	}

	fn tick(&mut self, start: Option<Request>) -> Outputs {
		let forwarded = if self.inner.ready() { self.buffer.take() } else { None };
		if let Some(request) = forwarded {
			tracing::debug!(?request, "handed off");
		}

		let inner = self.inner.tick(forwarded);

		let mut accepted = false;
		if let Some(request) = start {
			if self.buffer.is_none() {
				tracing::debug!(?request, "buffered");
				self.buffer = Some(request);
				accepted = true;
			}
			else {
				tracing::warn!(?request, "start while buffer is full ignored");
			}
		}

		self.busy = accepted || self.buffer.is_some();

		let outputs = Outputs { done: inner.done, busy: self.busy };
		self.statistics.record(start.is_some(), accepted, outputs);
		outputs
	}

	fn reset(&mut self) {
		self.inner.reset();
		self.buffer = None;
		self.busy = false;
	}

	fn statistics(&self) -> Statistics {
		Statistics { toggles: self.inner.statistics().toggles, ..self.statistics }
	}
}

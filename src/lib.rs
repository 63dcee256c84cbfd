//! Booth radix-8 multiplier cores.
//!
//! Every core multiplies two N-bit operands under one of four sign interpretations and produces the exact 2N-bit
//! product. The cores differ only in how the work is staged across clock ticks:
//!
//! - [`IterativeCore`] consumes one Booth window per tick in a single shift-accumulate register.
//! - [`PipelinedCore`] is fully unrolled and accepts one operation per tick.
//! - [`Streaming`] puts a one-deep input buffer in front of another core.
//! - [`WideComposer`] builds a 2n-bit multiplier out of four n-bit cores.
//!
//! All of them implement [`Core`], the tick-level request/response contract.

mod encoder;
pub use encoder::{BoothDigit, Digits, Magnitude, PaddedMultiplier};

mod error;
pub use error::Error;

mod interface;
pub use interface::{Core, Outputs, Product, Request, Statistics};

mod iterative;
pub use iterative::IterativeCore;

mod operand;
pub use operand::{ExtendedOperand, Operand};

mod pipelined;
pub use pipelined::PipelinedCore;

pub mod reduction;

pub mod reference;
pub use reference::reference_multiply;

pub mod selector;

mod sign_mode;
pub use sign_mode::SignMode;

mod streaming;
pub use streaming::Streaming;

pub mod width;
pub use width::Width;

pub mod wide;
pub use wide::WideComposer;

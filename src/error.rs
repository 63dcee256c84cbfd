#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("operand width {bits} is not in 1..={max}")]
	UnsupportedWidth { bits: u32, max: u32 },

	#[error("lane width {bits} is not in 1..={max}")]
	UnsupportedLaneWidth { bits: u32, max: u32 },

	#[error("{name} {value} does not fit in {bits} bits")]
	OperandOverflow { name: &'static str, value: i128, bits: u32 },

	#[error("malformed operand {token:?}")]
	MalformedOperand { token: String },

	#[error("unknown sign mode {0:?}, expected one of uu, us, su, ss")]
	UnknownSignMode(String),
}

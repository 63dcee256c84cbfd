use crate::Error;

/// Signedness of the two operands.
///
/// Bit 1 selects the multiplicand interpretation, bit 0 the multiplier interpretation.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum SignMode {
	UU = 0b00,
	US = 0b01,
	SU = 0b10,
	SS = 0b11,
}

impl SignMode {
	pub const ALL: [Self; 4] = [Self::UU, Self::US, Self::SU, Self::SS];

	pub const fn from_bits(bits: u8) -> Self {
		match bits & 0b11 {
			0b00 => Self::UU,
			0b01 => Self::US,
			0b10 => Self::SU,
			_ => Self::SS,
		}
	}

	pub const fn from_signedness(multiplicand_is_signed: bool, multiplier_is_signed: bool) -> Self {
		Self::from_bits(((multiplicand_is_signed as u8) << 1) | multiplier_is_signed as u8)
	}

	pub const fn bits(self) -> u8 {
		self as u8
	}

	pub const fn multiplicand_is_signed(self) -> bool {
		self.bits() & 0b10 != 0
	}

	pub const fn multiplier_is_signed(self) -> bool {
		self.bits() & 0b01 != 0
	}

	/// Whether the product is read back as a signed value.
	pub const fn product_is_signed(self) -> bool {
		self.bits() != 0
	}
}

impl std::fmt::Display for SignMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Self::UU => "uu",
			Self::US => "us",
			Self::SU => "su",
			Self::SS => "ss",
		})
	}
}

impl std::str::FromStr for SignMode {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"uu" | "UU" | "0" => Self::UU,
			"us" | "US" | "1" => Self::US,
			"su" | "SU" | "2" => Self::SU,
			"ss" | "SS" | "3" => Self::SS,
			_ => return Err(Error::UnknownSignMode(s.to_owned())),
		})
	}
}

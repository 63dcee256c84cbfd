use anyhow::Context as _;
use booth::{Error, Request, Width};

/// Reads every operation from `paths`, in order. `-` is stdin.
///
/// One operation per line, `<multiplicand> <multiplier> <mode>`. `#` starts a comment.
pub(crate) fn read(width: Width, paths: &[std::path::PathBuf]) -> anyhow::Result<Vec<Request>> {
	let mut requests = vec![];

	for path in paths {
		let contents =
			if path.as_os_str() == "-" {
				std::io::read_to_string(std::io::stdin())
			}
			else {
				std::fs::read_to_string(path)
			};
		let contents = contents.with_context(|| format!("could not read {}", path.display()))?;

		for (i, line) in contents.lines().enumerate() {
			let request = parse_line(width, line).with_context(|| format!("{}:{}", path.display(), i + 1))?;
			requests.extend(request);
		}
	}

	Ok(requests)
}

pub(crate) fn parse_line(width: Width, line: &str) -> Result<Option<Request>, Error> {
	let line = line.split_once('#').map_or(line, |(line, _)| line).trim();
	if line.is_empty() {
		return Ok(None);
	}

	let mut tokens = line.split_whitespace();
	let (Some(multiplicand), Some(multiplier), Some(mode), None) = (tokens.next(), tokens.next(), tokens.next(), tokens.next()) else {
		return Err(Error::MalformedOperand { token: line.to_owned() });
	};

	Ok(Some(Request {
		multiplicand: width.check("multiplicand", parse_number(multiplicand)?)?,
		multiplier: width.check("multiplier", parse_number(multiplier)?)?,
		mode: mode.parse()?,
	}))
}

/// Decimal or `0x` hex, optionally negative. `_` separators are allowed.
fn parse_number(token: &str) -> Result<i128, Error> {
	let malformed = || Error::MalformedOperand { token: token.to_owned() };

	let (negative, digits) = match token.strip_prefix('-') {
		Some(digits) => (true, digits),
		None => (false, token),
	};
	let digits = digits.replace('_', "");

	let magnitude =
		if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
			u128::from_str_radix(hex, 16)
		}
		else {
			digits.parse()
		};
	let magnitude = i128::try_from(magnitude.map_err(|_| malformed())?).map_err(|_| malformed())?;

	Ok(if negative { -magnitude } else { magnitude })
}

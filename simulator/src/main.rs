//! Drives a multiplier core tick by tick with operations read from stimulus files.
//!
//! Example:
//!
//!     printf '10 5 uu\n-10 5 ss\n' | cargo run -p simulator -- --core streaming --check -

mod drive;

mod stimulus;

use anyhow::Context as _;
use booth::{Core, IterativeCore, PipelinedCore, Streaming, WideComposer, Width};

#[derive(Debug, clap::Parser)]
#[command(about = "Tick-level driver for the Booth radix-8 multiplier cores")]
struct Args {
	/// Core to drive.
	#[arg(long, value_enum, default_value_t = CoreKind::Iterative)]
	core: CoreKind,

	/// Core inside `--core streaming`, and the lanes of `--core wide`.
	#[arg(long, value_enum, default_value_t = LaneKind::Iterative)]
	lane: LaneKind,

	/// Operand width. Defaults to 8, or 16 for `--core wide`.
	#[arg(long)]
	width: Option<u32>,

	/// Width of the low segment of the pipelined core's final adder.
	#[arg(long, default_value_t = booth::reduction::DEFAULT_SPLIT)]
	split_at: u32,

	/// Compare every product against the arbitrary-precision reference.
	#[arg(long)]
	check: bool,

	/// Present a start on every tick, even while the core is busy.
	#[arg(long)]
	back_to_back: bool,

	/// Files of `<multiplicand> <multiplier> <mode>` lines. `-` is stdin.
	#[arg(required = true)]
	stimulus: Vec<std::path::PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum CoreKind {
	Iterative,
	Pipelined,
	Streaming,
	Wide,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum LaneKind {
	Iterative,
	Pipelined,
}

impl LaneKind {
	fn build(self, width: Width, split_at: u32) -> Box<dyn Core> {
		match self {
			Self::Iterative => Box::new(IterativeCore::new(width)),
			Self::Pipelined => Box::new(PipelinedCore::with_split(width, split_at)),
		}
	}
}

fn main() -> anyhow::Result<()> {
	let filter =
		tracing_subscriber::EnvFilter::try_from_env("SIMULATOR_LOG")
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	let args: Args = clap::Parser::parse();

	let width = args.width.unwrap_or(match args.core {
		CoreKind::Wide => 16,
		CoreKind::Iterative | CoreKind::Pipelined | CoreKind::Streaming => 8,
	});
	let width = Width::new(width)?;

	let mut core = build(&args, width)?;
	tracing::info!(core = ?args.core, %width, latency = core.latency(), initiation_interval = core.initiation_interval(), "starting");

	let requests = stimulus::read(width, &args.stimulus)?;
	let completions = drive::run(&mut *core, &requests, args.back_to_back)?;

	let mut mismatches = 0_usize;
	for completion in &completions {
		let request = requests[completion.index];
		let product = completion.product;

		println!(
			"{:#x} * {:#x} {} = {product} [ticks {}..={}]",
			request.multiplicand, request.multiplier, request.mode,
			completion.issued_at, completion.done_at,
		);

		if args.check {
			let expected = booth::reference_multiply(width, request.multiplicand, request.multiplier, request.mode);
			if product.to_bigint() != expected {
				tracing::error!(index = completion.index, %product, %expected, "product differs from the reference");
				mismatches += 1;
			}
		}
	}

	println!();
	println!("{}", core.statistics());

	anyhow::ensure!(mismatches == 0, "{mismatches} of {} products differ from the reference", completions.len());

	Ok(())
}

fn build(args: &Args, width: Width) -> anyhow::Result<Box<dyn Core>> {
	let lane = args.lane;
	let split_at = args.split_at;

	Ok(match args.core {
		CoreKind::Iterative => LaneKind::Iterative.build(width, split_at),

		CoreKind::Pipelined => LaneKind::Pipelined.build(width, split_at),

		CoreKind::Streaming => Box::new(Streaming::new(lane.build(width, split_at))),

		CoreKind::Wide => {
			anyhow::ensure!(width.bits() % 2 == 0, "--core wide needs an even width, not {width}");
			let lane_width = Width::new(width.bits() / 2)?;
			let composer = WideComposer::new(lane_width, |lane_width| lane.build(lane_width, split_at)).context("could not build the wide composer")?;
			Box::new(composer)
		},
	})
}

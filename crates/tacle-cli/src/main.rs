//! Command-line front end for `tacle`: reads a CSV sheet and prints every
//! constraint the catalogue discovers.

use std::path::PathBuf;
use std::process::ExitCode;

use tacle::catalogue::catalogue;
use tracing::{error, info};
use tracing_subscriber::fmt::time::uptime;

const HELP: &str = "\
tacle-cli: discover structural and arithmetic constraints in a CSV sheet

USAGE:
    tacle-cli [OPTIONS] <INPUT.csv>

OPTIONS:
    -p, --pattern <GLOB>   Only print constraints whose rendering matches GLOB
    -v, --verbose          Increase log verbosity (-v, -vv)
    -h, --help             Print this help and exit
";

struct Args {
	input: PathBuf,
	pattern: Option<String>,
	verbose: u8,
}

fn parse_args() -> Result<Args, pico_args::Error> {
	let mut pargs = pico_args::Arguments::from_env();
	if pargs.contains(["-h", "--help"]) {
		print!("{HELP}");
		std::process::exit(0);
	}
	let args = Args {
		pattern: pargs.opt_value_from_str(["-p", "--pattern"])?,
		verbose: pargs.contains(["-v", "--verbose"]) as u8 + pargs.contains("-vv") as u8,
		input: pargs.free_from_os_str(|s| Ok::<_, &str>(PathBuf::from(s)))?,
	};
	let remaining = pargs.finish();
	if !remaining.is_empty() {
		return Err(pico_args::Error::ArgumentParsingFailed {
			cause: format!("unrecognised arguments: {remaining:?}"),
		});
	}
	Ok(args)
}

fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => tracing::Level::WARN,
		1 => tracing::Level::INFO,
		_ => tracing::Level::DEBUG,
	};
	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_timer(uptime())
		.with_writer(std::io::stderr)
		.init();
}

fn main() -> ExitCode {
	let args = match parse_args() {
		Ok(args) => args,
		Err(e) => {
			eprintln!("{HELP}\nerror: {e}");
			return ExitCode::FAILURE;
		}
	};
	init_logging(args.verbose);

	let store = match tacle::learn_from_csv(&args.input) {
		Ok(store) => store,
		Err(e) => {
			error!(error = %e, "failed to learn constraints");
			return ExitCode::FAILURE;
		}
	};
	info!(found = store.len(), "learning finished");

	let templates = catalogue();
	let pattern = args.pattern.as_deref().unwrap_or("*");
	let mut printed = 0;
	for (_, rendered) in tacle::filter_constraints(&store, &templates, pattern) {
		println!("{rendered}");
		printed += 1;
	}
	info!(printed, "constraints printed");
	ExitCode::SUCCESS
}

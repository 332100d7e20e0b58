use std::borrow::Cow;
use std::io::{self, BufWriter, Write as _};
use std::string::FromUtf8Error;

use gumdrop::Options;
use hardlight::driver::{TokenKind, Tokenizer};
use hardlight::logging::{self, LogConfig, LogFormat};
use tracing::Level;
use tracing_subscriber::util::TryInitError;

mod support;

use support::HexArray;

#[derive(Debug, Options)]
enum Command {

	#[options(help = "print every token of a document")]
	Tokens(InputArgs),

	#[options(help = "print the frontmatter block of a document")]
	Frontmatter(InputArgs),

	#[options(help = "print the persisted scanner state after every token")]
	State(InputArgs),
}

#[derive(Debug, Options)]
struct InputArgs {

	#[options(help = "document to scan ('-' for stdin)", required)]
	input_file: String,

	#[options(no_short, help = "log level (trace, debug, info, warn, error)", default = "warn")]
	log_level: Level,

	#[options(no_short, help = "log level for scanner events, if different")]
	scanner_log_level: Option<Level>,

	#[options(no_short, help = "log level for driver events, if different")]
	driver_log_level: Option<Level>,

	#[options(no_short, help = "log output format (compact, pretty, json)", default = "compact")]
	log_format: LogFormat,

	#[options(help = "show help for this command")]
	help: bool,
}

impl InputArgs {
	fn log_config(&self) -> LogConfig {
		LogConfig {
			global: self.log_level,
			scanner: self.scanner_log_level,
			driver: self.driver_log_level,
		}
	}
}

#[derive(Debug, thiserror::Error)]
enum RunError {
	#[error("{}", .0)]
	IoError(#[from] io::Error),
	#[error("input is not UTF-8: {}", .0)]
	NotUtf8(#[from] FromUtf8Error),
	#[error("document has no frontmatter block")]
	NoFrontmatter,
	#[error("couldn't set up logging: {}", .0)]
	Logging(#[from] TryInitError),
}

impl RunError {
	fn exit_code(&self) -> ExitCode {
		match *self {
			RunError::IoError(_) => ExitCode::IoError,
			RunError::NotUtf8(_) | RunError::NoFrontmatter => ExitCode::InvalidData,
			RunError::Logging(_) => ExitCode::InternalError,
		}
	}
}

impl Command {
	fn args(&self) -> &InputArgs {
		match *self {
			Command::Tokens(ref a) | Command::Frontmatter(ref a) | Command::State(ref a) => a,
		}
	}

	fn user_wants_help(&self) -> bool {
		self.args().help
	}

	fn print_usage_and_exit(process_name: &str, command_name: Option<&'static str>) -> ! {
		let to_print = command_name.and_then(Command::command_usage)
			.unwrap_or_else(Command::usage);
		eprintln!("{}", to_print);
		eprintln!("\nRun '{} `subcommand` --help' for more guidance", process_name);
		std::process::exit(ExitCode::Success.into());
	}
}

#[repr(i32)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum ExitCode {
	Success = 0,
	InternalError = 1,
	IoError = 2,
	CliArgError = 3,
	InvalidData = 4,
}

impl From<ExitCode> for i32 {
	fn from(src: ExitCode) -> Self {
		src as i32
	}
}


trait HelpExt: Eq + PartialEq<str> {
	fn is_help(&self) -> bool {
		["help", "-h", "--help", "-help"].into_iter().any(|help| self == help)
	}
}
impl HelpExt for str {}


fn main() {
	let (process, args_str) = {
		let mut iter = std::env::args();
		let process = iter.next().map(Cow::Owned).unwrap_or(
			Cow::Borrowed(env!("CARGO_BIN_NAME"))
		);
		(process, iter.collect::<Vec<_>>())
	};
	if args_str.is_empty() || matches!(*args_str, [ref s] if s.is_help()) {
		Command::print_usage_and_exit(&process, None);
	}
	let command = match Command::parse_args_default(&args_str) {
		Ok(c) if c.user_wants_help() => Command::print_usage_and_exit(&process, c.command_name()),
		Ok(c) => c,
		Err(e) => {
			eprintln!("argument error: {}", e);
			eprintln!("run `{} help` for usage guidelines", process);
			std::process::exit(ExitCode::CliArgError.into());
		}
	};

	let code = match run(command) {
		Ok(()) => ExitCode::Success,
		// output closed early, e.g. piped into `head`
		Err(RunError::IoError(e)) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::Success,
		Err(e) => {
			eprintln!("error: {}", e);
			e.exit_code()
		},
	};
	std::process::exit(code.into());
}

fn run(command: Command) -> Result<(), RunError> {
	let args = command.args();
	logging::init(&args.log_config(), args.log_format)?;
	tracing::debug!(target: logging::DRIVER, levels = %args.log_config(), input = %args.input_file,
		"starting");

	let src = String::from_utf8(support::read_input(&args.input_file)?)?;

	let stdout = io::stdout();
	let mut output = BufWriter::new(stdout.lock());

	match command {
		Command::Tokens(_) => {
			for token in Tokenizer::new(&src) {
				writeln!(output, "{} {:?}", token, token.text(&src))?;
			}
		},
		Command::Frontmatter(_) => {
			let mut tokens = Tokenizer::new(&src).take(2);
			match (tokens.next(), tokens.next()) {
				(Some(fence), Some(body)) if fence.kind == TokenKind::FrontmatterFence => {
					// an empty block has no body token, only its two fences
					if body.kind == TokenKind::Frontmatter {
						output.write_all(body.text(&src).as_bytes())?;
					}
				},
				_ => return Err(RunError::NoFrontmatter),
			}
		},
		Command::State(_) => {
			let mut tokens = Tokenizer::new(&src);
			while let Some((token, state)) = tokens.next_with_state() {
				writeln!(output, "{} {}", token, HexArray(&state))?;
			}
		},
	}

	output.flush()?;
	Ok(())
}

use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use weft_cli::Commands;
use weft_cli::OutputFormat;
use weft_cli::WeftCli;
use weft_core::Mirror;
use weft_core::TokenFile;
use weft_core::Vfs;
use weft_core::WeftError;
use weft_core::parse_token_lines;
use weft_core::serialize_tokens;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = WeftCli::parse();

	// Respect NO_COLOR, --no-color, and terminal capability.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Tokenize {
			input,
			output,
			overwrite,
		}) => run_tokenize(&args, input, output.clone(), *overwrite),
		Some(Commands::Check {
			input_dir,
			fixture_dir,
			diff,
			format,
		}) => run_check(input_dir, fixture_dir, *diff, *format),
		None => {
			eprintln!("No subcommand specified. Run `weft --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<WeftError>() {
			Ok(weft_err) => {
				let report: miette::Report = (*weft_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool) {
	let default_directive = if verbose { "weft=debug" } else { "warn" };
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn run_tokenize(
	args: &WeftCli,
	input: &Path,
	output: Option<PathBuf>,
	overwrite: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	if input.is_dir() {
		tokenize_directory(args, input, output, overwrite)
	} else {
		tokenize_file(args, input, output, overwrite)
	}
}

fn tokenize_file(
	args: &WeftCli,
	input: &Path,
	output: Option<PathBuf>,
	overwrite: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let output = output.unwrap_or_else(|| input.with_extension("tok"));
	ensure_writable(&output, overwrite)?;

	let token_file = TokenFile::generate(input)?;
	token_file.save_to(&output)?;
	println!("Tokenized {} -> {}", input.display(), output.display());
	if args.verbose {
		println!("  {} token(s)", token_file.tokens().len());
	}

	Ok(())
}

fn tokenize_directory(
	args: &WeftCli,
	input: &Path,
	output: Option<PathBuf>,
	overwrite: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let output_root = output.unwrap_or_else(|| input.to_path_buf());
	let vfs = Vfs::read(input, "weft")?;

	if vfs.is_empty() {
		println!("No .weft files found under {}", input.display());
		return Ok(());
	}

	for asset in vfs.iter() {
		let out_path = output_root.join(asset.rel_path().with_extension("tok"));
		ensure_writable(&out_path, overwrite)?;
		if let Some(parent) = out_path.parent() {
			std::fs::create_dir_all(parent)?;
		}

		let token_file = TokenFile::from_source(asset.path(), asset.text());
		token_file.save_to(&out_path)?;
		if args.verbose {
			println!(
				"  {} ({} token(s))",
				asset.rel_path().display(),
				token_file.tokens().len()
			);
		}
	}

	println!("{} file(s) tokenized into {}", vfs.len(), output_root.display());

	Ok(())
}

fn ensure_writable(output: &Path, overwrite: bool) -> Result<(), WeftError> {
	if output.exists() && !overwrite {
		return Err(WeftError::OutputExists {
			path: output.display().to_string(),
		});
	}
	Ok(())
}

struct Mismatch {
	file: String,
	recorded: String,
	generated: String,
}

fn run_check(
	input_dir: &Path,
	fixture_dir: &Path,
	show_diff: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let is_stale = run_check_once(input_dir, fixture_dir, show_diff, format)?;
	if is_stale {
		process::exit(1);
	}

	Ok(())
}

/// Run a single check and return whether any token streams differ from
/// their fixtures (true = stale).
fn run_check_once(
	input_dir: &Path,
	fixture_dir: &Path,
	show_diff: bool,
	format: OutputFormat,
) -> Result<bool, Box<dyn std::error::Error>> {
	let mirror = Mirror::new(
		Vfs::read_locked(input_dir, "weft")?,
		Vfs::read_locked(fixture_dir, "tok")?,
	);

	let mut mismatches = Vec::new();
	for (source, fixture) in mirror.pairs()? {
		let generated = TokenFile::from_source(source.path(), source.text());
		// Reparse the fixture so formatting quirks (blank lines) never count
		// as a difference, and so malformed fixtures fail loudly.
		let recorded = serialize_tokens(&parse_token_lines(fixture.text())?);
		if generated.serialized() != recorded {
			mismatches.push(Mismatch {
				file: source.rel_path().display().to_string(),
				recorded,
				generated: generated.serialized().to_string(),
			});
		}
	}

	if mismatches.is_empty() {
		match format {
			OutputFormat::Json => {
				println!("{{\"ok\":true,\"mismatches\":[]}}");
			}
			OutputFormat::Text => {
				println!("Check passed: all token streams are up to date.");
			}
		}
		return Ok(false);
	}

	match format {
		OutputFormat::Json => {
			let entries: Vec<serde_json::Value> = mismatches
				.iter()
				.map(|mismatch| {
					serde_json::json!({
						"file": mismatch.file,
						"recorded": mismatch.recorded,
						"generated": mismatch.generated,
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": false,
				"mismatches": entries,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			eprintln!("Check failed.");
			eprintln!();
			eprintln!("Stale token streams:");
			for mismatch in &mismatches {
				eprintln!("  {}", mismatch.file);
				if show_diff {
					print_diff(&mismatch.recorded, &mismatch.generated);
				}
			}
			eprintln!();
			eprintln!(
				"{} token stream(s) are out of date. Run `weft tokenize` to regenerate.",
				mismatches.len()
			);
		}
	}

	Ok(true)
}

fn print_diff(recorded: &str, generated: &str) {
	let diff = TextDiff::from_lines(recorded, generated);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Tokenize weft template files into flat KIND:text token streams.",
	long_about = "weft is the tokenizer front end for an HTML-like templating language with \
	              typed `${value:type}` interpolation and `@for(...)` directives.\n\nIt turns \
	              template source into a flat, fully classified token sequence and renders it \
	              in a stable line-based `KIND:text` form.\n\nQuick start:\n  weft tokenize \
	              page.weft          Write page.tok next to the source\n  weft tokenize src/ \
	              out/          Tokenize a whole tree into out/\n  weft check src/ fixtures/    \
	              Diff output against recorded fixtures"
)]
pub struct WeftCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Tokenize a `.weft` file or a whole directory tree.
	///
	/// In file mode the serialized token stream is written next to the input
	/// with a `.tok` extension, or to the given output path. In directory
	/// mode every `.weft` file under the input directory is tokenized in
	/// sorted order into a mirrored `.tok` file under the output directory;
	/// the first failing file aborts the batch.
	Tokenize {
		/// Template file or directory to tokenize.
		input: PathBuf,

		/// Output file or directory. Defaults to the input location with the
		/// `.tok` extension.
		output: Option<PathBuf>,

		/// Replace output files that already exist.
		#[arg(long, default_value_t = false)]
		overwrite: bool,
	},
	/// Compare tokenizer output against recorded `.tok` fixtures.
	///
	/// Tokenizes every `.weft` file under the input directory and diffs the
	/// serialized stream against the fixture with the same stem under the
	/// fixture directory. Exits with a non-zero status code when any stream
	/// differs, making it suitable for CI pipelines.
	Check {
		/// Directory of `.weft` template sources.
		input_dir: PathBuf,

		/// Directory of `.tok` fixture files, paired with sources by
		/// relative directory and file stem.
		fixture_dir: PathBuf,

		/// Show a unified diff for each mismatching token stream.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results. Use `text` for human-readable
		/// output or `json` for programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each mismatch entry
	/// includes the file path and both serialized streams.
	Json,
}

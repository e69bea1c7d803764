use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum WeftError {
	#[error(transparent)]
	#[diagnostic(code(weft::io_error))]
	Io(#[from] std::io::Error),

	#[error("token line {line} is malformed (no `:` separator): `{content}`")]
	#[diagnostic(
		code(weft::malformed_token_line),
		help("each line of a token stream must read `KIND:text`")
	)]
	MalformedTokenLine { line: usize, content: String },

	#[error("token line {line} names an unknown kind: `{label}`")]
	#[diagnostic(code(weft::unknown_token_kind))]
	UnknownTokenKind { line: usize, label: String },

	#[error("attempted to sync a locked virtual file system at `{path}`")]
	#[diagnostic(
		code(weft::locked_vfs),
		help("load the tree with `Vfs::read` instead of `Vfs::read_locked` to allow writes")
	)]
	LockedVfs { path: String },

	#[error("attempted to modify a locked virtual asset at `{path}`")]
	#[diagnostic(code(weft::locked_asset))]
	LockedAsset { path: String },

	#[error("no comparison asset found for `{path}`")]
	#[diagnostic(
		code(weft::missing_mirror_asset),
		help("every file in the target tree needs a fixture with the same stem")
	)]
	MissingMirrorAsset { path: String },

	#[error("output already exists at `{path}`")]
	#[diagnostic(
		code(weft::output_exists),
		help("pass --overwrite to replace existing output")
	)]
	OutputExists { path: String },
}

pub type WeftResult<T> = Result<T, WeftError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;

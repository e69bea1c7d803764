use std::path::Path;
use std::path::PathBuf;

use crate::WeftResult;
use crate::tokenizer::Tokenizer;
use crate::tokens::Token;
use crate::tokens::parse_token_lines;
use crate::tokens::serialize_tokens;

/// A token sequence tied to the file it came from, with its canonical
/// serialized form precomputed.
///
/// Two constructors matter in practice: [`TokenFile::generate`] tokenizes a
/// template source file, and [`TokenFile::load`] parses an already
/// serialized token stream. Both normalize to the same canonical text, so
/// comparing a generated file against a loaded fixture is a plain string
/// comparison.
#[derive(Debug, Clone)]
pub struct TokenFile {
	path: PathBuf,
	tokens: Vec<Token>,
	serialized: String,
}

impl TokenFile {
	/// Tokenize the template source at `path`.
	pub fn generate(path: impl AsRef<Path>) -> WeftResult<Self> {
		let path = path.as_ref().to_path_buf();
		let tokenizer = Tokenizer::from_file(&path)?;
		Ok(Self::from_tokens(path, tokenizer.into_tokens()))
	}

	/// Tokenize in-memory `source`, recording `path` as its origin.
	pub fn from_source(path: impl AsRef<Path>, source: &str) -> Self {
		let tokenizer = Tokenizer::from_source(source);
		Self::from_tokens(path.as_ref().to_path_buf(), tokenizer.into_tokens())
	}

	/// Parse a serialized `KIND:text` token stream from `path`.
	pub fn load(path: impl AsRef<Path>) -> WeftResult<Self> {
		let path = path.as_ref().to_path_buf();
		let text = std::fs::read_to_string(&path)?;
		let tokens = parse_token_lines(&text)?;
		Ok(Self::from_tokens(path, tokens))
	}

	fn from_tokens(path: PathBuf, tokens: Vec<Token>) -> Self {
		let serialized = serialize_tokens(&tokens);
		Self {
			path,
			tokens,
			serialized,
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	/// The canonical serialized form, regenerated from the parsed tokens so
	/// fixture formatting quirks like blank lines never affect comparison.
	pub fn serialized(&self) -> &str {
		&self.serialized
	}

	/// Write the serialized form to `path`.
	pub fn save_to(&self, path: impl AsRef<Path>) -> WeftResult<()> {
		std::fs::write(path, &self.serialized)?;
		Ok(())
	}
}

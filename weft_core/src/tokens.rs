use std::fmt::Display;

use crate::WeftError;
use crate::WeftResult;

/// The closed set of token kinds produced by the tokenizer.
///
/// `RawText`, `Str`, `TagInfo`, `AtDirective`, `CurlyBraceOpen`,
/// `CurlyBraceClose`, and `DollarSignInterpolation` are intermediate kinds:
/// phase 2 always consumes the first four and phase 3 relabels or expands the
/// rest, so only the remaining kinds can appear in a final sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TokenKind {
	#[default]
	RawText,
	Str,
	TagInfo,
	AtDirective,
	CurlyBraceOpen,
	CurlyBraceClose,
	DollarSignInterpolation,
	HtmlTagInfoStart,
	HtmlTagInfoEnd,
	HtmlTagName,
	HtmlCurlyBraceOpen,
	HtmlCurlyBraceClose,
	HtmlAttrKey,
	HtmlAttrEqualSign,
	HtmlAttrValue,
	HtmlAttrValuePartial,
	StringStart,
	StringEnd,
	StringContent,
	DollarSignInterpolationOpen,
	DollarSignInterpolationClose,
	DollarSignInterpolationValue,
	DollarSignInterpolationSemicolon,
	DollarSignInterpolationType,
	AtDirectiveStart,
	AtDirectiveName,
	AtDirectiveParenthesisOpen,
	AtDirectiveParenthesisClose,
	AtDirectiveParamValue,
	AtDirectiveSemicolon,
	AtDirectiveParamType,
	EndOfFile,
}

impl TokenKind {
	/// The stable text label used in the serialized `KIND:text` form.
	pub fn label(self) -> &'static str {
		match self {
			TokenKind::RawText => "RAW_TEXT",
			TokenKind::Str => "STRING",
			TokenKind::TagInfo => "TAG_INFO",
			TokenKind::AtDirective => "AT_DIRECTIVE",
			TokenKind::CurlyBraceOpen => "CURLY_BRACE_OPEN",
			TokenKind::CurlyBraceClose => "CURLY_BRACE_CLOSE",
			TokenKind::DollarSignInterpolation => "DOLLAR_SIGN_INTERPOLATION",
			TokenKind::HtmlTagInfoStart => "HTML_TAG_INFO_START",
			TokenKind::HtmlTagInfoEnd => "HTML_TAG_INFO_END",
			TokenKind::HtmlTagName => "HTML_TAG_NAME",
			TokenKind::HtmlCurlyBraceOpen => "HTML_CURLY_BRACE_OPEN",
			TokenKind::HtmlCurlyBraceClose => "HTML_CURLY_BRACE_CLOSE",
			TokenKind::HtmlAttrKey => "HTML_ATTR_KEY",
			TokenKind::HtmlAttrEqualSign => "HTML_ATTR_EQUAL_SIGN",
			TokenKind::HtmlAttrValue => "HTML_ATTR_VALUE",
			TokenKind::HtmlAttrValuePartial => "HTML_ATTR_VALUE_PARTIAL",
			TokenKind::StringStart => "STRING_START",
			TokenKind::StringEnd => "STRING_END",
			TokenKind::StringContent => "STRING_CONTENT",
			TokenKind::DollarSignInterpolationOpen => "DOLLAR_SIGN_INTERPOLATION_OPEN",
			TokenKind::DollarSignInterpolationClose => "DOLLAR_SIGN_INTERPOLATION_CLOSE",
			TokenKind::DollarSignInterpolationValue => "DOLLAR_SIGN_INTERPOLATION_VALUE",
			TokenKind::DollarSignInterpolationSemicolon => "DOLLAR_SIGN_INTERPOLATION_SEMICOLON",
			TokenKind::DollarSignInterpolationType => "DOLLAR_SIGN_INTERPOLATION_TYPE",
			TokenKind::AtDirectiveStart => "AT_DIRECTIVE_START",
			TokenKind::AtDirectiveName => "AT_DIRECTIVE_NAME",
			TokenKind::AtDirectiveParenthesisOpen => "AT_DIRECTIVE_PARENTHESIS_OPEN",
			TokenKind::AtDirectiveParenthesisClose => "AT_DIRECTIVE_PARENTHESIS_CLOSE",
			TokenKind::AtDirectiveParamValue => "AT_DIRECTIVE_PARAM_VALUE",
			TokenKind::AtDirectiveSemicolon => "AT_DIRECTIVE_SEMICOLON",
			TokenKind::AtDirectiveParamType => "AT_DIRECTIVE_PARAM_TYPE",
			TokenKind::EndOfFile => "END_OF_FILE",
		}
	}

	/// Resolve a serialized label back to its kind.
	pub fn from_label(label: &str) -> Option<Self> {
		let kind = match label {
			"RAW_TEXT" => TokenKind::RawText,
			"STRING" => TokenKind::Str,
			"TAG_INFO" => TokenKind::TagInfo,
			"AT_DIRECTIVE" => TokenKind::AtDirective,
			"CURLY_BRACE_OPEN" => TokenKind::CurlyBraceOpen,
			"CURLY_BRACE_CLOSE" => TokenKind::CurlyBraceClose,
			"DOLLAR_SIGN_INTERPOLATION" => TokenKind::DollarSignInterpolation,
			"HTML_TAG_INFO_START" => TokenKind::HtmlTagInfoStart,
			"HTML_TAG_INFO_END" => TokenKind::HtmlTagInfoEnd,
			"HTML_TAG_NAME" => TokenKind::HtmlTagName,
			"HTML_CURLY_BRACE_OPEN" => TokenKind::HtmlCurlyBraceOpen,
			"HTML_CURLY_BRACE_CLOSE" => TokenKind::HtmlCurlyBraceClose,
			"HTML_ATTR_KEY" => TokenKind::HtmlAttrKey,
			"HTML_ATTR_EQUAL_SIGN" => TokenKind::HtmlAttrEqualSign,
			"HTML_ATTR_VALUE" => TokenKind::HtmlAttrValue,
			"HTML_ATTR_VALUE_PARTIAL" => TokenKind::HtmlAttrValuePartial,
			"STRING_START" => TokenKind::StringStart,
			"STRING_END" => TokenKind::StringEnd,
			"STRING_CONTENT" => TokenKind::StringContent,
			"DOLLAR_SIGN_INTERPOLATION_OPEN" => TokenKind::DollarSignInterpolationOpen,
			"DOLLAR_SIGN_INTERPOLATION_CLOSE" => TokenKind::DollarSignInterpolationClose,
			"DOLLAR_SIGN_INTERPOLATION_VALUE" => TokenKind::DollarSignInterpolationValue,
			"DOLLAR_SIGN_INTERPOLATION_SEMICOLON" => TokenKind::DollarSignInterpolationSemicolon,
			"DOLLAR_SIGN_INTERPOLATION_TYPE" => TokenKind::DollarSignInterpolationType,
			"AT_DIRECTIVE_START" => TokenKind::AtDirectiveStart,
			"AT_DIRECTIVE_NAME" => TokenKind::AtDirectiveName,
			"AT_DIRECTIVE_PARENTHESIS_OPEN" => TokenKind::AtDirectiveParenthesisOpen,
			"AT_DIRECTIVE_PARENTHESIS_CLOSE" => TokenKind::AtDirectiveParenthesisClose,
			"AT_DIRECTIVE_PARAM_VALUE" => TokenKind::AtDirectiveParamValue,
			"AT_DIRECTIVE_SEMICOLON" => TokenKind::AtDirectiveSemicolon,
			"AT_DIRECTIVE_PARAM_TYPE" => TokenKind::AtDirectiveParamType,
			"END_OF_FILE" => TokenKind::EndOfFile,
			_ => return None,
		};
		Some(kind)
	}
}

impl Display for TokenKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.label())
	}
}

/// An immutable `(kind, text)` pair. The text is the exact source substring
/// (or synthesized literal) the kind classifies; tokens carry no positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
	pub kind: TokenKind,
	pub text: String,
}

impl Token {
	pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
		Self {
			kind,
			text: text.into(),
		}
	}

	/// The unconditional terminator appended after every scan.
	pub fn end_of_file() -> Self {
		Self::new(TokenKind::EndOfFile, "EOF")
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.kind, self.text)
	}
}

/// Render a token sequence into the canonical line-oriented form: one
/// `KIND:text` line per token, each terminated by a newline. An empty
/// sequence serializes to the empty string.
pub fn serialize_tokens(tokens: &[Token]) -> String {
	let mut out = String::new();
	for token in tokens {
		out.push_str(&token.to_string());
		out.push('\n');
	}
	out
}

/// Re-parse a serialized `KIND:text` stream. Blank lines are skipped. Each
/// remaining line splits at its first `:`; a line with no separator or an
/// unrecognized kind label is rejected with the offending 1-based line
/// number and content.
pub fn parse_token_lines(text: &str) -> WeftResult<Vec<Token>> {
	let mut tokens = Vec::new();
	for (index, line) in text.lines().enumerate() {
		if line.trim().is_empty() {
			continue;
		}
		let Some((label, token_text)) = line.split_once(':') else {
			return Err(WeftError::MalformedTokenLine {
				line: index + 1,
				content: line.to_string(),
			});
		};
		let Some(kind) = TokenKind::from_label(label) else {
			return Err(WeftError::UnknownTokenKind {
				line: index + 1,
				label: label.to_string(),
			});
		};
		tokens.push(Token::new(kind, token_text));
	}
	Ok(tokens)
}

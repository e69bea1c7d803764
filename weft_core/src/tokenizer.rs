use std::path::Path;

use crate::WeftResult;
use crate::cursor::Cursor;
use crate::tokens::Token;
use crate::tokens::TokenKind;
use crate::tokens::serialize_tokens;

/// The tokenizer front end: owns the fully classified token sequence for one
/// source text.
///
/// Tokenization runs three rewrite passes. Phase 1 segments raw characters
/// into coarse spans (raw text, quoted strings, `@for(...)` directives, tag
/// spans, stray braces). Phase 2 re-scans each coarse span with a fresh child
/// cursor and replaces it with finer structural tokens. Phase 3 relabels the
/// leftover intermediate kinds and expands every `${value:type}`
/// interpolation. No pass mutates a token in place; each replaces the prior
/// sequence wholesale.
#[derive(Debug, Clone)]
pub struct Tokenizer {
	tokens: Vec<Token>,
}

impl Tokenizer {
	pub fn from_source(source: &str) -> Self {
		Self {
			tokens: tokenize(source),
		}
	}

	pub fn from_file(path: impl AsRef<Path>) -> WeftResult<Self> {
		let text = std::fs::read_to_string(path)?;
		Ok(Self::from_source(&text))
	}

	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	pub fn into_tokens(self) -> Vec<Token> {
		self.tokens
	}

	/// The canonical `KIND:text` line form of the token sequence.
	pub fn serialize(&self) -> String {
		serialize_tokens(&self.tokens)
	}
}

/// Run all three phases over `source` (leading/trailing whitespace trimmed).
/// Tokenization is total: unterminated constructs capture to the end of
/// input instead of failing.
pub fn tokenize(source: &str) -> Vec<Token> {
	let source = source.trim();
	let tokens = phase1(source);
	tracing::debug!(count = tokens.len(), "phase 1 segmentation complete");
	let tokens = phase2(tokens);
	tracing::debug!(count = tokens.len(), "phase 2 decomposition complete");
	let tokens = phase3(tokens);
	tracing::debug!(count = tokens.len(), "phase 3 expansion complete");
	tokens
}

/// Whether `position` lies inside an open quoted region, by replaying the
/// two-flag state machine from the start of the text.
///
/// The mixed-nesting transitions (a quote character seen while the opposite
/// flag is set) are asymmetric on purpose and must not be "fixed": when both
/// flags are set, a quote character clears only its own flag and the output
/// stays true; when only the opposite flag is set, the output is forced true
/// with no flag change. Escaped quotes never change state.
pub fn in_quote(chars: &[char], position: usize) -> bool {
	let mut in_double = false;
	let mut in_single = false;
	let mut inside = false;

	for (index, ch) in chars.iter().enumerate() {
		if index > position {
			break;
		}
		let escaped = index > 0 && chars[index - 1] == '\\';
		match ch {
			'"' => {
				if escaped {
					continue;
				}
				if !in_double && !in_single {
					in_double = true;
					inside = true;
				} else if in_double && !in_single {
					in_double = false;
					inside = false;
				} else if in_double && in_single {
					in_double = false;
				} else {
					inside = true;
				}
			}
			'\'' => {
				if escaped {
					continue;
				}
				if !in_single && !in_double {
					in_single = true;
					inside = true;
				} else if in_single && !in_double {
					in_single = false;
					inside = false;
				} else if in_single && in_double {
					in_single = false;
				} else {
					inside = true;
				}
			}
			_ => {}
		}
	}

	inside
}

/// Flush the pending store as a trimmed `RAW_TEXT` token, skipping the
/// append entirely when the trimmed text is empty.
fn collect_store(cursor: &mut Cursor<char, Token>) {
	let flushed = cursor.flush_text();
	let trimmed = flushed.trim();
	if !trimmed.is_empty() {
		cursor.produce(Token::new(TokenKind::RawText, trimmed));
	}
}

/// Scan a quoted span: mark at the opening delimiter, advance until the
/// unescaped matching quote, and emit the whole span (delimiters included)
/// as a single `STRING` token. An unterminated string emits nothing.
fn scan_quoted(cursor: &mut Cursor<char, Token>, quote: char) {
	collect_store(cursor);
	cursor.mark();
	cursor.next();
	loop {
		if cursor.current() == quote && cursor.peek(-1) != '\\' {
			let text = cursor.text_from_mark();
			cursor.produce(Token::new(TokenKind::Str, text));
			break;
		}
		if cursor.at_end() {
			break;
		}
		cursor.next();
	}
}

/// Phase 1: a single left-to-right scan of the source characters producing
/// the coarse token stream. Quote context decides whether `@`, `{`, `}`,
/// and `<` act as syntax or literal text. Every character is processed
/// exactly once, including the final one, and the stream always terminates
/// with a single `END_OF_FILE` token.
fn phase1(source: &str) -> Vec<Token> {
	let mut cursor: Cursor<char, Token> = Cursor::from_text(source);
	if cursor.is_empty() {
		cursor.produce(Token::end_of_file());
		return cursor.into_produced();
	}

	loop {
		match cursor.current() {
			'@' => {
				if in_quote(cursor.elements(), cursor.position()) {
					cursor.store();
				} else {
					collect_store(&mut cursor);
					// Directive recognition is keyword-exact at this stage:
					// only the `@for(` spelling opens a directive span.
					if cursor.pull_text(4) == "@for(" {
						cursor.mark();
						cursor.next_until(&')');
						let text = cursor.text_from_mark();
						cursor.produce(Token::new(TokenKind::AtDirective, text));
					} else {
						cursor.store();
					}
				}
			}
			'\'' => scan_quoted(&mut cursor, '\''),
			'"' => scan_quoted(&mut cursor, '"'),
			'{' => {
				if in_quote(cursor.elements(), cursor.position()) {
					cursor.store();
				} else {
					collect_store(&mut cursor);
					cursor.produce(Token::new(TokenKind::CurlyBraceOpen, "{"));
				}
			}
			'}' => {
				if in_quote(cursor.elements(), cursor.position()) {
					cursor.store();
				} else {
					collect_store(&mut cursor);
					cursor.produce(Token::new(TokenKind::CurlyBraceClose, "}"));
				}
			}
			'<' => {
				if in_quote(cursor.elements(), cursor.position()) {
					cursor.store();
				} else {
					collect_store(&mut cursor);
					cursor.mark();
					loop {
						let ch = cursor.current();
						if !in_quote(cursor.elements(), cursor.position())
							&& (ch == '>' || ch == '}')
						{
							let text = cursor.text_from_mark();
							// A `}` before any `>` means the `<` sits inside a
							// brace-delimited region, not a real tag: the whole
							// span falls back to raw text.
							let kind = if ch == '>' {
								TokenKind::TagInfo
							} else {
								TokenKind::RawText
							};
							cursor.produce(Token::new(kind, text));
							break;
						}
						if cursor.at_end() {
							break;
						}
						cursor.next();
					}
				}
			}
			_ => cursor.store(),
		}
		if cursor.at_end() {
			break;
		}
		cursor.next();
	}

	collect_store(&mut cursor);
	cursor.produce(Token::end_of_file());
	cursor.into_produced()
}

/// Phase 2: walk the phase-1 stream and replace every `TAG_INFO`, `STRING`,
/// and `AT_DIRECTIVE` token with its structural decomposition, via a fresh
/// child cursor over the token's own text. All other tokens pass through.
fn phase2(tokens: Vec<Token>) -> Vec<Token> {
	let mut stream: Cursor<Token> = Cursor::new(tokens);
	if stream.is_empty() {
		return Vec::new();
	}
	loop {
		let token = stream.current();
		match token.kind {
			TokenKind::TagInfo => decompose_tag_info(&token.text, &mut stream),
			TokenKind::Str => decompose_string(&token.text, &mut stream),
			TokenKind::AtDirective => decompose_directive(&token.text, &mut stream),
			_ => stream.produce(token),
		}
		if stream.at_end() {
			break;
		}
		stream.next();
	}
	stream.into_produced()
}

/// Decompose a `TAG_INFO` span into tag delimiters, attribute keys, equal
/// signs, and attribute values.
fn decompose_tag_info(text: &str, stream: &mut Cursor<Token>) {
	let mut cursor: Cursor<char> = Cursor::from_text(text);
	loop {
		match cursor.current() {
			'<' => stream.produce(Token::new(TokenKind::HtmlTagInfoStart, "<")),
			'=' => {
				let key = cursor.flush_text().trim().to_string();
				stream.produce(Token::new(TokenKind::HtmlAttrKey, key));
				stream.produce(Token::new(TokenKind::HtmlAttrEqualSign, "="));
			}
			'>' => {
				// Anything still pending before `>` is a boolean-style
				// attribute with no value.
				let key = cursor.flush_text().trim().to_string();
				if !key.is_empty() {
					stream.produce(Token::new(TokenKind::HtmlAttrKey, key));
				}
				stream.produce(Token::new(TokenKind::HtmlTagInfoEnd, ">"));
			}
			'\'' => {
				cursor.mark();
				cursor.next();
				loop {
					if cursor.current() == '\'' && cursor.peek(-1) != '\\' {
						let value = cursor.text_from_mark();
						decompose_single_quoted_value(&value, stream);
						break;
					}
					if cursor.at_end() {
						break;
					}
					cursor.next();
				}
			}
			'"' => {
				// Double-quoted attribute values are emitted whole; only the
				// single-quoted path splits on interpolation.
				cursor.mark();
				cursor.next();
				loop {
					if cursor.current() == '"' && cursor.peek(-1) != '\\' {
						let value = cursor.text_from_mark();
						stream.produce(Token::new(TokenKind::HtmlAttrValue, value));
						break;
					}
					if cursor.at_end() {
						break;
					}
					cursor.next();
				}
			}
			_ => cursor.store(),
		}
		if cursor.at_end() {
			break;
		}
		cursor.next();
	}
}

/// Sub-scan a single-quoted attribute value (delimiters included) for
/// `${...}` interpolation. A value containing interpolation splits into
/// `HTML_ATTR_VALUE_PARTIAL` segments interleaved with interpolation spans;
/// otherwise the whole value is one `HTML_ATTR_VALUE`.
fn decompose_single_quoted_value(value: &str, stream: &mut Cursor<Token>) {
	let mut cursor: Cursor<char> = Cursor::from_text(value);
	let mut split = false;
	loop {
		let ch = cursor.current();
		if ch == '$' && cursor.peek(1) == '{' {
			split = true;
			let partial = cursor.flush_text();
			stream.produce(Token::new(TokenKind::HtmlAttrValuePartial, partial));
			cursor.mark();
			cursor.next_until(&'}');
			let interpolation = cursor.text_from_mark();
			stream.produce(Token::new(TokenKind::DollarSignInterpolation, interpolation));
		} else {
			cursor.store();
		}
		if cursor.at_end() {
			break;
		}
		cursor.next();
	}
	if split {
		let trailing = cursor.flush_text();
		stream.produce(Token::new(TokenKind::HtmlAttrValuePartial, trailing));
	} else {
		let whole = cursor.text_from_mark();
		stream.produce(Token::new(TokenKind::HtmlAttrValue, whole));
	}
}

/// Decompose a `STRING` span into its delimiters, literal content runs, and
/// embedded `${...}` interpolation spans.
fn decompose_string(text: &str, stream: &mut Cursor<Token>) {
	let mut cursor: Cursor<char> = Cursor::from_text(text);
	loop {
		let ch = cursor.current();
		let position = cursor.position();
		match ch {
			'$' => {
				if cursor.peek(1) == '{' {
					let content = cursor.flush_text();
					stream.produce(Token::new(TokenKind::StringContent, content));
					cursor.mark();
					cursor.next_until(&'}');
					let interpolation = cursor.text_from_mark();
					stream.produce(Token::new(TokenKind::DollarSignInterpolation, interpolation));
				} else {
					cursor.store();
				}
			}
			'\'' => {
				if position == 0 {
					stream.produce(Token::new(TokenKind::StringStart, "'"));
				} else if cursor.at_end() {
					let content = cursor.flush_text();
					if !content.is_empty() {
						stream.produce(Token::new(TokenKind::StringContent, content));
					}
					stream.produce(Token::new(TokenKind::StringEnd, "'"));
				}
			}
			'"' => {
				if position == 0 {
					stream.produce(Token::new(TokenKind::StringStart, "\""));
				} else if cursor.at_end() {
					// The double-quoted path emits its final content run even
					// when empty.
					let content = cursor.flush_text();
					stream.produce(Token::new(TokenKind::StringContent, content));
					stream.produce(Token::new(TokenKind::StringEnd, "\""));
				}
			}
			_ => cursor.store(),
		}
		if cursor.at_end() {
			break;
		}
		cursor.next();
	}
}

/// Decompose an `AT_DIRECTIVE` span (`@name(...)`) into its start marker,
/// name, parentheses, and colon-delimited `value:type` parameter pairs.
fn decompose_directive(text: &str, stream: &mut Cursor<Token>) {
	let mut cursor: Cursor<char> = Cursor::from_text(text);
	loop {
		match cursor.current() {
			'@' => stream.produce(Token::new(TokenKind::AtDirectiveStart, "@")),
			'(' => {
				let name = cursor.flush_text();
				stream.produce(Token::new(TokenKind::AtDirectiveName, name));
				stream.produce(Token::new(TokenKind::AtDirectiveParenthesisOpen, "("));
				cursor.next();
				cursor.mark();
				cursor.go_to_end();
				cursor.prev();
				let params = cursor.text_from_mark();
				produce_typed_pairs(
					&params,
					TokenKind::AtDirectiveParamValue,
					TokenKind::AtDirectiveSemicolon,
					TokenKind::AtDirectiveParamType,
					stream,
				);
			}
			')' => stream.produce(Token::new(TokenKind::AtDirectiveParenthesisClose, ")")),
			_ => cursor.store(),
		}
		if cursor.at_end() {
			break;
		}
		cursor.next();
	}
}

/// Split a colon-delimited list into alternating `value : type` tokens:
/// even-indexed segments emit a value followed by the `:` delimiter,
/// odd-indexed segments emit a type. Every segment is trimmed.
fn produce_typed_pairs(
	list: &str,
	value_kind: TokenKind,
	delimiter_kind: TokenKind,
	type_kind: TokenKind,
	stream: &mut Cursor<Token>,
) {
	for (index, part) in list.split(':').enumerate() {
		let part = part.trim();
		if index % 2 == 0 {
			stream.produce(Token::new(value_kind, part));
			stream.produce(Token::new(delimiter_kind, ":"));
		} else {
			stream.produce(Token::new(type_kind, part));
		}
	}
}

/// Phase 3: relabel the remaining intermediate kinds into their terminal
/// HTML-ish kinds and expand every interpolation span into an
/// open/value/type/close sequence mirroring the directive parameter grammar.
fn phase3(tokens: Vec<Token>) -> Vec<Token> {
	let mut stream: Cursor<Token> = Cursor::new(tokens);
	if stream.is_empty() {
		return Vec::new();
	}
	loop {
		let token = stream.current();
		match token.kind {
			TokenKind::CurlyBraceOpen => {
				stream.produce(Token::new(TokenKind::HtmlCurlyBraceOpen, token.text));
			}
			TokenKind::CurlyBraceClose => {
				stream.produce(Token::new(TokenKind::HtmlCurlyBraceClose, token.text));
			}
			TokenKind::RawText => {
				stream.produce(Token::new(TokenKind::HtmlTagName, token.text));
			}
			TokenKind::DollarSignInterpolation => {
				stream.produce(Token::new(TokenKind::DollarSignInterpolationOpen, "${"));
				let mut inner = token.text.replacen("${", "", 1);
				inner.pop();
				produce_typed_pairs(
					&inner,
					TokenKind::DollarSignInterpolationValue,
					TokenKind::DollarSignInterpolationSemicolon,
					TokenKind::DollarSignInterpolationType,
					&mut stream,
				);
				stream.produce(Token::new(TokenKind::DollarSignInterpolationClose, "}"));
			}
			_ => stream.produce(token),
		}
		if stream.at_end() {
			break;
		}
		stream.next();
	}
	stream.into_produced()
}

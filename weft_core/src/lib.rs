//! `weft_core` is the core library for the weft template tokenizer. It turns
//! HTML-like template source with `${value:type}` interpolation and
//! `@for(...)` directives into a flat sequence of classified tokens, and
//! serializes that sequence into a stable line-based `KIND:text` form.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Template source
//!   → Phase 1 (segments characters into coarse spans: raw text, strings,
//!     directives, tag spans, braces)
//!   → Phase 2 (decomposes each coarse span into structural tokens)
//!   → Phase 3 (relabels intermediate kinds and expands interpolations)
//!   → Serializer (one KIND:text line per token)
//! ```
//!
//! ## Key Types
//!
//! - [`Cursor`] — A generic bounded cursor over a sequence, with marking,
//!   a store accumulator, and a produced-output buffer. All three phases
//!   run on it, over characters and over tokens alike.
//! - [`Token`] / [`TokenKind`] — The `(kind, text)` token model and its
//!   serialized labels.
//! - [`Tokenizer`] — The three-phase pipeline over one source text.
//! - [`TokenFile`] — A token sequence tied to the file it came from.
//! - [`Vfs`] / [`Mirror`] — In-memory directory trees for batch
//!   tokenization and fixture comparison.
//!
//! ## Quick Start
//!
//! ```rust
//! use weft_core::Tokenizer;
//!
//! let tokenizer = Tokenizer::from_source("<p>hi</p>");
//! for token in tokenizer.tokens() {
//!     println!("{token}");
//! }
//! ```

pub use cursor::*;
pub use error::*;
pub use token_file::*;
pub use tokenizer::*;
pub use tokens::*;
pub use vfs::*;

mod cursor;
mod error;
mod token_file;
mod tokenizer;
mod tokens;
mod vfs;

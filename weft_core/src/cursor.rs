/// A position-addressed view over an ordered sequence of elements.
///
/// The same abstraction drives both the character scan (`Cursor<char, Token>`)
/// and walks over already-produced token streams (`Cursor<Token>`). `T` is the
/// element type; `P` is the type of items the cursor produces while scanning,
/// defaulting to `T` for plain walks.
///
/// Movement is clamped: stepping past the final element pins the position at
/// the final element ("sticky end") and stepping before the first pins it at
/// zero. Out-of-range extraction clamps rather than failing — the cursor
/// never reports errors, by contract.
#[derive(Debug, Clone)]
pub struct Cursor<T, P = T> {
	elements: Vec<T>,
	position: usize,
	end: usize,
	marked: usize,
	store: Vec<T>,
	produced: Vec<P>,
}

impl<T, P> Cursor<T, P>
where
	T: Clone + Default + PartialEq,
{
	pub fn new(elements: Vec<T>) -> Self {
		let end = elements.len().saturating_sub(1);
		Self {
			elements,
			position: 0,
			end,
			marked: 0,
			store: Vec::new(),
			produced: Vec::new(),
		}
	}

	/// The element under the cursor, or the default value when the backing
	/// sequence is empty.
	pub fn current(&self) -> T {
		self.elements.get(self.position).cloned().unwrap_or_default()
	}

	pub fn elements(&self) -> &[T] {
		&self.elements
	}

	pub fn len(&self) -> usize {
		self.elements.len()
	}

	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	pub fn position(&self) -> usize {
		self.position
	}

	pub fn marked_position(&self) -> usize {
		self.marked
	}

	pub fn at_start(&self) -> bool {
		self.position == 0
	}

	pub fn at_end(&self) -> bool {
		self.position >= self.end
	}

	pub fn next(&mut self) {
		self.position = (self.position + 1).min(self.end);
	}

	pub fn prev(&mut self) {
		self.position = self.position.saturating_sub(1);
	}

	pub fn next_by(&mut self, n: usize) {
		for _ in 0..n {
			self.next();
		}
	}

	pub fn prev_by(&mut self, n: usize) {
		for _ in 0..n {
			self.prev();
		}
	}

	pub fn go_to_start(&mut self) {
		self.position = 0;
	}

	pub fn go_to_end(&mut self) {
		self.position = self.end;
	}

	/// Record the current position as the reference point for
	/// [`pull_from_mark`](Self::pull_from_mark) and
	/// [`go_to_mark`](Self::go_to_mark).
	pub fn mark(&mut self) {
		self.marked = self.position;
	}

	pub fn go_to_mark(&mut self) {
		self.position = self.marked;
	}

	/// Look at the element `n` steps away without moving the cursor. The
	/// position is saved, temporarily moved (clamped as usual), then
	/// restored. Negative `n` peeks backward.
	pub fn peek(&mut self, n: isize) -> T {
		let saved = self.position;
		if n >= 0 {
			self.next_by(n.unsigned_abs());
		} else {
			self.prev_by(n.unsigned_abs());
		}
		let element = self.current();
		self.position = saved;
		element
	}

	/// Repeatedly call `visit(element, position)` from the current position
	/// forward. Stops when `visit` returns `false` or after the visitor has
	/// run at the end position — the final element is always visited before
	/// iteration ends.
	pub fn iterate(&mut self, mut visit: impl FnMut(T, usize) -> bool) {
		loop {
			if !visit(self.current(), self.position) {
				break;
			}
			if self.at_end() {
				break;
			}
			self.next();
		}
	}

	/// Inclusive slice from the start through the current position.
	pub fn pull_from_start(&self) -> &[T] {
		let end = (self.position + 1).min(self.elements.len());
		&self.elements[..end]
	}

	/// Inclusive slice from the current position through the end.
	pub fn pull_from_end(&self) -> &[T] {
		let start = self.position.min(self.elements.len());
		&self.elements[start..]
	}

	/// Inclusive slice between the marked position and the current position.
	/// When the mark sits past the cursor the bounds are swapped rather than
	/// treated as an error.
	pub fn pull_from_mark(&self) -> &[T] {
		self.pull_range(self.marked, self.position)
	}

	/// Inclusive slice between two positions, clamped into bounds and
	/// swapped when `start > end`.
	pub fn pull_range(&self, start: usize, end: usize) -> &[T] {
		if self.elements.is_empty() {
			return &[];
		}
		let last = self.elements.len() - 1;
		let mut start = start.min(last);
		let mut end = end.min(last);
		if start > end {
			std::mem::swap(&mut start, &mut end);
		}
		&self.elements[start..=end]
	}

	/// Inclusive slice spanning `n` elements away from the current position;
	/// negative `n` pulls backward. `pull(0)` is the current element alone.
	pub fn pull(&self, n: isize) -> &[T] {
		if self.elements.is_empty() {
			return &[];
		}
		if n >= 0 {
			self.pull_range(self.position, self.position + n.unsigned_abs())
		} else {
			let start = self.position.saturating_sub(n.unsigned_abs());
			self.pull_range(start, self.position)
		}
	}

	/// Append the element under the cursor to the auxiliary store. The store
	/// accumulates pending raw text between syntactic boundaries and is
	/// independent of cursor position.
	pub fn store(&mut self) {
		if let Some(element) = self.elements.get(self.position) {
			self.store.push(element.clone());
		}
	}

	pub fn store_len(&self) -> usize {
		self.store.len()
	}

	pub fn store_clear(&mut self) {
		self.store.clear();
	}

	/// Return the stored elements and clear the store.
	pub fn store_flush(&mut self) -> Vec<T> {
		std::mem::take(&mut self.store)
	}

	/// Advance (one step first) until the cursor sits on `target` or the end
	/// is reached. Returns whether the cursor ended up on `target`.
	pub fn next_until(&mut self, target: &T) -> bool {
		self.next();
		while !self.at_end() {
			if self.current() == *target {
				return true;
			}
			self.next();
		}
		self.current() == *target
	}

	/// Backward counterpart of [`next_until`](Self::next_until).
	pub fn prev_until(&mut self, target: &T) -> bool {
		self.prev();
		while !self.at_start() {
			if self.current() == *target {
				return true;
			}
			self.prev();
		}
		self.current() == *target
	}

	/// Consume elements while `keep` holds, returning the consumed span. The
	/// cursor stops on the first element that fails the predicate (or the
	/// end).
	pub fn next_while(&mut self, mut keep: impl FnMut(&T) -> bool) -> Vec<T> {
		let mut consumed = Vec::new();
		while keep(&self.current()) {
			consumed.push(self.current());
			if self.at_end() {
				break;
			}
			self.next();
		}
		consumed
	}

	/// Consume elements until one of `targets` is reached, returning the
	/// consumed span. The cursor stops on the matching element (or the end).
	pub fn next_until_any(&mut self, targets: &[T]) -> Vec<T> {
		self.next_while(|element| !targets.contains(element))
	}

	/// Append a produced item to the production buffer.
	pub fn produce(&mut self, item: P) {
		self.produced.push(item);
	}

	pub fn produced(&self) -> &[P] {
		&self.produced
	}

	pub fn produced_len(&self) -> usize {
		self.produced.len()
	}

	pub fn last_produced(&self) -> Option<&P> {
		self.produced.last()
	}

	/// Atomically replace the whole production buffer. Each tokenizer phase
	/// uses this to swap the previous phase's sequence for its rewrite.
	pub fn replace_produced(&mut self, items: Vec<P>) {
		self.produced = items;
	}

	pub fn into_produced(self) -> Vec<P> {
		self.produced
	}
}

impl<P> Cursor<char, P> {
	pub fn from_text(text: &str) -> Self {
		Cursor::new(text.chars().collect())
	}

	pub fn text_from_start(&self) -> String {
		self.pull_from_start().iter().collect()
	}

	pub fn text_from_end(&self) -> String {
		self.pull_from_end().iter().collect()
	}

	pub fn text_from_mark(&self) -> String {
		self.pull_from_mark().iter().collect()
	}

	/// String form of [`pull`](Self::pull), used for fixed-width lookahead
	/// such as directive keyword detection.
	pub fn pull_text(&self, n: isize) -> String {
		self.pull(n).iter().collect()
	}

	/// Flush the store as a `String`.
	pub fn flush_text(&mut self) -> String {
		self.store_flush().into_iter().collect()
	}
}

use rand::Rng;
use rand::seq::IndexedRandom;

use super::context::Successor;

/// Represents the entry of one context in a transition table.
///
/// A `State` stores every successor observed after its context, in corpus
/// order and with repetitions. Sampling picks uniformly from that list, so a
/// word seen three times after the context is three times as likely.
///
/// ## Invariants
/// - A closed state holds exactly `[Successor::End]`
/// - An open state holds only `Successor::Word` entries
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
	successors: Vec<Successor>,
}

impl State {
	/// Creates a state with a single observed word.
	pub fn with_word(word: &str) -> Self {
		Self { successors: vec![Successor::Word(word.to_owned())] }
	}

	/// Creates a state that ends the sentence.
	pub fn closed() -> Self {
		Self { successors: vec![Successor::End] }
	}

	/// Records another occurrence of `word` after this context.
	pub fn push_word(&mut self, word: &str) {
		self.successors.push(Successor::Word(word.to_owned()));
	}

	/// Returns `true` if this state marks the end of a sentence.
	pub fn is_closed(&self) -> bool {
		matches!(self.successors.as_slice(), [Successor::End])
	}

	pub fn is_empty(&self) -> bool {
		self.successors.is_empty()
	}

	pub fn len(&self) -> usize {
		self.successors.len()
	}

	pub fn successors(&self) -> &[Successor] {
		&self.successors
	}

	/// Picks a successor uniformly at random.
	///
	/// Returns `None` if the state has no successors.
	pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Successor> {
		self.successors.choose(rng)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	#[test]
	fn test_duplicates_kept() {
		let mut state = State::with_word("you");
		state.push_word("me");
		state.push_word("you");
		assert_eq!(state.len(), 3);
		assert!(!state.is_closed());
	}

	#[test]
	fn test_closed() {
		let state = State::closed();
		assert!(state.is_closed());
		assert_eq!(state.successors(), &[Successor::End]);
	}

	#[test]
	fn test_pick_frequency() {
		let mut state = State::with_word("a");
		for _ in 0..8 {
			state.push_word("b");
		}
		let mut rng = SmallRng::seed_from_u64(7);
		let hits = (0..1000)
			.filter(|_| state.pick(&mut rng).and_then(Successor::word) == Some("b"))
			.count();
		assert!(hits > 800, "expected the frequent word to dominate, got {hits}");
	}

	#[test]
	fn test_pick_empty() {
		let mut rng = SmallRng::seed_from_u64(1);
		assert!(State::default().pick(&mut rng).is_none());
	}
}

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use super::context::{Context, Order, Successor};
use super::state::State;
use crate::error::{MarkovError, Result};
use crate::tokenizer::is_terminal;

/// Word-level Markov transition table.
///
/// Maps each context to the list of successors observed after it in the
/// corpus. The `Start` context lists the words that may open a sentence:
/// the first word of the corpus and every word that follows a terminal word.
///
/// # Responsibilities
/// - Build an order-1 table keyed by single words
/// - Build an order-2 table keyed by pairs of consecutive words
/// - Expose read-only lookups for the sampler
///
/// # Invariants
/// - The table is never mutated after construction
/// - Terminal contexts hold `[Successor::End]`
/// - The last context of the corpus is always closed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionTable {
	order: Order,
	states: HashMap<Context, State>,
}

/// Summary of a transition table.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TableStats {
	pub order: Order,
	/// Number of word contexts, `Start` excluded.
	pub contexts: usize,
	pub start_words: usize,
	pub closed_contexts: usize,
	/// Total number of recorded word successors.
	pub transitions: usize,
}

impl TransitionTable {
	/// Builds a table of the given order from a token sequence.
	pub fn build(tokens: &[String], order: Order) -> Result<Self> {
		match order {
			Order::First => Self::first_order(tokens),
			Order::Second => Self::second_order(tokens),
		}
	}

	/// Builds an order-1 table.
	///
	/// A terminal word always maps to the end of the sentence, overwriting
	/// whatever an earlier occurrence of the same text recorded. The last word
	/// of the corpus is closed the same way, even if it is not terminal.
	///
	/// # Errors
	/// Returns `EmptyCorpus` if `tokens` is empty.
	pub fn first_order(tokens: &[String]) -> Result<Self> {
		let Some(last) = tokens.last() else {
			return Err(MarkovError::EmptyCorpus);
		};

		let mut start = State::default();
		let mut states: HashMap<Context, State> = HashMap::new();

		if tokens.len() == 1 {
			start.push_word(last);
		}

		for (i, pair) in tokens.windows(2).enumerate() {
			let (current, next) = (&pair[0], &pair[1]);
			let key = Context::Single(current.clone());

			if i == 0 {
				start.push_word(current);
				states.insert(key, State::with_word(next));
			} else if is_terminal(current) {
				start.push_word(next);
				states.insert(key, State::closed());
			} else {
				states.entry(key).or_default().push_word(next);
			}
		}

		states.insert(Context::Single(last.clone()), State::closed());
		states.insert(Context::Start, start);

		let table = Self { order: Order::First, states };
		debug!("Built order-1 table: {:?}", table.stats());
		Ok(table)
	}

	/// Builds an order-2 table.
	///
	/// Scans the corpus once, tracking whether the scan sits between two
	/// sentences. Every word read between sentences becomes a start word.
	/// A pair whose first word is terminal maps to the end of the sentence,
	/// and so does the final pair of the corpus. A terminal last word has no
	/// pair to close.
	///
	/// # Errors
	/// - `EmptyCorpus` if `tokens` is empty
	/// - `TooFewTokens` if `tokens` holds a single word
	pub fn second_order(tokens: &[String]) -> Result<Self> {
		let n = tokens.len();
		if n == 0 {
			return Err(MarkovError::EmptyCorpus);
		}
		if n < 2 {
			return Err(MarkovError::TooFewTokens { order: 2, found: n });
		}

		let mut start = State::default();
		let mut states: HashMap<Context, State> = HashMap::new();
		let mut between_sentences = true;

		for (i, word) in tokens.iter().enumerate() {
			if between_sentences {
				start.push_word(word);
			}

			let terminal = is_terminal(word);
			if !terminal && i + 2 < n {
				let key = Context::Pair(word.clone(), tokens[i + 1].clone());
				states.entry(key).or_default().push_word(&tokens[i + 2]);
			}

			if terminal && i + 1 < n {
				let key = Context::Pair(word.clone(), tokens[i + 1].clone());
				states.insert(key, State::closed());
			}
			between_sentences = terminal;
		}

		let last = Context::Pair(tokens[n - 2].clone(), tokens[n - 1].clone());
		states.insert(last, State::closed());
		states.insert(Context::Start, start);

		let table = Self { order: Order::Second, states };
		debug!("Built order-2 table: {:?}", table.stats());
		Ok(table)
	}

	/// Assembles a table from raw states, bypassing the builders.
	#[cfg(test)]
	pub(crate) fn from_parts(order: Order, states: HashMap<Context, State>) -> Self {
		Self { order, states }
	}

	pub fn order(&self) -> Order {
		self.order
	}

	/// Returns the state for `context`, if any.
	pub fn get(&self, context: &Context) -> Option<&State> {
		self.states.get(context)
	}

	/// Returns the successors recorded for `context`, if any.
	pub fn successors(&self, context: &Context) -> Option<&[Successor]> {
		self.get(context).map(State::successors)
	}

	/// Returns the sentence start state, if any.
	pub fn start(&self) -> Option<&State> {
		self.get(&Context::Start)
	}

	/// Iterates over the candidate sentence start words, duplicates included.
	pub fn start_words(&self) -> impl Iterator<Item = &str> {
		self.start()
			.into_iter()
			.flat_map(State::successors)
			.filter_map(Successor::word)
	}

	/// Iterates over all contexts, `Start` included, in no particular order.
	pub fn contexts(&self) -> impl Iterator<Item = &Context> {
		self.states.keys()
	}

	/// Number of contexts, `Start` included.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	pub fn stats(&self) -> TableStats {
		let words = self.states.iter().filter(|(context, _)| **context != Context::Start);

		let mut stats = TableStats {
			order: self.order,
			contexts: 0,
			start_words: self.start_words().count(),
			closed_contexts: 0,
			transitions: 0,
		};
		for (_, state) in words {
			stats.contexts += 1;
			if state.is_closed() {
				stats.closed_contexts += 1;
			} else {
				stats.transitions += state.len();
			}
		}
		stats
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tokenizer::tokenize;

	fn words(text: &str) -> Vec<String> {
		tokenize(text)
	}

	fn single(word: &str) -> Context {
		Context::Single(word.to_owned())
	}

	fn pair(first: &str, second: &str) -> Context {
		Context::Pair(first.to_owned(), second.to_owned())
	}

	fn successor_words(table: &TransitionTable, context: &Context) -> Vec<String> {
		table
			.successors(context)
			.unwrap_or_else(|| panic!("missing context {context}"))
			.iter()
			.map(|s| s.word().unwrap_or("").to_owned())
			.collect()
	}

	#[test]
	fn test_first_order_scenario() {
		let table = TransitionTable::first_order(&words("I am. You are.")).unwrap();

		assert_eq!(successor_words(&table, &Context::Start), vec!["I", "You"]);
		assert_eq!(successor_words(&table, &single("I")), vec!["am."]);
		assert_eq!(table.successors(&single("am.")), Some(&[Successor::End][..]));
		assert_eq!(successor_words(&table, &single("You")), vec!["are."]);
		assert_eq!(table.successors(&single("are.")), Some(&[Successor::End][..]));
		assert_eq!(table.len(), 5);
	}

	#[test]
	fn test_first_order_duplicates() {
		let table = TransitionTable::first_order(&words("la la la land. la di da.")).unwrap();
		assert_eq!(successor_words(&table, &single("la")), vec!["la", "la", "land.", "di"]);
		assert_eq!(successor_words(&table, &Context::Start), vec!["la", "la"]);
	}

	#[test]
	fn test_first_order_last_word_closed() {
		let table = TransitionTable::first_order(&words("over and over and")).unwrap();
		assert!(table.get(&single("and")).unwrap().is_closed());
		assert_eq!(successor_words(&table, &single("over")), vec!["and", "and"]);
	}

	#[test]
	fn test_first_order_terminal_first_word_is_fresh() {
		// The very first word keeps its successor even when terminal.
		let table = TransitionTable::first_order(&words("Go! now")).unwrap();
		assert_eq!(successor_words(&table, &single("Go!")), vec!["now"]);
		assert_eq!(successor_words(&table, &Context::Start), vec!["Go!"]);
		assert!(table.get(&single("now")).unwrap().is_closed());
	}

	#[test]
	fn test_first_order_terminal_overwrites() {
		let table = TransitionTable::first_order(&words("Go! now Go! again")).unwrap();
		assert!(table.get(&single("Go!")).unwrap().is_closed());
		assert_eq!(successor_words(&table, &Context::Start), vec!["Go!", "again"]);
	}

	#[test]
	fn test_first_order_single_token() {
		let table = TransitionTable::first_order(&words("hello")).unwrap();
		assert_eq!(successor_words(&table, &Context::Start), vec!["hello"]);
		assert!(table.get(&single("hello")).unwrap().is_closed());
	}

	#[test]
	fn test_first_order_empty() {
		assert!(matches!(TransitionTable::first_order(&[]), Err(MarkovError::EmptyCorpus)));
	}

	#[test]
	fn test_second_order_scenario() {
		let table = TransitionTable::second_order(&words("I am fine. You are great.")).unwrap();

		assert_eq!(successor_words(&table, &pair("I", "am")), vec!["fine."]);
		assert_eq!(successor_words(&table, &pair("am", "fine.")), vec!["You"]);
		assert!(table.get(&pair("fine.", "You")).unwrap().is_closed());
		assert_eq!(successor_words(&table, &pair("You", "are")), vec!["great."]);
		assert!(table.get(&pair("are", "great.")).unwrap().is_closed());
		assert_eq!(successor_words(&table, &Context::Start), vec!["I", "You"]);
	}

	#[test]
	fn test_second_order_final_pair_closed() {
		let table = TransitionTable::second_order(&words("na na na na")).unwrap();
		assert!(table.get(&pair("na", "na")).unwrap().is_closed());
	}

	#[test]
	fn test_second_order_terminal_before_last() {
		let table = TransitionTable::second_order(&words("so long. bye")).unwrap();
		assert!(table.get(&pair("long.", "bye")).unwrap().is_closed());
		assert_eq!(successor_words(&table, &Context::Start), vec!["so", "bye"]);
	}

	#[test]
	fn test_second_order_too_short() {
		assert!(matches!(
			TransitionTable::second_order(&words("alone")),
			Err(MarkovError::TooFewTokens { order: 2, found: 1 })
		));
		assert!(matches!(TransitionTable::second_order(&[]), Err(MarkovError::EmptyCorpus)));
	}

	#[test]
	fn test_idempotent() {
		let tokens = words("She loves you. Yeah, yeah, yeah. She loves you!");
		for order in [Order::First, Order::Second] {
			let a = TransitionTable::build(&tokens, order).unwrap();
			let b = TransitionTable::build(&tokens, order).unwrap();
			assert_eq!(a, b);
		}
	}

	#[test]
	fn test_stats() {
		let stats = TransitionTable::first_order(&words("I am. You are.")).unwrap().stats();
		assert_eq!(
			stats,
			TableStats { order: Order::First, contexts: 4, start_words: 2, closed_contexts: 2, transitions: 2 }
		);
	}
}

use log::trace;
use rand::Rng;

use super::context::{Context, Order, Successor};
use super::transition_table::TransitionTable;
use crate::error::{MarkovError, Result};
use crate::tokenizer::starts_line;

/// Accumulates the words of a generated sentence.
///
/// Words starting with an uppercase letter open a new line, other words are
/// appended after a single space.
struct Sentence {
	text: String,
}

impl Sentence {
	fn new(first: &str) -> Self {
		Self { text: first.to_owned() }
	}

	fn push(&mut self, word: &str) {
		if starts_line(word) {
			self.text.push('\n');
		} else {
			self.text.push(' ');
		}
		self.text.push_str(word);
	}
}

/// Samples one sentence from a table of either order.
///
/// `tokens` is the corpus the table was built from; only the order-2 sampler
/// reads it.
pub fn sample_sentence<R: Rng + ?Sized>(
	table: &TransitionTable,
	tokens: &[String],
	rng: &mut R,
) -> Result<String> {
	match table.order() {
		Order::First => sample_first_order(table, rng),
		Order::Second => sample_second_order(table, tokens, rng),
	}
}

/// Samples one sentence from an order-1 table.
///
/// Draws the opening word from the sentence start context, then follows
/// single-word contexts until the end marker is drawn.
///
/// # Errors
/// - `NoStartWords` if the table has no sentence start candidates
/// - `BrokenChain` if a word on the walk has no entry
pub fn sample_first_order<R: Rng + ?Sized>(table: &TransitionTable, rng: &mut R) -> Result<String> {
	let first = match table.start().and_then(|start| start.pick(rng)) {
		Some(Successor::Word(word)) => word,
		_ => return Err(MarkovError::NoStartWords),
	};

	walk(table, Context::Single(first.clone()), Sentence::new(first), rng)
}

/// Samples one sentence from an order-2 table.
///
/// Seeds the context with a random pair of consecutive corpus words, which
/// both open the sentence, then slides the pair forward until a closed
/// context is reached.
///
/// # Errors
/// - `TooFewTokens` if `tokens` cannot provide a pair
/// - `UnknownContext` if the seed pair is not in the table
/// - `BrokenChain` if a later pair has no entry
pub fn sample_second_order<R: Rng + ?Sized>(
	table: &TransitionTable,
	tokens: &[String],
	rng: &mut R,
) -> Result<String> {
	if tokens.len() < 2 {
		return Err(MarkovError::TooFewTokens { order: 2, found: tokens.len() });
	}

	let index = rng.random_range(0..tokens.len() - 1);
	let (first, second) = (&tokens[index], &tokens[index + 1]);
	let seed = Context::Pair(first.clone(), second.clone());
	if table.get(&seed).is_none() {
		return Err(MarkovError::UnknownContext(seed));
	}

	let mut sentence = Sentence::new(first);
	sentence.text.push(' ');
	sentence.text.push_str(second);

	walk(table, seed, sentence, rng)
}

/// Follows the chain from `context` until the end marker is drawn.
fn walk<R: Rng + ?Sized>(
	table: &TransitionTable,
	mut context: Context,
	mut sentence: Sentence,
	rng: &mut R,
) -> Result<String> {
	loop {
		let Some(state) = table.get(&context) else {
			return Err(MarkovError::BrokenChain(context));
		};
		if state.is_closed() {
			break;
		}

		let word = match state.pick(rng) {
			Some(Successor::Word(word)) => word,
			Some(Successor::End) => break,
			None => return Err(MarkovError::BrokenChain(context)),
		};
		trace!("{context} -> {word:?}");

		sentence.push(word);
		context = context.advance(word);
	}

	Ok(sentence.text)
}

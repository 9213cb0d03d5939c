use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::{debug, info};
use rand::Rng;

use super::context::Order;
use super::generation_input::GenerationInput;
use super::sampler;
use super::transition_table::{TableStats, TransitionTable};
use crate::error::{MarkovError, Result};
use crate::io;
use crate::tokenizer::tokenize;

/// High-level lyric generator built from a corpus.
///
/// # Responsibilities
/// - Load and tokenize a corpus folder or raw text
/// - Own the order-1 and order-2 transition tables
/// - Generate one or many sentences, with retries and optional worker threads
#[derive(Debug)]
pub struct Generator {
	tokens: Vec<String>,
	first_order: TransitionTable,
	second_order: Option<TransitionTable>,
	sources: Vec<String>,
}

impl Generator {
	/// Creates a generator from every `.txt` file of a folder.
	///
	/// Files are read in name order and concatenated without separator.
	/// Both `"folder"` and `"folder/"` are accepted.
	///
	/// # Errors
	/// - `NoCorpusFiles` if the folder holds no `.txt` file
	/// - `Io` if the folder or a file cannot be read
	/// - `EmptyCorpus` if the files contain no words
	pub fn new<P: AsRef<Path>>(folder: P) -> Result<Self> {
		let folder = io::normalize_folder(folder.as_ref());
		let names = io::list_files(&folder, io::CORPUS_EXTENSION)?;
		if names.is_empty() {
			return Err(MarkovError::NoCorpusFiles(folder));
		}
		Self::from_files(folder, &names)
	}

	/// Creates a generator from the named files of a folder, in the given order.
	pub fn from_files<P: AsRef<Path>>(folder: P, names: &[String]) -> Result<Self> {
		let folder = folder.as_ref();
		if names.is_empty() {
			return Err(MarkovError::NoCorpusFiles(folder.to_path_buf()));
		}

		let text = io::combine_files(folder, names)?;
		let mut generator = Self::from_text(&text)?;
		generator.sources = names.to_vec();
		info!("Loaded {} corpus file(s) from {}", names.len(), folder.display());
		Ok(generator)
	}

	pub fn from_text(text: &str) -> Result<Self> {
		Self::from_tokens(tokenize(text))
	}

	/// Builds both tables from a token sequence.
	///
	/// The order-2 table is skipped when the corpus holds a single word.
	pub fn from_tokens(tokens: Vec<String>) -> Result<Self> {
		let first_order = TransitionTable::first_order(&tokens)?;
		let second_order = if tokens.len() >= 2 {
			Some(TransitionTable::second_order(&tokens)?)
		} else {
			None
		};

		debug!("Generator ready with {} tokens", tokens.len());
		Ok(Self { tokens, first_order, second_order, sources: Vec::new() })
	}

	/// Assembles a generator around hand-made tables, bypassing the builders.
	#[cfg(test)]
	pub(crate) fn from_tables(
		tokens: Vec<String>,
		first_order: TransitionTable,
		second_order: Option<TransitionTable>,
	) -> Self {
		Self { tokens, first_order, second_order, sources: Vec::new() }
	}

	/// File names the corpus was assembled from, empty for raw text.
	pub fn sources(&self) -> &[String] {
		&self.sources
	}

	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	/// Returns the table of the given order.
	///
	/// # Errors
	/// `TooFewTokens` if the corpus is too short for an order-2 table.
	pub fn table(&self, order: Order) -> Result<&TransitionTable> {
		match order {
			Order::First => Ok(&self.first_order),
			Order::Second => self
				.second_order
				.as_ref()
				.ok_or(MarkovError::TooFewTokens { order: 2, found: self.tokens.len() }),
		}
	}

	pub fn stats(&self) -> Vec<TableStats> {
		std::iter::once(&self.first_order)
			.chain(self.second_order.as_ref())
			.map(TransitionTable::stats)
			.collect()
	}

	/// Samples a single sentence with no retry.
	pub fn sample_sentence<R: Rng + ?Sized>(&self, order: Order, rng: &mut R) -> Result<String> {
		sampler::sample_sentence(self.table(order)?, &self.tokens, rng)
	}

	/// Samples `count` sentences in order, stopping at the first failure.
	pub fn sample_sentences<R: Rng + ?Sized>(
		&self,
		order: Order,
		count: usize,
		rng: &mut R,
	) -> Result<Vec<String>> {
		(0..count).map(|_| self.sample_sentence(order, rng)).collect()
	}

	/// Samples a sentence, redrawing up to `nb_try` more times on retryable errors.
	fn sample_with_retries<R: Rng + ?Sized>(&self, order: Order, nb_try: usize, rng: &mut R) -> Result<String> {
		let mut remaining = nb_try;
		loop {
			match self.sample_sentence(order, rng) {
				Err(e) if e.is_retryable() && remaining > 0 => {
					debug!("Retrying sentence ({remaining} left): {e}");
					remaining -= 1;
				}
				result => return result,
			}
		}
	}

	fn generate_chunk<R: Rng + ?Sized>(&self, input: &GenerationInput, count: usize, rng: &mut R) -> Result<Vec<String>> {
		(0..count)
			.map(|_| self.sample_with_retries(input.order, input.nb_try, rng))
			.collect()
	}

	/// Generates `input.sentences` sentences.
	///
	/// With more than one worker, the sentences are split into contiguous
	/// chunks sampled on scoped threads, each with its own random source.
	/// Chunks are reassembled in worker order, so a fixed seed and worker
	/// count always give the same output.
	///
	/// # Errors
	/// The first error of the lowest failing chunk.
	pub fn generate(&self, input: &GenerationInput) -> Result<Vec<String>> {
		// Fail fast on an order the corpus cannot serve.
		self.table(input.order)?;

		let workers = input.workers();
		if workers == 1 {
			let mut rng = input.seed.rng(0);
			return self.generate_chunk(input, input.sentences, &mut rng);
		}

		let chunk_size = input.sentences.div_ceil(workers);
		debug!("Generating {} sentences on {workers} workers", input.sentences);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for worker in 0..workers {
				let start = worker * chunk_size;
				let count = chunk_size.min(input.sentences.saturating_sub(start));
				if count == 0 {
					break;
				}

				let tx = tx.clone();
				scope.spawn(move || {
					let mut rng = input.seed.rng(worker);
					// The receiver outlives the scope.
					let _ = tx.send((worker, self.generate_chunk(input, count, &mut rng)));
				});
			}
		});
		drop(tx);

		let mut chunks: Vec<_> = rx.iter().collect();
		chunks.sort_by_key(|(worker, _)| *worker);

		let mut sentences = Vec::with_capacity(input.sentences);
		for (_, chunk) in chunks {
			sentences.extend(chunk?);
		}
		Ok(sentences)
	}

	/// Generates text with a line break after every sentence.
	pub fn generate_text(&self, input: &GenerationInput) -> Result<String> {
		let mut text = String::new();
		for sentence in self.generate(input)? {
			text.push_str(&sentence);
			text.push('\n');
		}
		Ok(text)
	}
}

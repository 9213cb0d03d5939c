use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::context::Order;

/// Strategy used to seed the random source of a generation run.
///
/// # Variants
/// - `Entropy`: draw fresh randomness from the operating system.
/// - `Fixed(u64)`: reproducible output for a given seed and worker count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Seed {
	Entropy,
	Fixed(u64),
}

impl Seed {
	/// Builds the random source of worker `worker`.
	///
	/// Fixed seeds are offset by the worker index so that workers draw
	/// independent sequences.
	pub(crate) fn rng(self, worker: usize) -> SmallRng {
		match self {
			Seed::Entropy => SmallRng::from_os_rng(),
			Seed::Fixed(seed) => SmallRng::seed_from_u64(seed.wrapping_add(worker as u64)),
		}
	}
}

/// Input parameters for a multi-sentence generation run.
///
/// # Responsibilities
/// - Select the model order and the number of sentences
/// - Bound how many times a failed sentence is redrawn (`nb_try`)
/// - Control seeding and the number of worker threads
pub struct GenerationInput {
	/// Model order to sample from.
	pub order: Order,

	/// Number of sentences to generate.
	pub sentences: usize,

	/// Number of extra attempts for a sentence that hit a retryable error.
	pub nb_try: usize,

	/// Random seed strategy.
	pub seed: Seed,

	/// Worker threads; 0 means one per logical CPU.
	workers: usize,
}

impl GenerationInput {
	/// Creates a sequential, entropy-seeded input with no retries.
	pub fn new(order: Order, sentences: usize) -> Self {
		Self { order, sentences, nb_try: 0, seed: Seed::Entropy, workers: 1 }
	}

	/// Sets the number of worker threads (0 = one per logical CPU).
	pub fn set_workers(&mut self, workers: usize) {
		self.workers = workers;
	}

	/// Number of workers actually used: never more than one per sentence,
	/// never less than one.
	pub fn workers(&self) -> usize {
		let requested = if self.workers == 0 { num_cpus::get() } else { self.workers };
		requested.min(self.sentences).max(1)
	}
}

//! Error types for table construction, sampling and corpus loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::context::Context;

/// Errors that can occur while building a transition table or sampling from it.
///
/// Sampling errors are local to a single sentence attempt: the table is never
/// mutated, so a caller may retry with a new random draw.
#[derive(Debug, Error)]
pub enum MarkovError {
	/// The corpus contains no tokens.
	#[error("corpus is empty")]
	EmptyCorpus,

	/// The corpus is too short for the requested model order.
	#[error("order-{order} model needs at least {order} tokens, found {found}")]
	TooFewTokens { order: usize, found: usize },

	/// The sentence-start context has no candidate words.
	#[error("no sentence start words available")]
	NoStartWords,

	/// The randomly chosen seed context does not exist in the table.
	#[error("unknown context {0}")]
	UnknownContext(Context),

	/// A context reached during the walk has no entry.
	#[error("broken chain at context {0}")]
	BrokenChain(Context),

	/// Model order could not be parsed.
	#[error("invalid model order: {0:?} (expected 1 or 2)")]
	InvalidOrder(String),

	/// The corpus folder holds no usable files.
	#[error("no corpus files found in {}", .0.display())]
	NoCorpusFiles(PathBuf),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl MarkovError {
	/// Whether a fresh random draw can succeed where this attempt failed.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::UnknownContext(_) | Self::BrokenChain(_))
	}
}

pub type Result<T> = std::result::Result<T, MarkovError>;

//! Markov chain lyric generation library.
//!
//! This crate turns a corpus of song lyrics into word-level Markov models and
//! samples new lyrics from them:
//! - Whitespace tokenization with sentence-ending punctuation
//! - Order-1 and order-2 transition tables
//! - Sentence sampling with an injectable random source
//! - Multi-sentence generation with retries and worker threads

/// Error type shared by the whole crate.
pub mod error;

/// Corpus folder helpers (file listing and concatenation).
pub mod io;

/// Markov models and generation logic.
pub mod model;

pub mod tokenizer;

pub use error::{MarkovError, Result};
pub use model::context::{Context, Order, Successor};
pub use model::generation_input::{GenerationInput, Seed};
pub use model::generator::Generator;
pub use model::transition_table::{TableStats, TransitionTable};

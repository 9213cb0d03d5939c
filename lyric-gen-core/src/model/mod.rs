//! Word-level Markov chain models and lyric generation.
//!
//! - Contexts, model orders and successors (`context`)
//! - Per-context successor lists (`state`)
//! - Order-1 and order-2 transition tables (`transition_table`)
//! - Sentence sampling (`sampler`)
//! - Generation parameters (`generation_input`)
//! - The high-level `Generator`

pub mod context;

/// Entry of one context in a transition table.
pub mod state;

/// Transition tables built once from a token sequence and read-only afterwards.
pub mod transition_table;

/// Random walks over a transition table, one sentence at a time.
pub mod sampler;

pub mod generation_input;

/// High-level interface: corpus loading, retries and parallel generation.
pub mod generator;

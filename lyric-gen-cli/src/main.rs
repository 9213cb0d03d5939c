use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use lyric_gen_core::{GenerationInput, Generator, Order, Seed};

/// Generate song lyrics from a corpus with a word-level Markov chain.
#[derive(Parser, Debug)]
#[command(name = "lyric-gen", version, about)]
struct Cli {
    /// Folder holding the `.txt` corpus files
    #[arg(long, env = "LYRIC_GEN_CORPUS", default_value = "./data")]
    corpus: PathBuf,

    /// Model order: 1 (single word context) or 2 (word pairs)
    #[arg(long, default_value = "1")]
    order: Order,

    /// Number of sentences to generate
    #[arg(long, default_value_t = 10)]
    sentences: usize,

    /// Fixed random seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Extra attempts for a sentence that hits a dead end
    #[arg(long, default_value_t = 5)]
    nb_try: usize,

    /// Worker threads (0 = one per CPU)
    #[arg(long, default_value_t = 1)]
    workers: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let generator = Generator::new(&cli.corpus)
        .with_context(|| format!("failed to load corpus from {}", cli.corpus.display()))?;
    debug!("corpus files: {:?}", generator.sources());

    let mut input = GenerationInput::new(cli.order, cli.sentences);
    input.nb_try = cli.nb_try;
    if let Some(seed) = cli.seed {
        input.seed = Seed::Fixed(seed);
    }
    input.set_workers(cli.workers);

    let text = generator
        .generate_text(&input)
        .with_context(|| format!("failed to generate {} order-{} sentence(s)", cli.sentences, cli.order))?;
    print!("{text}");

    Ok(())
}

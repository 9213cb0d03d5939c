use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware, put, web};
use clap::Parser;
use log::{info, warn};
use serde::Deserialize;

use lyric_gen_core::io::{CORPUS_EXTENSION, list_files, normalize_folder};
use lyric_gen_core::{GenerationInput, Generator, MarkovError, Order, Seed};

/// Upper bound on sentences per request.
const MAX_SENTENCES: usize = 1000;

/// HTTP server for the lyric generator.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Config {
	/// Folder holding the `.txt` corpus files
	#[arg(long, env = "LYRIC_GEN_CORPUS", default_value = "./data")]
	corpus: PathBuf,

	/// Address to bind
	#[arg(long, env = "LYRIC_GEN_BIND", default_value = "127.0.0.1")]
	bind: String,

	/// Port to listen on
	#[arg(long, env = "LYRIC_GEN_PORT", default_value_t = 5000)]
	port: u16,
}

/// Query parameters of the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	order: Option<String>,
	sentences: Option<usize>,
	seed: Option<u64>,
	nb_try: Option<usize>,
	workers: Option<usize>,
}

#[derive(Deserialize)]
struct CorporaQuery {
	names: Option<String>,
}

struct SharedData {
	generator: Option<Generator>,
	corpus_dir: PathBuf,
}

/// Outcome of a generation run on the blocking thread pool.
enum Generated {
	Done(Result<String, MarkovError>),
	NoCorpus,
	LockFailed,
}

impl GenerateParams {
	/// Builds the generation input, defaulting to one order-1 sentence.
	fn to_input(&self) -> Result<GenerationInput, String> {
		let order = match &self.order {
			None => Order::First,
			Some(s) => s.parse::<Order>().map_err(|e| e.to_string())?,
		};

		let sentences = self.sentences.unwrap_or(1);
		if sentences > MAX_SENTENCES {
			return Err(format!("sentences must be at most {MAX_SENTENCES}"));
		}

		let mut input = GenerationInput::new(order, sentences);
		input.nb_try = self.nb_try.unwrap_or(5);
		if let Some(seed) = self.seed {
			input.seed = Seed::Fixed(seed);
		}
		// Worker threads are capped at one per logical CPU.
		input.set_workers(self.workers.unwrap_or(1).min(num_cpus::get()));
		Ok(input)
	}
}

fn error_response(e: &MarkovError) -> HttpResponse {
	match e {
		MarkovError::InvalidOrder(_) => HttpResponse::BadRequest().body(e.to_string()),
		MarkovError::EmptyCorpus => HttpResponse::UnprocessableEntity().body(e.to_string()),
		MarkovError::NoCorpusFiles(_) => HttpResponse::NotFound().body(e.to_string()),
		MarkovError::Io(io) if io.kind() == ErrorKind::NotFound => HttpResponse::NotFound().body(e.to_string()),
		_ => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates lyrics from the loaded corpus, one sentence per line.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<RwLock<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let input = match query.to_input() {
		Ok(input) => input,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	// Generation may fan out to worker threads, keep it off the async workers.
	let generated = web::block(move || {
		let shared_data = match data.read() {
			Ok(d) => d,
			Err(_) => return Generated::LockFailed,
		};
		match &shared_data.generator {
			Some(generator) => Generated::Done(generator.generate_text(&input)),
			None => Generated::NoCorpus,
		}
	})
	.await;

	match generated {
		Ok(Generated::Done(Ok(text))) => HttpResponse::Ok().body(text),
		Ok(Generated::Done(Err(e))) => error_response(&e),
		Ok(Generated::NoCorpus) => HttpResponse::Conflict().body("No corpus loaded"),
		Ok(Generated::LockFailed) => HttpResponse::InternalServerError().body("Generator lock failed"),
		Err(_) => HttpResponse::InternalServerError().body("Generation task failed"),
	}
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let corpus_dir = match data.read() {
		Ok(d) => d.corpus_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};

	match list_files(&corpus_dir, CORPUS_EXTENSION) {
		Ok(files) => HttpResponse::Ok().body(files.iter().map(|f| strip_extension(f)).collect::<Vec<_>>().join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/loaded_corpora")]
async fn get_loaded_corpora(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	let names = match &shared_data.generator {
		Some(generator) => generator.sources().iter().map(|f| strip_extension(f)).collect::<Vec<_>>(),
		None => Vec::new(),
	};
	HttpResponse::Ok().body(names.join("\n"))
}

#[get("/v1/stats")]
async fn get_stats(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(d) => d,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	match &shared_data.generator {
		Some(generator) => HttpResponse::Ok().json(generator.stats()),
		None => HttpResponse::Conflict().body("No corpus loaded"),
	}
}

#[put("/v1/load_corpora")]
async fn put_corpora(data: web::Data<RwLock<SharedData>>, query: web::Query<CorporaQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let file_names: Vec<String> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.map(|s| format!("{s}.{CORPUS_EXTENSION}"))
		.collect();
	if file_names.iter().any(|f| f.contains(['/', '\\'])) {
		return HttpResponse::BadRequest().body("Corpus names cannot contain path separators");
	}

	let corpus_dir = match data.read() {
		Ok(d) => d.corpus_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};

	// Build outside the write lock so readers keep generating meanwhile.
	let generator = match Generator::from_files(&corpus_dir, &file_names) {
		Ok(g) => g,
		Err(e) => return error_response(&e),
	};

	match data.write() {
		Ok(mut d) => d.generator = Some(generator),
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	}

	info!("Loaded corpora: {query_names}");
	HttpResponse::Ok().body("Corpora loaded successfully")
}

fn strip_extension(file: &str) -> &str {
	file.strip_suffix(&format!(".{CORPUS_EXTENSION}")).unwrap_or(file)
}

/// Main entry point for the server.
///
/// Loads every corpus file of the configured folder when possible, wraps the
/// generator in a `RwLock` and starts the Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();
	let config = Config::parse();
	let corpus_dir = normalize_folder(&config.corpus);

	let generator = match Generator::new(&corpus_dir) {
		Ok(g) => Some(g),
		Err(e) => {
			warn!("Starting without a corpus: {e}");
			None
		}
	};
	let shared_data = web::Data::new(RwLock::new(SharedData { generator, corpus_dir }));

	info!("Listening on {}:{}", config.bind, config.port);
	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_generated)
			.service(get_corpora)
			.service(get_loaded_corpora)
			.service(get_stats)
			.service(put_corpora)
	})
		.bind((config.bind.as_str(), config.port))?
		.run()
		.await
}

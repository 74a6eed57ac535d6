use clap::Parser;
use csl::{
    config::EngineConfig,
    host::{HostFixture, InMemoryHost},
    log_sink::MemoryLogSink,
    CslResult, Engine, Error,
};
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON fixture with coach definitions, answers, metadata and handlers
    #[arg(short, long)]
    fixture: PathBuf,

    /// Coach to evaluate
    #[arg(short, long)]
    coach: String,

    /// Question to evaluate; all questions in definition order when omitted
    #[arg(short, long)]
    question: Option<String>,

    /// Path to config file
    #[arg(long, default_value = "csl.json")]
    config: PathBuf,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli, engine: &Engine) -> CslResult<usize> {
    match &cli.question {
        Some(question) => engine.evaluate_question(&cli.coach, question),
        None => engine.evaluate_coach(&cli.coach),
    }
}

fn print_state(engine: &Engine, log: &MemoryLogSink, coach: &str) -> CslResult<()> {
    let snapshot = engine.snapshot(coach)?;
    let json = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| Error::Config(format!("Failed to render snapshot: {}", e)))?;
    println!("{}", json);
    for record in log.records() {
        println!("[{} {}] {}", record.instance_id, record.question_id, record.message);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = if cli.config.exists() {
        match EngineConfig::from_file(&cli.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        // Default config
        EngineConfig::default()
    };
    info!("config loaded.");
    debug!("config: {:?}", config);

    let host = match HostFixture::from_file(&cli.fixture) {
        Ok(fixture) => Arc::new(InMemoryHost::from_fixture(fixture)),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let log = Arc::new(MemoryLogSink::new());
    let engine = Engine::with_log_sink(host, log.clone(), config);

    let outcome = run(&cli, &engine);
    if let Err(e) = print_state(&engine, &log, &cli.coach) {
        eprintln!("Error: {}", e);
    }
    match outcome {
        Ok(executed) => info!("{} lines executed", executed),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

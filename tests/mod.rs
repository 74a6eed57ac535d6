mod coach_tests;

use std::sync::Arc;

use csl::{
    config::EngineConfig,
    host::{CoachDefinition, InMemoryHost},
    log_sink::MemoryLogSink,
    Engine,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[ctor::ctor]
fn init_tests() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

pub struct TestCoach {
    pub host: Arc<InMemoryHost>,
    pub log: Arc<MemoryLogSink>,
    pub engine: Engine,
}

pub fn setup(coaches: Vec<CoachDefinition>) -> TestCoach {
    let host = Arc::new(InMemoryHost::new());
    for coach in coaches {
        host.add_coach(coach);
    }
    let log = Arc::new(MemoryLogSink::new());
    let engine = Engine::with_log_sink(host.clone(), log.clone(), EngineConfig::default());
    TestCoach { host, log, engine }
}

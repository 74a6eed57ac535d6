//! # Host Collaborators
//!
//! Everything the interpreter needs from the surrounding platform goes
//! through [`CoachHost`]: stored answers, coach definitions, registered
//! handlers, subcoach bookkeeping and metadata. All calls are point lookups or
//! writes; the most recent write wins.
//!
//! [`InMemoryHost`] is a complete implementation backed by maps. It can be
//! loaded from a JSON [`HostFixture`], which is what the `csl` binary does.

use std::{
    collections::{BTreeSet, HashMap},
    fs::File,
    io::BufReader,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("host lookup failed: {0}")]
    Lookup(String),
    #[error("host rejected {operation}: {message}")]
    Rejected { operation: String, message: String },
    #[error("invalid fixture: {0}")]
    Fixture(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// A stored answer: the selected option ids and any free text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Answer {
    pub fn with_options<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            text: None,
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            options: Vec::new(),
            text: Some(text.into()),
        }
    }

    /// Space-delimited tokens of every option and of the free text.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .map(String::as_str)
            .chain(self.text.as_deref())
            .flat_map(|s| s.split(' '))
            .filter(|token| !token.is_empty())
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.tokens().any(|t| t == token)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub id: String,
    /// Per-question logic text.
    #[serde(default)]
    pub logic: String,
}

impl QuestionDefinition {
    pub fn new(id: impl Into<String>, logic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            logic: logic.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoachDefinition {
    pub id: String,
    /// Logic run before every question's own logic.
    #[serde(default)]
    pub pre_logic: String,
    /// Logic run after every question's own logic.
    #[serde(default)]
    pub post_logic: String,
    #[serde(default)]
    pub questions: Vec<QuestionDefinition>,
}

impl CoachDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_question(mut self, id: impl Into<String>, logic: impl Into<String>) -> Self {
        self.questions.push(QuestionDefinition::new(id, logic));
        self
    }

    pub fn with_pre_logic(mut self, logic: impl Into<String>) -> Self {
        self.pre_logic = logic.into();
        self
    }

    pub fn with_post_logic(mut self, logic: impl Into<String>) -> Self {
        self.post_logic = logic.into();
        self
    }

    pub fn question(&self, id: &str) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|q| q.id.as_str())
    }
}

/// The platform as seen by the interpreter.
///
/// `instance_id` is the fully-qualified coach-instance name of the context
/// doing the lookup: the coach id for a top-level coach, a dotted path for a
/// subcoach.
#[automock]
pub trait CoachHost: Send + Sync {
    fn answer(&self, instance_id: &str, question_id: &str) -> HostResult<Option<Answer>>;

    fn coach_definition(&self, coach_id: &str) -> HostResult<Option<Arc<CoachDefinition>>>;

    fn handlers(&self, coach_id: &str) -> HostResult<Vec<String>>;

    fn create_subcoach(&self, coach_id: &str, instance_id: &str) -> HostResult<()>;

    fn remove_subcoach(&self, coach_id: &str, instance_id: &str) -> HostResult<()>;

    fn metadata(&self, instance_id: &str, group: &str, key: &str) -> HostResult<Option<String>>;
}

/// JSON shape accepted by [`InMemoryHost::from_fixture`].
///
/// ```json
/// {
///   "coaches": [{ "id": "intro", "questions": [{ "id": "q1", "logic": "..." }] }],
///   "answers": { "intro": { "q1": { "options": ["q1_a"] } } },
///   "metadata": { "intro": { "profile": { "level": "3" } } },
///   "handlers": { "intro": ["onFinish"] }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostFixture {
    #[serde(default)]
    pub coaches: Vec<CoachDefinition>,
    #[serde(default)]
    pub answers: HashMap<String, HashMap<String, Answer>>,
    #[serde(default)]
    pub metadata: HashMap<String, HashMap<String, HashMap<String, String>>>,
    #[serde(default)]
    pub handlers: HashMap<String, Vec<String>>,
}

impl HostFixture {
    pub fn from_file<P: AsRef<Path>>(path: P) -> HostResult<Self> {
        let file = File::open(path.as_ref())
            .map_err(|e| HostError::Fixture(format!("{}: {}", path.as_ref().display(), e)))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| HostError::Fixture(e.to_string()))
    }
}

#[derive(Debug, Default)]
struct HostState {
    coaches: HashMap<String, Arc<CoachDefinition>>,
    answers: HashMap<(String, String), Answer>,
    metadata: HashMap<(String, String, String), String>,
    handlers: HashMap<String, Vec<String>>,
    instances: BTreeSet<(String, String)>,
}

/// Map-backed host. Coach and instance ids are matched case-insensitively.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    state: RwLock<HostState>,
}

fn key(id: &str) -> String {
    id.to_lowercase()
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: HostFixture) -> Self {
        let host = Self::new();
        for coach in fixture.coaches {
            host.add_coach(coach);
        }
        for (instance, answers) in fixture.answers {
            for (question, answer) in answers {
                host.set_answer(&instance, &question, answer);
            }
        }
        for (instance, groups) in fixture.metadata {
            for (group, values) in groups {
                for (k, v) in values {
                    host.set_metadata(&instance, &group, &k, v);
                }
            }
        }
        for (coach, handlers) in fixture.handlers {
            host.set_handlers(&coach, handlers);
        }
        host
    }

    pub fn add_coach(&self, coach: CoachDefinition) {
        self.write().coaches.insert(key(&coach.id), Arc::new(coach));
    }

    pub fn set_answer(&self, instance_id: &str, question_id: &str, answer: Answer) {
        self.write()
            .answers
            .insert((key(instance_id), question_id.to_string()), answer);
    }

    pub fn clear_answer(&self, instance_id: &str, question_id: &str) {
        self.write()
            .answers
            .remove(&(key(instance_id), question_id.to_string()));
    }

    pub fn set_metadata(&self, instance_id: &str, group: &str, k: &str, value: impl Into<String>) {
        self.write().metadata.insert(
            (key(instance_id), group.to_string(), k.to_string()),
            value.into(),
        );
    }

    pub fn set_handlers(&self, coach_id: &str, handlers: Vec<String>) {
        self.write().handlers.insert(key(coach_id), handlers);
    }

    /// Live subcoach instances as `(coach id, instance id)` pairs.
    pub fn instances(&self) -> Vec<(String, String)> {
        self.read().instances.iter().cloned().collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HostState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HostState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CoachHost for InMemoryHost {
    fn answer(&self, instance_id: &str, question_id: &str) -> HostResult<Option<Answer>> {
        Ok(self
            .read()
            .answers
            .get(&(key(instance_id), question_id.to_string()))
            .cloned())
    }

    fn coach_definition(&self, coach_id: &str) -> HostResult<Option<Arc<CoachDefinition>>> {
        Ok(self.read().coaches.get(&key(coach_id)).cloned())
    }

    fn handlers(&self, coach_id: &str) -> HostResult<Vec<String>> {
        Ok(self
            .read()
            .handlers
            .get(&key(coach_id))
            .cloned()
            .unwrap_or_default())
    }

    fn create_subcoach(&self, coach_id: &str, instance_id: &str) -> HostResult<()> {
        if !self.read().coaches.contains_key(&key(coach_id)) {
            return Err(HostError::Rejected {
                operation: "create_subcoach".to_string(),
                message: format!("unknown coach {}", coach_id),
            });
        }
        self.write()
            .instances
            .insert((key(coach_id), key(instance_id)));
        Ok(())
    }

    fn remove_subcoach(&self, coach_id: &str, instance_id: &str) -> HostResult<()> {
        self.write()
            .instances
            .remove(&(key(coach_id), key(instance_id)));
        Ok(())
    }

    fn metadata(&self, instance_id: &str, group: &str, k: &str) -> HostResult<Option<String>> {
        Ok(self
            .read()
            .metadata
            .get(&(key(instance_id), group.to_string(), k.to_string()))
            .cloned())
    }
}
